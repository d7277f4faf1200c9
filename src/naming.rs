//! Identifier derivation: snake_case schema names to target identifiers.
//!
//! Every function here is pure and total: empty tokens (consecutive, leading or
//! trailing underscores) are skipped, never an error. Generated identifiers must stay
//! stable across schema revisions, so the rules are kept here rather than inlined
//! into emission code.
//!
//! | Kind | Example input | Output |
//! |------|---------------|--------|
//! | type | `ardrone3_piloting` | `ArsdkFeatureArdrone3Piloting` |
//! | enum value | `band` + `2_4ghz` | `...Band2_4ghz` |
//! | method | `on_flying_state_changed` | `onFlyingStateChanged` |
//! | parameter | `cam_id` | `camId` |
//! | wire function | `ardrone3_piloting` + `take_off` | `ardrone3_piloting_take_off` |
//! | constant | `ArsdkFeatureArdrone3Piloting` | `ARSDK_FEATURE_ARDRONE3_PILOTING_UID` |

use convert_case::{Boundary, Case, Converter};

use crate::schema::{Arg, ArgType};

/// Default type prefix of every generated binding type.
pub const DEFAULT_PREFIX: &str = "ArsdkFeature";

/// Suffix of the enum variant returned for values unknown at generation time.
pub const UNKNOWN_SUFFIX: &str = "SdkCoreUnknown";

fn tokens(name: &str) -> impl Iterator<Item = &str> {
    name.split('_').filter(|t| !t.is_empty())
}

/// First character uppercased, the rest lowercased.
fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// First character uppercased, the rest untouched.
fn upper_first(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// CamelCase of every token.
pub fn camel(name: &str) -> String {
    tokens(name).map(capitalize).collect()
}

/// `prefix` + CamelCase of `name`.
pub fn type_name(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, camel(name))
}

pub fn enum_type_name(prefix: &str, feature: &str, enum_name: &str) -> String {
    format!("{}{}", type_name(prefix, feature), camel(enum_name))
}

/// Enum type name + CamelCase of the value tokens.
///
/// An underscore is kept between two tokens when the text so far ends with a digit and
/// the next token starts with one, so `2_4ghz` never collapses into `24ghz`.
pub fn enum_value_name(enum_type: &str, value: &str) -> String {
    let mut out = enum_type.to_string();
    for token in tokens(value) {
        let starts_with_digit = token.starts_with(|c: char| c.is_ascii_digit());
        if starts_with_digit && out.ends_with(|c: char| c.is_ascii_digit()) {
            out.push('_');
        }
        out.push_str(&capitalize(token));
    }
    out
}

pub fn unknown_value_name(enum_type: &str) -> String {
    format!("{}{}", enum_type, UNKNOWN_SUFFIX)
}

/// lowerCamel: first character lowered, following tokens upper-first, otherwise untouched.
pub fn method_name(name: &str) -> String {
    let mut parts = tokens(name);
    let mut out = parts.next().map(lower_first).unwrap_or_default();
    for token in parts {
        out.push_str(&upper_first(token));
    }
    out
}

/// lowerCamel: first token fully lowercased, following tokens upper-first.
pub fn param_name(name: &str) -> String {
    let mut parts = tokens(name);
    let mut out = parts.next().map(str::to_lowercase).unwrap_or_default();
    for token in parts {
        out.push_str(&upper_first(token));
    }
    out
}

/// Parameter name of an argument; bitfields carry a `BitField` suffix.
pub fn arg_param_name(arg: &Arg) -> String {
    match arg.ty {
        ArgType::Bitfield { .. } => format!("{}BitField", param_name(&arg.name)),
        ArgType::Int(_)
        | ArgType::Float
        | ArgType::Double
        | ArgType::String
        | ArgType::Enum(_)
        | ArgType::MultiSetting(_) => param_name(&arg.name),
    }
}

/// Name of the codec's per-message encode/decode function: `<unit>_<message>`, lowercase.
pub fn wire_function_name(unit: &str, message: &str) -> String {
    tokens(unit)
        .chain(tokens(message))
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Word boundaries of a generated CamelCase name: lower or digit followed by upper.
/// Digits never start a word, so `Ardrone3` stays one word.
const CAMEL_BOUNDARIES: [Boundary; 2] = [Boundary::LowerUpper, Boundary::DigitUpper];

/// snake_case of a CamelCase identifier; used for module and file names.
pub fn snake_name(camel_name: &str) -> String {
    Converter::new()
        .set_boundaries(&CAMEL_BOUNDARIES)
        .to_case(Case::Snake)
        .convert(camel_name)
}

/// Registration constant of a unit: SCREAMING_SNAKE of its type name + `_UID`.
pub fn constant_name(unit_type: &str) -> String {
    let screaming = Converter::new()
        .set_boundaries(&CAMEL_BOUNDARIES)
        .to_case(Case::Constant)
        .convert(unit_type);
    format!("{}_UID", screaming)
}

pub fn callback_trait_name(unit_type: &str) -> String {
    format!("{}Callback", unit_type)
}

pub fn bitfield_type_name(enum_type: &str) -> String {
    format!("{}BitField", enum_type)
}

pub fn count_const_name(enum_type: &str) -> String {
    format!("{}Cnt", enum_type)
}

/// Handler method of an event: `on_<event>` in lowerCamel.
pub fn event_handler_name(event: &str) -> String {
    method_name(&format!("on_{}", event))
}

/// Decode-and-invoke step of an event: `call<Event>`.
pub fn call_step_name(event: &str) -> String {
    format!("call{}", camel(event))
}

/// Encoder of a message: `<message>_encoder` in lowerCamel.
pub fn encoder_name(message: &str) -> String {
    method_name(&format!("{}_encoder", message))
}

/// Verification-harness command name: capitalized `<unit>_<message>` tokens, first letter lowered.
pub fn command_name(unit: &str, message: &str) -> String {
    lower_first(&camel(&format!("{}_{}", unit, message)))
}

pub fn expected_cmd_type_name(unit: &str, message: &str) -> String {
    format!("ExpectedCmd{}", upper_first(&command_name(unit, message)))
}

pub fn harness_encoder_name(unit: &str, message: &str) -> String {
    method_name(&format!("{}_encoder", command_name(unit, message)))
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "static", "struct", "trait", "true", "try", "type", "unsafe", "use", "where",
    "while", "yield", "abstract", "become", "do", "final", "gen", "macro", "override", "priv",
    "typeof", "unsized", "virtual",
];

/// Identifier usable in Rust source: keywords become raw identifiers; the few
/// keywords that cannot be raw get a trailing underscore.
pub fn rust_ident(name: &str) -> String {
    match name {
        "self" | "Self" | "super" | "crate" | "_" => format!("{}_", name),
        _ if KEYWORDS.contains(&name) => format!("r#{}", name),
        _ => name.to_string(),
    }
}
