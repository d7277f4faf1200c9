//! Parse schema source into a [`Schema`] using PEST.
//!
//! Items declared inside a `class` block get that class id; everything else belongs to the
//! feature itself. Enum values without an explicit `= n` take the previous value plus one,
//! starting from 0.

use crate::schema::{
    Arg, ArgType, Enum, EnumValue, Feature, FeatureClass, IntType, Message, MessageKind, MultiSetting,
    Schema, SchemaError,
};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct SchemaParser;

/// Parse and validate schema source.
pub fn parse(source: &str) -> Result<Schema, SchemaError> {
    let features = parse_features(source).map_err(SchemaError::Parse)?;
    Schema::new(features)
}

/// Parse schema source into features without validating them.
pub fn parse_features(source: &str) -> Result<Vec<Feature>, String> {
    let pairs = SchemaParser::parse(Rule::schema, source).map_err(|e| e.to_string())?;
    let pair = pairs.into_iter().next().ok_or("Empty parse")?;
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::feature)
        .map(build_feature)
        .collect()
}

fn build_feature(pair: Pair<Rule>) -> Result<Feature, String> {
    let mut docs = Vec::new();
    let mut name = None;
    let mut id = None;
    let mut feature = Feature::new(0, "");
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::doc => docs.push(doc_line(inner)),
            Rule::ident => name = Some(inner.as_str().to_string()),
            Rule::int => id = Some(parse_u8(inner.as_str())?),
            Rule::class_def => build_class(inner, &mut feature)?,
            Rule::enum_def => feature.enums.push(build_enum(inner, None)?),
            Rule::multiset_def => feature.multisettings.push(build_multisetting(inner)?),
            Rule::message_def => push_message(&mut feature, build_message(inner, None)?),
            _ => {}
        }
    }
    feature.name = name.ok_or("feature: missing name")?;
    feature.id = id.ok_or("feature: missing id")?;
    feature.doc = docs.join("\n");
    Ok(feature)
}

fn build_class(pair: Pair<Rule>, feature: &mut Feature) -> Result<(), String> {
    let mut docs = Vec::new();
    let mut name = None;
    let mut id = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::doc => docs.push(doc_line(inner)),
            Rule::ident => name = Some(inner.as_str().to_string()),
            Rule::int => id = Some(parse_u8(inner.as_str())?),
            Rule::enum_def => feature.enums.push(build_enum(inner, id)?),
            Rule::message_def => push_message(feature, build_message(inner, id)?),
            _ => {}
        }
    }
    feature.classes.push(FeatureClass {
        id: id.ok_or("class: missing id")?,
        name: name.ok_or("class: missing name")?,
        doc: docs.join("\n"),
    });
    Ok(())
}

fn push_message(feature: &mut Feature, m: Message) {
    match m.kind {
        MessageKind::Command => feature.commands.push(m),
        MessageKind::Event => feature.events.push(m),
    }
}

fn build_enum(pair: Pair<Rule>, class_id: Option<u8>) -> Result<Enum, String> {
    let mut e = Enum::new("", &[]);
    e.class_id = class_id;
    let mut docs = Vec::new();
    let mut next = 0i64;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::doc => docs.push(doc_line(inner)),
            Rule::ident => e.name = inner.as_str().to_string(),
            Rule::enum_value => {
                let mut value_docs = Vec::new();
                let mut value_name = String::new();
                let mut value = next;
                for part in inner.into_inner() {
                    match part.as_rule() {
                        Rule::doc => value_docs.push(doc_line(part)),
                        Rule::value_ident => value_name = part.as_str().to_string(),
                        Rule::signed_int => value = parse_int(part.as_str())?,
                        _ => {}
                    }
                }
                let value = i32::try_from(value)
                    .map_err(|_| format!("{}.{}: value {} out of range", e.name, value_name, value))?;
                next = i64::from(value) + 1;
                e.values.push(EnumValue {
                    name: value_name,
                    value,
                    doc: value_docs.join("\n"),
                });
            }
            _ => {}
        }
    }
    e.doc = docs.join("\n");
    Ok(e)
}

fn build_multisetting(pair: Pair<Rule>) -> Result<MultiSetting, String> {
    let mut docs = Vec::new();
    let mut name = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::doc => docs.push(doc_line(inner)),
            Rule::ident => name = Some(inner.as_str().to_string()),
            _ => {}
        }
    }
    Ok(MultiSetting {
        name: name.ok_or("multisetting: missing name")?,
        doc: docs.join("\n"),
    })
}

fn build_message(pair: Pair<Rule>, class_id: Option<u8>) -> Result<Message, String> {
    let mut docs = Vec::new();
    let mut kind = None;
    let mut name = None;
    let mut id = None;
    let mut args = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::doc => docs.push(doc_line(inner)),
            Rule::message_kind => {
                kind = Some(match inner.as_str() {
                    "cmd" => MessageKind::Command,
                    _ => MessageKind::Event,
                })
            }
            Rule::ident => name = Some(inner.as_str().to_string()),
            Rule::int => {
                let raw = parse_int(inner.as_str())?;
                id = Some(u16::try_from(raw).map_err(|_| format!("message id {} out of range", raw))?);
            }
            Rule::arg => args.push(build_arg(inner)?),
            _ => {}
        }
    }
    let name: String = name.ok_or("message: missing name")?;
    let mut m = match kind.ok_or("message: missing kind")? {
        MessageKind::Command => Message::command(&name, id.ok_or("message: missing id")?),
        MessageKind::Event => Message::event(&name, id.ok_or("message: missing id")?),
    };
    m.class_id = class_id;
    m.doc = docs.join("\n");
    m.args = args;
    Ok(m)
}

fn build_arg(pair: Pair<Rule>) -> Result<Arg, String> {
    let mut docs = Vec::new();
    let mut name = None;
    let mut ty = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::doc => docs.push(doc_line(inner)),
            Rule::ident => name = Some(inner.as_str().to_string()),
            Rule::enum_ref => ty = Some(ArgType::Enum(referenced(inner)?)),
            Rule::multiset_ref => ty = Some(ArgType::MultiSetting(referenced(inner)?)),
            Rule::bitfield_ref => ty = Some(build_bitfield(inner)?),
            Rule::scalar_type => ty = Some(scalar(inner.as_str())?),
            _ => {}
        }
    }
    Ok(Arg {
        name: name.ok_or("arg: missing name")?,
        doc: docs.join("\n"),
        ty: ty.ok_or("arg: missing type")?,
    })
}

fn referenced(pair: Pair<Rule>) -> Result<String, String> {
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::ident)
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| "type reference: missing name".to_string())
}

fn build_bitfield(pair: Pair<Rule>) -> Result<ArgType, String> {
    let mut storage = None;
    let mut enumeration = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::int_type => storage = IntType::from_keyword(inner.as_str()),
            Rule::ident => enumeration = Some(inner.as_str().to_string()),
            _ => {}
        }
    }
    Ok(ArgType::Bitfield {
        enumeration: enumeration.ok_or("bitfield: missing enum")?,
        storage: storage.ok_or("bitfield: missing storage type")?,
    })
}

fn scalar(s: &str) -> Result<ArgType, String> {
    match s {
        "float" => Ok(ArgType::Float),
        "double" => Ok(ArgType::Double),
        "string" => Ok(ArgType::String),
        _ => IntType::from_keyword(s)
            .map(ArgType::Int)
            .ok_or_else(|| format!("Unknown type: {}", s)),
    }
}

fn doc_line(pair: Pair<Rule>) -> String {
    let text = pair
        .into_inner()
        .next()
        .map(|p| p.as_str())
        .unwrap_or_default();
    let text = text.strip_prefix(' ').unwrap_or(text);
    text.trim_end().to_string()
}

fn parse_int(s: &str) -> Result<i64, String> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|e| format!("Invalid integer {}: {}", s, e))?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn parse_u8(s: &str) -> Result<u8, String> {
    let raw = parse_int(s)?;
    u8::try_from(raw).map_err(|_| format!("id {} out of range", raw))
}
