//! Format wire commands and argument values for display.

use crate::bitfield;
use crate::codec::{Cmd, WireCodec};
use crate::dispatch::CommandKey;
use crate::schema::{Arg, ArgType, FeatureUnit, Message, Schema};
use crate::value::Value;

pub fn hex_string(b: &[u8]) -> String {
    b.iter().map(|x| format!("{:02x}", x)).collect::<Vec<_>>().join(" ")
}

/// Raw scalar string.
pub fn format_scalar_raw(v: &Value) -> String {
    match v {
        Value::U8(x) => format!("{}", x),
        Value::U16(x) => format!("{}", x),
        Value::U32(x) => format!("{}", x),
        Value::U64(x) => format!("{}", x),
        Value::I8(x) => format!("{}", x),
        Value::I16(x) => format!("{}", x),
        Value::I32(x) => format!("{}", x),
        Value::I64(x) => format!("{}", x),
        Value::Float(x) => format!("{}", x),
        Value::Double(x) => format!("{}", x),
        Value::Enum(x) => format!("{}", x),
        Value::Bitfield(x) => format!("{:#x}", x),
        Value::Str(s) => format!("{:?}", s),
        Value::MultiSetting(b) => format!("hex({})", hex_string(b)),
    }
}

/// One argument, with enum values and bitfield flags named when the schema knows them.
pub fn format_arg(unit: &FeatureUnit, arg: &Arg, v: &Value) -> String {
    match (&arg.ty, v) {
        (ArgType::Enum(name), Value::Enum(raw)) => {
            let label = unit
                .feature
                .find_enum(name)
                .and_then(|e| e.values.iter().find(|ev| ev.value == *raw))
                .map_or("<unknown>", |ev| ev.name.as_str());
            format!("{} ({})", label, raw)
        }
        (ArgType::Bitfield { enumeration, .. }, Value::Bitfield(raw)) => {
            let flags = match unit.feature.find_enum(enumeration) {
                Some(e) => {
                    let mut names = Vec::new();
                    bitfield::enum_for_all_set_in(e, *raw, |ev| names.push(ev.name.as_str()));
                    names.join("|")
                }
                None => String::new(),
            };
            format!("{:#x} [{}]", raw, flags)
        }
        _ => format_scalar_raw(v),
    }
}

/// `unit.message(arg=value, ...)`.
pub fn describe_message(unit: &FeatureUnit, message: &Message, values: &[Value]) -> String {
    let args: Vec<String> = message
        .args
        .iter()
        .zip(values)
        .map(|(arg, v)| format!("{}={}", arg.name, format_arg(unit, arg, v)))
        .collect();
    format!("{}.{}({})", unit.name(), message.name, args.join(", "))
}

/// Unit and message addressed by `key`, commands and events alike.
pub fn locate(schema: &Schema, key: CommandKey) -> Option<(FeatureUnit<'_>, &Message)> {
    let feature = schema.feature(key.feature_id)?;
    feature
        .units()
        .into_iter()
        .filter(|unit| unit.class_id() == key.class_id)
        .find_map(|unit| {
            unit.commands()
                .into_iter()
                .chain(unit.events())
                .find(|m| m.id == key.cmd_id)
                .map(|m| (unit, m))
        })
}

/// Full description of a wire command: decoded arguments when the schema knows it,
/// header and raw payload otherwise.
pub fn describe_command(schema: &Schema, codec: &dyn WireCodec, cmd: &Cmd) -> String {
    match locate(schema, cmd.key()) {
        Some((unit, message)) => match codec.decode(cmd, cmd.key(), message) {
            Ok(values) => describe_message(&unit, message, &values),
            Err(e) => format!("{}.{} <{}> {}", unit.name(), message.name, e, cmd.describe()),
        },
        None => format!("<unknown> {}", cmd.describe()),
    }
}
