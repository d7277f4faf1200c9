//! Runtime argument values exchanged with the wire codec.

use crate::schema::{ArgType, IntType};
use crate::types::ComparePolicy;

/// A single wire argument, in its wire representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Float(f32),
    Double(f64),
    Str(String),
    /// Raw enum value, possibly not declared in the schema.
    Enum(i32),
    /// Bitfield widened to 64 bits; the codec narrows it to the storage width.
    Bitfield(u64),
    /// Native bytes of a multisetting structure.
    MultiSetting(Vec<u8>),
}

impl Value {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U8(x) => Some(*x as u64),
            Value::U16(x) => Some(*x as u64),
            Value::U32(x) => Some(*x as u64),
            Value::U64(x) => Some(*x),
            Value::Bitfield(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I8(x) => Some(*x as i64),
            Value::I16(x) => Some(*x as i64),
            Value::I32(x) => Some(*x as i64),
            Value::I64(x) => Some(*x),
            Value::U8(x) => Some(*x as i64),
            Value::U16(x) => Some(*x as i64),
            Value::U32(x) => Some(*x as i64),
            Value::Enum(x) => Some(*x as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<i32> {
        match self {
            Value::Enum(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::MultiSetting(b) => Some(b),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Enum(_) => "enum",
            Value::Bitfield(_) => "bitfield",
            Value::MultiSetting(_) => "multisetting",
        }
    }

    /// This value can stand for an argument of type `ty`.
    pub fn fits(&self, ty: &ArgType) -> bool {
        match (ty, self) {
            (ArgType::Int(IntType::U8), Value::U8(_))
            | (ArgType::Int(IntType::U16), Value::U16(_))
            | (ArgType::Int(IntType::U32), Value::U32(_))
            | (ArgType::Int(IntType::U64), Value::U64(_))
            | (ArgType::Int(IntType::I8), Value::I8(_))
            | (ArgType::Int(IntType::I16), Value::I16(_))
            | (ArgType::Int(IntType::I32), Value::I32(_))
            | (ArgType::Int(IntType::I64), Value::I64(_))
            | (ArgType::Float, Value::Float(_))
            | (ArgType::Double, Value::Double(_))
            | (ArgType::String, Value::Str(_))
            | (ArgType::Enum(_), Value::Enum(_))
            | (ArgType::MultiSetting(_), Value::MultiSetting(_)) => true,
            (ArgType::Bitfield { storage, .. }, Value::Bitfield(b)) => {
                storage.bits() == 64 || *b >> storage.bits() == 0
            }
            _ => false,
        }
    }

    /// Equality under a comparison policy. Values of different kinds never compare equal.
    pub fn equals(&self, other: &Value, policy: ComparePolicy) -> bool {
        match policy {
            ComparePolicy::Text => match (self.as_str(), other.as_str()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            ComparePolicy::Bytes => match (self.as_bytes(), other.as_bytes()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            ComparePolicy::Numeric => self == other,
        }
    }
}
