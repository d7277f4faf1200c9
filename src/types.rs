//! Argument type mapping: the public type binding users see and the wire type the
//! codec exchanges, plus the conversions between them.
//!
//! | Argument | Public | Wire |
//! |----------|--------|------|
//! | `i8`/`i16`/`i32` | `isize` | same width |
//! | `u8`/`u16`/`u32` | `usize` | same width |
//! | `i64`/`u64` | `i64`/`u64` | `i64`/`u64` |
//! | `float`/`double` | `f32`/`f64` | `f32`/`f64` |
//! | `string` | `String` | `&str` |
//! | enum | generated enum | `i32` |
//! | bitfield | `u32` (`u64` for 64-bit storage) | unsigned storage width |
//! | multisetting | generated handle | `<codec>::multiset::<Name>`, by reference |

use crate::bitfield::BitfieldWidth;
use crate::naming;
use crate::schema::{Arg, ArgType, FeatureUnit, IntType, Schema};

/// Type seen by callers of encoders and receivers of callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicType {
    /// Wide signed integer for 8, 16 and 32-bit signed arguments.
    Int,
    /// Wide unsigned integer for 8, 16 and 32-bit unsigned arguments.
    UInt,
    I64,
    U64,
    F32,
    F64,
    String,
    Enum { module: String, name: String },
    Bitfield(BitfieldWidth),
    MultiSetting { name: String },
}

/// Type exchanged with the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireType {
    Int(IntType),
    F32,
    F64,
    /// Borrowed UTF-8 view, valid for the duration of the codec call.
    Str,
    /// Enums always travel as 32-bit signed integers.
    Enum,
    Bitfield(IntType),
    MultiSetting { name: String },
}

/// How the verification matcher compares one decoded argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparePolicy {
    /// String value equality.
    Text,
    /// Raw byte equality of the composite structure.
    Bytes,
    /// Numeric equality of the raw decoded value.
    Numeric,
}

pub fn compare_policy(ty: &ArgType) -> ComparePolicy {
    match ty {
        ArgType::String => ComparePolicy::Text,
        ArgType::MultiSetting(_) => ComparePolicy::Bytes,
        ArgType::Int(_)
        | ArgType::Float
        | ArgType::Double
        | ArgType::Enum(_)
        | ArgType::Bitfield { .. } => ComparePolicy::Numeric,
    }
}

/// Where a rendered public type is used.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    /// Inside a binding unit: generated types by bare name.
    Unit,
    /// Outside the bindings: generated types qualified by the bindings root path.
    Root(&'a str),
}

#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    schema: &'a Schema,
    prefix: &'a str,
    codec: &'a str,
}

impl<'a> TypeMapper<'a> {
    pub fn new(schema: &'a Schema, prefix: &'a str, codec: &'a str) -> Self {
        TypeMapper {
            schema,
            prefix,
            codec,
        }
    }

    /// Module name of a binding unit.
    pub fn unit_module(&self, unit: &FeatureUnit) -> String {
        naming::snake_name(&self.unit_type(unit))
    }

    /// Marker type name of a binding unit.
    pub fn unit_type(&self, unit: &FeatureUnit) -> String {
        naming::type_name(self.prefix, &unit.name())
    }

    pub fn public_type(&self, unit: &FeatureUnit, arg: &Arg) -> PublicType {
        match &arg.ty {
            ArgType::Int(it) => match it {
                IntType::I8 | IntType::I16 | IntType::I32 => PublicType::Int,
                IntType::U8 | IntType::U16 | IntType::U32 => PublicType::UInt,
                IntType::I64 => PublicType::I64,
                IntType::U64 => PublicType::U64,
            },
            ArgType::Float => PublicType::F32,
            ArgType::Double => PublicType::F64,
            ArgType::String => PublicType::String,
            ArgType::Enum(name) => {
                let owner = unit
                    .feature
                    .find_enum(name)
                    .map(|e| unit.feature.unit_for(e.class_id))
                    .unwrap_or(*unit);
                PublicType::Enum {
                    module: self.unit_module(&owner),
                    name: naming::enum_type_name(self.prefix, &unit.feature.name, name),
                }
            }
            ArgType::Bitfield { storage, .. } => PublicType::Bitfield(BitfieldWidth::for_storage(*storage)),
            ArgType::MultiSetting(name) => PublicType::MultiSetting {
                name: self.multisetting_type(unit, name),
            },
        }
    }

    pub fn wire_type(&self, arg: &Arg) -> WireType {
        match &arg.ty {
            ArgType::Int(it) => WireType::Int(*it),
            ArgType::Float => WireType::F32,
            ArgType::Double => WireType::F64,
            ArgType::String => WireType::Str,
            ArgType::Enum(_) => WireType::Enum,
            ArgType::Bitfield { storage, .. } => WireType::Bitfield(storage.unsigned()),
            ArgType::MultiSetting(name) => WireType::MultiSetting {
                name: naming::camel(name),
            },
        }
    }

    /// Public handle type of a multisetting, named after the feature declaring it.
    pub fn multisetting_type(&self, unit: &FeatureUnit, name: &str) -> String {
        let owner = self
            .schema
            .find_multisetting(name)
            .map(|(f, _)| f.name.as_str())
            .unwrap_or(unit.feature.name.as_str());
        naming::enum_type_name(self.prefix, owner, name)
    }

    /// Native structure of a multisetting in the codec.
    pub fn multisetting_native(&self, name: &str) -> String {
        format!("{}::multiset::{}", self.codec, naming::camel(name))
    }

    pub fn render_public(&self, ty: &PublicType, scope: Scope) -> String {
        match ty {
            PublicType::Int => "isize".to_string(),
            PublicType::UInt => "usize".to_string(),
            PublicType::I64 => "i64".to_string(),
            PublicType::U64 => "u64".to_string(),
            PublicType::F32 => "f32".to_string(),
            PublicType::F64 => "f64".to_string(),
            PublicType::String => "String".to_string(),
            PublicType::Bitfield(width) => width.rust_type().to_string(),
            PublicType::Enum { module, name } => match scope {
                Scope::Unit => name.clone(),
                Scope::Root(root) => format!("{}::{}::{}", root, module, name),
            },
            PublicType::MultiSetting { name } => match scope {
                Scope::Unit => name.clone(),
                Scope::Root(root) => format!("{}::{}", root, name),
            },
        }
    }

    /// Type of a local receiving a decoded value.
    pub fn render_wire_local(&self, ty: &WireType) -> String {
        match ty {
            WireType::Int(it) | WireType::Bitfield(it) => it.rust_name().to_string(),
            WireType::F32 => "f32".to_string(),
            WireType::F64 => "f64".to_string(),
            WireType::Str => "&str".to_string(),
            WireType::Enum => "i32".to_string(),
            WireType::MultiSetting { name } => format!("{}::multiset::{}", self.codec, name),
        }
    }

    /// Initial value of a local receiving a decoded value.
    pub fn render_wire_default(&self, ty: &WireType) -> String {
        match ty {
            WireType::Int(_) | WireType::Bitfield(_) | WireType::Enum => "0".to_string(),
            WireType::F32 | WireType::F64 => "0.0".to_string(),
            WireType::Str => "\"\"".to_string(),
            WireType::MultiSetting { name } => format!("{}::multiset::{}::default()", self.codec, name),
        }
    }

    /// Expression passing public value `expr` to the codec.
    ///
    /// Strings lend a view for the call only; multisettings lend their native structure.
    pub fn to_wire(&self, unit: &FeatureUnit, arg: &Arg, expr: &str) -> String {
        let public = self.public_type(unit, arg);
        match self.wire_type(arg) {
            WireType::Str => format!("{}.as_str()", expr),
            WireType::MultiSetting { .. } => format!("{}.native_settings()", expr),
            WireType::Enum => format!("{} as i32", expr),
            WireType::F32 | WireType::F64 => expr.to_string(),
            WireType::Int(it) | WireType::Bitfield(it) => {
                if self.render_public(&public, Scope::Unit) == it.rust_name() {
                    expr.to_string()
                } else {
                    format!("{} as {}", expr, it.rust_name())
                }
            }
        }
    }

    /// Expression turning decoded wire value `expr` into its public type.
    ///
    /// Strings are copied so the binding never keeps the codec's buffer. Enum values not
    /// declared in the schema become the unknown sentinel.
    pub fn to_public(&self, unit: &FeatureUnit, arg: &Arg, expr: &str, scope: Scope) -> String {
        let public = self.public_type(unit, arg);
        let rendered = self.render_public(&public, scope);
        match self.wire_type(arg) {
            WireType::Str => format!("{}.to_owned()", expr),
            WireType::MultiSetting { .. } => format!("{}::from_native({})", rendered, expr),
            WireType::Enum => format!("{}::from_raw({})", rendered, expr),
            WireType::F32 | WireType::F64 => expr.to_string(),
            WireType::Int(it) | WireType::Bitfield(it) => {
                if rendered == it.rust_name() {
                    expr.to_string()
                } else {
                    format!("{} as {}", expr, rendered)
                }
            }
        }
    }
}
