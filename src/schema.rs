//! Schema model: features, legacy classes, enums, multisettings, commands and events.
//!
//! The model is built once (by [`crate::parser`] or any other front end) and only read
//! afterwards. Legacy class partitioning is exposed through [`FeatureUnit`], the
//! "effective class" view that naming, dispatch and emission all work on: a feature
//! without classes yields a single unit with the implicit class id 0.

use std::collections::{BTreeMap, HashSet};

/// Errors raised while building or validating a [`Schema`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Duplicate feature id: {0}")]
    DuplicateFeatureId(u8),
    #[error("Duplicate feature name: {0}")]
    DuplicateFeatureName(String),
    #[error("{feature}: duplicate class id {class_id}")]
    DuplicateClassId { feature: String, class_id: u8 },
    #[error("{feature}: {item} does not belong to a declared class")]
    ClassMembership { feature: String, item: String },
    #[error("{feature}: duplicate message id {id} in class {class_id}")]
    DuplicateMessageId { feature: String, class_id: u8, id: u16 },
    #[error("{feature}: duplicate name {name}")]
    DuplicateName { feature: String, name: String },
    #[error("{message}: duplicate argument {arg}")]
    DuplicateArgName { message: String, arg: String },
    #[error("{enumeration}: duplicate value {value}")]
    DuplicateEnumValue { enumeration: String, value: String },
    #[error("{0}: enum has no values")]
    EmptyEnum(String),
    #[error("{message}.{arg}: unresolved reference to {target}")]
    UnresolvedReference {
        message: String,
        arg: String,
        target: String,
    },
}

/// Fixed-width integer argument types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

impl IntType {
    pub fn bits(self) -> u32 {
        match self {
            IntType::I8 | IntType::U8 => 8,
            IntType::I16 | IntType::U16 => 16,
            IntType::I32 | IntType::U32 => 32,
            IntType::I64 | IntType::U64 => 64,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, IntType::I8 | IntType::I16 | IntType::I32 | IntType::I64)
    }

    /// Unsigned type of the same width.
    pub fn unsigned(self) -> IntType {
        match self {
            IntType::I8 | IntType::U8 => IntType::U8,
            IntType::I16 | IntType::U16 => IntType::U16,
            IntType::I32 | IntType::U32 => IntType::U32,
            IntType::I64 | IntType::U64 => IntType::U64,
        }
    }

    pub fn rust_name(self) -> &'static str {
        match self {
            IntType::I8 => "i8",
            IntType::U8 => "u8",
            IntType::I16 => "i16",
            IntType::U16 => "u16",
            IntType::I32 => "i32",
            IntType::U32 => "u32",
            IntType::I64 => "i64",
            IntType::U64 => "u64",
        }
    }

    pub fn from_keyword(s: &str) -> Option<IntType> {
        Some(match s {
            "i8" => IntType::I8,
            "u8" => IntType::U8,
            "i16" => IntType::I16,
            "u16" => IntType::U16,
            "i32" => IntType::I32,
            "u32" => IntType::U32,
            "i64" => IntType::I64,
            "u64" => IntType::U64,
            _ => return None,
        })
    }
}

/// Argument type. Closed set: every consumer matches it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgType {
    Int(IntType),
    Float,
    Double,
    String,
    /// Reference to an enum of the same feature.
    Enum(String),
    /// Enum of the same feature used as a set of flags, stored on the wire as `storage`.
    Bitfield { enumeration: String, storage: IntType },
    /// Reference to a multisetting declared anywhere in the schema.
    MultiSetting(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub name: String,
    pub doc: String,
    pub ty: ArgType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Caller-issued, encode only.
    Command,
    /// Device-issued, decode and dispatch only.
    Event,
}

/// A command or an event.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub name: String,
    pub id: u16,
    /// Owning class for legacy partitioned features, `None` otherwise.
    pub class_id: Option<u8>,
    pub doc: String,
    pub args: Vec<Arg>,
}

impl Message {
    pub fn command(name: &str, id: u16) -> Self {
        Self::new(MessageKind::Command, name, id)
    }

    pub fn event(name: &str, id: u16) -> Self {
        Self::new(MessageKind::Event, name, id)
    }

    fn new(kind: MessageKind, name: &str, id: u16) -> Self {
        Message {
            kind,
            name: name.to_string(),
            id,
            class_id: None,
            doc: String::new(),
            args: Vec::new(),
        }
    }

    pub fn in_class(mut self, class_id: u8) -> Self {
        self.class_id = Some(class_id);
        self
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = doc.to_string();
        self
    }

    pub fn arg(mut self, name: &str, ty: ArgType) -> Self {
        self.args.push(Arg {
            name: name.to_string(),
            doc: String::new(),
            ty,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub value: i32,
    pub doc: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub doc: String,
    pub class_id: Option<u8>,
    /// Declaration order; ordinal positions (bitfield bits) follow this order.
    pub values: Vec<EnumValue>,
    pub used_like_bitfield: bool,
}

impl Enum {
    /// Canonical numeric value of the unknown sentinel.
    pub const CANONICAL_UNKNOWN: i32 = -1;

    pub fn new(name: &str, values: &[(&str, i32)]) -> Self {
        Enum {
            name: name.to_string(),
            doc: String::new(),
            class_id: None,
            values: values
                .iter()
                .map(|(n, v)| EnumValue {
                    name: n.to_string(),
                    value: *v,
                    doc: String::new(),
                })
                .collect(),
            used_like_bitfield: false,
        }
    }

    pub fn in_class(mut self, class_id: u8) -> Self {
        self.class_id = Some(class_id);
        self
    }

    pub fn as_bitfield(mut self) -> Self {
        self.used_like_bitfield = true;
        self
    }

    /// Numeric value of the unknown sentinel: -1, or the next lower value not declared.
    pub fn unknown_value(&self) -> i32 {
        let mut v = Self::CANONICAL_UNKNOWN;
        while self.contains(v) {
            v -= 1;
        }
        v
    }

    pub fn contains(&self, raw: i32) -> bool {
        self.values.iter().any(|v| v.value == raw)
    }

    /// Declaration position of the value whose numeric value is `raw`.
    pub fn ordinal_of(&self, raw: i32) -> Option<usize> {
        self.values.iter().position(|v| v.value == raw)
    }
}

/// Opaque composite settings bundle; never inspected field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSetting {
    pub name: String,
    pub doc: String,
}

/// Legacy sub-partition of a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureClass {
    pub id: u8,
    pub name: String,
    pub doc: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: u8,
    pub name: String,
    pub doc: String,
    pub classes: Vec<FeatureClass>,
    pub enums: Vec<Enum>,
    pub multisettings: Vec<MultiSetting>,
    pub commands: Vec<Message>,
    pub events: Vec<Message>,
}

impl Feature {
    pub fn new(id: u8, name: &str) -> Self {
        Feature {
            id,
            name: name.to_string(),
            doc: String::new(),
            classes: Vec::new(),
            enums: Vec::new(),
            multisettings: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn with_class(mut self, id: u8, name: &str) -> Self {
        self.classes.push(FeatureClass {
            id,
            name: name.to_string(),
            doc: String::new(),
        });
        self
    }

    pub fn with_enum(mut self, e: Enum) -> Self {
        self.enums.push(e);
        self
    }

    pub fn with_multisetting(mut self, name: &str) -> Self {
        self.multisettings.push(MultiSetting {
            name: name.to_string(),
            doc: String::new(),
        });
        self
    }

    pub fn with_command(mut self, m: Message) -> Self {
        self.commands.push(m);
        self
    }

    pub fn with_event(mut self, m: Message) -> Self {
        self.events.push(m);
        self
    }

    pub fn find_enum(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Binding units of this feature: one per class (ascending id), or a single implicit one.
    pub fn units(&self) -> Vec<FeatureUnit<'_>> {
        if self.classes.is_empty() {
            return vec![FeatureUnit {
                feature: self,
                class: None,
            }];
        }
        let mut classes: Vec<&FeatureClass> = self.classes.iter().collect();
        classes.sort_by_key(|c| c.id);
        classes
            .into_iter()
            .map(|class| FeatureUnit {
                feature: self,
                class: Some(class),
            })
            .collect()
    }

    /// The unit an item with the given class id belongs to.
    pub fn unit_for(&self, class_id: Option<u8>) -> FeatureUnit<'_> {
        FeatureUnit {
            feature: self,
            class: class_id.and_then(|id| self.classes.iter().find(|c| c.id == id)),
        }
    }
}

/// A feature seen through one effective class: the explicit class, or the implicit class 0.
#[derive(Debug, Clone, Copy)]
pub struct FeatureUnit<'a> {
    pub feature: &'a Feature,
    pub class: Option<&'a FeatureClass>,
}

impl<'a> FeatureUnit<'a> {
    /// `feature` or `feature_class`.
    pub fn name(&self) -> String {
        match self.class {
            Some(class) => format!("{}_{}", self.feature.name, class.name),
            None => self.feature.name.clone(),
        }
    }

    pub fn feature_id(&self) -> u8 {
        self.feature.id
    }

    pub fn class_id(&self) -> u8 {
        self.class.map_or(0, |c| c.id)
    }

    fn scope(&self) -> Option<u8> {
        self.class.map(|c| c.id)
    }

    /// Enums of this unit, in declaration order.
    pub fn enums(&self) -> impl Iterator<Item = &'a Enum> + 'a {
        let scope = self.scope();
        self.feature
            .enums
            .iter()
            .filter(move |e| e.class_id == scope)
    }

    pub fn owns_enum(&self, e: &Enum) -> bool {
        e.class_id == self.scope()
    }

    /// Commands of this unit, ascending id.
    pub fn commands(&self) -> Vec<&'a Message> {
        self.select(&self.feature.commands)
    }

    /// Events of this unit, ascending id.
    pub fn events(&self) -> Vec<&'a Message> {
        self.select(&self.feature.events)
    }

    fn select(&self, messages: &'a [Message]) -> Vec<&'a Message> {
        let scope = self.scope();
        let mut out: Vec<&Message> = messages.iter().filter(|m| m.class_id == scope).collect();
        out.sort_by_key(|m| m.id);
        out
    }
}

/// Whole schema, keyed by feature id.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    features: BTreeMap<u8, Feature>,
}

impl Schema {
    /// Normalize and validate features into a schema.
    ///
    /// Normalization sets each message's kind from the collection it sits in, and flags
    /// every enum referenced through a bitfield argument as used like a bitfield.
    pub fn new(features: Vec<Feature>) -> Result<Self, SchemaError> {
        let mut by_id = BTreeMap::new();
        let mut names = HashSet::new();
        for mut feature in features {
            normalize(&mut feature);
            if !names.insert(feature.name.clone()) {
                return Err(SchemaError::DuplicateFeatureName(feature.name));
            }
            let id = feature.id;
            if by_id.insert(id, feature).is_some() {
                return Err(SchemaError::DuplicateFeatureId(id));
            }
        }
        let schema = Schema { features: by_id };
        for feature in schema.features.values() {
            schema.validate_feature(feature)?;
        }
        Ok(schema)
    }

    /// Features in ascending id order.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    pub fn feature(&self, id: u8) -> Option<&Feature> {
        self.features.get(&id)
    }

    pub fn feature_by_name(&self, name: &str) -> Option<&Feature> {
        self.features.values().find(|f| f.name == name)
    }

    /// Every binding unit, ascending feature id then class id.
    pub fn units(&self) -> Vec<FeatureUnit<'_>> {
        self.features.values().flat_map(Feature::units).collect()
    }

    /// First multisetting named `name`, searching features in ascending id.
    pub fn find_multisetting(&self, name: &str) -> Option<(&Feature, &MultiSetting)> {
        self.features.values().find_map(|f| {
            f.multisettings
                .iter()
                .find(|m| m.name == name)
                .map(|m| (f, m))
        })
    }

    /// Look up a message by `<unit>.<message>`, e.g. `ardrone3_piloting.take_off`.
    pub fn find_message(&self, kind: MessageKind, qualified: &str) -> Option<(FeatureUnit<'_>, &Message)> {
        let (unit_name, message_name) = qualified.rsplit_once('.')?;
        self.units().into_iter().find_map(|unit| {
            if unit.name() != unit_name {
                return None;
            }
            let messages = match kind {
                MessageKind::Command => unit.commands(),
                MessageKind::Event => unit.events(),
            };
            messages
                .into_iter()
                .find(|m| m.name == message_name)
                .map(|m| (unit, m))
        })
    }

    fn validate_feature(&self, feature: &Feature) -> Result<(), SchemaError> {
        let mut class_ids = HashSet::new();
        for class in &feature.classes {
            if !class_ids.insert(class.id) {
                return Err(SchemaError::DuplicateClassId {
                    feature: feature.name.clone(),
                    class_id: class.id,
                });
            }
        }
        let check_membership = |item: &str, class_id: Option<u8>| -> Result<(), SchemaError> {
            let ok = match class_id {
                Some(id) => class_ids.contains(&id),
                None => feature.classes.is_empty(),
            };
            if ok {
                Ok(())
            } else {
                Err(SchemaError::ClassMembership {
                    feature: feature.name.clone(),
                    item: item.to_string(),
                })
            }
        };

        let mut type_names = HashSet::new();
        for e in &feature.enums {
            check_membership(&e.name, e.class_id)?;
            if !type_names.insert(e.name.as_str()) {
                return Err(SchemaError::DuplicateName {
                    feature: feature.name.clone(),
                    name: e.name.clone(),
                });
            }
            validate_enum(e)?;
        }
        for m in &feature.multisettings {
            if !type_names.insert(m.name.as_str()) {
                return Err(SchemaError::DuplicateName {
                    feature: feature.name.clone(),
                    name: m.name.clone(),
                });
            }
        }

        let mut message_ids = HashSet::new();
        let mut message_names = HashSet::new();
        for m in feature.commands.iter().chain(feature.events.iter()) {
            check_membership(&m.name, m.class_id)?;
            let class_id = m.class_id.unwrap_or(0);
            if !message_ids.insert((class_id, m.id)) {
                return Err(SchemaError::DuplicateMessageId {
                    feature: feature.name.clone(),
                    class_id,
                    id: m.id,
                });
            }
            if !message_names.insert((m.kind, class_id, m.name.as_str())) {
                return Err(SchemaError::DuplicateName {
                    feature: feature.name.clone(),
                    name: m.name.clone(),
                });
            }
            let mut arg_names = HashSet::new();
            for arg in &m.args {
                if !arg_names.insert(arg.name.as_str()) {
                    return Err(SchemaError::DuplicateArgName {
                        message: format!("{}.{}", feature.name, m.name),
                        arg: arg.name.clone(),
                    });
                }
                self.validate_arg(feature, m, arg)?;
            }
        }
        Ok(())
    }

    fn validate_arg(&self, feature: &Feature, m: &Message, arg: &Arg) -> Result<(), SchemaError> {
        let resolved = match &arg.ty {
            ArgType::Int(_) | ArgType::Float | ArgType::Double | ArgType::String => return Ok(()),
            ArgType::Enum(name) | ArgType::Bitfield { enumeration: name, .. } => {
                feature.find_enum(name).map(|_| ()).ok_or(name)
            }
            ArgType::MultiSetting(name) => self.find_multisetting(name).map(|_| ()).ok_or(name),
        };
        resolved.map_err(|target| SchemaError::UnresolvedReference {
            message: format!("{}.{}", feature.name, m.name),
            arg: arg.name.clone(),
            target: target.clone(),
        })
    }
}

fn normalize(feature: &mut Feature) {
    for m in &mut feature.commands {
        m.kind = MessageKind::Command;
    }
    for m in &mut feature.events {
        m.kind = MessageKind::Event;
    }
    let bitfields: HashSet<String> = feature
        .commands
        .iter()
        .chain(feature.events.iter())
        .flat_map(|m| m.args.iter())
        .filter_map(|a| match &a.ty {
            ArgType::Bitfield { enumeration, .. } => Some(enumeration.clone()),
            _ => None,
        })
        .collect();
    for e in &mut feature.enums {
        if bitfields.contains(&e.name) {
            e.used_like_bitfield = true;
        }
    }
}

fn validate_enum(e: &Enum) -> Result<(), SchemaError> {
    if e.values.is_empty() {
        return Err(SchemaError::EmptyEnum(e.name.clone()));
    }
    let mut names = HashSet::new();
    let mut values = HashSet::new();
    for v in &e.values {
        if !names.insert(v.name.as_str()) {
            return Err(SchemaError::DuplicateEnumValue {
                enumeration: e.name.clone(),
                value: v.name.clone(),
            });
        }
        if !values.insert(v.value) {
            return Err(SchemaError::DuplicateEnumValue {
                enumeration: e.name.clone(),
                value: v.value.to_string(),
            });
        }
    }
    Ok(())
}
