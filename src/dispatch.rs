//! Numeric addressing and the per-unit encode and decode tables.
//!
//! Every wire command carries a (feature id, class id, command id) triple. A unit is
//! registered under `Uid = feature_id * 256 + class_id`. Routing is a keyed lookup over
//! the full triple and is total: anything not in the table, including an absent
//! command, yields no route.

use std::collections::BTreeMap;
use std::fmt;

use crate::naming;
use crate::schema::{FeatureUnit, Message, MessageKind, Schema};

/// Status returned when a command does not belong to a binding.
pub const NO_ROUTE: i32 = -1;

/// 16-bit registration id of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uid(u16);

impl Uid {
    pub fn new(feature_id: u8, class_id: u8) -> Self {
        Uid(u16::from(feature_id) << 8 | u16::from(class_id))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn feature_id(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn class_id(self) -> u8 {
        (self.0 & 0xff) as u8
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Full wire address of a command or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandKey {
    pub feature_id: u8,
    pub class_id: u8,
    pub cmd_id: u16,
}

impl CommandKey {
    pub fn new(feature_id: u8, class_id: u8, cmd_id: u16) -> Self {
        CommandKey {
            feature_id,
            class_id,
            cmd_id,
        }
    }

    pub fn uid(&self) -> Uid {
        Uid::new(self.feature_id, self.class_id)
    }
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.feature_id, self.class_id, self.cmd_id)
    }
}

/// One encodable message and the codec function that builds it.
#[derive(Debug, Clone)]
pub struct EncodeEntry<'a> {
    pub key: CommandKey,
    pub message: &'a Message,
    pub wire_function: String,
}

/// Encodable messages of a unit: commands, then events when tooling asks for them,
/// each group in ascending id.
#[derive(Debug, Clone, Default)]
pub struct EncodeTable<'a> {
    entries: Vec<EncodeEntry<'a>>,
}

impl<'a> EncodeTable<'a> {
    pub fn entries(&self) -> &[EncodeEntry<'a>] {
        &self.entries
    }

    pub fn find(&self, kind: MessageKind, name: &str) -> Option<&EncodeEntry<'a>> {
        self.entries
            .iter()
            .find(|e| e.message.kind == kind && e.message.name == name)
    }

    pub fn commands(&self) -> impl Iterator<Item = &EncodeEntry<'a>> {
        self.entries
            .iter()
            .filter(|e| e.message.kind == MessageKind::Command)
    }

    pub fn events(&self) -> impl Iterator<Item = &EncodeEntry<'a>> {
        self.entries
            .iter()
            .filter(|e| e.message.kind == MessageKind::Event)
    }
}

/// Decode routes of a unit's events.
#[derive(Debug, Clone)]
pub struct DispatchTable<'a> {
    uid: Uid,
    routes: BTreeMap<CommandKey, &'a Message>,
}

impl<'a> DispatchTable<'a> {
    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Event addressed by `key`; `None` for an absent key or an unknown triple.
    pub fn route(&self, key: Option<CommandKey>) -> Option<&'a Message> {
        let key = key?;
        if key.uid() != self.uid {
            return None;
        }
        self.routes.get(&key).copied()
    }

    /// Routes in ascending command id.
    pub fn entries(&self) -> impl Iterator<Item = (CommandKey, &'a Message)> + '_ {
        self.routes.iter().map(|(k, m)| (*k, *m))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Everything the emitter and the runtime bindings need for one unit.
#[derive(Debug, Clone)]
pub struct FeatureTables<'a> {
    pub unit: FeatureUnit<'a>,
    pub uid: Uid,
    pub encode: EncodeTable<'a>,
    pub dispatch: DispatchTable<'a>,
}

impl<'a> FeatureTables<'a> {
    pub fn build(unit: FeatureUnit<'a>, encode_events: bool) -> Self {
        let uid = Uid::new(unit.feature_id(), unit.class_id());
        let unit_name = unit.name();
        let key = |m: &Message| CommandKey::new(unit.feature_id(), unit.class_id(), m.id);

        let mut entries = Vec::new();
        let events = unit.events();
        let encodable = unit
            .commands()
            .into_iter()
            .chain(events.iter().copied().filter(|_| encode_events));
        for message in encodable {
            entries.push(EncodeEntry {
                key: key(message),
                message,
                wire_function: naming::wire_function_name(&unit_name, &message.name),
            });
        }

        let routes = events.iter().map(|m| (key(m), *m)).collect();

        FeatureTables {
            unit,
            uid,
            encode: EncodeTable { entries },
            dispatch: DispatchTable { uid, routes },
        }
    }
}

/// Tables of every unit, ascending Uid.
pub fn build(schema: &Schema, encode_events: bool) -> Vec<FeatureTables<'_>> {
    schema
        .units()
        .into_iter()
        .map(|unit| FeatureTables::build(unit, encode_events))
        .collect()
}
