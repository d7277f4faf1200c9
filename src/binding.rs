//! Runtime bindings: encoders and the decode dispatcher, interpreted from the same
//! tables the emitter renders into source.

use std::collections::BTreeMap;

use crate::codec::{Cmd, CodecError, WireCodec};
use crate::dispatch::{self, EncodeEntry, FeatureTables, Uid, NO_ROUTE};
use crate::schema::{ArgType, Feature, Message, MessageKind, Schema};
use crate::value::Value;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("No route for command")]
    NoRoute,
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl DispatchError {
    /// [`NO_ROUTE`] or the codec's negative status.
    pub fn status(&self) -> i32 {
        match self {
            DispatchError::NoRoute => NO_ROUTE,
            DispatchError::Codec(e) => e.status(),
        }
    }
}

/// Receiver of decoded events. Handlers are optional: an event whose name is not
/// implemented is decoded and then dropped silently.
pub trait EventHandler {
    fn implements(&self, _event: &str) -> bool {
        true
    }

    fn on_event(&mut self, event: &Message, args: &[Value]);
}

/// Deferred construction of one wire command.
pub struct BuildStep<'a> {
    codec: &'a dyn WireCodec,
    entry: &'a EncodeEntry<'a>,
    args: Vec<Value>,
}

impl<'a> BuildStep<'a> {
    /// Encode into `cmd`; the codec result is returned unchanged.
    pub fn build(&self, cmd: &mut Cmd) -> Result<(), CodecError> {
        self.codec.encode(cmd, self.entry.key, self.entry.message, &self.args)
    }

    /// `build` as a status: 0 on success, the codec's negative status otherwise.
    pub fn status(&self, cmd: &mut Cmd) -> i32 {
        match self.build(cmd) {
            Ok(()) => 0,
            Err(e) => e.status(),
        }
    }

    pub fn message(&self) -> &'a Message {
        self.entry.message
    }
}

pub struct FeatureBinding<'a> {
    tables: FeatureTables<'a>,
    codec: &'a dyn WireCodec,
}

impl<'a> FeatureBinding<'a> {
    pub fn new(tables: FeatureTables<'a>, codec: &'a dyn WireCodec) -> Self {
        FeatureBinding { tables, codec }
    }

    pub fn uid(&self) -> Uid {
        self.tables.uid
    }

    pub fn name(&self) -> String {
        self.tables.unit.name()
    }

    pub fn tables(&self) -> &FeatureTables<'a> {
        &self.tables
    }

    /// Build step for command `name`, or `None` if the unit has no such command.
    pub fn encoder(&self, name: &str, args: Vec<Value>) -> Option<BuildStep<'_>> {
        self.step(MessageKind::Command, name, args)
    }

    /// Build step for event `name`, for tooling that plays the device side.
    pub fn event_encoder(&self, name: &str, args: Vec<Value>) -> Option<BuildStep<'_>> {
        self.step(MessageKind::Event, name, args)
    }

    fn step(&self, kind: MessageKind, name: &str, args: Vec<Value>) -> Option<BuildStep<'_>> {
        let entry = self.tables.encode.find(kind, name)?;
        Some(BuildStep {
            codec: self.codec,
            entry,
            args,
        })
    }

    /// Route `cmd` to its event, decode it and hand it to `handler`.
    ///
    /// Returns the command id. Nothing reaches the handler when decoding fails; enum
    /// values not declared in the schema are replaced by the enum's unknown sentinel.
    pub fn decode(&self, cmd: Option<&Cmd>, handler: &mut dyn EventHandler) -> Result<u16, DispatchError> {
        let cmd = cmd.ok_or(DispatchError::NoRoute)?;
        let key = cmd.key();
        let message = self
            .tables
            .dispatch
            .route(Some(key))
            .ok_or(DispatchError::NoRoute)?;
        let mut values = self.codec.decode(cmd, key, message)?;
        sanitize_enums(self.tables.unit.feature, message, &mut values);
        if handler.implements(&message.name) {
            handler.on_event(message, &values);
        }
        Ok(key.cmd_id)
    }

    /// `decode` as a status: the command id, [`NO_ROUTE`] or the codec's negative status.
    pub fn decode_status(&self, cmd: Option<&Cmd>, handler: &mut dyn EventHandler) -> i32 {
        match self.decode(cmd, handler) {
            Ok(id) => i32::from(id),
            Err(e) => e.status(),
        }
    }
}

/// Replace undeclared enum values by the enum's unknown sentinel.
pub fn sanitize_enums(feature: &Feature, message: &Message, values: &mut [Value]) {
    for (arg, value) in message.args.iter().zip(values.iter_mut()) {
        let (ArgType::Enum(name), Value::Enum(raw)) = (&arg.ty, &*value) else {
            continue;
        };
        if let Some(e) = feature.find_enum(name) {
            if !e.contains(*raw) {
                *value = Value::Enum(e.unknown_value());
            }
        }
    }
}

/// Bindings of a whole schema, keyed by unit Uid.
pub struct Bindings<'a> {
    units: BTreeMap<Uid, FeatureBinding<'a>>,
}

impl<'a> Bindings<'a> {
    pub fn new(schema: &'a Schema, codec: &'a dyn WireCodec) -> Self {
        let units = dispatch::build(schema, true)
            .into_iter()
            .map(|tables| (tables.uid, FeatureBinding::new(tables, codec)))
            .collect();
        Bindings { units }
    }

    pub fn unit(&self, uid: Uid) -> Option<&FeatureBinding<'a>> {
        self.units.get(&uid)
    }

    pub fn unit_by_name(&self, name: &str) -> Option<&FeatureBinding<'a>> {
        self.units.values().find(|u| u.name() == name)
    }

    pub fn units(&self) -> impl Iterator<Item = &FeatureBinding<'a>> {
        self.units.values()
    }

    /// Build step for `<unit>.<command>`.
    pub fn encoder(&self, qualified: &str, args: Vec<Value>) -> Option<BuildStep<'_>> {
        let (unit, name) = qualified.rsplit_once('.')?;
        self.unit_by_name(unit)?.encoder(name, args)
    }

    /// Build step for `<unit>.<event>`.
    pub fn event_encoder(&self, qualified: &str, args: Vec<Value>) -> Option<BuildStep<'_>> {
        let (unit, name) = qualified.rsplit_once('.')?;
        self.unit_by_name(unit)?.event_encoder(name, args)
    }

    /// Route `cmd` to the unit registered under its Uid.
    pub fn decode(&self, cmd: Option<&Cmd>, handler: &mut dyn EventHandler) -> Result<u16, DispatchError> {
        let cmd = cmd.ok_or(DispatchError::NoRoute)?;
        let unit = self.units.get(&cmd.key().uid()).ok_or(DispatchError::NoRoute)?;
        unit.decode(Some(cmd), handler)
    }
}
