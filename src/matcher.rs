//! Verification matcher: a reference wire command built from literal arguments and
//! matched against commands observed during a test.

use crate::codec::{Cmd, WireCodec};
use crate::dispatch::CommandKey;
use crate::dump;
use crate::schema::{FeatureUnit, Message, MessageKind, Schema};
use crate::types::compare_policy;
use crate::value::Value;

pub struct ExpectedCmd<'a> {
    codec: &'a dyn WireCodec,
    unit: FeatureUnit<'a>,
    message: &'a Message,
    key: CommandKey,
    cmd: Cmd,
}

impl<'a> ExpectedCmd<'a> {
    /// Encode command `<unit>.<command>` with `args` into a fresh buffer.
    ///
    /// `None` when the command is unknown or the codec rejects the arguments; no
    /// partially built object is ever returned.
    pub fn new(schema: &'a Schema, codec: &'a dyn WireCodec, qualified: &str, args: Vec<Value>) -> Option<Self> {
        let (unit, message) = schema.find_message(MessageKind::Command, qualified)?;
        let key = CommandKey::new(unit.feature_id(), unit.class_id(), message.id);
        let mut cmd = Cmd::new();
        if let Err(e) = codec.encode(&mut cmd, key, message, &args) {
            tracing::debug!(command = qualified, status = e.status(), "expected command not built: {}", e);
            return None;
        }
        Some(ExpectedCmd {
            codec,
            unit,
            message,
            key,
            cmd,
        })
    }

    pub fn cmd(&self) -> &Cmd {
        &self.cmd
    }

    pub fn message(&self) -> &'a Message {
        self.message
    }

    /// Command id equality; with `check_params`, also every argument under its
    /// comparison policy. Both sides are decoded separately and compared raw: no
    /// unknown-sentinel substitution happens here.
    pub fn matches(&self, incoming: &Cmd, check_params: bool) -> bool {
        if incoming.id() != self.cmd.id() {
            return false;
        }
        if !check_params {
            return true;
        }
        let Ok(expected) = self.codec.decode(&self.cmd, self.key, self.message) else {
            return false;
        };
        let Ok(actual) = self.codec.decode(incoming, self.key, self.message) else {
            return false;
        };
        self.message
            .args
            .iter()
            .zip(expected.iter().zip(actual.iter()))
            .all(|(arg, (e, a))| e.equals(a, compare_policy(&arg.ty)))
    }

    /// Full contents of the expected command, for diagnostics.
    pub fn describe(&self) -> String {
        match self.codec.decode(&self.cmd, self.key, self.message) {
            Ok(values) => dump::describe_message(&self.unit, self.message, &values),
            Err(_) => self.cmd.describe(),
        }
    }
}
