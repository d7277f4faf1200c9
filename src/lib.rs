//! # arsdkgen: ARSDK schema compiler
//!
//! Compiles the ARSDK drone command/event schema into typed Rust bindings: one module per
//! feature (or legacy feature class) with enums, bitfield helpers, command encoders, an
//! event callback trait and a decode dispatcher, plus a test harness that matches the
//! commands sent by code under test against expected ones.
//!
//! The same tables that drive emission also drive an in-process runtime
//! ([`binding::Bindings`]) on top of a pluggable [`codec::WireCodec`], which the tests and
//! the `lint_schema`/`arsdkgen` binaries use directly.
//!
//! ## Schema structure
//!
//! - **Feature**: numeric id and name, optionally split into legacy **classes**
//! - **Enums**: named values, usable as plain enums or as bitfields of flags
//! - **Multisettings**: opaque composite settings referenced by name
//! - **Commands** (`cmd`): sent by the application, encode only
//! - **Events** (`evt`): sent by the device, decoded and dispatched to a handler
//!
//! ## Example schema
//!
//! ```text
//! /// Battery status.
//! feature battery = 3 {
//!     enum alert { none; low_power; critical; }
//!
//!     /// Charge changed.
//!     evt level = 7 (percent: u8, alert: enum alert);
//! }
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use arsdkgen::{generate_source, GenConfig, Target};
//!
//! let source = std::fs::read_to_string("arsdk.schema").unwrap();
//! let set = generate_source(&source, &GenConfig::default(), Target::All).unwrap();
//! set.write_to("src/generated").unwrap();
//! ```

pub mod binding;
pub mod bitfield;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod dump;
pub mod emit;
pub mod generator;
pub mod harness;
pub mod lint;
pub mod matcher;
pub mod naming;
pub mod output;
pub mod parser;
pub mod schema;
pub mod types;
pub mod value;
mod writer;

pub use binding::{Bindings, DispatchError, EventHandler, FeatureBinding};
pub use codec::{ArsdkCodec, Cmd, CodecError, WireCodec};
pub use config::GenConfig;
pub use dispatch::{CommandKey, Uid, NO_ROUTE};
pub use generator::{generate_source, ArtifactSet, GenError, Generator, Target};
pub use matcher::ExpectedCmd;
pub use parser::parse;
pub use schema::{Arg, ArgType, Enum, Feature, FeatureUnit, IntType, Message, MessageKind, Schema, SchemaError};
pub use value::Value;
