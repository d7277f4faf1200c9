//! Schema diagnostics run before generation.
//!
//! ## Rules
//!
//! - **Bitfield width discrepancy**: a bitfield enum with exactly 32 values gets a 64-bit
//!   declared storage type but 32-bit helper bodies. Kept as is and reported.
//! - **Bitfield too wide**: more than 64 values cannot be addressed by any helper.
//! - **Bitfield storage too narrow**: an argument stores the flags in fewer bits than the
//!   enum has values.
//! - **Sentinel relocated**: an enum declares -1 itself, so its unknown sentinel moves to
//!   the next free lower value.
//! - **Identifier collision**: two schema names derive the same generated identifier or file.
//!   Checked for files, enum types and values, unit methods, the parameters of one message,
//!   and schema-wide for harness names and codec wire functions.
//! - **Missing doc**: commands and events should be documented.
//!
//! The generator refuses to emit when any error-level finding exists. The `lint_schema`
//! binary prints findings and exits with 1 on errors.

use std::collections::HashMap;

use crate::bitfield::{widths_disagree, MAX_BITFIELD_VALUES};
use crate::naming;
use crate::schema::{ArgType, Enum, Feature, FeatureUnit, Schema};

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Identifies which rule produced the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintRule {
    BitfieldWidthDiscrepancy,
    BitfieldTooWide,
    BitfieldStorageTooNarrow,
    SentinelRelocated,
    IdentifierCollision,
    MissingDoc,
}

/// A single lint message, located by schema path (`feature.item`).
#[derive(Debug, Clone)]
pub struct LintMessage {
    pub path: String,
    pub rule: LintRule,
    pub severity: Severity,
    pub message: String,
}

pub fn has_errors(messages: &[LintMessage]) -> bool {
    messages.iter().any(|m| m.severity == Severity::Error)
}

/// Run all rules. Messages follow schema order: features by id, then declaration order.
pub fn lint(schema: &Schema) -> Vec<LintMessage> {
    let mut out = Vec::new();
    let mut files: HashMap<String, String> = HashMap::new();
    for unit in schema.units() {
        let module = naming::snake_name(&naming::type_name(naming::DEFAULT_PREFIX, &unit.name()));
        for file in [module.clone(), format!("{}_impl", module)] {
            if let Some(other) = files.insert(file.clone(), unit.name()) {
                out.push(LintMessage {
                    path: unit.name(),
                    rule: LintRule::IdentifierCollision,
                    severity: Severity::Error,
                    message: format!("file {}.rs also generated for {}", file, other),
                });
            }
        }
    }
    lint_message_names(schema, &mut out);
    for feature in schema.features() {
        lint_feature(feature, &mut out);
        for unit in feature.units() {
            lint_unit(&unit, &mut out);
        }
    }
    out
}

/// Harness names and wire functions share one namespace across the whole schema.
fn lint_message_names(schema: &Schema, out: &mut Vec<LintMessage>) {
    let mut harness: HashMap<String, String> = HashMap::new();
    let mut wire: HashMap<String, String> = HashMap::new();
    for unit in schema.units() {
        let unit_name = unit.name();
        for m in unit.commands().into_iter().chain(unit.events()) {
            let path = format!("{}.{}", unit_name, m.name);
            let derived = [
                (&mut harness, naming::command_name(&unit_name, &m.name)),
                (&mut wire, naming::wire_function_name(&unit_name, &m.name)),
            ];
            for (seen, identifier) in derived {
                if let Some(other) = seen.insert(identifier.clone(), path.clone()) {
                    out.push(collision(&path, &identifier, &other));
                }
            }
        }
    }
}

fn lint_feature(feature: &Feature, out: &mut Vec<LintMessage>) {
    let mut types: HashMap<String, &str> = HashMap::new();
    for e in &feature.enums {
        let path = format!("{}.{}", feature.name, e.name);
        let ty = naming::enum_type_name(naming::DEFAULT_PREFIX, &feature.name, &e.name);
        if let Some(other) = types.insert(ty.clone(), &e.name) {
            out.push(collision(&path, &ty, other));
        }
        lint_enum(&path, &ty, e, out);
    }
    for ms in &feature.multisettings {
        let ty = naming::enum_type_name(naming::DEFAULT_PREFIX, &feature.name, &ms.name);
        if let Some(other) = types.insert(ty.clone(), &ms.name) {
            out.push(collision(&format!("{}.{}", feature.name, ms.name), &ty, other));
        }
    }

    for m in feature.commands.iter().chain(feature.events.iter()) {
        for arg in &m.args {
            let ArgType::Bitfield { enumeration, storage } = &arg.ty else {
                continue;
            };
            let count = feature.find_enum(enumeration).map_or(0, |e| e.values.len());
            if count > storage.bits() as usize {
                out.push(LintMessage {
                    path: format!("{}.{}.{}", feature.name, m.name, arg.name),
                    rule: LintRule::BitfieldStorageTooNarrow,
                    severity: Severity::Warning,
                    message: format!(
                        "{} values of {} do not fit in {}",
                        count,
                        enumeration,
                        storage.rust_name()
                    ),
                });
            }
        }
    }
}

fn lint_enum(path: &str, ty: &str, e: &Enum, out: &mut Vec<LintMessage>) {
    let mut variants: HashMap<String, &str> = HashMap::new();
    variants.insert(naming::unknown_value_name(ty), "the unknown sentinel");
    for v in &e.values {
        let variant = naming::enum_value_name(ty, &v.name);
        if let Some(other) = variants.insert(variant.clone(), &v.name) {
            out.push(collision(&format!("{}.{}", path, v.name), &variant, other));
        }
    }
    if e.contains(Enum::CANONICAL_UNKNOWN) {
        out.push(LintMessage {
            path: path.to_string(),
            rule: LintRule::SentinelRelocated,
            severity: Severity::Warning,
            message: format!(
                "declares {}; unknown values will map to {}",
                Enum::CANONICAL_UNKNOWN,
                e.unknown_value()
            ),
        });
    }
    if !e.used_like_bitfield {
        return;
    }
    let count = e.values.len();
    if count > MAX_BITFIELD_VALUES {
        out.push(LintMessage {
            path: path.to_string(),
            rule: LintRule::BitfieldTooWide,
            severity: Severity::Error,
            message: format!("{} values exceed the {} addressable bits", count, MAX_BITFIELD_VALUES),
        });
    } else if widths_disagree(count) {
        out.push(LintMessage {
            path: path.to_string(),
            rule: LintRule::BitfieldWidthDiscrepancy,
            severity: Severity::Warning,
            message: format!(
                "{} values: declared storage is 64-bit but helpers take 32-bit bitfields",
                count
            ),
        });
    }
}

fn lint_unit(unit: &FeatureUnit, out: &mut Vec<LintMessage>) {
    let mut methods: HashMap<String, String> = HashMap::new();
    for m in unit.commands() {
        let name = naming::encoder_name(&m.name);
        if let Some(other) = methods.insert(name.clone(), m.name.clone()) {
            out.push(collision(&format!("{}.{}", unit.name(), m.name), &name, &other));
        }
    }
    for m in unit.events() {
        let name = naming::event_handler_name(&m.name);
        if let Some(other) = methods.insert(name.clone(), m.name.clone()) {
            out.push(collision(&format!("{}.{}", unit.name(), m.name), &name, &other));
        }
    }
    for m in unit.commands().into_iter().chain(unit.events()) {
        let mut params: HashMap<String, &str> = HashMap::new();
        for a in &m.args {
            let ident = naming::rust_ident(&naming::arg_param_name(a));
            if let Some(other) = params.insert(ident.clone(), &a.name) {
                out.push(collision(&format!("{}.{}.{}", unit.name(), m.name, a.name), &ident, other));
            }
        }
        if m.doc.trim().is_empty() {
            out.push(LintMessage {
                path: format!("{}.{}", unit.name(), m.name),
                rule: LintRule::MissingDoc,
                severity: Severity::Warning,
                message: "no documentation".to_string(),
            });
        }
    }
}

fn collision(path: &str, identifier: &str, other: &str) -> LintMessage {
    LintMessage {
        path: path.to_string(),
        rule: LintRule::IdentifierCollision,
        severity: Severity::Error,
        message: format!("{} also derived from {}", identifier, other),
    }
}
