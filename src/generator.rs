//! Generation driver: schema in, named artifacts out.
//!
//! Runs lint, refuses to emit on error-level findings, builds the dispatch tables once
//! and hands them to the binding and harness emitters. Artifacts are kept in a sorted map
//! so that the same schema and configuration always produce the same files, in the same
//! order, byte for byte.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, GenConfig};
use crate::dispatch;
use crate::emit::Emitter;
use crate::harness::{self, HarnessEmitter};
use crate::lint::{self, LintMessage, Severity};
use crate::output::CleanOutputDir;
use crate::parser;
use crate::schema::{Schema, SchemaError};

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("{count} lint error(s), first at {path}: {message}")]
    Lint {
        count: usize,
        path: String,
        message: String,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Which artifacts to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Bindings,
    Harness,
    All,
}

impl Target {
    fn bindings(self) -> bool {
        matches!(self, Target::Bindings | Target::All)
    }

    fn harness(self) -> bool {
        matches!(self, Target::Harness | Target::All)
    }
}

/// Generated files by name, plus the prefixes a run owns in its output directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactSet {
    files: BTreeMap<String, String>,
    prefixes: Vec<String>,
}

impl ArtifactSet {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Clean the owned files out of `dir`, then write every artifact there.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, GenError> {
        let prefixes: Vec<&str> = self.prefixes.iter().map(String::as_str).collect();
        let out = CleanOutputDir::prepare(dir, &prefixes)?;
        let mut written = Vec::with_capacity(self.files.len());
        for (name, contents) in &self.files {
            written.push(out.write(name, contents)?);
        }
        tracing::info!(dir = %out.path().display(), files = written.len(), "wrote artifacts");
        Ok(written)
    }

    fn insert(&mut self, name: String, contents: String) {
        tracing::debug!(file = %name, bytes = contents.len(), "generated");
        self.files.insert(name, contents);
    }
}

pub struct Generator<'a> {
    schema: &'a Schema,
    config: &'a GenConfig,
}

impl<'a> Generator<'a> {
    pub fn new(schema: &'a Schema, config: &'a GenConfig) -> Result<Self, GenError> {
        config.validate()?;
        Ok(Generator { schema, config })
    }

    /// Lint the schema, logging every finding.
    pub fn lint(&self) -> Vec<LintMessage> {
        let messages = lint::lint(self.schema);
        for m in &messages {
            match m.severity {
                Severity::Error => tracing::error!(path = %m.path, rule = ?m.rule, "{}", m.message),
                Severity::Warning => tracing::warn!(path = %m.path, rule = ?m.rule, "{}", m.message),
            }
        }
        messages
    }

    pub fn generate(&self, target: Target) -> Result<ArtifactSet, GenError> {
        let messages = self.lint();
        let errors: Vec<&LintMessage> = messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .collect();
        if let Some(first) = errors.first() {
            return Err(GenError::Lint {
                count: errors.len(),
                path: first.path.clone(),
                message: first.message.clone(),
            });
        }

        let tables = dispatch::build(self.schema, true);
        tracing::info!(units = tables.len(), ?target, "generating");
        let mut set = ArtifactSet::default();

        if target.bindings() {
            let emitter = Emitter::new(self.schema, self.config);
            for t in &tables {
                tracing::debug!(unit = %t.unit.name(), uid = %t.uid, "emitting unit");
                set.insert(emitter.interface_file(&t.unit), emitter.interface_unit(t));
                set.insert(emitter.implementation_file(&t.unit), emitter.implementation_unit(t));
            }
            set.insert(self.config.aggregate_file(), emitter.aggregate_unit(&tables));
            set.insert(self.config.uids_file(), emitter.uids_unit(&tables));
            set.prefixes.push(self.config.file_prefix());
        }

        if target.harness() {
            let harness = HarnessEmitter::new(self.schema, self.config);
            set.insert(harness::EXPECTED_CMD_FILE.to_string(), harness.expected_cmd_unit(&tables));
            set.insert(harness::CMD_ENCODER_FILE.to_string(), harness.cmd_encoder_unit(&tables));
            set.prefixes
                .extend(harness::FILE_PREFIXES.iter().map(|p| p.to_string()));
        }
        Ok(set)
    }
}

/// Parse `source` and generate `target` in one go.
pub fn generate_source(source: &str, config: &GenConfig, target: Target) -> Result<ArtifactSet, GenError> {
    let schema = parser::parse(source)?;
    Generator::new(&schema, config)?.generate(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        feature battery = 3 {
            /// Charge changed.
            evt level = 7 (percent: u8);
        }
    "#;

    #[test]
    fn bindings_file_set() {
        let set = generate_source(SOURCE, &GenConfig::default(), Target::Bindings).unwrap();
        let names: Vec<&str> = set.names().collect();
        assert_eq!(
            names,
            vec![
                "arsdk_feature_battery.rs",
                "arsdk_feature_battery_impl.rs",
                "arsdk_features.rs",
                "arsdk_features_uids.rs",
            ]
        );
    }

    #[test]
    fn harness_only() {
        let set = generate_source(SOURCE, &GenConfig::default(), Target::Harness).unwrap();
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["cmd_encoder.rs", "expected_cmd.rs"]);
    }

    #[test]
    fn lint_errors_block_generation() {
        let src = "feature a = 1 { enum e { x_y; x__y; } }";
        let err = generate_source(src, &GenConfig::default(), Target::All).unwrap_err();
        assert!(matches!(err, GenError::Lint { count: 1, .. }));
    }

    #[test]
    fn bad_config_is_rejected() {
        let config = GenConfig::default().with_prefix("lower");
        let err = generate_source(SOURCE, &config, Target::All).unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
    }
}
