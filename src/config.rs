//! Generator configuration.

use crate::naming;

/// Where generated code finds its collaborators and how it names things.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    /// Prefix of every generated type, e.g. `ArsdkFeature`.
    pub prefix: String,
    /// Path of the codec crate or module providing `Cmd`, `cmd_enc`, `cmd_dec` and `multiset`.
    pub codec_path: String,
    /// Path under which the harness reaches the generated bindings.
    pub bindings_path: String,
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            prefix: naming::DEFAULT_PREFIX.to_string(),
            codec_path: "arsdk".to_string(),
            bindings_path: "crate::arsdk_features".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Type prefix {0:?} must be an identifier starting with an uppercase letter")]
    Prefix(String),
    #[error("{0:?} is not a Rust path")]
    Path(String),
}

impl GenConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_codec_path(mut self, path: impl Into<String>) -> Self {
        self.codec_path = path.into();
        self
    }

    pub fn with_bindings_path(mut self, path: impl Into<String>) -> Self {
        self.bindings_path = path.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut chars = self.prefix.chars();
        let starts_upper = chars.next().is_some_and(|c| c.is_ascii_uppercase());
        if !starts_upper || !chars.all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::Prefix(self.prefix.clone()));
        }
        for path in [&self.codec_path, &self.bindings_path] {
            if !is_rust_path(path) {
                return Err(ConfigError::Path(path.clone()));
            }
        }
        Ok(())
    }

    /// File name prefix shared by every binding artifact, e.g. `arsdk_feature`.
    pub fn file_prefix(&self) -> String {
        naming::snake_name(&self.prefix)
    }

    /// Aggregate unit declaring every binding module, e.g. `arsdk_features.rs`.
    pub fn aggregate_file(&self) -> String {
        format!("{}s.rs", self.file_prefix())
    }

    /// Aggregate table of unit Uids, e.g. `arsdk_features_uids.rs`.
    pub fn uids_file(&self) -> String {
        format!("{}s_uids.rs", self.file_prefix())
    }
}

fn is_rust_path(path: &str) -> bool {
    !path.is_empty()
        && path.split("::").all(|seg| {
            let mut chars = seg.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
