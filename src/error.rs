use std::path::PathBuf;
use thiserror::Error;

/// Failures loading a rule set at the rule-storage boundary.
///
/// The engine itself has no error type: once rules are loaded, anything
/// malformed inside them just fails to match.
#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("failed to read rule file {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule file {path}: {source}")]
    Parse {
        path:   PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("duplicate rule id '{0}'")]
    DuplicateId(String),
}

pub type Result<T> = std::result::Result<T, RuleSetError>;
