//! Error types for configuration loading.

use std::path::PathBuf;

/// Errors raised while reading an experiment configuration or anything it
/// points at (dataset tree, calibration files).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A file or directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A YAML document is malformed or does not match the expected shape.
    #[error("failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required key is absent from a mapping.
    #[error("missing key `{key}` in {context}")]
    MissingKey { context: String, key: String },

    /// A topic has no entry in the `msg_type` mapping.
    #[error("no msg_type entry for `{key}` (topic {topic})")]
    MissingMsgType { topic: String, key: String },

    /// The `topics` tree has a shape that cannot be flattened.
    #[error("invalid topic tree: {reason}")]
    InvalidTopicTree { reason: String },

    /// A calibration document has an unexpected shape.
    #[error("invalid calibration file {}: {reason}", path.display())]
    InvalidCalibration { path: PathBuf, reason: String },
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        ConfigError::Yaml {
            path: path.into(),
            source,
        }
    }

    pub fn missing_key(context: impl Into<String>, key: impl Into<String>) -> Self {
        ConfigError::MissingKey {
            context: context.into(),
            key: key.into(),
        }
    }

    pub fn invalid_topic_tree(reason: impl Into<String>) -> Self {
        ConfigError::InvalidTopicTree {
            reason: reason.into(),
        }
    }

    pub fn invalid_calibration(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidCalibration {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
