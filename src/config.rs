//! Experiment configuration file: raw reader and the typed, load-once view.

use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::discovery::SuffixStrip;
use crate::error::{ConfigError, Result};
use crate::topics::TopicTree;

/// Path used when the caller does not name a config file.
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// Read a YAML document into a generic value tree.
pub fn read_config(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::yaml(path, e))
}

/// Root of the experiment configuration.
///
/// Load it once with [`Config::load`] and pass it by reference; nothing in
/// this crate re-reads the file afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Number of workers the pipeline may use.
    pub worker_num: usize,

    /// Root of the recorded dataset tree.
    pub dataset_root: PathBuf,

    /// Directories to leave out of file discovery.
    pub exclude_path: Vec<String>,

    /// Suffix of compressed recordings (e.g. `.bag.tar.gz`).
    pub compressed_data_suffix: String,

    /// Suffix of ready-to-read recordings (e.g. `.bag`).
    pub data_suffix: String,

    /// Where the pipeline writes its output.
    pub save_root: PathBuf,

    /// Nested topic-naming tree, see [`TopicTree`].
    pub topics: Value,

    /// Message type per topic name or per sensor category.
    pub msg_type: BTreeMap<String, String>,

    /// Sensor config key → frame id.
    pub topics_alias: BTreeMap<String, String>,

    /// Topic every other stream is aligned to.
    pub main_topic: String,

    /// Maximum time difference between aligned messages, in milliseconds.
    pub time_diff_threshold: f64,

    /// Keep every n-th frame of the main topic.
    pub sample_interval: usize,

    /// Persist non-keyframe ("sweep") data as well.
    pub save_sweep_data: bool,

    /// Where calibrations come from.
    pub calib: CalibSettings,

    /// How the compressed suffix is removed when looking for an
    /// already-decompressed sibling.
    #[serde(default)]
    pub suffix_strip: SuffixStrip,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config: Config =
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::yaml(path, e))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Build the typed topic tree from the raw `topics` section.
    pub fn topic_tree(&self) -> Result<TopicTree> {
        TopicTree::from_value(&self.topics)
    }
}

/// `calib` section of the configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CalibSettings {
    pub load_way: LoadWay,

    /// Directory holding per-car calibration files. Required when
    /// `load_way` is `offline`.
    #[serde(default)]
    pub calib_path: Option<PathBuf>,
}

/// Calibration source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum LoadWay {
    /// Standalone calibration files under `calib_path`.
    Offline,
    /// Anything else; the calibration is expected to live in the main
    /// config and nothing is loaded from disk.
    Inline(String),
}

impl From<String> for LoadWay {
    fn from(value: String) -> Self {
        if value == "offline" {
            LoadWay::Offline
        } else {
            LoadWay::Inline(value)
        }
    }
}

/// Read the `topic` section of a simpler, standalone topic config.
///
/// Returns `Ok(None)` and prints a diagnostic when the file does not exist
/// or has no top-level `topic` key. A malformed document is still an error.
pub fn parse_topic_section(path: impl AsRef<Path>) -> Result<Option<Value>> {
    let path = path.as_ref();
    if !path.exists() {
        println!("config file not found: {}", path.display());
        return Ok(None);
    }

    let config = read_config(path)?;
    match config.get("topic") {
        Some(topic) => Ok(Some(topic.clone())),
        None => {
            println!("topic not in config");
            Ok(None)
        }
    }
}
