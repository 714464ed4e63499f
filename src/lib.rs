//! sensorset - Load multi-sensor dataset experiment configs
//!
//! This library reads the YAML experiment configuration of a lidar/camera/
//! radar dataset processing pipeline and turns it into plain, typed values:
//!
//! - **Topics**: the nested `topics` tree flattened into topic names and
//!   [`TopicInfo`] records (topic, sensor category, message type)
//! - **Calibration**: per-car, per-frame 4x4 transforms built from
//!   `tf_config` translation + roll/pitch/yaw, quantized to 6 decimals
//! - **Dataset files**: compressed recordings still to decompress and
//!   ready-to-read recordings, with directory exclusions
//! - **Pipeline knobs**: workers, main topic, time-diff threshold, sample
//!   interval, sweep persistence
//!
//! # Example
//!
//! ```rust,no_run
//! use sensorset::parse_config;
//!
//! let dataset = parse_config("./config.yaml")?;
//! for info in &dataset.topic_infos {
//!     println!("{} ({}) -> {}", info.topic, info.sensor_label(), info.msg_type);
//! }
//! if let Some(tf) = dataset.transform("car01", "lidar_top") {
//!     println!("{tf}");
//! }
//! # Ok::<(), sensorset::ConfigError>(())
//! ```

pub mod calib;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod discovery;
pub mod error;
pub mod geometry;
pub mod summary;
pub mod topics;

// Re-export main types for convenience
pub use calib::{CalibInfo, CarsCalib, TfConfig, load_calibrations};
pub use config::{Config, parse_topic_section, read_config};
pub use dataset::{DatasetConfig, parse_config};
pub use error::{ConfigError, Result};
pub use geometry::euler_to_rotation_matrix;
pub use topics::{SensorType, TopicInfo, TopicNode, TopicTree};
