//! Aggregated dataset configuration handed to the processing pipeline.

use nalgebra::Matrix4;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::calib::{CarCalib, CarsCalib, load_calibrations};
use crate::config::Config;
use crate::discovery::{list_compressed_files, list_data_files};
use crate::error::Result;
use crate::topics::TopicInfo;

/// Every value the pipeline needs, derived from one [`Config`].
#[derive(Debug, Clone, Serialize)]
pub struct DatasetConfig {
    pub worker_num: usize,
    /// Compressed recordings without a decompressed sibling yet.
    pub compressed_files: Vec<PathBuf>,
    /// Recordings ready to be read.
    pub files: Vec<PathBuf>,
    pub dataset_root: PathBuf,
    pub save_root: PathBuf,
    pub topics: Vec<String>,
    pub topic_infos: Vec<TopicInfo>,
    pub topics_alias: BTreeMap<String, String>,
    pub main_topic: String,
    /// Milliseconds.
    pub time_diff_threshold: f64,
    /// Frames.
    pub sample_interval: usize,
    pub save_sweep_data: bool,
    /// `None` when offline calibration was requested but the calibration
    /// directory does not exist.
    pub cars_calib: Option<CarsCalib>,
}

impl DatasetConfig {
    /// Derive everything from an already loaded config.
    ///
    /// Calibration files are parsed on a thread pool sized by `worker_num`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let tree = config.topic_tree()?;
        let topics = tree.topic_names();
        let topic_infos = tree.topic_infos(&config.msg_type)?;

        let compressed_files = list_compressed_files(config);
        let files = list_data_files(config);

        let cars_calib = match rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_num)
            .build()
        {
            Ok(pool) => pool.install(|| load_calibrations(config))?,
            Err(e) => {
                tracing::warn!(error = %e, "cannot build worker pool; using the global one");
                load_calibrations(config)?
            }
        };

        Ok(Self {
            worker_num: config.worker_num,
            compressed_files,
            files,
            dataset_root: config.dataset_root.clone(),
            save_root: config.save_root.clone(),
            topics,
            topic_infos,
            topics_alias: config.topics_alias.clone(),
            main_topic: config.main_topic.clone(),
            time_diff_threshold: config.time_diff_threshold,
            sample_interval: config.sample_interval,
            save_sweep_data: config.save_sweep_data,
            cars_calib,
        })
    }

    /// Calibrations of one car.
    pub fn calib_for(&self, car: &str) -> Option<&CarCalib> {
        self.cars_calib.as_ref()?.get(car)
    }

    /// Transform of `frame_id` on `car`.
    pub fn transform(&self, car: &str, frame_id: &str) -> Option<&Matrix4<f64>> {
        self.calib_for(car)?.get(frame_id).map(|c| c.transform_matrix())
    }
}

/// Load the config at `path` once and derive the full [`DatasetConfig`].
pub fn parse_config(path: impl AsRef<Path>) -> Result<DatasetConfig> {
    let config = Config::load(path)?;
    DatasetConfig::from_config(&config)
}
