//! Per-car sensor calibrations.
//!
//! Offline calibrations live in standalone YAML files, one or more per car,
//! named `<car>.<anything>.yaml`. Each top-level key is a sensor config key
//! that `topics_alias` maps to a frame id:
//!
//! ```yaml
//! lidar_top:
//!   tf_config: {tf_x: 0.0, tf_y: 0.0, tf_z: 1.8, tf_roll: 0.0, tf_pitch: 0.0, tf_yaw: 90.0}
//! ```

use nalgebra::{Matrix4, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize, Serializer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, LoadWay};
use crate::discovery::{ExcludeMatch, find_files};
use crate::error::{ConfigError, Result};
use crate::geometry::{euler_to_rotation_matrix, homogeneous, quantize};

/// frame id → calibration.
pub type CarCalib = BTreeMap<String, CalibInfo>;

/// car id → its calibrations.
pub type CarsCalib = BTreeMap<String, CarCalib>;

/// Six-parameter rigid-body pose: translation plus roll/pitch/yaw in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TfConfig {
    pub tf_x: f64,
    pub tf_y: f64,
    pub tf_z: f64,
    pub tf_roll: f64,
    pub tf_pitch: f64,
    pub tf_yaw: f64,
}

impl TfConfig {
    /// Homogeneous transform with every entry rounded to 6 decimals.
    pub fn transform_matrix(&self) -> Matrix4<f64> {
        let rotation = euler_to_rotation_matrix(self.tf_roll, self.tf_pitch, self.tf_yaw);
        let translation = Vector3::new(self.tf_x, self.tf_y, self.tf_z);
        quantize(&homogeneous(&rotation, &translation))
    }
}

/// Calibration of one sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibInfo {
    frame_id: String,
    raw_config: Value,
    #[serde(serialize_with = "serialize_rows")]
    transform_matrix: Matrix4<f64>,
}

impl CalibInfo {
    /// Build from a sensor's raw calibration mapping, which must hold a
    /// complete `tf_config`.
    pub fn new(frame_id: impl Into<String>, raw_config: Value, source: &Path) -> Result<Self> {
        let tf = raw_config
            .get("tf_config")
            .ok_or_else(|| ConfigError::missing_key(source.display().to_string(), "tf_config"))?;
        let tf: TfConfig =
            serde_yaml::from_value(tf.clone()).map_err(|e| ConfigError::yaml(source, e))?;

        Ok(Self {
            frame_id: frame_id.into(),
            transform_matrix: tf.transform_matrix(),
            raw_config,
        })
    }

    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    pub fn raw_config(&self) -> &Value {
        &self.raw_config
    }

    pub fn transform_matrix(&self) -> &Matrix4<f64> {
        &self.transform_matrix
    }
}

fn serialize_rows<S: Serializer>(m: &Matrix4<f64>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let rows: [[f64; 4]; 4] = std::array::from_fn(|r| std::array::from_fn(|c| m[(r, c)]));
    rows.serialize(serializer)
}

/// Car id of a calibration file: file name up to the first `.`.
pub fn car_id(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name,
    }
}

/// Parse one calibration file into frame id → calibration.
pub fn load_calib_file(path: &Path, topics_alias: &BTreeMap<String, String>) -> Result<CarCalib> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let doc: Value = serde_yaml::from_str(&contents).map_err(|e| ConfigError::yaml(path, e))?;
    let Value::Mapping(sensors) = doc else {
        return Err(ConfigError::invalid_calibration(path, "top level is not a mapping"));
    };

    let mut calib = CarCalib::new();
    for (key, value) in sensors {
        let sensor = key
            .as_str()
            .ok_or_else(|| ConfigError::invalid_calibration(path, format!("sensor key {key:?} is not a string")))?;
        let frame_id = topics_alias
            .get(sensor)
            .ok_or_else(|| ConfigError::missing_key("topics_alias", sensor))?;
        let info = CalibInfo::new(frame_id.clone(), value, path)?;
        calib.insert(frame_id.clone(), info);
    }
    Ok(calib)
}

/// Load every car's calibration according to `config.calib`.
///
/// * offline, directory present: `Some(cars)`
/// * offline, directory missing: `None`
/// * any other load way: `Some(empty)`
///
/// Files are parsed in parallel and merged in path order, so when two
/// files of the same car define the same frame id the later path wins.
pub fn load_calibrations(config: &Config) -> Result<Option<CarsCalib>> {
    match &config.calib.load_way {
        LoadWay::Inline(way) => {
            tracing::info!(load_way = %way, "calibration comes from the config; nothing loaded from disk");
            Ok(Some(CarsCalib::new()))
        }
        LoadWay::Offline => {
            tracing::info!("loading calibration from offline files");
            let calib_path = config
                .calib
                .calib_path
                .as_deref()
                .ok_or_else(|| ConfigError::missing_key("calib", "calib_path"))?;
            if !calib_path.exists() {
                tracing::info!(path = %calib_path.display(), "calibration path does not exist");
                return Ok(None);
            }
            load_calib_dir(calib_path, &config.topics_alias).map(Some)
        }
    }
}

/// Load all `.yaml` calibration files under `dir`, grouped by car id.
pub fn load_calib_dir(dir: &Path, topics_alias: &BTreeMap<String, String>) -> Result<CarsCalib> {
    let mut files: Vec<PathBuf> = find_files(dir, ".yaml", &[], ExcludeMatch::Exact);
    files.sort();

    let parsed = files
        .par_iter()
        .map(|path| load_calib_file(path, topics_alias).map(|calib| (car_id(path), calib)))
        .collect::<Result<Vec<_>>>()?;

    let mut cars = CarsCalib::new();
    for (car, calib) in parsed {
        tracing::debug!(%car, sensors = calib.len(), "loaded calibration file");
        cars.entry(car).or_default().extend(calib);
    }

    tracing::info!(cars = cars.len(), files = files.len(), "loaded calibrations");
    Ok(cars)
}
