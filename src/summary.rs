//! Human-readable rendering of a loaded dataset configuration.

use nalgebra::Matrix4;
use prettytable::{Table, row};
use std::path::PathBuf;

use crate::calib::CarsCalib;
use crate::dataset::DatasetConfig;
use crate::topics::TopicInfo;

/// Table of topic, sensor category and message type.
pub fn topics_table(infos: &[TopicInfo]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Topic", "Sensor", "Type"]);
    for info in infos {
        table.add_row(row![info.topic, info.sensor_label(), info.msg_type]);
    }
    table
}

/// One block per car and frame, each with its 4x4 transform.
pub fn format_calibrations(cars: Option<&CarsCalib>) -> String {
    let Some(cars) = cars else {
        return "calibration: no data (offline calibration path missing)\n".to_string();
    };
    if cars.is_empty() {
        return "calibration: none loaded\n".to_string();
    }
    cars.iter()
        .map(|(car, frames)| {
            let blocks: String = frames
                .iter()
                .map(|(frame_id, info)| {
                    format!("  {frame_id}\n{}", format_matrix(info.transform_matrix(), "    "))
                })
                .collect();
            format!("car {car}\n{blocks}")
        })
        .collect()
}

fn format_matrix(m: &Matrix4<f64>, indent: &str) -> String {
    m.row_iter()
        .map(|row| {
            format!(
                "{indent}[{:>11.6} {:>11.6} {:>11.6} {:>11.6}]\n",
                row[0], row[1], row[2], row[3]
            )
        })
        .collect()
}

fn file_lines(tag: &str, files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|f| format!("  [{tag}] {}\n", f.display()))
        .collect()
}

/// Short overview of every derived value.
pub fn format_summary(ds: &DatasetConfig) -> String {
    format!(
        "Dataset root: {}\n\
         Save root: {}\n\
         Workers: {}\n\
         Main topic: {}\n\
         Time diff threshold (ms): {}, Sample interval (frames): {}, Save sweep data: {}\n\
         Compressed files pending: {}, Data files: {}\n\n\
         {}{}\n{}\n{}",
        ds.dataset_root.display(),
        ds.save_root.display(),
        ds.worker_num,
        ds.main_topic,
        ds.time_diff_threshold,
        ds.sample_interval,
        ds.save_sweep_data,
        ds.compressed_files.len(),
        ds.files.len(),
        file_lines("compressed", &ds.compressed_files),
        file_lines("data", &ds.files),
        topics_table(&ds.topic_infos),
        format_calibrations(ds.cars_calib.as_ref()),
    )
}
