//! On-disk fixture: a small dataset tree, calibration files and config.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Fixture {
    pub dir: TempDir,
    pub config: PathBuf,
}

impl Fixture {
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

/// Build the fixture with the given `calib` section body.
pub fn fixture_with_calib(calib: &str) -> Fixture {
    fixture_with(calib, "")
}

/// Build the fixture with the given `calib` section body and extra
/// top-level config lines.
pub fn fixture_with(calib: &str, extra: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let data = root.join("data");

    // 2023 run: compressed and already decompressed
    touch(&data.join("2023/run1.bag.tar.gz"));
    touch(&data.join("2023/run1.bag"));
    // 2024 run: compressed only
    touch(&data.join("2024/run2.bag.tar.gz"));
    // excluded directory
    touch(&data.join("old/run0.bag.tar.gz"));
    touch(&data.join("old/run0.bag"));
    touch(&data.join("old/nested/run00.bag"));

    let calib_dir = root.join("calib");
    fs::create_dir_all(&calib_dir).unwrap();
    fs::write(
        calib_dir.join("car01.yaml"),
        "lidar_top:\n  tf_config: {tf_x: 0.0, tf_y: 0.0, tf_z: 1.8, tf_roll: 0.0, tf_pitch: 0.0, tf_yaw: 90.0}\n\
         cam_front:\n  tf_config: {tf_x: 1.2, tf_y: 0.0, tf_z: 1.5, tf_roll: -90.0, tf_pitch: 0.0, tf_yaw: -90.0}\n",
    )
    .unwrap();

    let config = format!(
        r#"worker_num: 2
dataset_root: {data}
exclude_path:
  - {old}
compressed_data_suffix: .tar.gz
data_suffix: .bag
save_root: {save}
topics:
  lidar: [/lidar/top, /lidar/front]
  camera:
    /camera/front: null
  radar: /radar/front
msg_type:
  lidar: sensor_msgs/PointCloud2
  /camera/front: sensor_msgs/CompressedImage
  radar: radar_msgs/RadarScan
topics_alias:
  lidar_top: lidar_top
  cam_front: camera_front
main_topic: /lidar/top
time_diff_threshold: 50
sample_interval: 5
save_sweep_data: true
calib:
{calib}
{extra}
"#,
        data = data.display(),
        old = data.join("old").display(),
        save = root.join("out").display(),
        calib = calib.replace("{calib_dir}", &calib_dir.display().to_string()),
        extra = extra,
    );
    let config_path = root.join("config.yaml");
    fs::write(&config_path, config).unwrap();

    Fixture {
        dir,
        config: config_path,
    }
}

pub fn offline_fixture() -> Fixture {
    fixture_with_calib("  load_way: offline\n  calib_path: {calib_dir}")
}
