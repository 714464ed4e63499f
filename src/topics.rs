//! Topic tree: typed view of the nested `topics` section and its flatteners.
//!
//! The section nests sensor categories around topic names:
//!
//! ```yaml
//! topics:
//!   lidar: [/lidar/top, /lidar/front]   # list: msg_type looked up by "lidar"
//!   camera:
//!     /camera/front: null               # keyed leaf: msg_type looked up by topic
//! ```

use serde::Serialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ConfigError, Result};

/// Sensor category a topic belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SensorType {
    Lidar,
    Camera,
    Radar,
    /// User-defined category, e.g. `imu` or `gnss`.
    Other(String),
}

impl SensorType {
    pub fn as_str(&self) -> &str {
        match self {
            SensorType::Lidar => "lidar",
            SensorType::Camera => "camera",
            SensorType::Radar => "radar",
            SensorType::Other(name) => name,
        }
    }
}

impl From<&str> for SensorType {
    fn from(name: &str) -> Self {
        match name {
            "lidar" => SensorType::Lidar,
            "camera" => SensorType::Camera,
            "radar" => SensorType::Radar,
            other => SensorType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SensorType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One topic to extract from a recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicInfo {
    pub topic: String,
    /// `None` for a topic keyed directly under `topics`.
    pub sensor_type: Option<SensorType>,
    pub msg_type: String,
}

impl TopicInfo {
    pub fn new(
        topic: impl Into<String>,
        sensor_type: impl Into<Option<SensorType>>,
        msg_type: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            sensor_type: sensor_type.into(),
            msg_type: msg_type.into(),
        }
    }

    /// Category name, or `-` when the topic has none.
    pub fn sensor_label(&self) -> &str {
        self.sensor_type.as_ref().map_or("-", SensorType::as_str)
    }
}

/// A node of the topic tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicNode {
    /// Mapping key with a non-empty value; the key names the category of
    /// everything below it.
    Category { name: String, children: Vec<TopicNode> },
    /// Topic names sharing the enclosing category. A bare scalar is a
    /// one-item list.
    List { category: Option<String>, items: Vec<String> },
    /// Mapping key with an empty value; the key itself is the topic.
    Leaf(String),
}

/// The `topics` section, parsed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicTree {
    roots: Vec<TopicNode>,
}

impl TopicTree {
    /// Build the tree from the raw YAML value.
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self {
            roots: build_nodes(value, None)?,
        })
    }

    pub fn roots(&self) -> &[TopicNode] {
        &self.roots
    }

    /// Every topic name, depth-first in document order. Duplicates are kept.
    pub fn topic_names(&self) -> Vec<String> {
        let mut out = Vec::new();
        for node in &self.roots {
            collect_names(node, &mut out);
        }
        out
    }

    /// Every topic with its sensor category and message type, in the same
    /// order as [`TopicTree::topic_names`].
    ///
    /// Keyed leaves resolve their message type by topic name, list items by
    /// category name. A missing entry is an error, and so is a list with no
    /// category to look up. Keyed leaves directly under `topics` carry no
    /// sensor type.
    pub fn topic_infos(&self, msg_types: &BTreeMap<String, String>) -> Result<Vec<TopicInfo>> {
        let mut out = Vec::new();
        for node in &self.roots {
            collect_infos(node, None, msg_types, &mut out)?;
        }
        Ok(out)
    }
}

fn build_nodes(value: &Value, category: Option<&str>) -> Result<Vec<TopicNode>> {
    match value {
        Value::Mapping(map) => {
            let mut nodes = Vec::with_capacity(map.len());
            for (key, child) in map {
                let name = scalar_to_string(key).ok_or_else(|| {
                    ConfigError::invalid_topic_tree(format!("mapping key {key:?} is not a scalar"))
                })?;
                if is_truthy(child) {
                    let children = build_nodes(child, Some(name.as_str()))?;
                    nodes.push(TopicNode::Category { name, children });
                } else {
                    nodes.push(TopicNode::Leaf(name));
                }
            }
            Ok(nodes)
        }
        Value::Sequence(seq) => {
            let items = seq
                .iter()
                .map(|item| {
                    scalar_to_string(item).ok_or_else(|| {
                        ConfigError::invalid_topic_tree(format!(
                            "list under {} holds a non-scalar item {item:?}",
                            category.unwrap_or("<root>")
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(vec![TopicNode::List {
                category: category.map(str::to_string),
                items,
            }])
        }
        Value::Null => Ok(Vec::new()),
        Value::Tagged(tagged) => build_nodes(&tagged.value, category),
        scalar => {
            // bool/number/string, never None here
            let item = scalar_to_string(scalar).unwrap_or_default();
            Ok(vec![TopicNode::List {
                category: category.map(str::to_string),
                items: vec![item],
            }])
        }
    }
}

fn collect_names(node: &TopicNode, out: &mut Vec<String>) {
    match node {
        TopicNode::Category { children, .. } => {
            for child in children {
                collect_names(child, out);
            }
        }
        TopicNode::List { items, .. } => out.extend(items.iter().cloned()),
        TopicNode::Leaf(name) => out.push(name.clone()),
    }
}

fn collect_infos(
    node: &TopicNode,
    category: Option<&str>,
    msg_types: &BTreeMap<String, String>,
    out: &mut Vec<TopicInfo>,
) -> Result<()> {
    match node {
        TopicNode::Category { name, children } => {
            for child in children {
                collect_infos(child, Some(name.as_str()), msg_types, out)?;
            }
        }
        TopicNode::List { category: list_category, items } => {
            let sensor = list_category.as_deref().or(category).ok_or_else(|| {
                ConfigError::invalid_topic_tree("topic list has no enclosing sensor category")
            })?;
            for item in items {
                let msg_type = lookup_msg_type(msg_types, sensor, item)?;
                out.push(TopicInfo::new(item.clone(), SensorType::from(sensor), msg_type));
            }
        }
        TopicNode::Leaf(topic) => {
            let msg_type = lookup_msg_type(msg_types, topic, topic)?;
            out.push(TopicInfo::new(topic.clone(), category.map(SensorType::from), msg_type));
        }
    }
    Ok(())
}

fn lookup_msg_type(msg_types: &BTreeMap<String, String>, key: &str, topic: &str) -> Result<String> {
    msg_types
        .get(key)
        .cloned()
        .ok_or_else(|| ConfigError::MissingMsgType {
            topic: topic.to_string(),
            key: key.to_string(),
        })
}

/// YAML emptiness: null, false, zero, empty string and empty collections.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    fn msg_types(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_list_and_keyed_leaf() {
        let tree = TopicTree::from_value(&yaml("lidar: [a, b]\ncamera:\n  c: null\n")).unwrap();
        let infos = tree
            .topic_infos(&msg_types(&[("lidar", "PointCloud2"), ("c", "Image")]))
            .unwrap();
        assert_eq!(
            infos,
            vec![
                TopicInfo::new("a", SensorType::Lidar, "PointCloud2"),
                TopicInfo::new("b", SensorType::Lidar, "PointCloud2"),
                TopicInfo::new("c", SensorType::Camera, "Image"),
            ]
        );
        assert_eq!(tree.topic_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tree_shape() {
        let tree = TopicTree::from_value(&yaml("lidar: [a]\ncamera:\n  c: ~\n")).unwrap();
        assert_eq!(
            tree.roots(),
            &[
                TopicNode::Category {
                    name: "lidar".into(),
                    children: vec![TopicNode::List {
                        category: Some("lidar".into()),
                        items: vec!["a".into()],
                    }],
                },
                TopicNode::Category {
                    name: "camera".into(),
                    children: vec![TopicNode::Leaf("c".into())],
                },
            ]
        );
    }

    #[test]
    fn test_scalar_under_category() {
        let tree = TopicTree::from_value(&yaml("radar: /radar/front\n")).unwrap();
        let infos = tree.topic_infos(&msg_types(&[("radar", "RadarScan")])).unwrap();
        assert_eq!(infos, vec![TopicInfo::new("/radar/front", SensorType::Radar, "RadarScan")]);
    }

    #[test]
    fn test_user_defined_category_and_nesting() {
        let src = "sensors:\n  imu:\n    /imu/data: null\n  lidar: [/l]\n";
        let tree = TopicTree::from_value(&yaml(src)).unwrap();
        let infos = tree
            .topic_infos(&msg_types(&[("/imu/data", "Imu"), ("lidar", "PointCloud2")]))
            .unwrap();
        assert_eq!(infos[0].sensor_type, Some(SensorType::Other("imu".into())));
        assert_eq!(infos[0].sensor_label(), "imu");
        assert_eq!(infos[1].sensor_type, Some(SensorType::Lidar));
    }

    #[test]
    fn test_falsy_values_mark_leaves() {
        let src = "camera:\n  a: null\n  b: ''\n  c: []\n  d: {}\n  e: false\n  f: 0\n";
        let tree = TopicTree::from_value(&yaml(src)).unwrap();
        assert_eq!(tree.topic_names(), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let src = "lidar: [a]\ncamera:\n  a: null\n";
        let tree = TopicTree::from_value(&yaml(src)).unwrap();
        assert_eq!(tree.topic_names(), vec!["a", "a"]);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let src = "lidar: [x, y, z]\ncamera:\n  front: null\n  rear: null\nradar: [r]\n";
        let tree = TopicTree::from_value(&yaml(src)).unwrap();
        let types = msg_types(&[("lidar", "P"), ("front", "I"), ("rear", "I"), ("radar", "R")]);
        assert_eq!(tree.topic_names(), tree.topic_names());
        assert_eq!(tree.topic_infos(&types).unwrap(), tree.topic_infos(&types).unwrap());
        assert_eq!(tree.topic_names(), vec!["x", "y", "z", "front", "rear", "r"]);
    }

    #[test]
    fn test_missing_msg_type_is_an_error() {
        let tree = TopicTree::from_value(&yaml("camera:\n  c: null\n")).unwrap();
        let err = tree.topic_infos(&msg_types(&[("camera", "Image")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingMsgType { ref key, .. } if key == "c"));
    }

    #[test]
    fn test_root_list_has_no_category() {
        let tree = TopicTree::from_value(&yaml("[a, b]")).unwrap();
        assert_eq!(tree.topic_names(), vec!["a", "b"]);
        assert!(matches!(
            tree.topic_infos(&BTreeMap::new()),
            Err(ConfigError::InvalidTopicTree { .. })
        ));
    }

    #[test]
    fn test_root_keyed_topic_has_no_sensor_type() {
        let tree = TopicTree::from_value(&yaml("/imu/data: null\nlidar: [a]\n")).unwrap();
        let infos = tree
            .topic_infos(&msg_types(&[("/imu/data", "Imu"), ("lidar", "PointCloud2")]))
            .unwrap();
        assert_eq!(
            infos,
            vec![
                TopicInfo::new("/imu/data", None, "Imu"),
                TopicInfo::new("a", SensorType::Lidar, "PointCloud2"),
            ]
        );
        assert_eq!(infos[0].sensor_label(), "-");
    }

    #[test]
    fn test_root_keyed_topic_still_needs_msg_type() {
        let tree = TopicTree::from_value(&yaml("/imu/data: null\n")).unwrap();
        let err = tree.topic_infos(&BTreeMap::new()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingMsgType { ref key, .. } if key == "/imu/data"));
    }

    #[test]
    fn test_mapping_inside_list_is_rejected() {
        let err = TopicTree::from_value(&yaml("lidar:\n  - a: null\n")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTopicTree { .. }));
    }
}
