//! Typed configuration tree
//!
//! A closed sum of five node variants built from parsed JSON-shaped data:
//! - Object: insertion-ordered mapping, unique keys
//! - Array: ordered sequence
//! - String, Number, Bool: immutable leaves
//!
//! Paths are resolved with `*`/`**` wildcards (see `resolve`), and writes
//! merge with any existing value (see `merge`).

mod accessors;
mod merge;
mod path;
mod resolve;
mod root;

pub use accessors::parse_int;
pub use path::{split_keys, split_path, Segment};
pub use root::ConfigTree;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

use crate::error::{ConfigError, Result};

/// Variant tag of a node, used in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "object"),
            Self::Array => write!(f, "array"),
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

/// A configuration node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Object(ObjectNode),
    Array(ArrayNode),
    String(String),
    Number(Number),
    Bool(bool),
}

/// Insertion-ordered mapping from key to child node.
///
/// Re-inserting an existing key replaces the child without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    items: Vec<(String, Node)>,
}

/// Ordered sequence of child nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayNode {
    elems: Vec<Node>,
}

impl Node {
    /// Build a node from a parsed value, recursively.
    ///
    /// `null` has no node variant and is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(elems) => ArrayNode::from_values(elems).map(Node::Array),
            Value::Object(map) => ObjectNode::from_map(map).map(Node::Object),
            Value::String(s) => Ok(Node::String(s)),
            Value::Bool(b) => Ok(Node::Bool(b)),
            Value::Number(n) => Ok(Node::Number(n)),
            Value::Null => Err(ConfigError::MalformedInput(
                "null has no configuration node variant".to_string(),
            )),
        }
    }

    /// Convert back to a plain value.
    ///
    /// With `preserve_order` false, object keys are emitted sorted rather
    /// than in insertion order.
    pub fn to_plain_value(&self, preserve_order: bool) -> Value {
        match self {
            Node::Object(object) => object.to_plain_value(preserve_order),
            Node::Array(array) => Value::Array(
                array
                    .iter()
                    .map(|elem| elem.to_plain_value(preserve_order))
                    .collect(),
            ),
            Node::String(s) => Value::String(s.clone()),
            Node::Number(n) => Value::Number(n.clone()),
            Node::Bool(b) => Value::Bool(*b),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Object(_) => NodeKind::Object,
            Node::Array(_) => NodeKind::Array,
            Node::String(_) => NodeKind::String,
            Node::Number(_) => NodeKind::Number,
            Node::Bool(_) => NodeKind::Bool,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectNode> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            Node::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Pretty JSON, 2-space indentation, insertion order kept
    pub fn dump_to_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl ObjectNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys of a `Map` are already unique, so entries are taken as-is
    fn from_map(map: Map<String, Value>) -> Result<Self> {
        let items = map
            .into_iter()
            .map(|(key, value)| Node::from_value(value).map(|node| (key, node)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.items.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(key, _)| key.as_str())
    }

    /// Literal (non-wildcard) child lookup
    pub fn get_item(&self, key: &str) -> Option<&Node> {
        self.position(key).map(|index| &self.items[index].1)
    }

    pub fn get_item_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.position(key).map(|index| &mut self.items[index].1)
    }

    /// Insert or replace a child, returning the previous one.
    ///
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> Option<Node> {
        let key = key.into();
        match self.position(&key) {
            Some(index) => Some(std::mem::replace(&mut self.items[index].1, node)),
            None => {
                self.items.push((key, node));
                None
            }
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|(k, _)| k == key)
    }

    /// Child slot for `key`, inserting an empty object if absent
    fn child_or_insert_object(&mut self, key: &str) -> &mut Node {
        let index = match self.position(key) {
            Some(index) => index,
            None => {
                self.items
                    .push((key.to_string(), Node::Object(ObjectNode::new())));
                self.items.len() - 1
            }
        };
        &mut self.items[index].1
    }

    fn to_plain_value(&self, preserve_order: bool) -> Value {
        let mut entries: Vec<&(String, Node)> = self.items.iter().collect();
        if !preserve_order {
            entries.sort_by(|a, b| a.0.cmp(&b.0));
        }
        let map: Map<String, Value> = entries
            .into_iter()
            .map(|(key, node)| (key.clone(), node.to_plain_value(preserve_order)))
            .collect();
        Value::Object(map)
    }
}

impl ArrayNode {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_values(values: Vec<Value>) -> Result<Self> {
        let elems = values
            .into_iter()
            .map(Node::from_value)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { elems })
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn get_elem(&self, index: usize) -> Option<&Node> {
        self.elems.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.elems.iter()
    }

    pub fn push(&mut self, node: Node) {
        self.elems.push(node);
    }
}

impl From<ObjectNode> for Node {
    fn from(object: ObjectNode) -> Self {
        Node::Object(object)
    }
}

impl From<ArrayNode> for Node {
    fn from(array: ArrayNode) -> Self {
        Node::Array(array)
    }
}

impl From<Vec<Node>> for ArrayNode {
    fn from(elems: Vec<Node>) -> Self {
        Self { elems }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Number(n.into())
    }
}

impl TryFrom<Value> for Node {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self> {
        Node::from_value(value)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Object(object) => object.serialize(serializer),
            Node::Array(array) => serializer.collect_seq(array.iter()),
            Node::String(s) => serializer.serialize_str(s),
            Node::Number(n) => n.serialize(serializer),
            Node::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl Serialize for ObjectNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for (key, node) in &self.items {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Node::from_value(value).map_err(de::Error::custom)
    }
}
