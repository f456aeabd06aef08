//! Tree root
//!
//! Top-level configuration is always a mapping. `ConfigTree` owns the root
//! object node and exposes the node readers through `Deref`.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::ops::Deref;
use tracing::trace;

use super::{Node, ObjectNode};
use crate::error::{ConfigError, Result};

/// A configuration tree rooted at an object node.
///
/// `root` is only ever built from an `ObjectNode` and no `&mut Node` to it
/// is handed out, so it stays an object.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    root: Node,
}

impl ConfigTree {
    /// Empty tree
    pub fn new() -> Self {
        Self::from_object(ObjectNode::new())
    }

    pub fn from_object(object: ObjectNode) -> Self {
        Self {
            root: Node::Object(object),
        }
    }

    /// Build a tree from a parsed value; the value must be a mapping
    pub fn from_value(value: Value) -> Result<Self> {
        match Node::from_value(value)? {
            Node::Object(object) => Ok(Self::from_object(object)),
            other => Err(ConfigError::RootNotObject(other.kind())),
        }
    }

    /// Set `value` at `path`, merging with any existing value
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        trace!(path = %path, "set");
        self.object_mut().set(path, value)
    }

    pub fn set_node(&mut self, path: &str, node: Node) -> Result<()> {
        self.object_mut().set_node(path, node)
    }

    /// Overlay another tree; see [`ObjectNode::overlay`]
    pub fn overlay(&mut self, other: ConfigTree) -> Result<()> {
        self.object_mut().overlay(other.into_object())
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn into_object(self) -> ObjectNode {
        match self.root {
            Node::Object(object) => object,
            _ => unreachable!("config tree root is always an object"),
        }
    }

    fn object_mut(&mut self) -> &mut ObjectNode {
        match &mut self.root {
            Node::Object(object) => object,
            _ => unreachable!("config tree root is always an object"),
        }
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for ConfigTree {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.root
    }
}

impl TryFrom<Value> for ConfigTree {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl Serialize for ConfigTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}
