//! Merge-on-set
//!
//! Writes walk literal keys only, creating empty objects for missing
//! intermediate segments and descending into existing ones. At the terminal
//! segment an existing node is merged with the incoming one:
//! - Arrays: append the incoming node as one element (no concatenation)
//! - Everything else, objects included: overwrite

use serde_json::Value;
use tracing::trace;

use super::path::split_keys;
use super::{Node, ObjectNode};
use crate::error::{ConfigError, Result};

impl Node {
    /// Combine an existing node with an incoming one, in place
    pub fn merge(&mut self, incoming: Node) {
        match self {
            Node::Array(array) => array.push(incoming),
            _ => *self = incoming,
        }
    }
}

impl ObjectNode {
    /// Set a value at a slash-separated path
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        let node = Node::from_value(value)?;
        self.set_node(path, node)
    }

    pub fn set_node(&mut self, path: &str, node: Node) -> Result<()> {
        self.set_from_list(&split_keys(path), node)
    }

    pub fn set_from_list(&mut self, keys: &[&str], node: Node) -> Result<()> {
        let (key, rest) = keys.split_first().ok_or(ConfigError::EmptyPath)?;

        if rest.is_empty() {
            match self.get_item_mut(key) {
                Some(existing) => {
                    trace!(key = %key, existing = %existing.kind(), incoming = %node.kind(), "merging");
                    existing.merge(node);
                }
                None => {
                    self.insert(*key, node);
                }
            }
            return Ok(());
        }

        match self.child_or_insert_object(key) {
            Node::Object(child) => child.set_from_list(rest, node),
            other => Err(ConfigError::PathConflict {
                segment: key.to_string(),
                found: other.kind(),
            }),
        }
    }

    /// Overlay another object onto this one.
    ///
    /// An incoming object descends into an existing object key by key, the
    /// way intermediate `set` segments do, and meeting an existing
    /// non-object is a `PathConflict`. Any other pairing uses the terminal
    /// merge rule. Entries before a conflict stay applied.
    pub fn overlay(&mut self, other: ObjectNode) -> Result<()> {
        for (key, incoming) in other.items {
            match self.get_item_mut(&key) {
                Some(existing) => match (existing, incoming) {
                    (Node::Object(existing), Node::Object(incoming)) => existing.overlay(incoming)?,
                    (existing, Node::Object(_)) => {
                        return Err(ConfigError::PathConflict {
                            segment: key,
                            found: existing.kind(),
                        });
                    }
                    (existing, incoming) => existing.merge(incoming),
                },
                None => {
                    self.items.push((key, incoming));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ArrayNode;
    use serde_json::json;

    fn object(value: Value) -> ObjectNode {
        match Node::from_value(value).unwrap() {
            Node::Object(object) => object,
            other => panic!("expected object, got {}", other.kind()),
        }
    }

    fn plain(object: &ObjectNode) -> Value {
        Node::Object(object.clone()).to_plain_value(true)
    }

    #[test]
    fn test_set_then_get() {
        let mut root = ObjectNode::new();
        root.set("soc/fc/cores", json!(4)).unwrap();

        let node = Node::Object(root);
        assert_eq!(node.get("soc/fc/cores").unwrap().to_plain_value(true), json!(4));
    }

    #[test]
    fn test_scalar_overwrite() {
        let mut root = object(json!({"timeout": 100}));
        root.set("timeout", json!("fast")).unwrap();
        assert_eq!(plain(&root), json!({"timeout": "fast"}));
    }

    #[test]
    fn test_merge_in_place() {
        let mut node = Node::from(ArrayNode::from(vec![Node::from(1i64)]));
        node.merge(Node::from("x"));
        assert_eq!(node.to_plain_value(true), json!([1, "x"]));

        let mut node = Node::from(true);
        node.merge(Node::from(2i64));
        assert_eq!(node, Node::from(2i64));
    }

    #[test]
    fn test_array_append_whole_value() {
        // The first set stores [1, 2] as the array itself, so the second
        // grows it by one element holding [3]. This is the one-element growth
        // rule, not the [[1, 2], [3]] shape from the array-merge example.
        let mut root = ObjectNode::new();
        root.set("a", json!([1, 2])).unwrap();
        root.set("a", json!([3])).unwrap();
        assert_eq!(plain(&root), json!({"a": [1, 2, [3]]}));
    }

    #[test]
    fn test_array_append_scalar() {
        let mut root = object(json!({"flags": ["-O2"]}));
        root.set("flags", json!("-g")).unwrap();
        assert_eq!(plain(&root), json!({"flags": ["-O2", "-g"]}));
    }

    #[test]
    fn test_intermediate_segments_descend() {
        let mut root = ObjectNode::new();
        root.set("a/b", json!(1)).unwrap();
        root.set("a/c", json!(2)).unwrap();
        assert_eq!(plain(&root), json!({"a": {"b": 1, "c": 2}}));
    }

    #[test]
    fn test_terminal_object_overwrites() {
        let mut root = object(json!({"a": {"b": 1}}));
        root.set("a", json!({"c": 2})).unwrap();
        assert_eq!(plain(&root), json!({"a": {"c": 2}}));
    }

    #[test]
    fn test_set_keeps_key_position() {
        let mut root = object(json!({"first": 1, "second": 2}));
        root.set("first", json!(10)).unwrap();
        let keys: Vec<&str> = root.keys().collect();
        assert_eq!(keys, vec!["first", "second"]);
    }

    #[test]
    fn test_wildcards_are_literal_on_write() {
        let mut root = object(json!({"a": {"b": 1}}));
        root.set("*/b", json!(2)).unwrap();
        assert_eq!(plain(&root), json!({"a": {"b": 1}, "*": {"b": 2}}));
    }

    #[test]
    fn test_descend_through_scalar_is_conflict() {
        let mut root = object(json!({"a": 1}));
        let err = root.set("a/b", json!(2)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::PathConflict { ref segment, found: crate::tree::NodeKind::Number } if segment == "a"
        ));
        assert_eq!(plain(&root), json!({"a": 1}));
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut root = ObjectNode::new();
        assert!(matches!(root.set("", json!(1)), Err(ConfigError::EmptyPath)));
        assert!(matches!(root.set("//", json!(1)), Err(ConfigError::EmptyPath)));
    }

    #[test]
    fn test_null_value_rejected() {
        let mut root = ObjectNode::new();
        let err = root.set("a/b", Value::Null).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedInput(_)));
        assert!(root.is_empty());
    }

    #[test]
    fn test_overlay_deep_merges_objects() {
        let mut base = object(json!({
            "cache": {"derived_data": "off", "spm": "off"},
            "timeout": 100
        }));
        base.overlay(object(json!({
            "cache": {"derived_data": "on"},
            "timeout": 200,
            "extra": true
        })))
        .unwrap();

        assert_eq!(
            plain(&base),
            json!({
                "cache": {"derived_data": "on", "spm": "off"},
                "timeout": 200,
                "extra": true
            })
        );
    }

    #[test]
    fn test_overlay_matches_set() {
        let base = json!({"list": [1], "obj": {"x": 1}, "s": "old"});
        let layer = json!({"list": [2], "obj": {"y": {"z": 3}}, "s": 5});

        let mut overlaid = object(base.clone());
        overlaid.overlay(object(layer)).unwrap();

        let mut set = object(base);
        set.set("list", json!([2])).unwrap();
        set.set("obj/y/z", json!(3)).unwrap();
        set.set("s", json!(5)).unwrap();

        assert_eq!(plain(&overlaid), plain(&set));
        assert_eq!(plain(&overlaid)["list"], json!([1, [2]]));
    }

    #[test]
    fn test_overlay_object_onto_scalar_conflicts() {
        let mut base = object(json!({"s": "old"}));
        let err = base.overlay(object(json!({"s": {"x": 1}}))).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::PathConflict { ref segment, found: crate::tree::NodeKind::String } if segment == "s"
        ));
        assert!(base.set("s/x", json!(1)).is_err());
        assert_eq!(plain(&base), json!({"s": "old"}));
    }

    #[test]
    fn test_overlay_object_onto_array_conflicts() {
        let mut base = object(json!({"l": [1]}));
        let err = base.overlay(object(json!({"l": {"a": 2}}))).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::PathConflict { ref segment, found: crate::tree::NodeKind::Array } if segment == "l"
        ));
        assert!(base.set("l/a", json!(2)).is_err());
        assert_eq!(plain(&base), json!({"l": [1]}));
    }
}
