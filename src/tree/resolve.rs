//! Wildcard-aware path resolution
//!
//! Resolution rules on an object, for a non-empty segment list:
//! - leading `*`/`**` segments are skipped to find the first literal name
//! - children are scanned in insertion order, first hit wins
//! - a child whose key equals the name is searched with the segments after
//!   the name; when no wildcard was skipped this result is final, hit or miss
//! - otherwise `*` tries each child with one segment consumed, and `**`
//!   tries each child with the segments unchanged
//!
//! Scalars and arrays only resolve the empty path (to themselves).

use super::path::{split_path, Segment};
use super::{Node, ObjectNode};

impl Node {
    /// Resolve a slash-separated path. `""` resolves to `self`.
    pub fn get(&self, path: &str) -> Option<&Node> {
        self.get_from_list(&split_path(path))
    }

    pub fn get_from_list(&self, segments: &[Segment<'_>]) -> Option<&Node> {
        if segments.is_empty() {
            return Some(self);
        }
        match self {
            Node::Object(object) => object.lookup(segments),
            Node::Array(_) | Node::String(_) | Node::Number(_) | Node::Bool(_) => None,
        }
    }
}

impl ObjectNode {
    /// Resolve a non-empty segment list against the children
    fn lookup(&self, segments: &[Segment<'_>]) -> Option<&Node> {
        let first = *segments.first()?;
        let skip_count = segments.iter().take_while(|s| s.is_wildcard()).count();
        let name = segments.get(skip_count).and_then(Segment::literal);

        for (key, child) in self.iter() {
            if Some(key) == name {
                let result = child.get_from_list(&segments[skip_count + 1..]);
                if skip_count == 0 || result.is_some() {
                    return result;
                }
            } else if first == Segment::Any {
                if let Some(found) = child.get_from_list(&segments[1..]) {
                    return Some(found);
                }
            } else if first == Segment::Deep {
                if let Some(found) = child.get_from_list(segments) {
                    return Some(found);
                }
            }
        }

        None
    }
}
