//! Slash-separated path parsing
//!
//! Empty segments are dropped, so `""`, `"/"` and `"a//b"` normalise to
//! `[]`, `[]` and `["a", "b"]`. An empty path addresses the node itself.

/// One component of a read path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Exact key match
    Literal(&'a str),
    /// `*`: exactly one level
    Any,
    /// `**`: zero or more levels
    Deep,
}

impl<'a> Segment<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw {
            "*" => Segment::Any,
            "**" => Segment::Deep,
            name => Segment::Literal(name),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        !matches!(self, Segment::Literal(_))
    }

    pub fn literal(&self) -> Option<&'a str> {
        match self {
            Segment::Literal(name) => Some(name),
            _ => None,
        }
    }
}

/// Split a read path into segments, wildcards recognised
pub fn split_path(path: &str) -> Vec<Segment<'_>> {
    split_keys(path).into_iter().map(Segment::parse).collect()
}

/// Split a write path into literal keys (no wildcard meaning)
pub fn split_keys(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}
