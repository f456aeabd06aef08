//! Config Tree - typed, order-preserving configuration trees
//!
//! This crate builds configuration trees from parsed JSON (or TOML) data,
//! resolves slash-separated paths with `*` and `**` wildcards, and merges
//! values and whole sources on top of each other.

pub mod error;
pub mod layers;
pub mod loader;
pub mod tree;

pub use error::{ConfigError, Result};
pub use layers::{ConfigSource, LayeredConfig, SourceOrigin};
pub use loader::{import_config, import_config_from_file, import_config_from_str, Format};
pub use tree::{ArrayNode, ConfigTree, Node, NodeKind, ObjectNode, Segment};
