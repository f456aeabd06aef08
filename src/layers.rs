//! Layered configuration with provenance
//!
//! Sources are overlaid in order, later layers taking precedence, and every
//! contributing source is recorded with the SHA-256 digest of its raw bytes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::loader::{parse_bytes, Format};
use crate::tree::ConfigTree;

/// Origin of a configuration source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    File,
    Inline,
}

/// A contributing config source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigSource {
    pub origin: SourceOrigin,

    /// File path (None for inline values)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for inline values)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// A tree assembled from several sources
#[derive(Debug, Clone, Default)]
pub struct LayeredConfig {
    tree: ConfigTree,
    sources: Vec<ConfigSource>,
}

impl LayeredConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay the given files in order
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut layered = Self::new();
        for path in paths {
            layered.overlay_file(path.as_ref())?;
        }
        Ok(layered)
    }

    /// Overlay one file on top of the current layers
    pub fn overlay_file(&mut self, path: &Path) -> Result<()> {
        let (value, digest) = Self::load_file(path)?;
        let layer = ConfigTree::from_value(value)?;
        self.tree.overlay(layer)?;

        debug!(path = %path.display(), digest = %digest, layer = self.sources.len(), "overlaid config file");
        self.sources.push(ConfigSource {
            origin: SourceOrigin::File,
            path: Some(path.to_string_lossy().to_string()),
            digest: Some(digest),
        });
        Ok(())
    }

    /// Overlay an in-memory mapping
    pub fn overlay_value(&mut self, value: Value) -> Result<()> {
        let layer = ConfigTree::from_value(value)?;
        self.tree.overlay(layer)?;

        debug!(layer = self.sources.len(), "overlaid inline config");
        self.sources.push(ConfigSource {
            origin: SourceOrigin::Inline,
            path: None,
            digest: None,
        });
        Ok(())
    }

    /// Set a single path on the merged tree
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        self.tree.set(path, value)
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    pub fn into_tree(self) -> ConfigTree {
        self.tree
    }

    /// Contributing sources in precedence order
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Read and parse a file, returning the value and digest
    fn load_file(path: &Path) -> Result<(Value, String)> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let value = parse_bytes(&bytes, Format::from_path(path))?;
        Ok((value, digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_source(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_then_platform() {
        let defaults = write_source(
            ".json",
            r#"{"soc": {"cores": 1, "name": "pulp"}, "timeout": 100}"#,
        );
        let platform = write_source(".toml", "timeout = 50\n[soc]\ncores = 8\n");

        let layered = LayeredConfig::load(&[defaults.path(), platform.path()]).unwrap();

        assert_eq!(
            layered.tree().to_plain_value(true),
            json!({"soc": {"cores": 8, "name": "pulp"}, "timeout": 50})
        );
        assert_eq!(layered.sources().len(), 2);
        assert_eq!(layered.sources()[0].origin, SourceOrigin::File);
    }

    #[test]
    fn test_source_digest() {
        let source = write_source(".json", "{}");
        let layered = LayeredConfig::load(&[source.path()]).unwrap();

        // sha256("{}")
        assert_eq!(
            layered.sources()[0].digest.as_deref(),
            Some("44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a")
        );
    }

    #[test]
    fn test_inline_layer_and_set() {
        let mut layered = LayeredConfig::new();
        layered.overlay_value(json!({"flags": ["-O2"]})).unwrap();
        layered.set("flags", json!("-g")).unwrap();
        layered.set("soc/name", json!("gap")).unwrap();

        assert_eq!(
            layered.tree().to_plain_value(true),
            json!({"flags": ["-O2", "-g"], "soc": {"name": "gap"}})
        );

        let source = &layered.sources()[0];
        assert_eq!(source.origin, SourceOrigin::Inline);
        assert_eq!(
            serde_json::to_value(source).unwrap(),
            json!({"origin": "inline"})
        );
    }

    #[test]
    fn test_failed_layer_not_recorded() {
        let broken = write_source(".json", "[1, 2]");
        let mut layered = LayeredConfig::new();
        assert!(layered.overlay_file(broken.path()).is_err());
        assert!(layered.sources().is_empty());
    }
}
