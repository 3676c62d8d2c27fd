//! Seed documents
//!
//! A seed document lists the skills of a matrix and, optionally, the starting
//! credit balance. JSON, YAML and TOML are accepted, chosen by file extension:
//!
//! ```yaml
//! credits: 120
//! skills:
//!   - id: root
//!     label: Core OS
//!     status: mastered
//!   - id: sec1
//!     cost: 10
//!     dependencies: [root]
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::SkillSeed;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Unsupported seed file extension: {0} (expected .json, .yaml, .yml or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to parse {format} seed: {message}")]
    Parse { format: SeedFormat, message: String },
}

/// Serialization format of a seed document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedFormat {
    Json,
    Yaml,
    Toml,
}

impl SeedFormat {
    /// Picks the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(SeedFormat::Json),
            "yaml" | "yml" => Some(SeedFormat::Yaml),
            "toml" => Some(SeedFormat::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for SeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeedFormat::Json => "JSON",
            SeedFormat::Yaml => "YAML",
            SeedFormat::Toml => "TOML",
        })
    }
}

/// A parsed seed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedFile {
    /// Starting balance; the project default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<u64>,

    #[serde(default)]
    pub skills: Vec<SkillSeed>,
}

impl SeedFile {
    /// Reads and parses a seed file, choosing the format by extension
    pub fn load(path: &Path) -> Result<Self> {
        let format = SeedFormat::from_path(path)
            .ok_or_else(|| SeedError::UnsupportedFormat(path.to_path_buf()))?;

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file: {}", path.display()))?;

        Self::parse(&content, format)
            .with_context(|| format!("Invalid seed file: {}", path.display()))
    }

    /// Parses a seed document from a string
    pub fn parse(content: &str, format: SeedFormat) -> Result<Self, SeedError> {
        let parsed = match format {
            SeedFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            SeedFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            SeedFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|message| SeedError::Parse { format, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SkillStatus;
    use tempfile::TempDir;

    #[test]
    fn format_from_extension() {
        assert_eq!(SeedFormat::from_path(Path::new("a.json")), Some(SeedFormat::Json));
        assert_eq!(SeedFormat::from_path(Path::new("a.YML")), Some(SeedFormat::Yaml));
        assert_eq!(SeedFormat::from_path(Path::new("a.toml")), Some(SeedFormat::Toml));
        assert_eq!(SeedFormat::from_path(Path::new("a.txt")), None);
        assert_eq!(SeedFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn parse_yaml() {
        let yaml = r#"
credits: 50
skills:
  - id: root
    label: Core OS
    status: MASTERED
  - id: sec1
    cost: 10
    dependencies: [root]
    x: 25
    y: 30
"#;

        let seed = SeedFile::parse(yaml, SeedFormat::Yaml).unwrap();
        assert_eq!(seed.credits, Some(50));
        assert_eq!(seed.skills.len(), 2);
        assert_eq!(seed.skills[0].status, SkillStatus::Mastered);
        assert_eq!(seed.skills[1].dependencies[0].as_str(), "root");
        assert_eq!(seed.skills[1].x, 25.0);
    }

    #[test]
    fn parse_toml() {
        let toml = r#"
[[skills]]
id = "root"
status = "mastered"

[[skills]]
id = "ai1"
cost = 30
dependencies = ["root"]
"#;

        let seed = SeedFile::parse(toml, SeedFormat::Toml).unwrap();
        assert_eq!(seed.credits, None);
        assert_eq!(seed.skills[1].cost, 30);
    }

    #[test]
    fn parse_json() {
        let json = r#"{"credits": 5, "skills": [{"id": "x", "cost": 1}]}"#;
        let seed = SeedFile::parse(json, SeedFormat::Json).unwrap();
        assert_eq!(seed.skills[0].id.as_str(), "x");
    }

    #[test]
    fn invalid_id_is_a_parse_error() {
        let json = r#"{"skills": [{"id": "has space"}]}"#;
        let err = SeedFile::parse(json, SeedFormat::Json).unwrap_err();
        assert!(matches!(err, SeedError::Parse { format: SeedFormat::Json, .. }));
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed.txt");
        fs::write(&path, "skills: []").unwrap();

        let err = SeedFile::load(&path).unwrap_err();
        assert!(err.downcast_ref::<SeedError>().is_some());
    }

    #[test]
    fn load_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed.yaml");
        fs::write(&path, "skills:\n  - id: only\n").unwrap();

        let seed = SeedFile::load(&path).unwrap();
        assert_eq!(seed.skills.len(), 1);
    }
}
