//! Skill domain model
//!
//! A skill is a single unlockable node in the progression matrix. Nodes are
//! described by a [`SkillSeed`] at construction time and live on as
//! [`SkillNode`]s inside a [`SkillGraph`](super::SkillGraph).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::id::SkillId;

/// Progression status of a skill
///
/// Transitions only move forward: `Locked -> Available -> Mastered`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum SkillStatus {
    #[default]
    #[serde(alias = "LOCKED")]
    Locked,
    #[serde(alias = "AVAILABLE")]
    Available,
    #[serde(alias = "MASTERED")]
    Mastered,
}

impl SkillStatus {
    /// Returns true if the skill has been mastered
    pub fn is_mastered(&self) -> bool {
        matches!(self, SkillStatus::Mastered)
    }

    /// Returns true if the skill can be unlocked right now
    pub fn is_available(&self) -> bool {
        matches!(self, SkillStatus::Available)
    }

    /// Returns true if the skill's prerequisites are not yet met
    pub fn is_locked(&self) -> bool {
        matches!(self, SkillStatus::Locked)
    }

    /// Returns a lowercase label for display
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillStatus::Locked => "locked",
            SkillStatus::Available => "available",
            SkillStatus::Mastered => "mastered",
        }
    }
}

impl fmt::Display for SkillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SkillStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "locked" => Ok(SkillStatus::Locked),
            "available" => Ok(SkillStatus::Available),
            "mastered" => Ok(SkillStatus::Mastered),
            other => Err(format!(
                "unknown skill status '{}': expected locked, available or mastered",
                other
            )),
        }
    }
}

/// Layout coordinates (presentation only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Construction-time description of a skill
///
/// This is also the persisted form: a saved matrix is a list of seeds whose
/// `status` carries the node's current progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSeed {
    pub id: SkillId,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub cost: u64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<SkillId>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,

    #[serde(default)]
    pub x: f64,

    #[serde(default)]
    pub y: f64,

    /// Initial status
    #[serde(default)]
    pub status: SkillStatus,
}

impl SkillSeed {
    /// Creates a locked seed with no dependencies
    pub fn new(id: SkillId, cost: u64) -> Self {
        Self {
            label: id.to_string(),
            id,
            description: String::new(),
            cost,
            dependencies: Vec::new(),
            icon: String::new(),
            x: 0.0,
            y: 0.0,
            status: SkillStatus::Locked,
        }
    }

    /// Adds a dependency
    pub fn depends_on(mut self, dep: SkillId) -> Self {
        self.dependencies.push(dep);
        self
    }

    /// Sets the initial status
    pub fn with_status(mut self, status: SkillStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the display label and description
    pub fn describe(mut self, label: impl Into<String>, description: impl Into<String>) -> Self {
        self.label = label.into();
        self.description = description.into();
        self
    }

    /// Sets the icon token and layout position
    pub fn at(mut self, icon: impl Into<String>, x: f64, y: f64) -> Self {
        self.icon = icon.into();
        self.x = x;
        self.y = y;
        self
    }
}

/// A skill node inside a built graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillNode {
    pub id: SkillId,
    pub label: String,
    pub description: String,
    pub cost: u64,
    pub status: SkillStatus,

    /// Prerequisites, all of which must be mastered (deduplicated, seed order)
    pub dependencies: Vec<SkillId>,

    pub icon: String,
    pub position: Position,
}

impl SkillNode {
    /// Returns true if this node has no prerequisites
    pub fn is_root(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Converts the node back into a seed carrying its current status
    pub fn to_seed(&self) -> SkillSeed {
        SkillSeed {
            id: self.id.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
            cost: self.cost,
            dependencies: self.dependencies.clone(),
            icon: self.icon.clone(),
            x: self.position.x,
            y: self.position.y,
            status: self.status,
        }
    }
}

impl From<SkillSeed> for SkillNode {
    fn from(seed: SkillSeed) -> Self {
        let mut dependencies: Vec<SkillId> = Vec::with_capacity(seed.dependencies.len());
        for dep in seed.dependencies {
            if !dependencies.contains(&dep) {
                dependencies.push(dep);
            }
        }

        Self {
            id: seed.id,
            label: seed.label,
            description: seed.description,
            cost: seed.cost,
            status: seed.status,
            dependencies,
            icon: seed.icon,
            position: Position {
                x: seed.x,
                y: seed.y,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> SkillId {
        SkillId::new(s).unwrap()
    }

    #[test]
    fn status_ordering_follows_progression() {
        assert!(SkillStatus::Locked < SkillStatus::Available);
        assert!(SkillStatus::Available < SkillStatus::Mastered);
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!("MASTERED".parse::<SkillStatus>(), Ok(SkillStatus::Mastered));
        assert_eq!("available".parse::<SkillStatus>(), Ok(SkillStatus::Available));
        assert!("unlocked".parse::<SkillStatus>().is_err());
    }

    #[test]
    fn status_deserializes_uppercase_alias() {
        let status: SkillStatus = serde_json::from_str("\"LOCKED\"").unwrap();
        assert_eq!(status, SkillStatus::Locked);

        let json = serde_json::to_string(&SkillStatus::Mastered).unwrap();
        assert_eq!(json, "\"mastered\"");
    }

    #[test]
    fn seed_defaults_when_fields_missing() {
        let seed: SkillSeed = serde_json::from_str(r#"{"id": "root"}"#).unwrap();
        assert_eq!(seed.cost, 0);
        assert_eq!(seed.status, SkillStatus::Locked);
        assert!(seed.dependencies.is_empty());
    }

    #[test]
    fn node_from_seed_collapses_duplicate_dependencies() {
        let seed = SkillSeed::new(id("d"), 5)
            .depends_on(id("b"))
            .depends_on(id("c"))
            .depends_on(id("b"));

        let node = SkillNode::from(seed);
        assert_eq!(node.dependencies, vec![id("b"), id("c")]);
        assert!(!node.is_root());
    }

    #[test]
    fn node_to_seed_keeps_presentation_metadata() {
        let seed = SkillSeed::new(id("sec1"), 10)
            .describe("NetSec I", "Firewalls")
            .at("fa-shield-alt", 25.0, 30.0)
            .with_status(SkillStatus::Available);

        let node = SkillNode::from(seed.clone());
        assert_eq!(node.position, Position { x: 25.0, y: 30.0 });
        assert_eq!(node.to_seed(), seed);
    }
}
