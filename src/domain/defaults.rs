//! Built-in "Neural Link" matrix
//!
//! Used by `skills init` when no seed file is given.

use super::id::{IdError, SkillId};
use super::skill::{SkillSeed, SkillStatus};

/// Starting balance that ships with the built-in matrix
pub const DEFAULT_CREDITS: u64 = 120;

struct Entry {
    id: &'static str,
    label: &'static str,
    description: &'static str,
    cost: u64,
    dependencies: &'static [&'static str],
    icon: &'static str,
    x: f64,
    y: f64,
    mastered: bool,
}

const NEURAL_LINK: &[Entry] = &[
    Entry {
        id: "root",
        label: "Core OS",
        description: "Basic understanding of Zenith Operating System navigation.",
        cost: 0,
        dependencies: &[],
        icon: "fa-microchip",
        x: 50.0,
        y: 10.0,
        mastered: true,
    },
    // Security
    Entry {
        id: "sec1",
        label: "NetSec I",
        description: "Introduction to network security protocols and firewalls.",
        cost: 10,
        dependencies: &["root"],
        icon: "fa-shield-alt",
        x: 25.0,
        y: 30.0,
        mastered: false,
    },
    Entry {
        id: "sec2",
        label: "Cryptography",
        description: "Understanding hashing, encryption, and salting.",
        cost: 25,
        dependencies: &["sec1"],
        icon: "fa-key",
        x: 15.0,
        y: 55.0,
        mastered: false,
    },
    Entry {
        id: "sec3",
        label: "White Hat",
        description: "Advanced penetration testing methodologies.",
        cost: 50,
        dependencies: &["sec2"],
        icon: "fa-user-secret",
        x: 25.0,
        y: 80.0,
        mastered: false,
    },
    // Development
    Entry {
        id: "dev1",
        label: "React.js",
        description: "Component based architecture and hooks.",
        cost: 10,
        dependencies: &["root"],
        icon: "fa-code",
        x: 75.0,
        y: 30.0,
        mastered: true,
    },
    Entry {
        id: "dev2",
        label: "TypeScript",
        description: "Static typing for scalable web applications.",
        cost: 20,
        dependencies: &["dev1"],
        icon: "fa-brackets-curly",
        x: 85.0,
        y: 55.0,
        mastered: false,
    },
    Entry {
        id: "dev3",
        label: "FullStack",
        description: "Server-side rendering and database management.",
        cost: 45,
        dependencies: &["dev2"],
        icon: "fa-server",
        x: 75.0,
        y: 80.0,
        mastered: false,
    },
    // AI
    Entry {
        id: "ai1",
        label: "LLM Basics",
        description: "Prompt engineering and model configuration.",
        cost: 30,
        dependencies: &["root"],
        icon: "fa-brain",
        x: 50.0,
        y: 50.0,
        mastered: false,
    },
];

/// Returns the eight-node Neural Link matrix
///
/// One root with a security branch, a development branch and a single AI
/// node hanging directly off the root.
pub fn neural_link() -> Result<Vec<SkillSeed>, IdError> {
    NEURAL_LINK
        .iter()
        .map(|entry| -> Result<SkillSeed, IdError> {
            let mut seed = SkillSeed::new(SkillId::new(entry.id)?, entry.cost)
                .describe(entry.label, entry.description)
                .at(entry.icon, entry.x, entry.y);
            for dep in entry.dependencies {
                seed = seed.depends_on(SkillId::new(*dep)?);
            }
            if entry.mastered {
                seed = seed.with_status(SkillStatus::Mastered);
            }
            Ok(seed)
        })
        .collect()
}
