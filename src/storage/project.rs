//! Project management
//!
//! Handles project initialization and provides access to the matrix store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::info;

use super::config::SKILLS_DIR;
use super::{Config, MatrixStore, SeedFile};
use crate::domain::{defaults, SkillMatrix};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a skills project. Run 'skills init' first.")]
    NotInProject,

    #[error("Project at {0} has no matrix state. Run 'skills init' to create it.")]
    MissingState(PathBuf),
}

/// How `Project::init` should seed the matrix
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Seed document; the built-in Neural Link matrix when absent
    pub seed: Option<SeedFile>,

    /// Starting balance, overriding the seed and the project config
    pub credits: Option<u64>,
}

/// A skills project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(SKILLS_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let config = Config::load()?;
        let root = config
            .project_root
            .clone()
            .ok_or(ProjectError::NotInProject)?;

        Ok(Self { root, config })
    }

    /// Initializes a new project at the given path
    ///
    /// Existing matrix state is kept, so running init twice is harmless.
    /// Returns the project and whether a new matrix was written.
    pub fn init(root: impl Into<PathBuf>, options: InitOptions) -> Result<(Self, bool)> {
        let root = root.into();
        let skills_dir = root.join(SKILLS_DIR);

        fs::create_dir_all(&skills_dir).with_context(|| {
            format!("Failed to create {} directory: {}", SKILLS_DIR, skills_dir.display())
        })?;

        // Create default config
        let config_path = skills_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Skill matrix configuration

# State file inside .skills/
state_file = "matrix.json"

# Starting balance when the seed does not specify one
initial_credits = 120
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        // Lock and temp files are not worth committing
        let gitignore_path = skills_dir.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(&gitignore_path, "*.lock\n*.tmp\n").with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        let project = Self::open(root)?;
        let store = project.store();
        if store.exists() {
            return Ok((project, false));
        }

        let seed = match options.seed {
            Some(seed) => seed,
            None => SeedFile {
                credits: None,
                skills: defaults::neural_link()?,
            },
        };
        let credits = options
            .credits
            .or(seed.credits)
            .unwrap_or(project.config.project.initial_credits);

        let matrix = SkillMatrix::from_seeds(seed.skills, credits)
            .context("Seed does not form a valid skill matrix")?;
        store.save(&matrix)?;
        info!(
            path = %store.path().display(),
            skills = matrix.graph().len(),
            credits,
            "matrix initialized"
        );

        Ok((project, true))
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .skills directory path
    pub fn skills_dir(&self) -> PathBuf {
        self.root.join(SKILLS_DIR)
    }

    /// Returns the matrix store
    pub fn store(&self) -> MatrixStore {
        MatrixStore::new(self.skills_dir().join(&self.config.project.state_file))
    }

    /// Loads the current matrix
    pub fn load_matrix(&self) -> Result<SkillMatrix> {
        let store = self.store();
        if !store.exists() {
            return Err(ProjectError::MissingState(self.root.clone()).into());
        }
        store.load()
    }
}
