//! # Storage Layer
//!
//! Persistence for the skill matrix.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Matrix state | JSON snapshot | `.skills/matrix.json` |
//! | Config | TOML | `.skills/config.toml` |
//! | Seeds | JSON, YAML or TOML | anywhere, passed to `skills init --seed` |
//!
//! ## Concurrency Safety
//!
//! - [`MatrixStore`] uses file locking (`fs2`) on a sibling `.lock` file
//! - Unlocks run inside [`MatrixStore::transact`], one writer at a time
//! - All writes are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a skills project
//! - [`MatrixStore`] - Read/write the matrix state
//! - [`SeedFile`] - Parse seed documents
//! - [`Config`] - Project and global configuration

mod config;
mod project;
mod seed;
mod state;

pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, SKILLS_DIR};
pub use project::{InitOptions, Project, ProjectError};
pub use seed::{SeedError, SeedFile, SeedFormat};
pub use state::{MatrixSnapshot, MatrixStore};
