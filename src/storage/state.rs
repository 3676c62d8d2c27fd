//! Matrix state file
//!
//! The current matrix is stored in `.skills/matrix.json` as a snapshot of
//! every skill (status included) plus the credit balance. Loading always
//! rebuilds the graph, so a hand-edited file is re-validated exactly like a
//! fresh seed.
//!
//! A sibling `.lock` file serializes access: readers take a shared lock,
//! [`MatrixStore::transact`] holds an exclusive lock across
//! load, mutate and save.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{CreditBalance, GraphError, SkillMatrix, SkillSeed};

/// Serialized form of a matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixSnapshot {
    pub credits: CreditBalance,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    pub skills: Vec<SkillSeed>,
}

impl MatrixSnapshot {
    /// Captures the current state of a matrix
    pub fn capture(matrix: &SkillMatrix) -> Self {
        Self {
            credits: matrix.balance(),
            updated_at: Some(Utc::now()),
            skills: matrix.graph().to_seeds(),
        }
    }

    /// Rebuilds the matrix, re-checking every structural invariant
    pub fn restore(self) -> Result<SkillMatrix, GraphError> {
        SkillMatrix::from_seeds(self.skills, self.credits.amount())
    }
}

/// Store for the matrix state file
pub struct MatrixStore {
    path: PathBuf,
}

impl MatrixStore {
    /// Creates a new store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a state file has been written
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn open_lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let lock_path = self.lock_path();
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))
    }

    /// Loads the matrix under a shared lock
    pub fn load(&self) -> Result<SkillMatrix> {
        let lock = self.open_lock()?;
        lock.lock_shared()
            .context("Failed to acquire read lock on matrix state")?;

        // Lock is released when `lock` is dropped
        self.read_snapshot()?
            .restore()
            .with_context(|| format!("Invalid matrix state: {}", self.path.display()))
    }

    /// Writes the matrix under an exclusive lock
    pub fn save(&self, matrix: &SkillMatrix) -> Result<()> {
        let lock = self.open_lock()?;
        lock.lock_exclusive()
            .context("Failed to acquire write lock on matrix state")?;

        self.write_snapshot(&MatrixSnapshot::capture(matrix))
    }

    /// Runs `op` against the stored matrix while holding the exclusive lock
    ///
    /// The state is written back only when `op` succeeds, so a rejected
    /// unlock leaves the file untouched. Errors from `op` are returned as-is
    /// inside the `anyhow::Error` and can be recovered with `downcast_ref`.
    pub fn transact<T, E>(&self, op: impl FnOnce(&mut SkillMatrix) -> Result<T, E>) -> Result<T>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let lock = self.open_lock()?;
        lock.lock_exclusive()
            .context("Failed to acquire write lock on matrix state")?;

        let mut matrix = self
            .read_snapshot()?
            .restore()
            .with_context(|| format!("Invalid matrix state: {}", self.path.display()))?;

        let value = op(&mut matrix)?;
        self.write_snapshot(&MatrixSnapshot::capture(&matrix))?;
        debug!(path = %self.path.display(), "matrix state saved");

        Ok(value)
    }

    fn read_snapshot(&self) -> Result<MatrixSnapshot> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read matrix state: {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse matrix state: {}", self.path.display()))
    }

    fn write_snapshot(&self, snapshot: &MatrixSnapshot) -> Result<()> {
        // Write to temp file first
        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, snapshot)
                .context("Failed to serialize matrix state")?;
            writeln!(writer).context("Failed to write matrix state")?;
            writer.flush().context("Failed to flush matrix state")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })
    }
}
