//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init`, `validate` |
//! | Query | Inspect the matrix | `list`, `show`, `available`, `order` |
//! | Credits | Balance and progress | `balance`, `status` |
//! | Progression | Spend credits | `unlock` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output, including engine events:
//! ```bash
//! skills --verbose unlock sec1
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod query;
mod skill;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
