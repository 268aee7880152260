//! # Shep
//!
//! A CLI tool that gives every branch of a Laravel project its own git worktree,
//! provisioned into a runnable app: a patched `.env`, a SQLite database,
//! Composer dependencies and a Laravel Herd site.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create and provision a worktree at .worktrees/feature-auth
//! shep new feature-auth
//!
//! # Re-run provisioning in the current worktree
//! shep init
//!
//! # List all worktrees
//! shep list
//!
//! # Remove the worktree and unlink its site
//! shep remove feature-auth
//! ```
//!
//! ## Module Structure
//!
//! - [`commands`] - Command implementations (new, init, remove, list, shell integration)
//! - [`config`] - `.shep.toml` tool overrides
//! - [`envfile`] - `.env` parsing and patching for per-worktree SQLite apps
//! - [`git`] - Git operations using the git2 crate and the git CLI
//! - [`process`] - External command execution
//! - [`prompt`] - Yes/no prompts, abstracted for testability
//! - [`provision`] - The fixed provisioning sequence
//! - [`site`] - Herd hostname derivation and site registration
//! - [`styling`] - Colored output that degrades to plain text off a terminal
//! - [`traits`] - `GitOperations` and `CommandRunner` seams

pub mod commands;
pub mod config;
pub mod envfile;
pub mod git;
pub mod process;
pub mod prompt;
pub mod provision;
pub mod site;
pub mod styling;
pub mod traits;

pub use anyhow::Result;
