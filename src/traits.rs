use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::git::WorktreeEntry;
use crate::process::{Invocation, ProcessOutput};

/// Trait for Git operations to enable mocking in tests
pub trait GitOperations {
    fn repo_root(&self) -> PathBuf;
    fn main_repo_root(&self) -> PathBuf;
    fn worktree_path(&self, branch: &str) -> PathBuf;
    fn branch_exists(&self, branch: &str) -> Result<bool>;
    fn worktree_exists(&self, branch: &str) -> bool;
    fn current_branch(&self) -> Result<Option<String>>;
    fn create_branch(&self, branch: &str) -> Result<()>;
    fn add_worktree(&self, worktree_path: &Path, branch: &str) -> Result<()>;
    fn remove_worktree(&self, worktree_path: &Path) -> Result<()>;
    fn prune_worktrees(&self) -> Result<()>;
    fn list_worktrees(&self) -> Result<Vec<WorktreeEntry>>;
}

/// Trait for running external executables so provisioning can be exercised without them
pub trait CommandRunner {
    /// Runs the invocation to completion.
    ///
    /// # Errors
    /// Returns an error if the executable could not be started. A non-zero exit
    /// status is reported through [`ProcessOutput::success`], not as an error.
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput>;

    /// Resolves an executable name against `PATH`
    fn locate(&self, program: &str) -> Option<PathBuf>;
}
