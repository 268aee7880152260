use anyhow::{Context, Result};
use git2::{BranchType, ErrorCode, Repository};
use std::path::{Path, PathBuf};

use crate::process::{Invocation, OutputMode, SystemRunner};
use crate::traits::{CommandRunner, GitOperations};

/// Directory under the repository root that holds managed worktrees
pub const WORKTREES_DIR: &str = ".worktrees";

/// Shown in place of a branch name when a worktree has a detached HEAD
pub const DETACHED: &str = "(detached)";

pub struct GitRepo {
    repo: Repository,
    git: String,
}

impl GitRepo {
    /// Opens the git repository containing the specified path
    ///
    /// # Errors
    /// Returns an error if the path is not inside a git repository
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            log::debug!("Repository discovery from {} failed: {}", path.display(), e);
            anyhow::anyhow!("Not in a git repository.")
        })?;
        Ok(Self {
            repo,
            git: "git".to_string(),
        })
    }

    /// Uses a different `git` executable for worktree commands
    #[must_use]
    pub fn with_git_executable(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }

    /// Top level of the working tree we were opened from (a linked worktree's own root
    /// when run inside one)
    #[must_use]
    pub fn repo_root(&self) -> PathBuf {
        let root = self.repo.workdir().unwrap_or_else(|| self.repo.path());
        normalize(root)
    }

    /// Root of the primary repository, even when opened from a linked worktree
    #[must_use]
    pub fn main_repo_root(&self) -> PathBuf {
        if !self.repo.is_worktree() {
            return self.repo_root();
        }
        // commondir is the main repository's `.git` directory
        let common_dir = normalize(self.repo.commondir());
        match common_dir.parent() {
            Some(parent) => parent.to_path_buf(),
            None => self.repo_root(),
        }
    }

    #[must_use]
    pub fn worktree_path(&self, branch: &str) -> PathBuf {
        worktree_path_in(&self.repo_root(), branch)
    }

    /// Checks if a local branch exists in the repository
    ///
    /// # Errors
    /// Returns an error if git operations fail
    pub fn branch_exists(&self, branch: &str) -> Result<bool> {
        match self.repo.find_branch(branch, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) if e.code() == ErrorCode::InvalidSpec => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    #[must_use]
    pub fn worktree_exists(&self, branch: &str) -> bool {
        self.worktree_path(branch).is_dir()
    }

    /// Name of the checked-out branch, or `None` when HEAD is detached or unborn
    ///
    /// # Errors
    /// Returns an error if HEAD cannot be read
    pub fn current_branch(&self) -> Result<Option<String>> {
        if self.repo.head_detached()? {
            return Ok(None);
        }
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e).context("Failed to read HEAD"),
        };
        Ok(head
            .shorthand()
            .filter(|name| !name.is_empty() && *name != "HEAD")
            .map(str::to_string))
    }

    /// Creates a local branch pointing at the current HEAD commit
    ///
    /// # Errors
    /// Returns an error if HEAD does not point at a commit or the branch cannot be created
    pub fn create_branch(&self, branch: &str) -> Result<()> {
        let head = self
            .repo
            .head()
            .context("Failed to resolve HEAD")?
            .peel_to_commit()
            .context("HEAD does not point to a commit")?;
        self.repo
            .branch(branch, &head, false)
            .with_context(|| format!("Failed to create branch '{}'", branch))?;
        Ok(())
    }

    /// Adds a linked worktree at `worktree_path` checking out `branch`
    ///
    /// Branch names may contain slashes, which git2's named worktrees cannot hold,
    /// so this goes through the git executable.
    ///
    /// # Errors
    /// Returns an error if git cannot be run or exits unsuccessfully
    pub fn add_worktree(&self, worktree_path: &Path, branch: &str) -> Result<()> {
        let invocation = self
            .git_command()
            .args(["worktree", "add"])
            .arg(worktree_path.to_string_lossy())
            .arg(branch)
            .mode(OutputMode::Streamed);
        SystemRunner.run(&invocation)?.ensure_success(&invocation)?;
        Ok(())
    }

    /// Force-removes the linked worktree at `worktree_path`
    ///
    /// # Errors
    /// Returns an error if git cannot be run or exits unsuccessfully
    pub fn remove_worktree(&self, worktree_path: &Path) -> Result<()> {
        let invocation = self
            .git_command()
            .args(["worktree", "remove"])
            .arg(worktree_path.to_string_lossy())
            .arg("--force")
            .mode(OutputMode::Streamed);
        SystemRunner.run(&invocation)?.ensure_success(&invocation)?;
        Ok(())
    }

    /// Drops administrative entries for worktrees whose directories are gone
    ///
    /// # Errors
    /// Returns an error if git cannot be run or exits unsuccessfully
    pub fn prune_worktrees(&self) -> Result<()> {
        let invocation = self.git_command().args(["worktree", "prune"]);
        SystemRunner.run(&invocation)?.ensure_success(&invocation)?;
        Ok(())
    }

    /// Lists every worktree git knows about, the main one included
    ///
    /// # Errors
    /// Returns an error if git cannot be run or exits unsuccessfully
    pub fn list_worktrees(&self) -> Result<Vec<WorktreeEntry>> {
        let invocation = self
            .git_command()
            .args(["worktree", "list", "--porcelain"])
            .mode(OutputMode::Captured);
        let output = SystemRunner.run(&invocation)?.ensure_success(&invocation)?;
        Ok(parse_worktree_list(&output.stdout))
    }

    fn git_command(&self) -> Invocation {
        Invocation::new(&self.git).current_dir(&self.repo_root())
    }
}

/// `<root>/.worktrees/<branch>`
#[must_use]
pub fn worktree_path_in(repo_root: &Path, branch: &str) -> PathBuf {
    repo_root.join(WORKTREES_DIR).join(branch)
}

/// Strips trailing separators (git2 reports directories with one)
fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}

/// One worktree as reported by `git worktree list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeEntry {
    pub path: String,
    pub head: String,
    pub branch: String,
}

/// Parses `git worktree list --porcelain` output.
///
/// Records are separated by blank lines. Branches are reported as short names;
/// worktrees without a `branch` line are shown as [`DETACHED`].
#[must_use]
pub fn parse_worktree_list(output: &str) -> Vec<WorktreeEntry> {
    let mut entries = Vec::new();
    let mut current: Option<WorktreeEntry> = None;

    for line in output.lines() {
        if line.trim().is_empty() {
            entries.extend(current.take());
            continue;
        }

        if let Some(path) = line.strip_prefix("worktree ") {
            entries.extend(current.take());
            current = Some(WorktreeEntry {
                path: path.to_string(),
                head: String::new(),
                branch: DETACHED.to_string(),
            });
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };

        if let Some(head) = line.strip_prefix("HEAD ") {
            entry.head = head.chars().take(7).collect();
        } else if let Some(reference) = line.strip_prefix("branch ") {
            entry.branch = reference
                .strip_prefix("refs/heads/")
                .unwrap_or(reference)
                .to_string();
        } else if line == "bare" {
            entry.branch = "(bare)".to_string();
        }
    }

    entries.extend(current);
    entries
}

impl GitOperations for GitRepo {
    fn repo_root(&self) -> PathBuf {
        self.repo_root()
    }

    fn main_repo_root(&self) -> PathBuf {
        self.main_repo_root()
    }

    fn worktree_path(&self, branch: &str) -> PathBuf {
        self.worktree_path(branch)
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        self.branch_exists(branch)
    }

    fn worktree_exists(&self, branch: &str) -> bool {
        self.worktree_exists(branch)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        self.current_branch()
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.create_branch(branch)
    }

    fn add_worktree(&self, worktree_path: &Path, branch: &str) -> Result<()> {
        self.add_worktree(worktree_path, branch)
    }

    fn remove_worktree(&self, worktree_path: &Path) -> Result<()> {
        self.remove_worktree(worktree_path)
    }

    fn prune_worktrees(&self) -> Result<()> {
        self.prune_worktrees()
    }

    fn list_worktrees(&self) -> Result<Vec<WorktreeEntry>> {
        self.list_worktrees()
    }
}
