//! Command implementations.
//!
//! Each command has a plain entry point used by the binary, which opens the
//! repository around the current directory and wires up real processes and
//! terminal prompts, and a `*_with` variant taking a [`CommandContext`] so tests
//! can substitute any of them.

pub mod init;
pub mod list;
pub mod new;
pub mod remove;
pub mod shell;

use anyhow::Result;
use std::path::Path;

use crate::config::ShepConfig;
use crate::git::GitRepo;
use crate::prompt::Prompter;
use crate::provision::Provisioner;
use crate::site::SiteRegistrar;
use crate::traits::{CommandRunner, GitOperations};

/// Everything a command needs from the outside world
pub struct CommandContext<'a> {
    pub git: &'a dyn GitOperations,
    pub runner: &'a dyn CommandRunner,
    pub prompter: &'a dyn Prompter,
    pub config: &'a ShepConfig,
}

impl<'a> CommandContext<'a> {
    /// Folder name of the main repository, the base of every site hostname
    ///
    /// # Errors
    /// Returns an error if the repository root has no final path component
    pub fn repo_name(&self) -> Result<String> {
        repo_name(&self.git.main_repo_root())
    }

    /// # Errors
    /// Returns an error if the repository name cannot be determined
    pub fn provisioner(&self) -> Result<Provisioner<'a>> {
        let config: &'a ShepConfig = self.config;
        Ok(Provisioner::new(
            self.runner,
            self.prompter,
            &config.tools,
            self.repo_name()?,
        ))
    }

    /// # Errors
    /// Returns an error if the repository name cannot be determined
    pub fn site(&self) -> Result<SiteRegistrar<'a>> {
        let config: &'a ShepConfig = self.config;
        Ok(SiteRegistrar::new(
            self.runner,
            &config.tools.herd,
            self.repo_name()?,
        ))
    }
}

/// Extracts repository name from a path
///
/// # Errors
/// Returns an error if the path doesn't have a valid file name
pub fn repo_name(repo_path: &Path) -> Result<String> {
    if let Some(name) = repo_path.file_name() {
        Ok(name.to_string_lossy().to_string())
    } else {
        anyhow::bail!("Could not determine repository name from path")
    }
}

/// Opens the repository around the current directory and loads its configuration
///
/// # Errors
/// Returns an error if the current directory is not inside a git repository or
/// the configuration file cannot be read
pub fn open_current_repo() -> Result<(GitRepo, ShepConfig)> {
    let current_dir = std::env::current_dir()?;
    let git_repo = GitRepo::open(&current_dir)?;
    let config = ShepConfig::load_from_repo(&git_repo.main_repo_root())?;
    let git_repo = git_repo.with_git_executable(config.tools.git.clone());
    Ok((git_repo, config))
}

fn require_branch(branch: &str) -> Result<()> {
    if branch.trim().is_empty() {
        anyhow::bail!("Branch name required.");
    }
    Ok(())
}
