use anyhow::{Context, Result};
use assert_fs::TempDir;
use assert_fs::prelude::*;

use std::process::Command;

use crate::laravel::create_laravel_skeleton;

/// Overrides pointing every Laravel tool at an executable that does not exist
const MISSING_TOOLS: [(&str, &str); 4] = [
    ("SHEP_HERD", "shep-test-missing-herd"),
    ("SHEP_COMPOSER", "shep-test-missing-composer"),
    ("SHEP_PHP", "shep-test-missing-php"),
    ("SHEP_NPM", "shep-test-missing-npm"),
];

/// A committed Laravel skeleton in a real git repository named `myapp`
pub struct CliTestEnvironment {
    pub repo_dir: assert_fs::fixture::ChildPath,
    pub bin_dir: assert_fs::fixture::ChildPath,
    herd: Option<assert_fs::fixture::ChildPath>,
    _temp_dir: TempDir, // Keep temp_dir private to ensure cleanup, but don't expose it
}

impl CliTestEnvironment {
    /// Creates a new test environment with a real git repository on branch `main`
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to create temporary directory
    /// - Failed to initialize git repository
    /// - Failed to configure git settings
    /// - Failed to create initial commit
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let repo_dir = temp_dir.child("myapp");
        let bin_dir = temp_dir.child("bin");

        repo_dir.create_dir_all()?;
        bin_dir.create_dir_all()?;

        Self::run_git_command(&repo_dir, &["init"])?;
        Self::run_git_command(&repo_dir, &["config", "user.name", "Test User"])?;
        Self::run_git_command(&repo_dir, &["config", "user.email", "test@example.com"])?;

        create_laravel_skeleton(&repo_dir)?;
        repo_dir.child(".gitignore").write_str(".env\n.worktrees/\n")?;
        Self::run_git_command(&repo_dir, &["add", "."])?;
        Self::run_git_command(&repo_dir, &["commit", "-m", "Initial commit"])?;

        // Ensure we have a main branch (some git versions default to 'master')
        Self::run_git_command(&repo_dir, &["branch", "-M", "main"])?;

        Ok(Self {
            repo_dir,
            bin_dir,
            herd: None,
            _temp_dir: temp_dir,
        })
    }

    /// Run a git command in the repository directory
    ///
    /// # Errors
    /// Returns an error if git cannot be run or exits unsuccessfully
    pub fn git(&self, args: &[&str]) -> Result<String> {
        Self::run_git_command(&self.repo_dir, args)
    }

    fn run_git_command(repo_path: &assert_fs::fixture::ChildPath, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_path.path())
            .output()
            .context("Failed to execute git command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git command failed: {}", stderr);
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Installs a `herd` stand-in that appends its arguments to `herd.log`
    ///
    /// # Errors
    /// Returns an error if the script cannot be written or made executable
    #[cfg(unix)]
    pub fn with_recording_herd(mut self) -> Result<Self> {
        use std::os::unix::fs::PermissionsExt;

        let log = self.bin_dir.child("herd.log");
        let herd = self.bin_dir.child("herd");
        herd.write_str(&format!(
            "#!/bin/sh\necho \"$@\" >> '{}'\n",
            log.path().display()
        ))?;
        std::fs::set_permissions(herd.path(), std::fs::Permissions::from_mode(0o755))?;

        self.herd = Some(herd);
        Ok(self)
    }

    /// Lines written by the recording `herd`, empty when it never ran
    ///
    /// # Errors
    /// Returns an error if the log exists but cannot be read
    pub fn herd_calls(&self) -> Result<Vec<String>> {
        let log = self.bin_dir.child("herd.log");
        if !log.path().exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(log.path())?;
        Ok(contents.lines().map(ToString::to_string).collect())
    }

    /// Execute a CLI command in the repository with the Laravel tools stubbed out
    ///
    /// # Errors
    /// Returns an error if the command setup fails
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        self.run_command_in(self.repo_dir.path(), args)
    }

    /// Like [`Self::run_command`], from another working directory
    ///
    /// # Errors
    /// Returns an error if the command setup fails
    pub fn run_command_in(
        &self,
        dir: &std::path::Path,
        args: &[&str],
    ) -> Result<assert_cmd::Command> {
        let mut cmd =
            assert_cmd::Command::cargo_bin("shep").context("Failed to find shep binary")?;

        cmd.current_dir(dir).env_remove("SHEP_GIT").env_remove("SHEP_LOG");
        for (var, value) in MISSING_TOOLS {
            cmd.env(var, value);
        }
        if let Some(herd) = &self.herd {
            cmd.env("SHEP_HERD", herd.path());
        }

        cmd.args(args);
        Ok(cmd)
    }

    /// Get the path to a worktree within the repository
    pub fn worktree_path(&self, branch_name: &str) -> assert_fs::fixture::ChildPath {
        self.repo_dir.child(".worktrees").child(branch_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn test_cli_test_environment_creation() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        env.repo_dir.assert(predicate::path::is_dir());
        env.repo_dir.child(".git").assert(predicate::path::exists());
        env.repo_dir
            .child(".env.example")
            .assert(predicate::str::contains("DB_CONNECTION=mysql"));
        assert_eq!(env.git(&["branch", "--show-current"])?.trim(), "main");

        Ok(())
    }

    #[test]
    fn test_worktree_path() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        let path = env.worktree_path("feature-a");
        assert!(path.path().ends_with("myapp/.worktrees/feature-a"));

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_recording_herd_logs_arguments() -> Result<()> {
        let env = CliTestEnvironment::new()?.with_recording_herd()?;
        assert!(env.herd_calls()?.is_empty());

        let herd = env.bin_dir.child("herd");
        let status = Command::new(herd.path()).args(["link", "myapp-x"]).status()?;
        assert!(status.success());
        assert_eq!(env.herd_calls()?, vec!["link myapp-x"]);

        Ok(())
    }
}
