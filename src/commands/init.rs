use anyhow::{Context, Result};
use std::path::Path;

use super::{CommandContext, open_current_repo};
use crate::process::SystemRunner;
use crate::prompt::TerminalPrompter;
use crate::styling::{INFO, SUCCESS, println};

/// Provisions an existing worktree, or the current directory when no branch is given
///
/// # Errors
/// Returns an error if:
/// - Not inside a git repository
/// - No branch was given and the current branch cannot be determined
/// - The given branch has no worktree
pub fn init_worktree(branch: Option<&str>) -> Result<()> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let (git_repo, config) = open_current_repo()?;
    let ctx = CommandContext {
        git: &git_repo,
        runner: &SystemRunner,
        prompter: &TerminalPrompter,
        config: &config,
    };
    init_worktree_with(&ctx, branch, &current_dir)
}

/// Provisions using the supplied context; `current_dir` is provisioned when `branch` is `None`
///
/// # Errors
/// Returns an error if:
/// - No branch was given and the current branch cannot be determined
/// - The given branch has no worktree
pub fn init_worktree_with(
    ctx: &CommandContext<'_>,
    branch: Option<&str>,
    current_dir: &Path,
) -> Result<()> {
    let (worktree_path, branch) = match branch.filter(|b| !b.trim().is_empty()) {
        None => {
            let current = ctx.git.current_branch().unwrap_or_else(|e| {
                log::debug!("Failed to read current branch: {:#}", e);
                None
            });
            let Some(current) = current else {
                anyhow::bail!(
                    "Could not determine branch name. Please specify a branch.\n\
                    Usage: shep init [branch]"
                );
            };
            println!(
                "{INFO}Provisioning current directory as '{}'...{INFO:#}",
                current
            );
            (current_dir.to_path_buf(), current)
        }
        Some(branch) => {
            if !ctx.git.worktree_exists(branch) {
                anyhow::bail!(
                    "Worktree for branch '{}' does not exist.\n\
                    Use 'shep new {}' to create it.",
                    branch,
                    branch
                );
            }
            println!("{INFO}Provisioning worktree '{}'...{INFO:#}", branch);
            (ctx.git.worktree_path(branch), branch.to_string())
        }
    };

    ctx.provisioner()?.provision(&worktree_path, &branch)?;

    println!(
        "{SUCCESS}✓ Provisioning complete for '{}'{SUCCESS:#}",
        branch
    );
    Ok(())
}
