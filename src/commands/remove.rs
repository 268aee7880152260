use anyhow::{Context, Result};

use super::{CommandContext, open_current_repo, require_branch};
use crate::process::SystemRunner;
use crate::prompt::TerminalPrompter;
use crate::styling::{INFO, SUCCESS, println};

/// Removes the worktree for `branch` after confirmation, unlinking its Herd site
///
/// # Errors
/// Returns an error if:
/// - Not inside a git repository
/// - The worktree doesn't exist
/// - Git fails to remove the worktree
pub fn remove_worktree(branch: &str) -> Result<()> {
    let (git_repo, config) = open_current_repo()?;
    let ctx = CommandContext {
        git: &git_repo,
        runner: &SystemRunner,
        prompter: &TerminalPrompter,
        config: &config,
    };
    remove_worktree_with(&ctx, branch)
}

/// Removes a worktree using the supplied context
///
/// Declining the confirmation is not an error; nothing is touched.
///
/// # Errors
/// Returns an error if:
/// - The worktree doesn't exist
/// - Git fails to remove the worktree
pub fn remove_worktree_with(ctx: &CommandContext<'_>, branch: &str) -> Result<()> {
    require_branch(branch)?;
    let git = ctx.git;

    if !git.worktree_exists(branch) {
        anyhow::bail!("Worktree for branch '{}' does not exist.", branch);
    }

    let worktree_path = git.worktree_path(branch);

    let confirmed = ctx.prompter.confirm(
        &format!("Remove worktree at '{}'?", worktree_path.display()),
        false,
    )?;
    if !confirmed {
        println!("Aborted.");
        return Ok(());
    }

    println!("{INFO}Unlinking from Herd...{INFO:#}");
    ctx.site()?.unlink(branch);

    println!("{INFO}Removing worktree '{}'...{INFO:#}", branch);
    git.remove_worktree(&worktree_path).context("Failed to remove worktree")?;

    if let Err(e) = git.prune_worktrees() {
        log::debug!("git worktree prune failed: {:#}", e);
    }

    println!("{SUCCESS}✓ Worktree '{}' removed.{SUCCESS:#}", branch);

    Ok(())
}
