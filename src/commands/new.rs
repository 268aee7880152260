use anyhow::{Context, Result};

use super::{CommandContext, open_current_repo, require_branch};
use crate::process::SystemRunner;
use crate::prompt::TerminalPrompter;
use crate::styling::{INFO, SUCCESS, println};

/// Creates a worktree for `branch` under `.worktrees/` and provisions it
///
/// # Errors
/// Returns an error if:
/// - Not inside a git repository
/// - The worktree already exists
/// - The branch or worktree cannot be created
pub fn new_worktree(branch: &str) -> Result<()> {
    let (git_repo, config) = open_current_repo()?;
    let ctx = CommandContext {
        git: &git_repo,
        runner: &SystemRunner,
        prompter: &TerminalPrompter,
        config: &config,
    };
    new_worktree_with(&ctx, branch)
}

/// Creates and provisions a worktree using the supplied context
///
/// The final line written to stdout is the worktree path, for shell wrappers to
/// change into.
///
/// # Errors
/// Returns an error if:
/// - The worktree already exists
/// - The branch or worktree cannot be created
pub fn new_worktree_with(ctx: &CommandContext<'_>, branch: &str) -> Result<()> {
    require_branch(branch)?;
    let git = ctx.git;

    if git.worktree_exists(branch) {
        anyhow::bail!("Worktree for branch '{}' already exists.", branch);
    }

    if !git.branch_exists(branch)? {
        let create = ctx.prompter.confirm(
            &format!("Branch '{}' does not exist. Create it?", branch),
            true,
        )?;
        if !create {
            println!("Aborted.");
            return Ok(());
        }

        println!("{INFO}Creating branch '{}'...{INFO:#}", branch);
        git.create_branch(branch).context("Failed to create branch")?;
    }

    let worktree_path = git.worktree_path(branch);

    println!("{INFO}Creating worktree for '{}'...{INFO:#}", branch);
    git.add_worktree(&worktree_path, branch).context("Failed to create worktree")?;

    ctx.provisioner()?.provision(&worktree_path, branch)?;

    println!(
        "{SUCCESS}✓ Worktree created at: {}{SUCCESS:#}",
        worktree_path.display()
    );
    println!("{}", worktree_path.display());

    Ok(())
}
