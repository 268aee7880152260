use anyhow::Result;
use std::io::Write;

use super::open_current_repo;
use crate::git::WorktreeEntry;
use crate::styling::{DIM, INFO};
use crate::traits::GitOperations;

/// Prints every worktree of the current repository as a table
///
/// # Errors
/// Returns an error if not inside a git repository or `git worktree list` fails
pub fn list_worktrees() -> Result<()> {
    let (git_repo, _config) = open_current_repo()?;
    list_worktrees_with(&git_repo, &mut anstream::stdout())
}

/// Writes the worktree table to `out`
///
/// # Errors
/// Returns an error if listing worktrees or writing fails
pub fn list_worktrees_with(git: &dyn GitOperations, out: &mut dyn Write) -> Result<()> {
    let worktrees = git.list_worktrees()?;

    if worktrees.is_empty() {
        writeln!(out, "{INFO}No worktrees found.{INFO:#}")?;
        return Ok(());
    }

    writeln!(out)?;
    write_table(out, &worktrees)?;
    writeln!(out)?;

    Ok(())
}

/// Branch / Path / HEAD columns under a dimmed header
fn write_table(out: &mut dyn Write, worktrees: &[WorktreeEntry]) -> std::io::Result<()> {
    writeln!(out, "{DIM}{}{DIM:#}", format_row("Branch", "Path", "HEAD"))?;
    writeln!(out, "{DIM}{}{DIM:#}", format_row("------", "----", "----"))?;
    for worktree in worktrees {
        let row = format_row(&worktree.branch, &worktree.path, &worktree.head);
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

fn format_row(branch: &str, path: &str, head: &str) -> String {
    let row = format!("{:<20} {:<50} {}", branch, path, head);
    row.trim_end().to_string()
}
