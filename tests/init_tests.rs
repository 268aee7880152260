//! Integration tests for the init command

use anyhow::Result;
use assert_fs::prelude::*;
use predicates::prelude::*;

use test_support::{CliTestEnvironment, read_env_value};

fn create_worktree(env: &CliTestEnvironment, branch: &str) -> Result<()> {
    env.run_command(&["new", branch])?
        .write_stdin("y\nn\nn\n")
        .assert()
        .success();
    Ok(())
}

#[test]
fn test_init_named_worktree_restores_environment() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    create_worktree(&env, "feature-a")?;

    let worktree = env.worktree_path("feature-a");
    std::fs::remove_file(worktree.child(".env").path())?;

    env.run_command(&["init", "feature-a"])?
        .write_stdin("n\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Provisioning worktree 'feature-a'...",
        ))
        .stdout(predicate::str::contains(
            "✓ Provisioning complete for 'feature-a'",
        ));

    assert_eq!(
        read_env_value(&worktree.child(".env"), "APP_URL")?.as_deref(),
        Some("https://myapp-feature-a.test")
    );

    Ok(())
}

#[test]
fn test_init_is_idempotent() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    create_worktree(&env, "feature-a")?;

    let dotenv = env.worktree_path("feature-a").child(".env");
    let first = std::fs::read_to_string(dotenv.path())?;

    env.run_command(&["init", "feature-a"])?
        .write_stdin("n\nn\n")
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(dotenv.path())?, first);
    assert_eq!(first.matches("APP_URL=").count(), 1);

    Ok(())
}

#[test]
fn test_init_without_branch_uses_current_worktree() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    create_worktree(&env, "feature-a")?;

    let worktree = env.worktree_path("feature-a");
    env.run_command_in(worktree.path(), &["init"])?
        .write_stdin("n\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Provisioning current directory as 'feature-a'...",
        ));

    // hostname still comes from the main repository's folder
    assert_eq!(
        read_env_value(&worktree.child(".env"), "APP_URL")?.as_deref(),
        Some("https://myapp-feature-a.test")
    );

    Ok(())
}

#[test]
fn test_init_in_main_repository() -> Result<()> {
    let env = CliTestEnvironment::new()?;

    env.run_command(&["init"])?
        .write_stdin("n\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ Provisioning complete for 'main'",
        ));

    assert_eq!(
        read_env_value(&env.repo_dir.child(".env"), "APP_URL")?.as_deref(),
        Some("https://myapp-main.test")
    );
    env.repo_dir
        .child("database/database.sqlite")
        .assert(predicate::path::is_file());

    Ok(())
}

#[test]
fn test_init_missing_worktree_fails_with_hint() -> Result<()> {
    let env = CliTestEnvironment::new()?;

    env.run_command(&["init", "feature-x"])?
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Worktree for branch 'feature-x' does not exist.",
        ))
        .stderr(predicate::str::contains(
            "Use 'shep new feature-x' to create it.",
        ));

    Ok(())
}

#[test]
fn test_init_detached_head_fails() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.git(&["checkout", "--detach"])?;

    env.run_command(&["init"])?
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Could not determine branch name. Please specify a branch.",
        ));

    Ok(())
}
