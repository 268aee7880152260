use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use env_logger::Env;
use shep::Result;
use shep::commands::shell::{self, Shell};
use shep::commands::{init, list, new, remove};
use shep::styling::{ERROR, eprintln};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "shep")]
#[command(about = "Shep - Laravel Worktree Manager")]
#[command(version)]
#[command(arg_required_else_help = true)]
#[command(after_help = "Examples:
  shep new feature-auth      Create worktree for new feature
  shep init                  Provision the current worktree
  shep remove feature-auth   Remove the feature worktree
  shep list                  Show all worktrees")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a worktree for a branch and provision it
    New {
        /// Branch name for the worktree
        #[arg(value_hint = ValueHint::Other)]
        branch: String,
    },
    /// Provision an existing worktree, or the current directory
    Init {
        /// Branch whose worktree to provision. Defaults to the current directory
        #[arg(value_hint = ValueHint::Other)]
        branch: Option<String>,
    },
    /// Remove a worktree and its Herd site
    Remove {
        /// Branch whose worktree to remove
        #[arg(value_hint = ValueHint::Other)]
        branch: String,
    },
    /// List all worktrees
    #[command(visible_alias = "ls")]
    List,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Generate a shell function that changes into worktrees created by `shep new`
    ShellInit {
        /// Shell to generate integration for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::new().filter_or("SHEP_LOG", "warn"))
        .format_timestamp(None)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return exit_for_parse_error(&e),
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{ERROR}Error: {:#}{ERROR:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::New { branch } => new::new_worktree(&branch)?,
        Commands::Init { branch } => init::init_worktree(branch.as_deref())?,
        Commands::Remove { branch } => remove::remove_worktree(&branch)?,
        Commands::List => list::list_worktrees()?,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            shell::generate_completions(shell, &mut cmd);
        }
        Commands::ShellInit { shell } => shell::generate_shell_integration(shell),
    }

    Ok(())
}

/// Help and version exit 0; every usage error exits 1
fn exit_for_parse_error(e: &clap::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            ExitCode::SUCCESS
        }
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = Cli::command().print_help();
            ExitCode::SUCCESS
        }
        ErrorKind::InvalidSubcommand => {
            let _ = e.print();
            eprintln!();
            let _ = Cli::command().write_long_help(&mut std::io::stderr());
            ExitCode::FAILURE
        }
        _ => {
            let _ = e.print();
            ExitCode::FAILURE
        }
    }
}
