//! Provisioning of a worktree into a runnable Laravel app.
//!
//! Steps always run in the same order and a failing step never stops the ones
//! after it; failures are printed as warnings and collected in the
//! [`ProvisionReport`]. Interrupting a prompt ends provisioning.

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;

use crate::config::Tools;
use crate::envfile;
use crate::process::{Invocation, OutputMode};
use crate::prompt::Prompter;
use crate::site::SiteRegistrar;
use crate::styling::{INFO, SUCCESS, WARNING, eprintln, println};
use crate::traits::CommandRunner;

/// Frontend manifest whose presence offers the dev server
pub const PACKAGE_MANIFEST: &str = "package.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Environment,
    Dependencies,
    AppKey,
    Migrations,
    Site,
    DevServer,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Environment => "environment setup",
            Step::Dependencies => "composer install",
            Step::AppKey => "application key",
            Step::Migrations => "migrations",
            Step::Site => "Herd link",
            Step::DevServer => "npm run dev",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Set when the Herd link succeeded
    pub site_url: Option<String>,
    pub failed: Vec<Step>,
}

impl ProvisionReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Provisioner<'a> {
    runner: &'a dyn CommandRunner,
    prompter: &'a dyn Prompter,
    tools: &'a Tools,
    site: SiteRegistrar<'a>,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        prompter: &'a dyn Prompter,
        tools: &'a Tools,
        repo_name: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            prompter,
            tools,
            site: SiteRegistrar::new(runner, &tools.herd, repo_name),
        }
    }

    /// Provisions the worktree at `worktree_path` for `branch`
    ///
    /// Failed steps are reported and recorded in the returned report.
    ///
    /// # Errors
    /// Returns an error if a prompt is interrupted; no further steps run
    pub fn provision(&self, worktree_path: &Path, branch: &str) -> Result<ProvisionReport> {
        let mut report = ProvisionReport::default();
        let hostname = self.site.hostname(branch);
        let url = self.site.url(branch);

        println!("{INFO}Setting up environment...{INFO:#}");
        if let Err(e) = envfile::prepare_environment(worktree_path, &url) {
            warn(&format!("Failed to set up environment: {:#}", e));
            report.failed.push(Step::Environment);
        }

        println!("{INFO}Running composer install...{INFO:#}");
        let install = Invocation::new(&self.tools.composer)
            .args(["install", "--quiet"])
            .current_dir(worktree_path)
            .mode(OutputMode::Streamed);
        if let Err(e) = self.run(&install) {
            warn(&format!("Composer install failed: {:#}", e));
            report.failed.push(Step::Dependencies);
        }

        if self.ask("Generate application key?", true)? {
            println!("{INFO}Generating application key...{INFO:#}");
            let keygen = self
                .artisan(worktree_path, &["key:generate", "--quiet"])
                .mode(OutputMode::Quiet);
            if let Err(e) = self.run(&keygen) {
                log::debug!("Key generation failed: {:#}", e);
                report.failed.push(Step::AppKey);
            }
        }

        if self.ask("Run migrations with seeding?", false)? {
            println!("{INFO}Running migrations with seeding...{INFO:#}");
            let migrate = self
                .artisan(worktree_path, &["migrate", "--seed", "--quiet"])
                .mode(OutputMode::Streamed);
            if let Err(e) = self.run(&migrate) {
                warn(&format!("Migrations failed: {:#}", e));
                report.failed.push(Step::Migrations);
            }
        }

        println!("{INFO}Linking to Herd as '{}'...{INFO:#}", hostname);
        match self.site.link(worktree_path, branch) {
            Ok(()) => {
                println!("{SUCCESS}✓ Site available at: {}{SUCCESS:#}", url);
                report.site_url = Some(url);
            }
            Err(e) => {
                warn(&format!("{:#}", e));
                report.failed.push(Step::Site);
            }
        }

        let has_manifest = worktree_path.join(PACKAGE_MANIFEST).is_file();
        if has_manifest && self.ask("Run 'npm run dev'?", false)? {
            println!("{INFO}Starting npm run dev...{INFO:#}");
            let dev = Invocation::new(&self.tools.npm)
                .args(["run", "dev"])
                .current_dir(worktree_path)
                .mode(OutputMode::Interactive);
            if let Err(e) = self.run(&dev) {
                warn(&format!("npm run dev failed: {:#}", e));
                report.failed.push(Step::DevServer);
            }
        }

        if !report.is_clean() {
            let failed: Vec<String> = report.failed.iter().map(ToString::to_string).collect();
            log::info!(
                "Provisioning finished with failed steps: {}",
                failed.join(", ")
            );
        }

        Ok(report)
    }

    fn artisan(&self, worktree_path: &Path, args: &[&str]) -> Invocation {
        Invocation::new(&self.tools.php)
            .arg("artisan")
            .args(args.iter().copied())
            .current_dir(worktree_path)
    }

    fn run(&self, invocation: &Invocation) -> Result<()> {
        self.runner.run(invocation)?.ensure_success(invocation)?;
        Ok(())
    }

    fn ask(&self, prompt: &str, default: bool) -> Result<bool> {
        self.prompter
            .confirm(prompt, default)
            .context("Provisioning stopped")
    }
}

fn warn(message: &str) {
    eprintln!("{WARNING}⚠ Warning: {}{WARNING:#}", message);
}
