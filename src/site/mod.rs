//! Laravel Herd site registration.
//!
//! Each worktree is served by Herd under a hostname derived from the main
//! repository's folder name and the branch. Herd is optional: when its executable
//! cannot be found, linking reports an error and unlinking does nothing.

use anyhow::Result;
use std::path::Path;

use crate::process::Invocation;
use crate::traits::CommandRunner;

/// Top-level domain Herd serves sites under
pub const SITE_TLD: &str = "test";

/// Hostname for `branch` of the repository in folder `repo_name`.
///
/// The folder name is split on its first `.`; anything after it is a suffix kept
/// at the end: `pushsilver.dev` + `feature-x` gives `pushsilver-feature-x.dev`,
/// `myapp` + `feature-x` gives `myapp-feature-x`.
#[must_use]
pub fn hostname(repo_name: &str, branch: &str) -> String {
    match repo_name.split_once('.') {
        Some((base, suffix)) => format!("{}-{}.{}", base, branch, suffix),
        None => format!("{}-{}", repo_name, branch),
    }
}

/// `https://<hostname>.test`
#[must_use]
pub fn site_url(hostname: &str) -> String {
    format!("https://{}.{}", hostname, SITE_TLD)
}

pub struct SiteRegistrar<'a> {
    runner: &'a dyn CommandRunner,
    herd: &'a str,
    repo_name: String,
}

impl<'a> SiteRegistrar<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        herd: &'a str,
        repo_name: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            herd,
            repo_name: repo_name.into(),
        }
    }

    #[must_use]
    pub fn hostname(&self, branch: &str) -> String {
        hostname(&self.repo_name, branch)
    }

    #[must_use]
    pub fn url(&self, branch: &str) -> String {
        site_url(&self.hostname(branch))
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.runner.locate(self.herd).is_some()
    }

    /// Links the worktree at `worktree_path` in Herd, then secures it and restarts Herd.
    ///
    /// Only the link itself must succeed; securing and restarting are best-effort.
    ///
    /// # Errors
    /// Returns an error if Herd is not installed or `herd link` fails
    pub fn link(&self, worktree_path: &Path, branch: &str) -> Result<()> {
        if !self.is_available() {
            anyhow::bail!("Herd CLI not found. Skipping Herd setup.");
        }

        let hostname = self.hostname(branch);

        let link = Invocation::new(self.herd)
            .args(["link", hostname.as_str()])
            .current_dir(worktree_path);
        self.run(&link)?;

        let secure = Invocation::new(self.herd)
            .args(["secure", hostname.as_str()])
            .current_dir(worktree_path);
        if let Err(e) = self.run(&secure) {
            log::debug!("Ignoring failed herd secure: {:#}", e);
        }

        let restart = Invocation::new(self.herd).arg("restart");
        if let Err(e) = self.run(&restart) {
            log::debug!("Ignoring failed herd restart: {:#}", e);
        }

        Ok(())
    }

    /// Removes the Herd link for `branch`, ignoring every failure
    pub fn unlink(&self, branch: &str) {
        if !self.is_available() {
            log::debug!("Herd not found, nothing to unlink");
            return;
        }

        let hostname = self.hostname(branch);
        let unlink = Invocation::new(self.herd).args(["unlink", hostname.as_str()]);
        if let Err(e) = self.run(&unlink) {
            log::debug!("Ignoring failed herd unlink: {:#}", e);
        }
    }

    fn run(&self, invocation: &Invocation) -> Result<()> {
        self.runner.run(invocation)?.ensure_success(invocation)?;
        Ok(())
    }
}
