//! External process execution.
//!
//! Every tool shep drives (git, composer, artisan, npm, herd) goes through a
//! [`CommandRunner`]. [`SystemRunner`] spawns real processes and logs each one
//! at debug level; [`RecordingRunner`] records invocations for tests.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::traits::CommandRunner;

/// How a child process is wired to the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Output discarded, stdin closed
    Quiet,
    /// Stdout captured and returned, stderr discarded, stdin closed
    Captured,
    /// Stdout and stderr forwarded to ours, stdin closed
    Streamed,
    /// Stdin, stdout and stderr all inherited
    Interactive,
}

/// A single external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub mode: OutputMode,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            mode: OutputMode::Quiet,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of a process that ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
}

impl ProcessOutput {
    /// Converts a non-zero exit into an error naming the command
    ///
    /// # Errors
    /// Returns an error if the process did not exit successfully
    pub fn ensure_success(self, invocation: &Invocation) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        match self.code {
            Some(code) => anyhow::bail!("`{}` exited with status {}", invocation, code),
            None => anyhow::bail!("`{}` was terminated by a signal", invocation),
        }
    }
}

/// Runs real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.current_dir {
            cmd.current_dir(dir);
        }

        match invocation.mode {
            OutputMode::Quiet => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null());
            }
            OutputMode::Captured => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::null());
            }
            OutputMode::Streamed => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            OutputMode::Interactive => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
        }

        match &invocation.current_dir {
            Some(dir) => log::debug!("$ {} [{}]", invocation, dir.display()),
            None => log::debug!("$ {}", invocation),
        }

        let started = Instant::now();
        let result = cmd.output();
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(output) => log::debug!(
                "[shep-trace] cmd=\"{}\" dur={:.1}ms ok={}",
                invocation,
                duration_ms,
                output.status.success()
            ),
            Err(e) => log::debug!(
                "[shep-trace] cmd=\"{}\" dur={:.1}ms err=\"{}\"",
                invocation,
                duration_ms,
                e
            ),
        }

        let output = result.with_context(|| format!("Failed to execute {}", invocation.program))?;

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Records invocations instead of running them, for testing
#[derive(Debug, Default)]
pub struct RecordingRunner {
    invocations: RefCell<Vec<Invocation>>,
    available: Vec<String>,
    failing: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs that [`CommandRunner::locate`] should report as installed
    #[must_use]
    pub fn with_available(mut self, programs: &[&str]) -> Self {
        self.available.extend(programs.iter().map(|p| (*p).to_string()));
        self
    }

    /// Makes every invocation of `program` exit with status 1
    #[must_use]
    pub fn failing(mut self, program: &str) -> Self {
        self.failing.push(program.to_string());
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Rendered command lines, in the order they ran
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        self.invocations.borrow_mut().push(invocation.clone());
        let success = !self.failing.contains(&invocation.program);
        Ok(ProcessOutput {
            success,
            code: Some(if success { 0 } else { 1 }),
            stdout: String::new(),
        })
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.available
            .iter()
            .any(|p| p == program)
            .then(|| PathBuf::from("/usr/local/bin").join(program))
    }
}
