//! `.env` handling for provisioned worktrees.
//!
//! The file is parsed into an ordered list of lines, each remembering the key it
//! assigns (if any), so edits touch only the lines they target and everything
//! else (comments, blank lines, ordering, line endings) survives untouched.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

pub const ENV_FILE: &str = ".env";
pub const ENV_TEMPLATE: &str = ".env.example";
pub const DATABASE_DIR: &str = "database";
pub const DATABASE_FILE: &str = "database.sqlite";

/// Keys whose server-database values are kept but disabled for SQLite
pub const DISABLED_KEYS: [&str; 4] = ["DB_HOST", "DB_PORT", "DB_USERNAME", "DB_PASSWORD"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    text: String,
    key: Option<String>,
    carriage_return: bool,
}

impl Line {
    fn parse(raw: &str) -> Self {
        let (text, carriage_return) = match raw.strip_suffix('\r') {
            Some(text) => (text, true),
            None => (raw, false),
        };
        let key = text
            .split_once('=')
            .map(|(key, _)| key)
            .filter(|key| !key.is_empty() && !key.contains(char::is_whitespace))
            .map(str::to_string);
        Self {
            text: text.to_string(),
            key,
            carriage_return,
        }
    }

    fn assignment(key: &str, value: &str, carriage_return: bool) -> Self {
        Self {
            text: format!("{}={}", key, value),
            key: Some(key.to_string()),
            carriage_return,
        }
    }
}

/// An environment file held as ordered lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvFile {
    lines: Vec<Line>,
    trailing_newline: bool,
}

impl EnvFile {
    #[must_use]
    pub fn parse(content: &str) -> Self {
        if content.is_empty() {
            return Self::default();
        }
        let trailing_newline = content.ends_with('\n');
        let body = content.strip_suffix('\n').unwrap_or(content);
        Self {
            lines: body.split('\n').map(Line::parse).collect(),
            trailing_newline,
        }
    }

    /// Value of the first line assigning `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.key.as_deref() == Some(key))
            .map(|line| &line.text[key.len() + 1..])
    }

    /// Replaces the first `KEY=` line, or appends one when there is none
    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.key.as_deref() == Some(key))
        {
            *line = Line::assignment(key, value, line.carriage_return);
            return;
        }

        let carriage_return = self.lines.last().is_some_and(|line| line.carriage_return);
        self.lines.push(Line::assignment(key, value, carriage_return));
    }

    /// Comments out every `KEY=` line, keeping its value
    pub fn disable(&mut self, key: &str) {
        for line in &mut self.lines {
            if line.key.as_deref() == Some(key) {
                line.text.insert(0, '#');
                line.key = None;
            }
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&line.text);
            if line.carriage_return {
                out.push('\r');
            }
        }
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }
}

/// The edits applied to a worktree's `.env`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvPatch {
    pub set: Vec<(String, String)>,
    pub disable: Vec<String>,
}

impl EnvPatch {
    /// SQLite-backed settings for a worktree served at `app_url`
    #[must_use]
    pub fn for_worktree(app_url: &str, database_path: &Path) -> Self {
        Self {
            set: vec![
                ("APP_URL".to_string(), app_url.to_string()),
                ("DB_CONNECTION".to_string(), "sqlite".to_string()),
                (
                    "DB_DATABASE".to_string(),
                    database_path.to_string_lossy().into_owned(),
                ),
            ],
            disable: DISABLED_KEYS.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    pub fn apply(&self, env: &mut EnvFile) {
        for (key, value) in &self.set {
            env.set(key, value);
        }
        for key in &self.disable {
            env.disable(key);
        }
    }

    #[must_use]
    pub fn apply_to_str(&self, content: &str) -> String {
        let mut env = EnvFile::parse(content);
        self.apply(&mut env);
        env.render()
    }
}

/// Path of the SQLite database inside a worktree
#[must_use]
pub fn database_path(worktree_path: &Path) -> PathBuf {
    worktree_path.join(DATABASE_DIR).join(DATABASE_FILE)
}

/// Prepares a worktree's `.env` and SQLite database.
///
/// Copies `.env.example` to `.env` when `.env` is missing, creates an empty
/// `database/database.sqlite` when missing, then patches `.env` (if one exists)
/// to point at that database and `app_url`.
///
/// # Errors
/// Returns an error if any filesystem operation fails
pub fn prepare_environment(worktree_path: &Path, app_url: &str) -> Result<()> {
    let env_path = worktree_path.join(ENV_FILE);
    let template_path = worktree_path.join(ENV_TEMPLATE);

    if !env_path.exists() && template_path.exists() {
        fs::copy(&template_path, &env_path)
            .with_context(|| format!("Failed to copy {} to {}", ENV_TEMPLATE, ENV_FILE))?;
    }

    let database = database_path(worktree_path);
    if let Some(dir) = database.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&database)
        .with_context(|| format!("Failed to create {}", database.display()))?;

    if env_path.exists() {
        let content = fs::read_to_string(&env_path)
            .with_context(|| format!("Failed to read {}", env_path.display()))?;
        let patched = EnvPatch::for_worktree(app_url, &database).apply_to_str(&content);
        fs::write(&env_path, patched)
            .with_context(|| format!("Failed to write {}", env_path.display()))?;
    }

    Ok(())
}
