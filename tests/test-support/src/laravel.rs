use anyhow::{Context, Result};
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

/// `.env.example` of a fresh Laravel app using MySQL
pub const ENV_TEMPLATE: &str = "\
APP_NAME=Laravel
APP_ENV=local
APP_KEY=
APP_URL=http://localhost

DB_CONNECTION=mysql
DB_HOST=127.0.0.1
DB_PORT=3306
DB_DATABASE=laravel
DB_USERNAME=root
DB_PASSWORD=
";

/// Writes the files of a Laravel app that provisioning looks at
///
/// # Errors
/// Returns an error if any file cannot be written
pub fn create_laravel_skeleton(dir: &ChildPath) -> Result<()> {
    dir.child(".env.example").write_str(ENV_TEMPLATE)?;
    dir.child("composer.json")
        .write_str("{\n    \"name\": \"laravel/laravel\"\n}\n")?;
    dir.child("artisan").write_str("#!/usr/bin/env php\n<?php\n")?;
    dir.child("database").child(".gitignore").write_str("*.sqlite*\n")?;
    Ok(())
}

/// Value of the first active `KEY=` line in the `.env` file at `env_file`
///
/// # Errors
/// Returns an error if the file cannot be read
pub fn read_env_value(env_file: &ChildPath, key: &str) -> Result<Option<String>> {
    let contents = std::fs::read_to_string(env_file.path())
        .with_context(|| format!("Failed to read {}", env_file.path().display()))?;
    let prefix = format!("{}=", key);
    Ok(contents
        .lines()
        .find_map(|line| line.strip_prefix(&prefix))
        .map(ToString::to_string))
}
