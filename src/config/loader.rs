//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "timetable.toml";

/// Load configuration from timetable.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load timetable.toml if one exists, otherwise fall back to defaults
pub fn load_config_or_default() -> Result<Config> {
    match load_config() {
        Err(Error::ConfigNotFound) => {
            tracing::warn!("No {} found, using default configuration", CONFIG_FILENAME);
            Ok(Config::default())
        }
        other => other,
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    parse_config(&content)
}

/// Parse configuration text after interpolating environment variables
pub fn parse_config(content: &str) -> Result<Config> {
    let content = interpolate_env_vars(content);
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.auth.secret.is_empty() {
        return Err(Error::Config("auth.secret must not be empty".to_string()));
    }
    if config.auth.token_ttl_secs <= 0 {
        return Err(Error::Config("auth.token_ttl_secs must be positive".to_string()));
    }
    let cookie_ok = !config.auth.cookie_name.is_empty()
        && config
            .auth
            .cookie_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !cookie_ok {
        return Err(Error::Config(format!(
            "auth.cookie_name '{}' is not a valid cookie name",
            config.auth.cookie_name
        )));
    }
    if !(4..=31).contains(&config.auth.bcrypt_cost) {
        return Err(Error::Config("auth.bcrypt_cost must be between 4 and 31".to_string()));
    }
    Ok(())
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Timetable Configuration

[server]
host = "0.0.0.0"
port = 8000
static_dir = "./static"

[auth]
# Rotating the secret signs everyone out
secret = "${TIMETABLE_SECRET:-mysecret}"
token_ttl_secs = 3600
cookie_name = "token"
roles = ["student", "teacher", "admin"]
bcrypt_cost = 12

[store]
users_file = "./users.json"

[schedule]
# Random classes generated at startup (0 to start empty)
sample_classes = 100
"#
}
