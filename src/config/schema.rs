//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Server configuration for the HTTP UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

/// Token signing and role settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for session tokens
    #[serde(default = "default_secret")]
    pub secret: String,

    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Roles a new account may register with
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_secret() -> String {
    "mysecret".to_string()
}

fn default_token_ttl_secs() -> i64 {
    3600
}

fn default_cookie_name() -> String {
    "token".to_string()
}

fn default_roles() -> Vec<String> {
    vec![
        "student".to_string(),
        "teacher".to_string(),
        "admin".to_string(),
    ]
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            token_ttl_secs: default_token_ttl_secs(),
            cookie_name: default_cookie_name(),
            roles: default_roles(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl AuthConfig {
    pub fn is_known_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// User store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_users_file")]
    pub users_file: PathBuf,
}

fn default_users_file() -> PathBuf {
    PathBuf::from("./users.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            users_file: default_users_file(),
        }
    }
}

/// Schedule seeding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Random classes generated at startup
    #[serde(default = "default_sample_classes")]
    pub sample_classes: usize,
}

fn default_sample_classes() -> usize {
    100
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            sample_classes: default_sample_classes(),
        }
    }
}
