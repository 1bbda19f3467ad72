//! Authentication models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Seconds since the Unix epoch, as carried in a token's `exp` claim.
///
/// Issuers may write either an integer or a float; both are kept as written
/// so that a decoded claim set compares equal to the one that was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Seconds(i64),
    Fractional(f64),
}

impl Timestamp {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Timestamp::Seconds(secs) => secs as f64,
            Timestamp::Fractional(secs) => secs,
        }
    }

    /// `true` once `now` has reached this instant (the boundary itself counts as past).
    pub fn is_reached(&self, now: i64) -> bool {
        match *self {
            Timestamp::Seconds(secs) => secs <= now,
            Timestamp::Fractional(secs) => secs <= now as f64,
        }
    }
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        Timestamp::Seconds(secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Seconds(secs) => write!(f, "{}", secs),
            Timestamp::Fractional(secs) => write!(f, "{}", secs),
        }
    }
}

/// Token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the principal's login)
    pub sub: String,
    /// Role name, checked by the role gate
    pub role: String,
    /// Expiration time
    pub exp: Timestamp,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Study group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Any other descriptive fields, kept verbatim
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Claim names with a dedicated field; never stored in `extra`
pub const RESERVED_CLAIMS: &[&str] = &["sub", "role", "exp", "name", "group"];

impl Claims {
    pub fn new(sub: impl Into<String>, role: impl Into<String>, exp: i64) -> Self {
        Self {
            sub: sub.into(),
            role: role.into(),
            exp: Timestamp::Seconds(exp),
            name: None,
            group: None,
            extra: Map::new(),
        }
    }

    /// Create claims for a registered principal, valid until `exp`
    pub fn for_principal(principal: &Principal, exp: i64) -> Self {
        Self {
            name: Some(principal.name.clone()),
            group: Some(principal.group.clone()),
            ..Self::new(principal.login.clone(), principal.role.clone(), exp)
        }
    }

    /// Descriptive fields beyond the named ones
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Attach a descriptive field. Reserved names are refused and `false` is returned.
    pub fn insert_extra(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if RESERVED_CLAIMS.contains(&key.as_str()) {
            return false;
        }
        self.extra.insert(key, value.into());
        true
    }

    /// Check whether the claims have expired at `now`
    pub fn is_expired(&self, now: i64) -> bool {
        self.exp.is_reached(now)
    }
}

/// A registered account as kept in the user store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub name: String,
    pub group: String,
    pub login: String,
    pub role: String,
    pub hashed_password: String,
}

/// Registration form
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub group: String,
    pub login: String,
    pub password: String,
    pub role: String,
}

/// Login form
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Principal information safe to show in listings
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub login: String,
    pub name: String,
    pub group: String,
    pub role: String,
}

impl From<Principal> for UserInfo {
    fn from(principal: Principal) -> Self {
        Self {
            login: principal.login,
            name: principal.name,
            group: principal.group,
            role: principal.role,
        }
    }
}
