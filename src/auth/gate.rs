//! Authentication and role gating
//!
//! A protected operation moves through three outcomes:
//! no/invalid/expired token is `Unauthenticated`, a valid token whose role
//! is not allowed is `Forbidden`, anything else proceeds with the caller's
//! claims. Read-only pages use [`AuthGate::authenticate`] instead and treat
//! every failure as [`Identity::Anonymous`].

use thiserror::Error;

use crate::auth::models::{Claims, Principal};
use crate::auth::token::{TokenCodec, TokenError};

/// Roles allowed to change the schedule
pub const SCHEDULE_EDITORS: &[&str] = &["teacher", "admin"];

/// Caller identity for personalization-only paths
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Authenticated(Claims),
    Anonymous,
}

impl Identity {
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Identity::Authenticated(claims) => Some(claims),
            Identity::Anonymous => None,
        }
    }

    pub fn into_claims(self) -> Option<Claims> {
        match self {
            Identity::Authenticated(claims) => Some(claims),
            Identity::Anonymous => None,
        }
    }
}

/// Outcome of a role check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

/// Why a presented token did not yield an identity. Diagnostic only: callers
/// must not reveal which one happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error(transparent)]
    Invalid(#[from] TokenError),

    #[error("token expired")]
    Expired,
}

/// Rejection of a gated operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    Unauthenticated,

    #[error("Access denied")]
    Forbidden,
}

/// Check `claims.role` against `allowed`. Signature and expiry are the
/// caller's concern; an empty `allowed` denies everyone.
pub fn authorize(claims: &Claims, allowed: &[&str]) -> Access {
    if allowed.iter().any(|role| *role == claims.role) {
        Access::Allowed
    } else {
        Access::Denied
    }
}

/// Token verification and issuance with a fixed key and token lifetime
#[derive(Debug, Clone)]
pub struct AuthGate {
    codec: TokenCodec,
    token_ttl_secs: i64,
}

impl AuthGate {
    pub fn new(codec: TokenCodec, token_ttl_secs: i64) -> Self {
        Self {
            codec,
            token_ttl_secs,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Sign a token for `principal`, expiring `token_ttl_secs` after `now`
    pub fn issue(&self, principal: &Principal, now: i64) -> String {
        let claims = Claims::for_principal(principal, now.saturating_add(self.token_ttl_secs));
        self.codec.encode(&claims)
    }

    /// Decode `token` and reject it if expired at `now`
    pub fn verify(&self, token: &str, now: i64) -> Result<Claims, Rejection> {
        let claims = self.codec.decode(token)?;
        if claims.is_expired(now) {
            return Err(Rejection::Expired);
        }
        Ok(claims)
    }

    /// Resolve the caller. Missing, invalid and expired tokens are all anonymous.
    pub fn authenticate(&self, token: Option<&str>, now: i64) -> Identity {
        let Some(token) = token else {
            return Identity::Anonymous;
        };

        match self.verify(token, now) {
            Ok(claims) => Identity::Authenticated(claims),
            Err(rejection) => {
                tracing::debug!("Ignoring presented token: {}", rejection);
                Identity::Anonymous
            }
        }
    }

    /// Authenticate then authorize for a gated operation
    pub fn require(
        &self,
        token: Option<&str>,
        now: i64,
        allowed: &[&str],
    ) -> Result<Claims, AuthError> {
        let claims = self
            .authenticate(token, now)
            .into_claims()
            .ok_or(AuthError::Unauthenticated)?;

        match authorize(&claims, allowed) {
            Access::Allowed => Ok(claims),
            Access::Denied => {
                tracing::warn!(
                    "Denied {} with role '{}' (allowed: {})",
                    claims.sub,
                    claims.role,
                    allowed.join(", ")
                );
                Err(AuthError::Forbidden)
            }
        }
    }
}
