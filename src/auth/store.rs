//! JSON-file user store

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth::models::{Principal, RegisterRequest};
use crate::error::{Error, Result};

/// Check a plaintext password against a stored bcrypt hash.
///
/// A hash that bcrypt cannot parse never matches.
pub fn verify_password(plaintext: &str, hashed: &str) -> bool {
    match bcrypt::verify(plaintext, hashed) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Unreadable password hash: {}", e);
            false
        }
    }
}

/// Registered principals, persisted as a pretty-printed JSON array.
///
/// Every read-modify-write of the file is serialized through one lock.
pub struct UserStore {
    path: PathBuf,
    bcrypt_cost: u32,
    lock: Arc<Mutex<()>>,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>, bcrypt_cost: u32) -> Self {
        Self {
            path: path.into(),
            bcrypt_cost,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty store
    async fn read_users(&self) -> Result<Vec<Principal>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_users(&self, users: &[Principal]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(users)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    /// All registered principals
    pub async fn list(&self) -> Result<Vec<Principal>> {
        let _guard = self.lock.lock().await;
        self.read_users().await
    }

    /// Find a principal by login
    pub async fn lookup(&self, login: &str) -> Result<Option<Principal>> {
        let _guard = self.lock.lock().await;
        let users = self.read_users().await?;
        Ok(users.into_iter().find(|u| u.login == login))
    }

    /// Look up `login` and check `password`; `None` on unknown login or wrong password
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<Option<Principal>> {
        let Some(principal) = self.lookup(login).await? else {
            return Ok(None);
        };
        let hashed = principal.hashed_password.clone();
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hashed))
            .await
            .map_err(|e| Error::Other(format!("Password check failed: {}", e)))?;
        Ok(matches.then_some(principal))
    }

    /// Hash the password and append a new principal. Logins are unique.
    pub async fn register(&self, request: RegisterRequest) -> Result<Principal> {
        let password = request.password;
        let cost = self.bcrypt_cost;
        let hashed_password = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| Error::Other(format!("Password hashing failed: {}", e)))??;

        let _guard = self.lock.lock().await;
        let mut users = self.read_users().await?;
        if users.iter().any(|u| u.login == request.login) {
            return Err(Error::LoginExists(request.login));
        }

        let principal = Principal {
            name: request.name,
            group: request.group,
            login: request.login,
            role: request.role,
            hashed_password,
        };
        users.push(principal.clone());
        self.write_users(&users).await?;

        tracing::info!("Registered {} as {}", principal.login, principal.role);
        Ok(principal)
    }
}

impl Clone for UserStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            bcrypt_cost: self.bcrypt_cost,
            lock: Arc::clone(&self.lock),
        }
    }
}
