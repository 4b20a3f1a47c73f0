//! AuthStore — explicitly constructed holder of the signed-in session.
//!
//! Lifecycle: `new` → `restore` (load persisted credential, if any) →
//! `login` / `logout`. The store is passed around as `Arc<AuthStore>` to
//! whatever needs the token; nothing reads credentials ambiently.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::AuthError;

use super::model::{StoredCredential, User};

#[derive(Debug)]
struct Session {
    token: SecretString,
    user: Option<User>,
}

/// Holds the current session and mirrors it to an optional credential file.
pub struct AuthStore {
    credential_path: Option<PathBuf>,
    session: RwLock<Option<Session>>,
}

impl AuthStore {
    /// Create a signed-out store. Pass `None` to keep the session in memory only.
    pub fn new(credential_path: Option<PathBuf>) -> Self {
        Self {
            credential_path,
            session: RwLock::new(None),
        }
    }

    /// Load the persisted credential, if one exists. Returns whether a
    /// session was restored.
    ///
    /// A malformed file is logged and treated as signed out.
    pub async fn restore(&self) -> Result<bool, AuthError> {
        let Some(path) = self.credential_path.as_deref() else {
            return Ok(false);
        };

        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No persisted credential");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let stored: StoredCredential = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring malformed credential file");
                return Ok(false);
            }
        };

        if stored.token.trim().is_empty() {
            warn!(path = %path.display(), "Ignoring credential file with empty token");
            return Ok(false);
        }

        *self.session.write().await = Some(Session {
            token: SecretString::from(stored.token),
            user: stored.user,
        });
        info!(path = %path.display(), "Restored persisted session");
        Ok(true)
    }

    /// Store a fresh session and persist it.
    pub async fn login(&self, token: SecretString, user: User) -> Result<(), AuthError> {
        let user_id = user.id;
        {
            let mut session = self.session.write().await;
            *session = Some(Session {
                token,
                user: Some(user),
            });
        }
        self.persist().await?;
        info!(user_id, "Signed in");
        Ok(())
    }

    /// Clear the session and delete the persisted credential.
    pub async fn logout(&self) -> Result<(), AuthError> {
        *self.session.write().await = None;

        if let Some(path) = self.credential_path.as_deref() {
            match fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        info!("Signed out");
        Ok(())
    }

    /// Replace the cached user details, keeping the token.
    pub async fn set_user(&self, user: User) -> Result<(), AuthError> {
        {
            let mut session = self.session.write().await;
            match session.as_mut() {
                Some(session) => session.user = Some(user),
                None => {
                    debug!("set_user called while signed out; ignoring");
                    return Ok(());
                }
            }
        }
        self.persist().await
    }

    /// The bearer token, if signed in.
    pub async fn token(&self) -> Option<SecretString> {
        self.session.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn user(&self) -> Option<User> {
        self.session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    async fn persist(&self) -> Result<(), AuthError> {
        let Some(path) = self.credential_path.as_deref() else {
            return Ok(());
        };

        let body = {
            let session = self.session.read().await;
            let Some(session) = session.as_ref() else {
                return Ok(());
            };
            let stored = StoredCredential::new(&session.token, session.user.as_ref());
            serde_json::to_string_pretty(&stored).map_err(|e| persist_error(path, e))?
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| persist_error(path, e))?;
        }
        fs::write(path, body)
            .await
            .map_err(|e| persist_error(path, e))?;
        debug!(path = %path.display(), "Credential persisted");
        Ok(())
    }
}

fn persist_error(path: &Path, e: impl std::fmt::Display) -> AuthError {
    AuthError::Persist {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn user() -> User {
        User {
            id: 1,
            email: "sam@example.com".into(),
            username: None,
            first_name: Some("Sam".into()),
            last_name: Some("Lee".into()),
        }
    }

    #[tokio::test]
    async fn new_store_is_signed_out() {
        let store = AuthStore::new(None);
        assert!(!store.is_authenticated().await);
        assert!(store.token().await.is_none());
        assert!(!store.restore().await.unwrap());
    }

    #[tokio::test]
    async fn login_persists_and_restore_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/credentials.json");

        let store = AuthStore::new(Some(path.clone()));
        store
            .login(SecretString::from("tok-123"), user())
            .await
            .unwrap();
        assert!(path.exists());

        let fresh = AuthStore::new(Some(path));
        assert!(fresh.restore().await.unwrap());
        assert_eq!(fresh.token().await.unwrap().expose_secret(), "tok-123");
        assert_eq!(fresh.user().await.unwrap().email, "sam@example.com");
    }

    #[tokio::test]
    async fn logout_clears_memory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let store = AuthStore::new(Some(path.clone()));
        store.login(SecretString::from("tok"), user()).await.unwrap();
        store.logout().await.unwrap();

        assert!(!store.is_authenticated().await);
        assert!(!path.exists());
        // Logging out twice is fine.
        store.logout().await.unwrap();
    }

    #[tokio::test]
    async fn malformed_file_is_treated_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = AuthStore::new(Some(path));
        assert!(!store.restore().await.unwrap());
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn set_user_keeps_token() {
        let store = AuthStore::new(None);
        store.login(SecretString::from("tok"), user()).await.unwrap();

        let renamed = User {
            first_name: Some("Samantha".into()),
            ..user()
        };
        store.set_user(renamed).await.unwrap();

        assert_eq!(store.user().await.unwrap().display_name(), "Samantha");
        assert_eq!(store.token().await.unwrap().expose_secret(), "tok");
    }

    #[tokio::test]
    async fn debug_output_hides_token() {
        let store = AuthStore::new(None);
        store
            .login(SecretString::from("super-secret"), user())
            .await
            .unwrap();
        let session = store.session.read().await;
        assert!(!format!("{session:?}").contains("super-secret"));
    }
}
