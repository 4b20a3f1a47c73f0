//! MindfulApp — wires configuration, the auth store and the backend client
//! together and builds the conversational flows on top of them.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::api::{AuthResponse, BackendClient, LoginRequest, RegisterRequest};
use crate::auth::{AuthStore, User};
use crate::chat::FreeChat;
use crate::checkin::{CheckInFlow, CheckInSubmitter};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::transcript::Transcript;

/// Details for a new account. The password stays wrapped until the request
/// body is built.
pub struct Registration {
    pub email: String,
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
}

/// One configured client: a restored session plus the HTTP backend.
pub struct MindfulApp {
    config: ClientConfig,
    auth: Arc<AuthStore>,
    backend: Arc<BackendClient>,
}

impl MindfulApp {
    /// Configure from `MINDFUL_*` environment variables and connect.
    pub async fn from_env() -> Result<Self> {
        Self::connect(ClientConfig::from_env()?).await
    }

    /// Restore any saved session and build the backend client.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let auth = Arc::new(AuthStore::new(config.credential_path.clone()));
        if auth.restore().await? {
            info!("Restored saved session");
        }
        let backend = Arc::new(BackendClient::new(&config, Arc::clone(&auth))?);
        Ok(Self {
            config,
            auth,
            backend,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    pub fn backend(&self) -> &Arc<BackendClient> {
        &self.backend
    }

    /// Sign in and persist the session.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.expose_secret().to_string(),
        };
        let resp = self.backend.login(&request).await?;
        self.sign_in(resp).await
    }

    /// Create an account and sign in with it.
    pub async fn register(&self, registration: Registration) -> Result<User> {
        let request = RegisterRequest {
            email: registration.email,
            password: registration.password.expose_secret().to_string(),
            first_name: registration.first_name,
            last_name: registration.last_name,
        };
        let resp = self.backend.register(&request).await?;
        self.sign_in(resp).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.auth.logout().await?;
        Ok(())
    }

    async fn sign_in(&self, resp: AuthResponse) -> Result<User> {
        let user = resp.user();
        self.auth
            .login(SecretString::from(resp.token), user.clone())
            .await?;
        Ok(user)
    }

    /// A fresh guided check-in writing into `transcript`.
    pub fn check_in(&self, transcript: Arc<Transcript>) -> CheckInFlow {
        let submitter = CheckInSubmitter::new(self.backend.clone(), self.config.submit_timeout);
        CheckInFlow::new(transcript, submitter)
    }

    /// A free-form chat writing into `transcript`.
    pub fn chat(&self, transcript: Arc<Transcript>) -> FreeChat {
        FreeChat::new(self.backend.clone(), transcript, self.config.submit_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkin::CheckInStep;
    use crate::error::Error;

    fn config(credential_path: Option<std::path::PathBuf>) -> ClientConfig {
        ClientConfig {
            credential_path,
            ..ClientConfig::default()
        }
    }

    #[tokio::test]
    async fn connect_without_saved_session_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let app = MindfulApp::connect(config(Some(dir.path().join("credentials.json"))))
            .await
            .unwrap();
        assert!(!app.auth().is_authenticated().await);
    }

    #[tokio::test]
    async fn connect_restores_saved_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(
            &path,
            r#"{"token": "tok-9", "user": {"id": 9, "email": "kim@example.com"}}"#,
        )
        .unwrap();

        let app = MindfulApp::connect(config(Some(path))).await.unwrap();
        assert!(app.auth().is_authenticated().await);
        assert_eq!(app.auth().user().await.unwrap().id, 9);

        app.logout().await.unwrap();
        assert!(!app.auth().is_authenticated().await);
    }

    #[tokio::test]
    async fn unreadable_credential_path_is_auth_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where a file is expected.
        let err = MindfulApp::connect(config(Some(dir.path().to_path_buf())))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[tokio::test]
    async fn flows_start_at_welcome() {
        let app = MindfulApp::connect(config(None)).await.unwrap();
        let flow = app.check_in(Transcript::new());
        assert_eq!(flow.step(), CheckInStep::Welcome);

        let chat = app.chat(Transcript::new());
        assert!(!chat.send_message("").await);
    }
}
