//! Signed-in user and persisted credential models.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl User {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.username.as_deref())
            .unwrap_or(&self.email)
    }
}

/// On-disk shape of a persisted session.
#[derive(Serialize, Deserialize)]
pub(crate) struct StoredCredential {
    pub token: String,
    pub user: Option<User>,
}

impl StoredCredential {
    pub(crate) fn new(token: &SecretString, user: Option<&User>) -> Self {
        Self {
            token: token.expose_secret().to_string(),
            user: user.cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            email: "anya@example.com".into(),
            username: Some("anya".into()),
            first_name: Some("Anya".into()),
            last_name: None,
        }
    }

    #[test]
    fn display_name_prefers_first_name() {
        assert_eq!(user().display_name(), "Anya");

        let no_first = User {
            first_name: Some("  ".into()),
            ..user()
        };
        assert_eq!(no_first.display_name(), "anya");

        let bare = User {
            username: None,
            first_name: None,
            ..user()
        };
        assert_eq!(bare.display_name(), "anya@example.com");
    }

    #[test]
    fn user_uses_camel_case() {
        let json = serde_json::to_value(user()).unwrap();
        assert_eq!(json["firstName"], "Anya");
        assert!(json.get("lastName").is_none());
    }
}
