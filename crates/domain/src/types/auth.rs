//! Account and login payloads

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ResourceId;

/// Username/password pair for `jwt/create`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Access/refresh pair returned by login and demo login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: ResourceId,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Response of `register/`: the new account plus a ready-to-use token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub user: UserAccount,
    pub access: String,
    pub refresh: String,
}

impl Registration {
    pub fn tokens(&self) -> AuthTokens {
        AuthTokens { access: self.access.clone(), refresh: self.refresh.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_password() {
        let creds = Credentials { username: "ann".into(), password: "hunter2".into() };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("ann"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn registration_exposes_token_pair() {
        let reg: Registration = serde_json::from_str(
            r#"{"user":{"id":7,"username":"ann","email":"a@b.c"},"access":"A","refresh":"R"}"#,
        )
        .unwrap();
        assert_eq!(reg.user.id, 7);
        assert_eq!(reg.tokens(), AuthTokens { access: "A".into(), refresh: "R".into() });
    }
}
