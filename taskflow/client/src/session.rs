//! The signed-in user as reported by the embedded authentication widget.
//!
//! The widget itself stays external; the application only consumes the
//! [`AuthResult`] it produces and asks it to sign out.

use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

fn first_char_upper(value: &str) -> Option<String> {
    value.chars().next().map(|c| c.to_uppercase().collect())
}

impl User {
    /// Two-letter initials from the name, else the first letter of the
    /// e-mail address, else `?`.
    pub fn initials(&self) -> String {
        if let (Some(first), Some(last)) = (&self.first_name, &self.last_name) {
            if let (Some(f), Some(l)) = (first_char_upper(first), first_char_upper(last)) {
                return format!("{}{}", f, l);
            }
        }
        self.email_address
            .as_deref()
            .and_then(first_char_upper)
            .unwrap_or_else(|| "?".to_string())
    }

    /// First name, else the local part of the e-mail address, else `User`.
    pub fn display_name(&self) -> String {
        if let Some(first) = self.first_name.as_deref().filter(|s| !s.is_empty()) {
            return first.to_string();
        }
        self.email_address
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
            .unwrap_or("User")
            .to_string()
    }
}

/// Outcome reported by the authentication widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Authenticated(User),
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl Session {
    /// Applies a widget result. A failure leaves the session signed out.
    pub fn apply(&mut self, result: AuthResult) {
        *self = match result {
            AuthResult::Authenticated(user) => Session::Authenticated(user),
            AuthResult::Failed(_) => Session::Anonymous,
        };
    }

    pub fn sign_out(&mut self) {
        *self = Session::Anonymous;
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Anonymous => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication client is not initialized")]
    NotInitialized,
    #[error("Sign out failed: {0}")]
    SignOut(String),
}

/// Trait for the operations the application asks of the auth widget.
#[automock]
pub trait AuthProvider {
    async fn logout(&self) -> Result<(), AuthError>;
}
