//! User read model consumed by the token issuer and login flow.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered HR system user with its assigned roles
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login name, unique case-insensitively
    pub user_name: String,

    /// Email address, unique case-insensitively
    pub email: String,

    /// Name shown in the UI and carried in the `name` claim
    pub display_name: String,

    /// Password hash as produced by the configured hasher
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role names, e.g. "Admin", "Employee"
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    /// Creates a new user without roles
    pub fn new(
        user_name: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name: user_name.into(),
            email: email.into(),
            display_name: display_name.into(),
            password_hash: password_hash.into(),
            roles: Vec::new(),
        }
    }

    /// Adds roles to the user
    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Whether `login` names this user by email or user name, ignoring case
    pub fn matches_login(&self, login: &str) -> bool {
        self.has_email(login) || self.has_user_name(login)
    }

    pub fn has_email(&self, login: &str) -> bool {
        self.email.eq_ignore_ascii_case(login.trim())
    }

    pub fn has_user_name(&self, login: &str) -> bool {
        self.user_name.eq_ignore_ascii_case(login.trim())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

// Keeps the password hash out of logs
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}
