use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::record;

record! {
    /// An account as exposed to other records. The password hash never leaves storage.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct User {
        pub id: i64,
        pub email: String,
        pub username: String,
        pub full_name: Option<String>,
        pub role: String,
        pub is_active: bool,
        pub created_at: Option<NaiveDateTime>,
    }
}

/// An account to create. `password_hash` is a PHC string produced by the caller.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: String,
    pub is_active: bool,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .finish()
    }
}
