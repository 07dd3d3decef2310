//! User entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user record keyed by its external identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Caller-supplied stable identifier; unique across the table.
    pub uid: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with fresh timestamps.
    pub fn new(
        uid: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            uid: uid.into(),
            name: name.into(),
            email: email.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field values submitted to an upsert.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// External identifier; the upsert conflict key.
    pub uid: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl NewUser {
    /// Creates a new upsert input.
    pub fn new(
        uid: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}
