use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account that can create, bid on and close auctions.
///
/// The id is assigned once at registration and is stable for the
/// account's lifetime; the email is the human-facing account key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque, unique account identifier.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Email address used as the account key.
    pub email: String,
}

impl User {
    /// Register a new user with a freshly assigned id.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
        }
    }
}
