use serde::Deserialize;
use serde::Serialize;

/// Authenticated principal as carried inside a token.
///
/// A point-in-time snapshot: the credential store stays authoritative, and
/// the snapshot is not refreshed until a new token is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: String,
    pub username: String,
    pub email: String,
}

impl Identity {
    pub fn new(
        subject_id: impl ToString,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            username: username.into(),
            email: email.into(),
        }
    }
}

/// Request-scoped attachment of a verified identity.
///
/// Only produced by [`authorize`](crate::bearer::authorize) after the token
/// has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    identity: Identity,
}

impl AuthContext {
    pub(crate) fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn subject_id(&self) -> &str {
        &self.identity.subject_id
    }

    pub fn into_identity(self) -> Identity {
        self.identity
    }
}
