//! Session identity.
//!
//! One session per controller: the token is generated at construction and
//! attached to every remote call until the controller is dropped.

use chrono::Utc;

use formassist_types::session::{Session, SessionId};

/// Generates the session for a controller instance.
pub struct SessionIdentity;

impl SessionIdentity {
    /// Create a fresh session with a random opaque token.
    pub fn create() -> Session {
        Session {
            id: SessionId::generate(),
            created_at: Utc::now(),
        }
    }
}
