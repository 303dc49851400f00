//! The authenticated caller.
//!
//! Authentication itself (tokens, sessions) happens outside this crate.
//! Whatever does it resolves a [`Caller`] and hands it to the API.

use crate::{error::PantryError, models::user::User};

/// A verified identity making a request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Caller {
    pub user_id: i64,
    pub email: String,
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Rejects requests that came without an identity.
pub fn require_caller(caller: Option<&Caller>) -> Result<&Caller, PantryError> {
    caller.ok_or_else(|| {
        tracing::debug!("rejecting unauthenticated request");
        PantryError::Unauthenticated
    })
}
