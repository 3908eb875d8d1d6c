//! Signed-in users and account management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::BackendService;
use crate::error::{CommerceError, ValidationError};
use crate::ids::UserId;

/// Text the user must type to confirm account deletion.
pub const DELETE_CONFIRMATION: &str = "DELETE";

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>, email: Option<&str>) -> Self {
        Self {
            id: id.into(),
            email: email.map(str::to_string),
        }
    }
}

/// A row of the back-office user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_admin: bool,
}

/// The signed-in user, or `NotAuthenticated`.
pub async fn require_user(backend: &dyn BackendService) -> Result<User, CommerceError> {
    backend
        .current_user()
        .await?
        .ok_or(CommerceError::NotAuthenticated)
}

/// Permanently delete the signed-in user's account.
///
/// `confirmation` must be exactly [`DELETE_CONFIRMATION`]. Clearing the
/// local session afterwards is the caller's job.
pub async fn delete_account(
    backend: &dyn BackendService,
    confirmation: &str,
) -> Result<(), CommerceError> {
    if confirmation != DELETE_CONFIRMATION {
        let mut err = ValidationError::new();
        err.invalid("confirmation", format!("must be {DELETE_CONFIRMATION}"));
        return Err(err.into());
    }

    let user = require_user(backend).await?;
    backend.delete_account().await?;
    tracing::info!(user_id = %user.id, "account deleted");
    Ok(())
}
