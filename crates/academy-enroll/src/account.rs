//! # Account Sign-In
//!
//! After a confirmed enrollment the parent is signed into the portal with
//! the data from the receipt.

use academy_core::receipt::{EnrolledAthlete, SubscriptionDescriptor};
use academy_core::ConfirmedEnrollment;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{EnrollError, EnrollResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Parent,
}

/// The signed-in portal user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedInUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub athletes: Vec<EnrolledAthlete>,
    pub subscription: SubscriptionDescriptor,
    pub is_new_account: bool,
}

impl LoggedInUser {
    pub fn from_confirmation(confirmed: &ConfirmedEnrollment) -> Self {
        LoggedInUser {
            name: confirmed.parent_name.clone(),
            email: confirmed.email.clone(),
            role: Role::Parent,
            athletes: confirmed.athletes.clone(),
            subscription: confirmed.subscription.clone(),
            is_new_account: confirmed.is_new_account,
        }
    }
}

/// Establishes the portal session for a user.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn sign_in(&self, user: LoggedInUser) -> EnrollResult<()>;
}

// =============================================================================
// In-Memory Implementation
// =============================================================================

/// Holds the current user in memory.
#[derive(Debug, Default)]
pub struct InMemoryAccountDirectory {
    current: RwLock<Option<LoggedInUser>>,
    refuse_with: Option<String>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory that refuses every sign-in with the given reason.
    pub fn refusing(reason: impl Into<String>) -> Self {
        InMemoryAccountDirectory {
            current: RwLock::new(None),
            refuse_with: Some(reason.into()),
        }
    }

    pub async fn current_user(&self) -> Option<LoggedInUser> {
        self.current.read().await.clone()
    }

    pub async fn sign_out(&self) {
        *self.current.write().await = None;
    }
}

#[async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn sign_in(&self, user: LoggedInUser) -> EnrollResult<()> {
        if let Some(reason) = &self.refuse_with {
            return Err(EnrollError::SignInFailed {
                email: user.email,
                reason: reason.clone(),
            });
        }

        info!(email = %user.email, athletes = user.athletes.len(), "Parent signed in");
        *self.current.write().await = Some(user);
        Ok(())
    }
}
