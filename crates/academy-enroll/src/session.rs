//! # Enrollment Session
//!
//! One parent's pass through the wizard, wired to the collaborators.
//!
//! ## Thread Safety
//! The wizard is an `Arc<tokio::sync::Mutex<_>>`: the submission guard
//! releases it while the service call is awaited, and the task settling
//! that call holds its own handle so UI handlers may read it concurrently.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UI handler ──► with_wizard_mut(|w| w.set_email(..)) ──► Wizard         │
//! │                                                                         │
//! │  Submit ──────► submit() ──► SubmissionGuard ──► EnrollmentService      │
//! │                                   │                                     │
//! │                                   └─ Confirmed ──► AccountDirectory     │
//! │                                                    sign_in(parent)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use academy_core::{PricingSnapshot, Session, Wizard};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::account::{AccountDirectory, LoggedInUser};
use crate::config::PortalConfig;
use crate::context::PortalContext;
use crate::error::EnrollResult;
use crate::guard::{SubmissionGuard, SubmitOutcome};
use crate::service::EnrollmentService;

pub struct EnrollmentSession {
    wizard: Arc<Mutex<Wizard>>,
    guard: SubmissionGuard,
    accounts: Arc<dyn AccountDirectory>,
    context: PortalContext,
    config: PortalConfig,
}

impl EnrollmentSession {
    /// Starts a fresh enrollment dated `today`.
    pub fn new(
        catalog: Arc<[Session]>,
        config: PortalConfig,
        today: NaiveDate,
        service: Arc<dyn EnrollmentService>,
        accounts: Arc<dyn AccountDirectory>,
    ) -> Self {
        info!(sessions = catalog.len(), %today, "Starting enrollment session");
        EnrollmentSession {
            wizard: Arc::new(Mutex::new(Wizard::new(catalog, config.pricing_config(), today))),
            guard: SubmissionGuard::new(service),
            accounts,
            context: PortalContext::new(),
            config,
        }
    }

    /// Runs a function with read access to the wizard.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let step = session.with_wizard(|w| w.step()).await;
    /// ```
    pub async fn with_wizard<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Wizard) -> R,
    {
        let wizard = self.wizard.lock().await;
        f(&wizard)
    }

    /// Runs a function with write access to the wizard.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// session.with_wizard_mut(|w| w.set_email("jane@x.com")).await?;
    /// ```
    pub async fn with_wizard_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Wizard) -> R,
    {
        let mut wizard = self.wizard.lock().await;
        f(&mut wizard)
    }

    pub async fn pricing(&self) -> PricingSnapshot {
        self.with_wizard(Wizard::pricing).await
    }

    pub fn context(&self) -> &PortalContext {
        &self.context
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Submits the enrollment and, once confirmed, signs the parent in.
    ///
    /// A failed sign-in is logged but does not undo the enrollment; the
    /// receipt is still returned.
    pub async fn submit(&self) -> EnrollResult<SubmitOutcome> {
        let submitted_on = self.with_wizard(Wizard::today).await;
        let outcome = self.guard.submit(&self.wizard, submitted_on).await?;

        if let SubmitOutcome::Confirmed { enrollment, .. } = &outcome {
            let user = LoggedInUser::from_confirmation(enrollment);
            if let Err(e) = self.accounts.sign_in(user).await {
                warn!(error = %e, "Enrollment confirmed but sign-in failed");
            }
        }

        Ok(outcome)
    }
}
