//! # Submission Guard
//!
//! Runs the payment-step submission so that one enrollment produces at most
//! one call to the enrollment service, however many times submit is pressed.
//!
//! ## Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  lock wizard ──► begin_submission()                                     │
//! │                   ├── AlreadySubmitting ──► Ignored (no service call)   │
//! │                   ├── Invalid ────────────► Invalid (errors on fields)  │
//! │                   └── Ready(request)                                    │
//! │                          │ status = Submitting                          │
//! │  unlock wizard ◄─────────┘                                              │
//! │                                                                         │
//! │  service.submit(request).await                                          │
//! │                                                                         │
//! │  lock wizard ──► Ok  ──► complete_submission() ──► Confirmed (receipt)  │
//! │              └─► Err ──► fail_submission(msg) ──► Rejected (step 4)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lock is not held across the service call, so the UI can keep
//! reading the wizard (and see `is_processing()`) while the request is out.
//!
//! ## Cancellation
//! The service call and its settlement run on their own task. Dropping the
//! caller's future does not cancel the request: the wizard is still settled
//! to the receipt or back to payment when the response arrives, and the
//! caller simply never sees the outcome.

use academy_core::{ConfirmedEnrollment, EnrollmentRequest, EnrollmentResponse, SubmitAttempt, Wizard};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::{EnrollError, EnrollResult};
use crate::service::EnrollmentService;

/// How a submit press was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service accepted the enrollment; the wizard is on the receipt.
    Confirmed {
        enrollment: ConfirmedEnrollment,
        response: EnrollmentResponse,
    },

    /// The service refused or failed; the wizard stays on payment with
    /// this message.
    Rejected { message: String },

    /// Payment fields did not validate; nothing was sent.
    Invalid { failures: usize },

    /// Another submission was already in flight; nothing was sent.
    Ignored,
}

pub struct SubmissionGuard {
    service: Arc<dyn EnrollmentService>,
}

impl SubmissionGuard {
    pub fn new(service: Arc<dyn EnrollmentService>) -> Self {
        SubmissionGuard { service }
    }

    /// Submits the wizard's draft at most once.
    ///
    /// Errors are only returned for wizard misuse (wrong step, already
    /// complete). Service failures are settled into `Rejected`.
    pub async fn submit(&self, wizard: &Arc<Mutex<Wizard>>, submitted_on: NaiveDate) -> EnrollResult<SubmitOutcome> {
        let request = match wizard.lock().await.begin_submission()? {
            SubmitAttempt::AlreadySubmitting => {
                info!("Submission already in flight, ignoring duplicate");
                return Ok(SubmitOutcome::Ignored);
            }
            SubmitAttempt::Invalid { failures } => {
                return Ok(SubmitOutcome::Invalid { failures });
            }
            SubmitAttempt::Ready(request) => request,
        };

        info!(athletes = request.athletes.len(), "Submitting enrollment");
        let task = tokio::spawn(settle(
            self.service.clone(),
            wizard.clone(),
            request,
            submitted_on,
        ));

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                // The task died before settling; put the wizard back on payment.
                error!(error = %e, "Submission task failed");
                let message = EnrollError::Transport(e.to_string()).user_message();
                wizard.lock().await.fail_submission(message.clone())?;
                Ok(SubmitOutcome::Rejected { message })
            }
        }
    }
}

/// Sends the request and records the service's answer on the wizard.
async fn settle(
    service: Arc<dyn EnrollmentService>,
    wizard: Arc<Mutex<Wizard>>,
    request: EnrollmentRequest,
    submitted_on: NaiveDate,
) -> EnrollResult<SubmitOutcome> {
    let result = service.submit(&request).await;
    let mut wizard = wizard.lock().await;

    match result {
        Ok(response) => {
            let enrollment = wizard.complete_submission(&response, submitted_on)?.clone();
            info!(
                total_paid = %enrollment.total_paid,
                is_new_account = response.is_new_account,
                "Enrollment confirmed"
            );
            Ok(SubmitOutcome::Confirmed { enrollment, response })
        }
        Err(e) => {
            let message = e.user_message();
            warn!(error = %e, "Enrollment submission failed");
            wizard.fail_submission(message.clone())?;
            Ok(SubmitOutcome::Rejected { message })
        }
    }
}
