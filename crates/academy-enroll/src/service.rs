//! # Enrollment Service
//!
//! The external system that charges the card, creates the account and
//! registers athletes into sessions.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit(EnrollmentRequest)                                              │
//! │     │                                                                   │
//! │     ├── Ok(EnrollmentResponse { isNewAccount, ... })                    │
//! │     │      athletes are registered, card is charged                     │
//! │     │                                                                   │
//! │     └── Err(Rejected { message })   shown on the payment step           │
//! │         Err(Transport(..))          generic failure message             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service is the capacity authority: the portal never blocks a full
//! session itself, the service rejects the enrollment instead.

use academy_core::{EnrollmentRequest, EnrollmentResponse, Session, SessionStatus};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EnrollError, EnrollResult};

/// Submits a complete enrollment.
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    async fn submit(&self, request: &EnrollmentRequest) -> EnrollResult<EnrollmentResponse>;
}

// =============================================================================
// In-Memory Implementation
// =============================================================================

/// A scripted outcome consumed by the next submission.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Reject(String),
    TransportFailure(String),
}

#[derive(Debug, Default)]
struct ServiceState {
    sessions: HashMap<String, Session>,
    accounts: HashSet<String>,
    calls: Vec<EnrollmentRequest>,
    script: VecDeque<ScriptedOutcome>,
}

/// Enrollment service backed by process memory.
///
/// Used by the simulator and the tests. Tracks registrations per session,
/// remembers which parent emails already have an account, and can be
/// scripted to fail.
#[derive(Debug)]
pub struct InMemoryEnrollmentService {
    state: Mutex<ServiceState>,
    latency: Duration,
}

impl InMemoryEnrollmentService {
    pub fn new(catalog: &[Session]) -> Self {
        let sessions = catalog.iter().map(|s| (s.id.clone(), s.clone())).collect();
        InMemoryEnrollmentService {
            state: Mutex::new(ServiceState {
                sessions,
                ..ServiceState::default()
            }),
            latency: Duration::ZERO,
        }
    }

    /// Delays every response, so concurrent submissions overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Registers a parent email as an existing account.
    pub async fn add_existing_account(&self, email: &str) {
        self.state.lock().await.accounts.insert(email.to_lowercase());
    }

    /// Queues an outcome for the next submission.
    pub async fn script(&self, outcome: ScriptedOutcome) {
        self.state.lock().await.script.push_back(outcome);
    }

    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls.len()
    }

    /// Every request received so far, in order.
    pub async fn calls(&self) -> Vec<EnrollmentRequest> {
        self.state.lock().await.calls.clone()
    }

    pub async fn registered_count(&self, session_id: &str) -> Option<u32> {
        self.state
            .lock()
            .await
            .sessions
            .get(session_id)
            .map(|s| s.registered_count)
    }
}

#[async_trait]
impl EnrollmentService for InMemoryEnrollmentService {
    async fn submit(&self, request: &EnrollmentRequest) -> EnrollResult<EnrollmentResponse> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut state = self.state.lock().await;
        state.calls.push(request.clone());

        match state.script.pop_front() {
            Some(ScriptedOutcome::Reject(message)) => {
                debug!(%message, "Scripted rejection");
                return Err(EnrollError::Rejected { message });
            }
            Some(ScriptedOutcome::TransportFailure(reason)) => {
                return Err(EnrollError::Transport(reason));
            }
            None => {}
        }

        // Seats requested per session, checked before anything is committed.
        let mut requested: HashMap<&str, u32> = HashMap::new();
        for athlete in &request.athletes {
            *requested.entry(athlete.session_id.as_str()).or_default() += 1;
        }
        for (session_id, seats) in &requested {
            let session = state.sessions.get(*session_id).ok_or_else(|| EnrollError::Rejected {
                message: format!("Session {} is no longer offered", session_id),
            })?;
            if session.status != SessionStatus::Open || session.spots_remaining() < *seats {
                return Err(EnrollError::Rejected {
                    message: format!("{} is full", session.program_label()),
                });
            }
        }

        for (session_id, seats) in requested {
            if let Some(session) = state.sessions.get_mut(session_id) {
                session.registered_count += seats;
            }
        }

        let email = request.parent_info.email.to_lowercase();
        let is_new_account = state.accounts.insert(email);
        let confirmation = Uuid::new_v4().simple().to_string()[..8].to_uppercase();

        info!(
            athletes = request.athletes.len(),
            is_new_account,
            confirmation = %confirmation,
            "Enrollment accepted"
        );

        Ok(EnrollmentResponse {
            is_new_account,
            account_id: Some(Uuid::new_v4().to_string()),
            confirmation_number: Some(format!("ENR-{}", confirmation)),
        })
    }
}
