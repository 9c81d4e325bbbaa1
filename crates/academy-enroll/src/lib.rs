//! # academy-enroll: Enrollment Orchestration
//!
//! Connects the pure wizard in `academy-core` to configuration, the session
//! catalog, the enrollment service and the portal account.
//!
//! ## Module Organization
//! ```text
//! academy_enroll/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── config.rs       ◄─── PortalConfig (TOML + env)
//! ├── catalog.rs      ◄─── Session catalog loading
//! ├── session.rs      ◄─── EnrollmentSession (wizard + collaborators)
//! ├── guard.rs        ◄─── At-most-once submission protocol
//! ├── service.rs      ◄─── EnrollmentService trait + in-memory service
//! ├── account.rs      ◄─── Parent sign-in after the receipt
//! ├── context.rs      ◄─── Shared dashboard selection
//! ├── logging.rs      ◄─── tracing subscriber setup
//! └── error.rs        ◄─── EnrollError
//! ```

pub mod account;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod logging;
pub mod service;
pub mod session;

pub use account::{AccountDirectory, InMemoryAccountDirectory, LoggedInUser, Role};
pub use config::PortalConfig;
pub use context::PortalContext;
pub use error::{EnrollError, EnrollResult};
pub use guard::{SubmissionGuard, SubmitOutcome};
pub use service::{EnrollmentService, InMemoryEnrollmentService, ScriptedOutcome};
pub use session::EnrollmentSession;
