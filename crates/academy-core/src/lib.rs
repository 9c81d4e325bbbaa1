//! # academy-core: Pure Enrollment Logic for the Academy Portal
//!
//! Everything the enrollment wizard decides lives here as pure, synchronous
//! code: field validation, session eligibility, pricing, the step machine,
//! the submission payload and the receipt projection.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Academy Portal Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Portal UI (out of scope)                     │   │
//! │  │   Athletes ──► Parent ──► Waiver ──► Payment ──► Receipt        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 academy-enroll (orchestration)                  │   │
//! │  │   config, submission guard, enrollment service, account login   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ academy-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   validation   eligibility   pricing   wizard   payload/receipt │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Catalog and athlete value types
//! - [`error`] - Validation and wizard error types
//! - [`validation`] - Field validators and input formatters
//! - [`eligibility`] - Age/gender session filtering
//! - [`draft`] - The mutable form state
//! - [`pricing`] - Subtotal, sibling discount, fees and total
//! - [`wizard`] - The five-step enrollment state machine
//! - [`payload`] - Enrollment request/response wire shapes
//! - [`receipt`] - Confirmation view-model
//!
//! ## Example Usage
//!
//! ```rust
//! use academy_core::money::Money;
//!
//! let tuition = Money::from_cents(21000);
//! let discount = tuition.percentage(1000); // 10%
//!
//! assert_eq!(discount.cents(), 2100);
//! assert_eq!((tuition - discount).to_string(), "$189.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod eligibility;
pub mod error;
pub mod money;
pub mod payload;
pub mod pricing;
pub mod receipt;
pub mod types;
pub mod validation;
pub mod wizard;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{AthleteDraft, EnrollmentDraft};
pub use error::{ValidationError, ValidationResult, WizardError, WizardResult};
pub use money::Money;
pub use payload::{EnrollmentRejection, EnrollmentRequest, EnrollmentResponse};
pub use pricing::{PricingConfig, PricingSnapshot};
pub use receipt::ConfirmedEnrollment;
pub use types::*;
pub use wizard::{FieldKey, Step, SubmissionStatus, SubmitAttempt, Wizard};
