//! # Error Types
//!
//! Domain-specific error types for academy-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  academy-core errors (this file)                                       │
//! │  ├── ValidationError  - Field-level input failures (stored as data)    │
//! │  └── WizardError      - Rejected wizard operations                     │
//! │                                                                         │
//! │  academy-enroll errors (separate crate)                                │
//! │  └── EnrollError      - Config, catalog, service and account failures  │
//! │                                                                         │
//! │  Flow: ValidationError → ValidationState (never thrown)                │
//! │        WizardError → EnrollError → caller                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the field label in every validation message
//! 3. Errors are enum variants, never String
//! 4. Each validation variant has a stable machine code (`code()`)

use thiserror::Error;

use crate::wizard::Step;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation failures for a single field.
///
/// These never abort anything on their own; the wizard records them in its
/// `ValidationState` and gates forward navigation on them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short (trimmed characters or digits).
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// A date lies after today.
    #[error("{field} cannot be in the future")]
    FutureDate { field: String },

    /// Value does not have the expected shape (e.g. email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Progressive input has not been completed (e.g. phone).
    #[error("{field} is incomplete")]
    Incomplete { field: String },

    /// Value does not match a fixed pattern (e.g. `MM/YY`).
    #[error("{field} must be in {pattern} format")]
    Format { field: String, pattern: String },

    /// Month component outside 1-12.
    #[error("{field} has an invalid month")]
    InvalidMonth { field: String },

    /// Waiver signature differs from the parent's legal name.
    #[error("Signature must match the parent name exactly")]
    SignatureMismatch,
}

impl ValidationError {
    /// Stable machine-readable code for the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Required { .. } => "REQUIRED",
            ValidationError::TooShort { .. } => "TOO_SHORT",
            ValidationError::FutureDate { .. } => "FUTURE_DATE",
            ValidationError::InvalidFormat { .. } => "INVALID_FORMAT",
            ValidationError::Incomplete { .. } => "INCOMPLETE",
            ValidationError::Format { .. } => "FORMAT",
            ValidationError::InvalidMonth { .. } => "INVALID_MONTH",
            ValidationError::SignatureMismatch => "SIGNATURE_MISMATCH",
        }
    }
}

// =============================================================================
// Wizard Error
// =============================================================================

/// Operations the enrollment wizard refused to perform.
///
/// ## When These Occur
/// ```text
/// advance() on step 1 with an unselected session ──► GateBlocked
/// back() on step 1 or on the receipt ─────────────► NoBackTransition
/// set_card_number() while submitting ─────────────► SubmissionInFlight
/// remove_athlete() with one athlete left ─────────► LastAthlete
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// The current step's gate predicate does not hold.
    #[error("{step} is incomplete: {failures} field(s) need attention")]
    GateBlocked { step: Step, failures: usize },

    /// `advance()` is not the way out of this step.
    #[error("{step} has no forward transition")]
    NoForwardTransition { step: Step },

    /// `back()` is not available from this step.
    #[error("{step} has no back transition")]
    NoBackTransition { step: Step },

    /// Operation only allowed on a different step.
    #[error("{operation} is not allowed on {step}")]
    WrongStep { operation: &'static str, step: Step },

    /// The enrollment already reached the receipt.
    #[error("Enrollment is complete; start a new enrollment to make changes")]
    Completed,

    /// A submission is in flight; the draft is frozen.
    #[error("Enrollment submission is in progress")]
    SubmissionInFlight,

    /// No submission is in flight to settle.
    #[error("No enrollment submission is in progress")]
    NotSubmitting,

    #[error("Athlete {index} does not exist ({count} athlete(s) in draft)")]
    AthleteOutOfRange { index: usize, count: usize },

    /// The draft must always keep at least one athlete.
    #[error("Cannot remove the only athlete")]
    LastAthlete,

    #[error("Session not found: {0}")]
    UnknownSession(String),

    /// Session exists but its gender/age constraints exclude the athlete.
    #[error("Session {session_id} is not available for athlete {index}")]
    IneligibleSession { session_id: String, index: usize },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for field validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Convenience type alias for wizard operation results.
pub type WizardResult<T> = Result<T, WizardError>;

// =============================================================================
// Unit Tests
// =============================================================================
