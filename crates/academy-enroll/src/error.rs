//! # Enrollment Error Types
//!
//! Error types for the orchestration layer.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Enrollment Error Categories                         │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Catalog      │  │   Enrollment Service    │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  CatalogLoad    │  │  Rejected               │ │
//! │  │  ConfigLoad     │  │  CatalogParse   │  │  Transport              │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Account      │  │    Wizard       │                              │
//! │  │                 │  │                 │                              │
//! │  │  SignInFailed   │  │  WizardError    │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use academy_core::WizardError;
use thiserror::Error;

/// Result type alias for enrollment operations.
pub type EnrollResult<T> = Result<T, EnrollError>;

/// Every failure the orchestration layer can report.
#[derive(Debug, Error)]
pub enum EnrollError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid portal configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoad(String),

    // =========================================================================
    // Catalog Errors
    // =========================================================================
    #[error("Failed to load session catalog: {0}")]
    CatalogLoad(String),

    #[error("Session catalog is malformed: {0}")]
    CatalogParse(String),

    // =========================================================================
    // Enrollment Service Errors
    // =========================================================================
    /// The service refused the enrollment. The message is shown to the user.
    #[error("{message}")]
    Rejected { message: String },

    /// The service could not be reached or answered garbage.
    #[error("Enrollment service unavailable: {0}")]
    Transport(String),

    // =========================================================================
    // Account Errors
    // =========================================================================
    #[error("Failed to sign in {email}: {reason}")]
    SignInFailed { email: String, reason: String },

    // =========================================================================
    // Wizard Errors
    // =========================================================================
    #[error(transparent)]
    Wizard(#[from] WizardError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for EnrollError {
    fn from(err: std::io::Error) -> Self {
        EnrollError::ConfigLoad(err.to_string())
    }
}

impl From<toml::de::Error> for EnrollError {
    fn from(err: toml::de::Error) -> Self {
        EnrollError::ConfigLoad(err.to_string())
    }
}

impl From<serde_json::Error> for EnrollError {
    fn from(err: serde_json::Error) -> Self {
        EnrollError::CatalogParse(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl EnrollError {
    /// Message to surface on the payment step after a failed submission.
    ///
    /// Service rejections carry their own message; anything else gets a
    /// generic one so transport details stay out of the UI.
    pub fn user_message(&self) -> String {
        match self {
            EnrollError::Rejected { message } => message.clone(),
            _ => "Payment failed. Please try again.".to_string(),
        }
    }

    /// Returns true if resubmitting the same request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EnrollError::Transport(_))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(self, EnrollError::InvalidConfig(_) | EnrollError::ConfigLoad(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let err = EnrollError::Rejected {
            message: "Session is full".into(),
        };
        assert_eq!(err.user_message(), "Session is full");
        assert_eq!(err.to_string(), "Session is full");

        let err = EnrollError::Transport("connection reset".into());
        assert_eq!(err.user_message(), "Payment failed. Please try again.");
    }

    #[test]
    fn test_error_categories() {
        assert!(EnrollError::Transport("timeout".into()).is_retryable());
        assert!(!EnrollError::Rejected { message: "no".into() }.is_retryable());
        assert!(EnrollError::InvalidConfig("bad".into()).is_config_error());
        assert!(!EnrollError::CatalogParse("bad".into()).is_config_error());
    }

    #[test]
    fn test_wizard_error_is_transparent() {
        let err: EnrollError = WizardError::LastAthlete.into();
        assert_eq!(err.to_string(), "Cannot remove the only athlete");
    }
}
