//! # Enrollment Payload
//!
//! Wire shapes exchanged with the external enrollment service.
//!
//! ## Request
//! ```json
//! {
//!   "parentInfo":  { "email", "firstName", "lastName", "phone" },
//!   "athletes":    [{ "firstName", "lastName", "dateOfBirth", "gender",
//!                     "jerseySize", "sessionId" }],
//!   "paymentInfo": { "cardNumber", "expiry", "cvc" }
//! }
//! ```
//!
//! Names are split on the first space; a single-word name is used for both
//! first and last name.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::draft::{AthleteDraft, EnrollmentDraft};
use crate::error::{WizardError, WizardResult};
use crate::types::{Gender, JerseySize};
use crate::wizard::Step;

/// Splits a free-text name on its first space.
///
/// ## Example
/// ```rust
/// use academy_core::payload::split_name;
///
/// assert_eq!(split_name("Jane Doe"), ("Jane".to_string(), "Doe".to_string()));
/// assert_eq!(split_name("Mary Ann Lee"), ("Mary".to_string(), "Ann Lee".to_string()));
/// assert_eq!(split_name("Cher"), ("Cher".to_string(), "Cher".to_string()));
/// ```
pub fn split_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(' ') {
        Some((first, last)) => (first.to_string(), last.trim_start().to_string()),
        None => (name.to_string(), name.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentInfo {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteInfo {
    pub first_name: String,
    pub last_name: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date_of_birth: String,
    pub gender: Gender,
    pub jersey_size: JerseySize,
    pub session_id: String,
}

/// Card details forwarded opaquely to the enrollment service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    /// Digits only.
    pub card_number: String,
    pub expiry: String,
    pub cvc: String,
}

/// Card data never reaches logs in full.
impl fmt::Debug for PaymentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last4 = self
            .card_number
            .get(self.card_number.len().saturating_sub(4)..)
            .unwrap_or_default();
        f.debug_struct("PaymentInfo")
            .field("card_number", &format_args!("**** {}", last4))
            .field("expiry", &self.expiry)
            .field("cvc", &"***")
            .finish()
    }
}

/// Body of the enrollment submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub parent_info: ParentInfo,
    pub athletes: Vec<AthleteInfo>,
    pub payment_info: PaymentInfo,
}

impl EnrollmentRequest {
    /// Assembles the request from a draft that passed steps 1-4.
    ///
    /// Fails with `GateBlocked` on the athlete step if any athlete is
    /// missing a date of birth, gender or session.
    pub fn from_draft(draft: &EnrollmentDraft) -> WizardResult<Self> {
        let incomplete = draft
            .athletes
            .iter()
            .filter(|a| a.dob.is_none() || a.gender.is_none() || a.selected_session_id.is_none())
            .count();
        if incomplete > 0 {
            return Err(WizardError::GateBlocked {
                step: Step::AthleteInfo,
                failures: incomplete,
            });
        }

        let (first_name, last_name) = split_name(&draft.parent_name);

        Ok(EnrollmentRequest {
            parent_info: ParentInfo {
                email: draft.email.trim().to_string(),
                first_name,
                last_name,
                phone: draft.phone.clone(),
            },
            athletes: draft.athletes.iter().filter_map(athlete_info).collect(),
            payment_info: PaymentInfo {
                card_number: draft.card_number.chars().filter(char::is_ascii_digit).collect(),
                expiry: draft.expiry.clone(),
                cvc: draft.cvc.clone(),
            },
        })
    }
}

fn athlete_info(athlete: &AthleteDraft) -> Option<AthleteInfo> {
    let (first_name, last_name) = split_name(&athlete.name);
    Some(AthleteInfo {
        first_name,
        last_name,
        date_of_birth: athlete.dob?.format("%Y-%m-%d").to_string(),
        gender: athlete.gender?,
        jersey_size: athlete.jersey_size,
        session_id: athlete.selected_session_id.clone()?,
    })
}

/// Successful reply from the enrollment service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub is_new_account: bool,

    #[serde(default)]
    pub account_id: Option<String>,

    #[serde(default)]
    pub confirmation_number: Option<String>,
}

/// Rejection body carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRejection {
    pub message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
