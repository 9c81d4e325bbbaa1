//! # Enrollment Draft
//!
//! The mutable form state owned by one wizard instance.
//!
//! ```text
//! EnrollmentDraft
//! ├── athletes: [AthleteDraft, ...]   (≥ 1, insertion order = display order)
//! ├── parent:   name, email, phone
//! ├── waiver:   agreed, signature
//! └── payment:  card number, expiry, cvc
//! ```
//!
//! Fields are only written through `Wizard` setters, which keep the
//! session-selection invariant: a selected session always admits the
//! athlete's current date of birth and gender.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{find_session, Gender, JerseySize, Session};

/// One athlete being enrolled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteDraft {
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub jersey_size: JerseySize,
    pub selected_session_id: Option<String>,
}

impl AthleteDraft {
    /// Resolves the selected session against a catalog snapshot.
    pub fn selected_session<'a>(&self, sessions: &'a [Session]) -> Option<&'a Session> {
        self.selected_session_id
            .as_deref()
            .and_then(|id| find_session(sessions, id))
    }
}

/// Complete form state for one enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDraft {
    pub athletes: Vec<AthleteDraft>,
    pub parent_name: String,
    pub email: String,
    pub phone: String,
    pub waiver_agreed: bool,
    pub waiver_signature: String,
    pub card_number: String,
    pub expiry: String,
    pub cvc: String,
}

impl EnrollmentDraft {
    /// Creates an empty draft with a single athlete placeholder.
    pub fn new() -> Self {
        EnrollmentDraft {
            athletes: vec![AthleteDraft::default()],
            parent_name: String::new(),
            email: String::new(),
            phone: String::new(),
            waiver_agreed: false,
            waiver_signature: String::new(),
            card_number: String::new(),
            expiry: String::new(),
            cvc: String::new(),
        }
    }

    pub fn athlete_count(&self) -> usize {
        self.athletes.len()
    }
}

impl Default for EnrollmentDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SessionGender, SessionStatus};

    #[test]
    fn test_new_draft_has_one_placeholder_athlete() {
        let draft = EnrollmentDraft::new();
        assert_eq!(draft.athlete_count(), 1);
        assert_eq!(draft.athletes[0], AthleteDraft::default());
        assert!(!draft.waiver_agreed);
    }

    #[test]
    fn test_selected_session_lookup() {
        let sessions = vec![Session {
            id: "s-1".to_string(),
            sport: "Volleyball".to_string(),
            level: "Intro".to_string(),
            gender: SessionGender::Female,
            min_age: 8,
            max_age: 12,
            price_cents: 9000,
            capacity: 10,
            registered_count: 0,
            status: SessionStatus::Open,
        }];

        let mut athlete = AthleteDraft::default();
        assert!(athlete.selected_session(&sessions).is_none());

        athlete.selected_session_id = Some("s-1".to_string());
        assert_eq!(athlete.selected_session(&sessions).map(|s| s.price_cents), Some(9000));

        athlete.selected_session_id = Some("gone".to_string());
        assert!(athlete.selected_session(&sessions).is_none());
    }
}
