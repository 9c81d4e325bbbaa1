//! # Receipt Module
//!
//! Projects a confirmed draft into the confirmation view-model handed to the
//! account/session collaborator.
//!
//! ```text
//! EnrollmentDraft + Session[] + PricingSnapshot
//!          │
//!          ▼
//! ConfirmedEnrollment
//! ├── total_paid
//! ├── athletes: [(name, program label)]
//! └── subscription: programs, Active, next payment date, monthly amount
//! ```

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::draft::EnrollmentDraft;
use crate::money::Money;
use crate::pricing::{PricingConfig, PricingSnapshot};
use crate::types::Session;

/// Athlete line on the confirmation screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledAthlete {
    pub name: String,
    pub program: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SubscriptionStatus {
    Active,
}

/// Recurring billing summary for the new enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDescriptor {
    /// Program labels joined with ", ".
    pub programs: String,
    pub status: SubscriptionStatus,
    #[ts(as = "String")]
    pub next_payment_date: NaiveDate,
    pub monthly_amount: Money,
}

/// Confirmation view-model shown on the receipt step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedEnrollment {
    pub parent_name: String,
    pub email: String,
    pub total_paid: Money,
    pub pricing: PricingSnapshot,
    pub athletes: Vec<EnrolledAthlete>,
    pub subscription: SubscriptionDescriptor,
    pub is_new_account: bool,
    #[ts(as = "String")]
    pub submitted_on: NaiveDate,
}

impl ConfirmedEnrollment {
    /// Builds the confirmation from the final draft state.
    ///
    /// Athletes whose session is missing from the catalog keep their line
    /// with an empty program label rather than disappearing from the receipt.
    pub fn assemble(
        draft: &EnrollmentDraft,
        sessions: &[Session],
        pricing: &PricingSnapshot,
        config: &PricingConfig,
        submitted_on: NaiveDate,
        is_new_account: bool,
    ) -> Self {
        let athletes: Vec<EnrolledAthlete> = draft
            .athletes
            .iter()
            .map(|a| EnrolledAthlete {
                name: a.name.trim().to_string(),
                program: a
                    .selected_session(sessions)
                    .map(Session::program_label)
                    .unwrap_or_default(),
                session_id: a.selected_session_id.clone().unwrap_or_default(),
            })
            .collect();

        let programs = athletes
            .iter()
            .map(|a| a.program.as_str())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let next_payment_date = submitted_on
            .checked_add_days(Days::new(u64::from(config.billing_period_days)))
            .unwrap_or(submitted_on);

        ConfirmedEnrollment {
            parent_name: draft.parent_name.trim().to_string(),
            email: draft.email.trim().to_string(),
            total_paid: pricing.total_due,
            pricing: *pricing,
            athletes,
            subscription: SubscriptionDescriptor {
                programs,
                status: SubscriptionStatus::Active,
                next_payment_date,
                monthly_amount: pricing.monthly_total,
            },
            is_new_account,
            submitted_on,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::AthleteDraft;
    use crate::types::{Gender, SessionGender, SessionStatus};

    fn session(id: &str, sport: &str, level: &str, price_cents: i64) -> Session {
        Session {
            id: id.to_string(),
            sport: sport.to_string(),
            level: level.to_string(),
            gender: SessionGender::Female,
            min_age: 5,
            max_age: 18,
            price_cents,
            capacity: 20,
            registered_count: 3,
            status: SessionStatus::Open,
        }
    }

    fn athlete(name: &str, session_id: &str) -> AthleteDraft {
        AthleteDraft {
            name: name.to_string(),
            dob: NaiveDate::from_ymd_opt(2016, 1, 1),
            gender: Some(Gender::Female),
            selected_session_id: Some(session_id.to_string()),
            ..AthleteDraft::default()
        }
    }

    #[test]
    fn test_assemble_two_athletes() {
        let sessions = vec![
            session("s-1", "Soccer", "U10", 9000),
            session("s-2", "Swim", "Level 2", 12000),
        ];
        let draft = EnrollmentDraft {
            athletes: vec![athlete("Mia Doe", "s-1"), athlete("Ava Doe", "s-2")],
            parent_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            ..EnrollmentDraft::new()
        };
        let config = PricingConfig::default();
        let pricing = PricingSnapshot::compute(&draft.athletes, &sessions, &config);
        let submitted_on = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let confirmed = ConfirmedEnrollment::assemble(&draft, &sessions, &pricing, &config, submitted_on, true);

        assert_eq!(confirmed.total_paid.cents(), 18900 + 6000);
        assert_eq!(confirmed.athletes[0].program, "Soccer - U10");
        assert_eq!(confirmed.athletes[1].name, "Ava Doe");
        assert_eq!(confirmed.subscription.programs, "Soccer - U10, Swim - Level 2");
        assert_eq!(confirmed.subscription.status, SubscriptionStatus::Active);
        assert_eq!(
            confirmed.subscription.next_payment_date,
            NaiveDate::from_ymd_opt(2026, 11, 18).unwrap()
        );
        assert_eq!(confirmed.subscription.monthly_amount.cents(), 18900);
        assert!(confirmed.is_new_account);
    }

    #[test]
    fn test_missing_session_keeps_athlete_line() {
        let draft = EnrollmentDraft {
            athletes: vec![athlete("Mia Doe", "retired")],
            ..EnrollmentDraft::new()
        };
        let config = PricingConfig::default();
        let pricing = PricingSnapshot::compute(&draft.athletes, &[], &config);
        let confirmed = ConfirmedEnrollment::assemble(
            &draft,
            &[],
            &pricing,
            &config,
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            false,
        );
        assert_eq!(confirmed.athletes.len(), 1);
        assert_eq!(confirmed.athletes[0].program, "");
        assert_eq!(confirmed.subscription.programs, "");
        assert_eq!(
            confirmed.subscription.next_payment_date,
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
        );
    }
}
