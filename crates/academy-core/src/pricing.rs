//! # Pricing Module
//!
//! Derives the order totals from the athletes in a draft.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal          = Σ price(selected session)   (unselected → $0)     │
//! │  sibling discount  = subtotal × 10%   if headcount > 1, else $0        │
//! │  monthly total     = subtotal − sibling discount                       │
//! │  registration fees = headcount × registration fee                      │
//! │  total due         = monthly total + registration fees                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The snapshot is recomputed on every read and never cached, so it cannot
//! drift from the draft. The discount is keyed on headcount, not on how many
//! athletes have a priced session.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::draft::AthleteDraft;
use crate::money::Money;
use crate::types::Session;

/// One-time registration fee charged per athlete.
pub const DEFAULT_REGISTRATION_FEE: Money = Money::from_cents(3000);

/// Sibling discount in basis points (1000 = 10%).
pub const DEFAULT_SIBLING_DISCOUNT_BPS: u32 = 1000;

/// Days between the enrollment date and the next subscription charge.
pub const DEFAULT_BILLING_PERIOD_DAYS: u32 = 30;

/// The single source of pricing constants.
///
/// Injected into the pricing calculation and the receipt projection so the
/// two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    pub registration_fee: Money,
    pub sibling_discount_bps: u32,
    pub billing_period_days: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            registration_fee: DEFAULT_REGISTRATION_FEE,
            sibling_discount_bps: DEFAULT_SIBLING_DISCOUNT_BPS,
            billing_period_days: DEFAULT_BILLING_PERIOD_DAYS,
        }
    }
}

/// Derived order totals. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingSnapshot {
    pub athlete_count: usize,
    pub subtotal: Money,
    pub sibling_discount: Money,
    pub monthly_total: Money,
    pub registration_fees: Money,
    pub total_due: Money,
}

impl PricingSnapshot {
    /// Computes the totals for the given athletes against a catalog snapshot.
    ///
    /// ## Example
    /// ```rust
    /// use academy_core::draft::AthleteDraft;
    /// use academy_core::pricing::{PricingConfig, PricingSnapshot};
    ///
    /// // No sessions selected yet: only the registration fee is due.
    /// let athletes = vec![AthleteDraft::default()];
    /// let snapshot = PricingSnapshot::compute(&athletes, &[], &PricingConfig::default());
    /// assert_eq!(snapshot.subtotal.cents(), 0);
    /// assert_eq!(snapshot.total_due.cents(), 3000);
    /// ```
    pub fn compute(athletes: &[AthleteDraft], sessions: &[Session], config: &PricingConfig) -> Self {
        let athlete_count = athletes.len();

        let subtotal: Money = athletes
            .iter()
            .filter_map(|a| a.selected_session(sessions))
            .map(Session::price)
            .sum();

        let sibling_discount = if athlete_count > 1 {
            subtotal.percentage(config.sibling_discount_bps)
        } else {
            Money::zero()
        };

        let monthly_total = subtotal - sibling_discount;
        let registration_fees = config.registration_fee.times(athlete_count as i64);

        PricingSnapshot {
            athlete_count,
            subtotal,
            sibling_discount,
            monthly_total,
            registration_fees,
            total_due: monthly_total + registration_fees,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
