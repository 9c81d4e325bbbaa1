//! # Domain Types
//!
//! Catalog and athlete value types shared by every module.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Session      │   │     Gender      │   │  SessionGender  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  Male           │   │  Male           │       │
//! │  │  sport, level   │   │  Female         │   │  Female         │       │
//! │  │  min/max age    │   └─────────────────┘   │  Coed           │       │
//! │  │  price          │                         └─────────────────┘       │
//! │  │  capacity       │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  └─────────────────┘   │   JerseySize    │   │  BillingStatus  │       │
//! │                        │  YS … AL        │   │  Paid / Failed  │       │
//! │                        └─────────────────┘   │  Refunded / …   │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session catalog is supplied externally and is read-only here.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Gender
// =============================================================================

/// Declared gender of an athlete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

/// Gender restriction carried by a training session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SessionGender {
    Male,
    Female,
    Coed,
}

impl SessionGender {
    /// Strict equality against an athlete's gender.
    ///
    /// Athletes are only ever `Male` or `Female`, so a `Coed` session never
    /// matches here.
    pub fn matches(self, gender: Gender) -> bool {
        matches!(
            (self, gender),
            (SessionGender::Male, Gender::Male) | (SessionGender::Female, Gender::Female)
        )
    }
}

// =============================================================================
// Session
// =============================================================================

/// Enrollment status of a session as reported by the catalog.
///
/// Informational only: eligibility never filters on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Open,
    Full,
    Closed,
}

/// Decimal `price` on the wire, whole cents in memory.
mod decimal_price {
    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use crate::money::Money;

    pub fn serialize<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&Money::from_cents(*cents).to_decimal(), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::from_decimal(amount)
            .map(|m| m.cents())
            .ok_or_else(|| de::Error::custom(format!("price {} is not a whole number of cents", amount)))
    }
}

/// A training session offered by the academy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Catalog identifier, referenced by `AthleteDraft::selected_session_id`.
    pub id: String,

    /// Sport name, e.g. "Soccer".
    pub sport: String,

    /// Program level, e.g. "U10 Development".
    pub level: String,

    pub gender: SessionGender,

    /// Youngest admitted age in whole years (inclusive).
    pub min_age: u32,

    /// Oldest admitted age in whole years (inclusive).
    pub max_age: u32,

    /// Monthly price in cents. Carried on the wire as `price` in decimal
    /// currency (`90.00` or `"90.00"`).
    #[serde(rename = "price", with = "decimal_price")]
    #[ts(type = "string")]
    pub price_cents: i64,

    pub capacity: u32,

    pub registered_count: u32,

    #[serde(default)]
    pub status: SessionStatus,
}

impl Session {
    /// Returns the monthly price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether an age falls inside `[min_age, max_age]`.
    pub fn admits_age(&self, age: i32) -> bool {
        age >= self.min_age as i32 && age <= self.max_age as i32
    }

    /// Label shown on receipts and subscription descriptors.
    pub fn program_label(&self) -> String {
        format!("{} - {}", self.sport, self.level)
    }

    /// Seats left before the session reaches capacity.
    pub fn spots_remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.registered_count)
    }
}

/// Finds a session by id in a catalog snapshot.
pub fn find_session<'a>(sessions: &'a [Session], id: &str) -> Option<&'a Session> {
    sessions.iter().find(|s| s.id == id)
}

// =============================================================================
// Jersey Size
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum JerseySize {
    #[serde(rename = "YS")]
    YouthSmall,
    #[default]
    #[serde(rename = "YM")]
    YouthMedium,
    #[serde(rename = "YL")]
    YouthLarge,
    #[serde(rename = "AS")]
    AdultSmall,
    #[serde(rename = "AM")]
    AdultMedium,
    #[serde(rename = "AL")]
    AdultLarge,
}

impl JerseySize {
    /// Short code sent to the enrollment service.
    pub fn code(&self) -> &'static str {
        match self {
            JerseySize::YouthSmall => "YS",
            JerseySize::YouthMedium => "YM",
            JerseySize::YouthLarge => "YL",
            JerseySize::AdultSmall => "AS",
            JerseySize::AdultMedium => "AM",
            JerseySize::AdultLarge => "AL",
        }
    }
}

// =============================================================================
// Billing Status
// =============================================================================

/// Display status of a transaction or invoice on the billing screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum BillingStatus {
    Paid,
    Failed,
    Refunded,
    Pending,
}

impl BillingStatus {
    /// Maps a backend status code onto its display status.
    ///
    /// Anything not recognised is still in flight from the user's point of
    /// view and shows as `Pending`.
    ///
    /// ## Example
    /// ```rust
    /// use academy_core::BillingStatus;
    ///
    /// assert_eq!(BillingStatus::from_backend_code("succeeded"), BillingStatus::Paid);
    /// assert_eq!(BillingStatus::from_backend_code("processing"), BillingStatus::Pending);
    /// ```
    pub fn from_backend_code(code: &str) -> Self {
        match code {
            "succeeded" => BillingStatus::Paid,
            "failed" => BillingStatus::Failed,
            "refunded" => BillingStatus::Refunded,
            _ => BillingStatus::Pending,
        }
    }
}

impl fmt::Display for BillingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingStatus::Paid => write!(f, "Paid"),
            BillingStatus::Failed => write!(f, "Failed"),
            BillingStatus::Refunded => write!(f, "Refunded"),
            BillingStatus::Pending => write!(f, "Pending"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
