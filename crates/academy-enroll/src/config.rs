//! # Portal Configuration
//!
//! Pricing and display settings for the enrollment portal.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ACADEMY_REGISTRATION_FEE=3000                                      │
//! │     ACADEMY_SIBLING_DISCOUNT_PCT=10                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/academy-portal/academy.toml (Linux)                      │
//! │     ~/Library/Application Support/com.academy.portal/academy.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     $30.00 registration fee, 10% sibling discount, 30 day billing      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # academy.toml
//! [pricing]
//! registration_fee_cents = 3000
//! sibling_discount_bps = 1000   # 10%
//! billing_period_days = 30
//!
//! [display]
//! currency_symbol = "$"
//! ```

use academy_core::{Money, PricingConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{EnrollError, EnrollResult};

/// Upper bound for the sibling discount (100%).
const MAX_DISCOUNT_BPS: u32 = 10_000;

// =============================================================================
// Pricing Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// One-time fee per athlete, in cents.
    #[serde(default = "default_registration_fee")]
    pub registration_fee_cents: i64,

    /// Discount applied when more than one athlete enrolls (1000 = 10%).
    #[serde(default = "default_sibling_discount")]
    pub sibling_discount_bps: u32,

    /// Days from enrollment to the next subscription charge.
    #[serde(default = "default_billing_period")]
    pub billing_period_days: u32,
}

fn default_registration_fee() -> i64 {
    academy_core::pricing::DEFAULT_REGISTRATION_FEE.cents()
}

fn default_sibling_discount() -> u32 {
    academy_core::pricing::DEFAULT_SIBLING_DISCOUNT_BPS
}

fn default_billing_period() -> u32 {
    academy_core::pricing::DEFAULT_BILLING_PERIOD_DAYS
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            registration_fee_cents: default_registration_fee(),
            sibling_discount_bps: default_sibling_discount(),
            billing_period_days: default_billing_period(),
        }
    }
}

// =============================================================================
// Display Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Main Portal Configuration
// =============================================================================

/// Complete portal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl PortalConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (academy.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EnrollResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading portal config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load portal config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a config file without env overrides or validation.
    pub fn from_file(path: &Path) -> EnrollResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EnrollResult<()> {
        if self.pricing.registration_fee_cents < 0 {
            return Err(EnrollError::InvalidConfig(
                "registration_fee_cents must not be negative".into(),
            ));
        }

        if self.pricing.sibling_discount_bps > MAX_DISCOUNT_BPS {
            return Err(EnrollError::InvalidConfig(format!(
                "sibling_discount_bps must be at most {}, got {}",
                MAX_DISCOUNT_BPS, self.pricing.sibling_discount_bps
            )));
        }

        if self.pricing.billing_period_days == 0 {
            return Err(EnrollError::InvalidConfig(
                "billing_period_days must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// Unparseable values are ignored with a warning.
    fn apply_env_overrides(&mut self) {
        if let Ok(fee) = std::env::var("ACADEMY_REGISTRATION_FEE") {
            match fee.parse::<i64>() {
                Ok(cents) => {
                    debug!(cents, "Overriding registration fee from environment");
                    self.pricing.registration_fee_cents = cents;
                }
                Err(_) => warn!(value = %fee, "Ignoring invalid ACADEMY_REGISTRATION_FEE"),
            }
        }

        // Whole percent in the environment, basis points in the file.
        if let Ok(pct) = std::env::var("ACADEMY_SIBLING_DISCOUNT_PCT") {
            match pct.parse::<u32>() {
                Ok(p) => {
                    debug!(percent = p, "Overriding sibling discount from environment");
                    self.pricing.sibling_discount_bps = p.saturating_mul(100);
                }
                Err(_) => warn!(value = %pct, "Ignoring invalid ACADEMY_SIBLING_DISCOUNT_PCT"),
            }
        }

        if let Ok(days) = std::env::var("ACADEMY_BILLING_PERIOD_DAYS") {
            match days.parse::<u32>() {
                Ok(d) => self.pricing.billing_period_days = d,
                Err(_) => warn!(value = %days, "Ignoring invalid ACADEMY_BILLING_PERIOD_DAYS"),
            }
        }

        if let Ok(symbol) = std::env::var("ACADEMY_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "academy", "portal")
            .map(|dirs| dirs.config_dir().join("academy.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The pricing constants handed to the wizard and the receipt.
    pub fn pricing_config(&self) -> PricingConfig {
        PricingConfig {
            registration_fee: Money::from_cents(self.pricing.registration_fee_cents),
            sibling_discount_bps: self.pricing.sibling_discount_bps,
            billing_period_days: self.pricing.billing_period_days,
        }
    }

    /// Formats an amount with the configured symbol and two decimals.
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.display.currency_symbol,
            amount.dollars().abs(),
            amount.cents_part()
        )
    }
}
