//! Configuration management for the booking service.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::cancellation::CancellationPolicy;
use crate::error::ConfigError;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cancellation and refund tiers
    pub cancellation: CancellationConfig,
    /// Checkout limits
    pub checkout: CheckoutConfig,
    /// Log filter (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Refund tier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationConfig {
    /// No cancellations this close to showtime, in minutes
    pub cutoff_minutes: i64,
    /// Partial refund applies from this many hours before showtime
    pub partial_refund_from_hours: i64,
    /// Full refund applies when cancelling more than this many hours ahead
    pub full_refund_after_hours: i64,
    /// Refund percentage above `full_refund_after_hours`
    pub full_refund_percent: u8,
    /// Refund percentage from `partial_refund_from_hours`
    pub partial_refund_percent: u8,
    /// Refund percentage from the cutoff
    pub late_refund_percent: u8,
}

/// Checkout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Maximum seats on one ticket
    pub max_seats_per_purchase: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cancellation: CancellationConfig {
                cutoff_minutes: 60,
                partial_refund_from_hours: 6,
                full_refund_after_hours: 24,
                full_refund_percent: 100,
                partial_refund_percent: 75,
                late_refund_percent: 50,
            },
            checkout: CheckoutConfig {
                max_seats_per_purchase: 8,
            },
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cancellation: CancellationConfig {
                cutoff_minutes: env::var("CANCELLATION_CUTOFF_MINUTES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.cancellation.cutoff_minutes),
                partial_refund_from_hours: env::var("PARTIAL_REFUND_FROM_HOURS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.cancellation.partial_refund_from_hours),
                full_refund_after_hours: env::var("FULL_REFUND_AFTER_HOURS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.cancellation.full_refund_after_hours),
                full_refund_percent: env::var("FULL_REFUND_PERCENT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.cancellation.full_refund_percent),
                partial_refund_percent: env::var("PARTIAL_REFUND_PERCENT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.cancellation.partial_refund_percent),
                late_refund_percent: env::var("LATE_REFUND_PERCENT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.cancellation.late_refund_percent),
            },
            checkout: CheckoutConfig {
                max_seats_per_purchase: env::var("MAX_SEATS_PER_PURCHASE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.checkout.max_seats_per_purchase),
            },
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// Builds the cancellation policy described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a threshold does not fit in a duration or
    /// the configured tiers are inconsistent.
    pub fn cancellation_policy(&self) -> Result<CancellationPolicy, ConfigError> {
        let c = &self.cancellation;
        let cutoff = threshold(
            "CANCELLATION_CUTOFF_MINUTES",
            c.cutoff_minutes,
            Duration::try_minutes,
        )?;
        let partial = threshold(
            "PARTIAL_REFUND_FROM_HOURS",
            c.partial_refund_from_hours,
            Duration::try_hours,
        )?;
        let full = threshold(
            "FULL_REFUND_AFTER_HOURS",
            c.full_refund_after_hours,
            Duration::try_hours,
        )?;
        CancellationPolicy::new(
            cutoff,
            partial,
            full,
            [
                c.full_refund_percent,
                c.partial_refund_percent,
                c.late_refund_percent,
            ],
        )
    }
}

fn threshold(
    name: &'static str,
    value: i64,
    to_duration: fn(i64) -> Option<Duration>,
) -> Result<Duration, ConfigError> {
    to_duration(value).ok_or(ConfigError::ThresholdOutOfRange { name, value })
}
