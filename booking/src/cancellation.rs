//! Cancellation eligibility and refund tiers.
//!
//! A paid ticket may be cancelled until one hour before showtime. The refund
//! depends on how long before the show the request is made:
//!
//! ```text
//! time until show      refund
//! ----------------     ------
//! more than 24h         100%
//! 6h to 24h inclusive    75%
//! 1h up to 6h            50%
//! under 1h              not cancellable
//! ```
//!
//! Everything here is a pure function of the ticket and an explicit `now`.

use crate::error::{BookingError, ConfigError};
use crate::types::{Money, RefundPercentage, Ticket, TicketStatus};
use chrono::{DateTime, Duration, Utc};

/// Refund tiers and the cancellation cutoff.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CancellationPolicy {
    cutoff: Duration,
    partial_refund_from: Duration,
    full_refund_after: Duration,
    full_refund: RefundPercentage,
    partial_refund: RefundPercentage,
    late_refund: RefundPercentage,
}

impl CancellationPolicy {
    /// 1h cutoff; 100% above 24h, 75% from 6h, 50% from 1h.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            cutoff: Duration::hours(1),
            partial_refund_from: Duration::hours(6),
            full_refund_after: Duration::hours(24),
            full_refund: RefundPercentage::FULL,
            partial_refund: RefundPercentage::saturating(75),
            late_refund: RefundPercentage::saturating(50),
        }
    }

    /// Builds a custom policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the cutoff is negative, the thresholds are
    /// not ordered `cutoff <= partial_refund_from <= full_refund_after`, a
    /// percentage is above 100, or refunds grow closer to showtime.
    pub fn new(
        cutoff: Duration,
        partial_refund_from: Duration,
        full_refund_after: Duration,
        percentages: [u8; 3],
    ) -> Result<Self, ConfigError> {
        if cutoff < Duration::zero() {
            return Err(ConfigError::NegativeCutoff);
        }
        if cutoff > partial_refund_from || partial_refund_from > full_refund_after {
            return Err(ConfigError::UnorderedThresholds);
        }
        let [full, partial, late] = percentages;
        let pct = |p| RefundPercentage::new(p).ok_or(ConfigError::PercentageOutOfRange(p));
        let (full_refund, partial_refund, late_refund) = (pct(full)?, pct(partial)?, pct(late)?);
        if full_refund < partial_refund || partial_refund < late_refund {
            return Err(ConfigError::IncreasingRefunds);
        }

        Ok(Self {
            cutoff,
            partial_refund_from,
            full_refund_after,
            full_refund,
            partial_refund,
            late_refund,
        })
    }

    /// No cancellation is accepted closer than this to showtime
    #[must_use]
    pub const fn cutoff(&self) -> Duration {
        self.cutoff
    }

    /// Refund tier for a cancellation made `until_show` before the show,
    /// `None` inside the cutoff.
    #[must_use]
    pub fn refund_percentage(&self, until_show: Duration) -> Option<RefundPercentage> {
        if until_show > self.full_refund_after {
            Some(self.full_refund)
        } else if until_show >= self.partial_refund_from {
            Some(self.partial_refund)
        } else if until_show >= self.cutoff {
            Some(self.late_refund)
        } else {
            None
        }
    }

    /// Decides whether `ticket` may be cancelled at `now`, and for how much.
    #[must_use]
    pub fn evaluate(&self, ticket: &Ticket, now: DateTime<Utc>) -> CancellationDecision {
        if ticket.status != TicketStatus::Paid {
            return CancellationDecision::Ineligible(BookingError::InvalidState {
                ticket_id: ticket.id,
                status: ticket.status,
            });
        }

        let until_show = ticket.show_time - now;
        match self.refund_percentage(until_show) {
            Some(percentage) => CancellationDecision::Eligible(RefundQuote {
                percentage,
                amount: ticket.total_price.percentage(percentage),
                until_show,
            }),
            None => CancellationDecision::Ineligible(BookingError::TooLateToCancel {
                cutoff_minutes: self.cutoff.num_minutes(),
                minutes_until_show: until_show.num_minutes(),
            }),
        }
    }
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Refund owed for an eligible cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefundQuote {
    /// Tier applied
    pub percentage: RefundPercentage,
    /// `total_price × percentage / 100`, rounded to the cent
    pub amount: Money,
    /// Time left before the show when the quote was made
    pub until_show: Duration,
}

/// Result of evaluating a cancellation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancellationDecision {
    /// The ticket may be cancelled with this refund
    Eligible(RefundQuote),
    /// The request must be rejected for this reason
    Ineligible(BookingError),
}

impl CancellationDecision {
    /// Whether cancellation is allowed
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible(_))
    }

    /// Refund tier, when eligible
    #[must_use]
    pub const fn refund_percentage(&self) -> Option<RefundPercentage> {
        match self {
            Self::Eligible(quote) => Some(quote.percentage),
            Self::Ineligible(_) => None,
        }
    }

    /// Refund amount, when eligible
    #[must_use]
    pub const fn refund_amount(&self) -> Option<Money> {
        match self {
            Self::Eligible(quote) => Some(quote.amount),
            Self::Ineligible(_) => None,
        }
    }

    /// Human-readable rejection reason, when ineligible
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Eligible(_) => None,
            Self::Ineligible(error) => Some(error.to_string()),
        }
    }

    /// Converts the decision into a `Result`
    ///
    /// # Errors
    ///
    /// Returns the rejection when the ticket is not eligible.
    pub fn into_result(self) -> Result<RefundQuote, BookingError> {
        match self {
            Self::Eligible(quote) => Ok(quote),
            Self::Ineligible(error) => Err(error),
        }
    }
}

/// Hours from `now` until `show_time`, negative once the show has started.
#[must_use]
#[allow(clippy::cast_precision_loss)] // millisecond spans stay far below 2^52
pub fn hours_until_show(show_time: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (show_time - now).num_milliseconds() as f64 / 3_600_000.0
}

/// Evaluates a cancellation under [`CancellationPolicy::standard`].
#[must_use]
pub fn evaluate_cancellation(ticket: &Ticket, now: DateTime<Utc>) -> CancellationDecision {
    CancellationPolicy::standard().evaluate(ticket, now)
}
