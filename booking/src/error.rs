//! Error types for the booking domain.
//!
//! Every rejection here is recoverable: the caller re-renders the current
//! state and reports the message. Nothing in this crate panics on bad input.

use crate::types::{SeatAssignmentId, ShowId, TicketId, TicketStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejections produced by checkout, cancellation and ticket lifecycle rules.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingError {
    /// Cancellation requested on a ticket that is not paid.
    #[error("ticket cannot be cancelled: ticket {ticket_id} is {status}")]
    InvalidState {
        /// Ticket the request targeted
        ticket_id: TicketId,
        /// Status observed when the request was evaluated
        status: TicketStatus,
    },

    /// Cancellation requested inside the cutoff window before showtime.
    #[error(
        "tickets cannot be cancelled within {cutoff_minutes} minutes of showtime \
         ({minutes_until_show} minutes remaining)"
    )]
    TooLateToCancel {
        /// Policy cutoff in minutes
        cutoff_minutes: i64,
        /// Whole minutes left before the show starts (negative once started)
        minutes_until_show: i64,
    },

    /// Checkout attempted with no seats selected.
    #[error("select at least one seat before checkout")]
    EmptySelection,

    /// More seats requested than a single purchase allows.
    #[error("cannot book more than {max} seats in one purchase (requested: {requested})")]
    TooManySeats {
        /// Seats in the request
        requested: usize,
        /// Configured maximum
        max: u32,
    },

    /// The show is not known to the box office.
    #[error("show {0} not found")]
    ShowNotFound(ShowId),

    /// The show has been deactivated and accepts no bookings.
    #[error("show {0} is not open for booking")]
    ShowInactive(ShowId),

    /// The show has already started.
    #[error("show {0} has already started")]
    ShowAlreadyStarted(ShowId),

    /// The show has not started yet, so its tickets cannot be used.
    #[error("show {0} has not started yet")]
    ShowNotStarted(ShowId),

    /// A selected seat assignment belongs to another show.
    #[error("seat {seat_id} is not part of show {show_id}")]
    SeatNotInShow {
        /// Offending seat assignment
        seat_id: SeatAssignmentId,
        /// Show being booked
        show_id: ShowId,
    },

    /// A selected seat assignment is already booked.
    #[error("seat {0} is already booked")]
    SeatUnavailable(SeatAssignmentId),

    /// The ticket is not known to the box office.
    #[error("ticket {0} not found")]
    TicketNotFound(TicketId),

    /// A ticket with this id was already issued.
    #[error("ticket {0} already exists")]
    TicketAlreadyExists(TicketId),

    /// Only paid tickets can be marked used.
    #[error("ticket {ticket_id} cannot be used: it is {status}")]
    NotUsable {
        /// Ticket the request targeted
        ticket_id: TicketId,
        /// Status observed when the request was evaluated
        status: TicketStatus,
    },

    /// Payment details failed validation.
    #[error(transparent)]
    InvalidPayment(#[from] PaymentError),

    /// A currency computation overflowed.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Errors from parsing or combining currency amounts.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoneyError {
    /// The text is not a non-negative decimal with at most two fraction digits.
    #[error("invalid currency amount: {0:?}")]
    InvalidAmount(String),

    /// The amount does not fit in the cent counter.
    #[error("currency amount overflow")]
    Overflow,
}

/// A single rejected payment field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFieldError {
    /// Card number is not 16 digits.
    #[error("Card number must be 16 digits.")]
    CardNumber,
    /// Expiry is not in `MM/YY` form.
    #[error("Use MM/YY format.")]
    ExpiryFormat,
    /// Expiry month lies in the past.
    #[error("Card has expired.")]
    CardExpired,
    /// CVV is not 3 digits.
    #[error("CVV must be 3 digits.")]
    Cvv,
    /// Venmo handle is malformed.
    #[error("Handle must start with '@' (e.g., @john-doe).")]
    VenmoHandle,
    /// `PayPal` email is malformed.
    #[error("Enter a valid email address.")]
    PayPalEmail,
}

/// All field errors found while validating one set of payment details.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("invalid payment details: {}", summarize(.fields))]
pub struct PaymentError {
    /// Rejected fields, in form order
    pub fields: Vec<PaymentFieldError>,
}

impl PaymentError {
    /// Returns true if `field` was among the rejected fields
    #[must_use]
    pub fn contains(&self, field: PaymentFieldError) -> bool {
        self.fields.contains(&field)
    }
}

fn summarize(fields: &[PaymentFieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Failures reported by the refund payout collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefundError {
    /// The processor refused the refund.
    #[error("refund declined: {reason}")]
    Declined {
        /// Processor-supplied reason
        reason: String,
    },
}

/// Errors from building configuration or policy values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The cancellation cutoff is negative.
    #[error("cancellation cutoff must not be negative")]
    NegativeCutoff,

    /// A configured threshold does not fit in a duration.
    #[error("{name} = {value} is out of range")]
    ThresholdOutOfRange {
        /// Setting name
        name: &'static str,
        /// Configured value
        value: i64,
    },

    /// Refund tier thresholds are not ordered cutoff ≤ partial ≤ full.
    #[error("refund tier thresholds must satisfy cutoff <= partial <= full")]
    UnorderedThresholds,

    /// A refund percentage is above 100.
    #[error("refund percentage {0} exceeds 100")]
    PercentageOutOfRange(u8),

    /// Refund percentages shrink the earlier a customer cancels.
    #[error("refund percentages must not increase closer to showtime")]
    IncreasingRefunds,
}
