//! Checkout totals and seat selection.

use crate::error::{BookingError, MoneyError};
use crate::types::{Money, SeatAssignmentId, Show};
use serde::{Deserialize, Serialize};

/// Total for `selected_seat_count` seats at `price_per_seat`.
///
/// Amounts are held in cents, so the result is already rounded to two
/// decimal places. Zero seats cost zero; rejecting an empty checkout is the
/// job of [`SeatSelection::checkout_total`].
///
/// # Errors
///
/// Returns [`MoneyError::Overflow`] if the total does not fit in cents.
pub fn compute_total(
    price_per_seat: Money,
    selected_seat_count: usize,
) -> Result<Money, MoneyError> {
    let count = u64::try_from(selected_seat_count).map_err(|_| MoneyError::Overflow)?;
    price_per_seat
        .checked_multiply(count)
        .ok_or(MoneyError::Overflow)
}

/// Seats picked during checkout.
///
/// Behaves as an ordered set: selecting a seat twice toggles it back out, so
/// a seat never counts twice toward the total.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSelection {
    seats: Vec<SeatAssignmentId>,
}

impl SeatSelection {
    /// Creates an empty selection
    #[must_use]
    pub const fn new() -> Self {
        Self { seats: Vec::new() }
    }

    /// Adds the seat if absent, removes it if present.
    ///
    /// Returns true if the seat is selected afterwards.
    pub fn toggle(&mut self, seat_id: SeatAssignmentId) -> bool {
        if let Some(pos) = self.seats.iter().position(|s| *s == seat_id) {
            self.seats.remove(pos);
            false
        } else {
            self.seats.push(seat_id);
            true
        }
    }

    /// Whether the seat is selected
    #[must_use]
    pub fn contains(&self, seat_id: &SeatAssignmentId) -> bool {
        self.seats.contains(seat_id)
    }

    /// Number of distinct selected seats
    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Selected seats in the order they were picked
    #[must_use]
    pub fn seat_ids(&self) -> &[SeatAssignmentId] {
        &self.seats
    }

    /// Drops selected seats that the refreshed `show` reports as booked or
    /// no longer lists. Returns the ids that were dropped.
    pub fn retain_available(&mut self, show: &Show) -> Vec<SeatAssignmentId> {
        let mut dropped = Vec::new();
        self.seats.retain(|id| {
            let keep = show.seat(id).is_some_and(|seat| !seat.is_booked);
            if !keep {
                dropped.push(*id);
            }
            keep
        });
        dropped
    }

    /// Total to charge for this selection.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::EmptySelection`] when nothing is selected, and
    /// [`BookingError::Money`] if the total overflows.
    pub fn checkout_total(&self, price_per_seat: Money) -> Result<Money, BookingError> {
        if self.is_empty() {
            return Err(BookingError::EmptySelection);
        }
        Ok(compute_total(price_per_seat, self.len())?)
    }
}

impl FromIterator<SeatAssignmentId> for SeatSelection {
    fn from_iter<I: IntoIterator<Item = SeatAssignmentId>>(iter: I) -> Self {
        let mut selection = Self::new();
        for id in iter {
            if !selection.contains(&id) {
                selection.seats.push(id);
            }
        }
        selection
    }
}
