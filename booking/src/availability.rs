//! Seat availability for a show.
//!
//! Availability is only as fresh as the seat list passed in. Callers re-fetch
//! the show before resolving seats for a checkout.

use crate::types::SeatAssignment;

/// Returns the seats with `is_booked == false`, in their original order.
///
/// An empty seat list yields no available seats.
#[must_use]
pub fn resolve_available_seats(seats: &[SeatAssignment]) -> Vec<&SeatAssignment> {
    seats.iter().filter(|seat| is_selectable(seat)).collect()
}

/// Whether a single seat may be added to a selection.
#[must_use]
pub const fn is_selectable(seat: &SeatAssignment) -> bool {
    !seat.is_booked
}

/// Splits seats into `(booked, available)`, each keeping the original order.
#[must_use]
pub fn partition_seats(seats: &[SeatAssignment]) -> (Vec<&SeatAssignment>, Vec<&SeatAssignment>) {
    seats.iter().partition(|seat| seat.is_booked)
}

/// Number of seats still open for booking.
#[must_use]
pub fn available_count(seats: &[SeatAssignment]) -> usize {
    seats.iter().filter(|seat| is_selectable(seat)).count()
}
