//! Wire snapshots exchanged with the cinema API.
//!
//! The API keys its records with integers; ids accept those as well as UUID
//! strings. Prices arrive as decimal strings (`"12.50"`) and sometimes as bare
//! JSON numbers; both are parsed straight into cents. Optional fields that
//! older payloads omit fall back to empty values.

use crate::types::{
    Money, MovieId, RefundPercentage, SeatAssignment, SeatAssignmentId, SeatType, Show, ShowId,
    TheaterId, Ticket, TicketId, TicketStatus, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Show as served by `GET /api/shows/{id}/`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSnapshot {
    /// Show id
    pub id: ShowId,
    /// Movie id
    pub movie: MovieId,
    /// Theater id
    pub theater: TheaterId,
    /// Movie title, when the endpoint inlines it
    #[serde(default)]
    pub movie_title: String,
    /// Price per seat
    #[serde(with = "decimal_money")]
    pub price: Money,
    /// Start time
    pub showtime: DateTime<Utc>,
    /// Whether the show accepts bookings
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Seats bound to the show
    #[serde(default)]
    pub seat_assignments: Vec<SeatAssignmentSnapshot>,
}

/// Seat entry of a [`ShowSnapshot`] or [`TicketSnapshot`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignmentSnapshot {
    /// Assignment id
    pub id: SeatAssignmentId,
    /// Seat label
    pub seat_number: String,
    /// Seat category
    #[serde(default)]
    pub seat_type: SeatType,
    /// Booked flag; ticket payloads leave it out
    #[serde(default)]
    pub is_booked: bool,
}

/// Ticket as served by `GET /api/tickets/`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSnapshot {
    /// Ticket id
    pub id: TicketId,
    /// Show the ticket is for
    #[serde(default)]
    pub show: Option<ShowId>,
    /// Owner
    #[serde(default)]
    pub user: Option<UserId>,
    /// Lifecycle status
    pub status: TicketStatus,
    /// Price paid
    #[serde(with = "decimal_money")]
    pub total_price: Money,
    /// Show start time
    pub show_time: DateTime<Utc>,
    /// Seats on the ticket
    #[serde(default)]
    pub seats: Vec<SeatAssignmentSnapshot>,
    /// Movie title
    #[serde(default)]
    pub movie_title: String,
    /// Purchase time
    #[serde(default)]
    pub booking_time: Option<DateTime<Utc>>,
    /// Refund owed, once cancelled
    #[serde(default, with = "optional_decimal_money")]
    pub refund_amount: Option<Money>,
    /// Refund tier, once cancelled
    #[serde(default)]
    pub refund_percentage: Option<RefundPercentage>,
    /// Customer's cancellation reason
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

const fn default_true() -> bool {
    true
}

impl From<SeatAssignmentSnapshot> for SeatAssignment {
    fn from(snapshot: SeatAssignmentSnapshot) -> Self {
        Self {
            id: snapshot.id,
            seat_number: snapshot.seat_number,
            seat_type: snapshot.seat_type,
            is_booked: snapshot.is_booked,
        }
    }
}

impl From<SeatAssignment> for SeatAssignmentSnapshot {
    fn from(seat: SeatAssignment) -> Self {
        Self {
            id: seat.id,
            seat_number: seat.seat_number,
            seat_type: seat.seat_type,
            is_booked: seat.is_booked,
        }
    }
}

impl From<ShowSnapshot> for Show {
    fn from(snapshot: ShowSnapshot) -> Self {
        Self {
            id: snapshot.id,
            movie_id: snapshot.movie,
            movie_title: snapshot.movie_title,
            theater_id: snapshot.theater,
            starts_at: snapshot.showtime,
            price: snapshot.price,
            is_active: snapshot.is_active,
            seats: snapshot
                .seat_assignments
                .into_iter()
                .map(SeatAssignment::from)
                .collect(),
        }
    }
}

impl From<Show> for ShowSnapshot {
    fn from(show: Show) -> Self {
        Self {
            id: show.id,
            movie: show.movie_id,
            theater: show.theater_id,
            movie_title: show.movie_title,
            price: show.price,
            showtime: show.starts_at,
            is_active: show.is_active,
            seat_assignments: show
                .seats
                .into_iter()
                .map(SeatAssignmentSnapshot::from)
                .collect(),
        }
    }
}

/// Missing show and user references become nil ids; a missing purchase
/// time falls back to the show time.
impl From<TicketSnapshot> for Ticket {
    fn from(snapshot: TicketSnapshot) -> Self {
        Self {
            id: snapshot.id,
            show_id: snapshot
                .show
                .unwrap_or_else(|| ShowId::from_uuid(Uuid::nil())),
            user_id: snapshot
                .user
                .unwrap_or_else(|| UserId::from_uuid(Uuid::nil())),
            movie_title: snapshot.movie_title,
            seats: snapshot.seats.into_iter().map(|seat| seat.id).collect(),
            total_price: snapshot.total_price,
            status: snapshot.status,
            show_time: snapshot.show_time,
            booked_at: snapshot.booking_time.unwrap_or(snapshot.show_time),
            refund_amount: snapshot.refund_amount,
            refund_percentage: snapshot.refund_percentage,
            cancellation_reason: snapshot.cancellation_reason,
            cancelled_at: None,
            refund_settlement: None,
        }
    }
}

impl TicketSnapshot {
    /// Snapshot of `ticket`, with seat labels taken from its `show`.
    ///
    /// Seats are listed in the show's display order.
    #[must_use]
    pub fn from_ticket(ticket: Ticket, show: &Show) -> Self {
        let seats = show
            .seats
            .iter()
            .filter(|seat| ticket.seats.contains(&seat.id))
            .cloned()
            .map(SeatAssignmentSnapshot::from)
            .collect();
        Self {
            id: ticket.id,
            show: Some(ticket.show_id),
            user: Some(ticket.user_id),
            status: ticket.status,
            total_price: ticket.total_price,
            show_time: ticket.show_time,
            seats,
            movie_title: ticket.movie_title,
            booking_time: Some(ticket.booked_at),
            refund_amount: ticket.refund_amount,
            refund_percentage: ticket.refund_percentage,
            cancellation_reason: ticket.cancellation_reason,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalRepr {
    Text(String),
    Number(serde_json::Number),
}

impl DecimalRepr {
    fn into_money<E: serde::de::Error>(self) -> Result<Money, E> {
        let text = match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        };
        Money::parse_decimal(&text).map_err(E::custom)
    }
}

mod decimal_money {
    use super::{DecimalRepr, Deserialize, Deserializer, Money, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&money.to_decimal_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        DecimalRepr::deserialize(deserializer)?.into_money()
    }
}

mod optional_decimal_money {
    use super::{DecimalRepr, Deserialize, Deserializer, Money, Serializer};

    #[allow(clippy::ref_option)] // signature fixed by serde's `with`
    pub fn serialize<S: Serializer>(
        money: &Option<Money>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match money {
            Some(money) => serializer.serialize_some(&money.to_decimal_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Money>, D::Error> {
        Option::<DecimalRepr>::deserialize(deserializer)?
            .map(DecimalRepr::into_money)
            .transpose()
    }
}
