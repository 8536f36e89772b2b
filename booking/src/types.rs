//! Domain types for cinema booking.
//!
//! Value objects (identifiers, [`Money`], [`RefundPercentage`]), the show and
//! ticket entities, and the [`BoxOfficeState`] the reducer works on.

use crate::error::MoneyError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Wire form of an identifier: the API's integer primary key or a UUID string.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Key(u64),
    Uuid(Uuid),
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// Serialized as the API's integer key when it came from one, as a
        /// UUID string otherwise.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random `", stringify!($name), "`")]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[doc = concat!("Create a `", stringify!($name), "` from a `Uuid`")]
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            #[doc = concat!("Create a `", stringify!($name), "` from an API primary key")]
            #[must_use]
            #[allow(clippy::cast_lossless)] // `u128::from` is not const
            pub const fn from_key(key: u64) -> Self {
                Self(Uuid::from_u128(key as u128))
            }

            /// Get the inner UUID
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// The API primary key this id was built from, if any
            #[must_use]
            pub fn key(&self) -> Option<u64> {
                u64::try_from(self.0.as_u128()).ok()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.key() {
                    Some(key) => write!(f, "{key}"),
                    None => write!(f, "{}", self.0),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self.key() {
                    Some(key) => serializer.serialize_u64(key),
                    None => self.0.serialize(serializer),
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                Ok(match IdRepr::deserialize(deserializer)? {
                    IdRepr::Key(key) => Self::from_key(key),
                    IdRepr::Uuid(uuid) => Self(uuid),
                })
            }
        }
    };
}

define_id!(
    /// Unique identifier for a scheduled show
    ShowId
);
define_id!(
    /// Unique identifier for a seat bound to one show
    SeatAssignmentId
);
define_id!(
    /// Unique identifier for a ticket
    TicketId
);
define_id!(
    /// Unique identifier for a customer account
    UserId
);
define_id!(
    /// Unique identifier for a catalog movie
    MovieId
);
define_id!(
    /// Unique identifier for a theater
    TheaterId
);

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// A non-negative currency amount stored in cents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole dollars, `None` on overflow
    #[must_use]
    pub const fn checked_from_dollars(dollars: u64) -> Option<Self> {
        match dollars.checked_mul(100) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Parses a decimal amount such as `"12.50"`, `"12.5"` or `"12"`.
    ///
    /// More than two fraction digits are rejected rather than rounded, since
    /// the API never sends sub-cent prices.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidAmount`] for signs, empty parts or
    /// non-digits, and [`MoneyError::Overflow`] if the amount does not fit.
    pub fn parse_decimal(text: &str) -> Result<Self, MoneyError> {
        let invalid = || MoneyError::InvalidAmount(text.to_string());
        let trimmed = text.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if trimmed.ends_with('.') {
            return Err(invalid());
        }

        let dollars: u64 = whole.parse().map_err(|_| MoneyError::Overflow)?;
        let cents: u64 = match fraction.len() {
            0 => 0,
            1 => u64::from(fraction.as_bytes()[0] - b'0') * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u64) -> Option<Self> {
        match self.0.checked_mul(quantity) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// The given percentage of this amount, rounded half-up to the cent.
    #[must_use]
    pub const fn percentage(self, percent: RefundPercentage) -> Self {
        // u128 keeps cents * 100 from overflowing for any u64 amount
        let scaled = self.0 as u128 * percent.value() as u128;
        #[allow(clippy::cast_possible_truncation)] // percent <= 100, so result <= self.0
        let cents = ((scaled + 50) / 100) as u64;
        Self(cents)
    }

    /// Renders the amount as a plain decimal (`"12.50"`), the API's wire form
    #[must_use]
    pub fn to_decimal_string(&self) -> String {
        format!("{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| Self(acc.0.saturating_add(m.0)))
    }
}

// ============================================================================
// Refund percentage
// ============================================================================

/// A whole refund percentage in `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RefundPercentage(u8);

impl RefundPercentage {
    /// Full refund
    pub const FULL: Self = Self(100);

    /// Creates a percentage, `None` if above 100
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 100 { Some(Self(value)) } else { None }
    }

    /// Creates a percentage, clamping values above 100
    #[must_use]
    pub const fn saturating(value: u8) -> Self {
        if value <= 100 { Self(value) } else { Self(100) }
    }

    /// Returns the percentage as a number
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for RefundPercentage {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("refund percentage {value} exceeds 100"))
    }
}

impl From<RefundPercentage> for u8 {
    fn from(value: RefundPercentage) -> Self {
        value.0
    }
}

impl fmt::Display for RefundPercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// ============================================================================
// Shows and seats
// ============================================================================

/// Seat category as configured per theater
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SeatType {
    /// Standard seating
    #[default]
    #[serde(rename = "regular")]
    Regular,
    /// VIP seating
    #[serde(rename = "VIP", alias = "vip")]
    Vip,
}

/// A physical seat bound to one show, with its booked flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    /// Assignment id (unique per show and seat)
    pub id: SeatAssignmentId,
    /// Seat label, e.g. "A7"
    pub seat_number: String,
    /// Seat category
    pub seat_type: SeatType,
    /// Whether a paid ticket currently holds this seat
    pub is_booked: bool,
}

impl SeatAssignment {
    /// Creates an unbooked seat assignment
    #[must_use]
    pub fn new(seat_number: impl Into<String>, seat_type: SeatType) -> Self {
        Self {
            id: SeatAssignmentId::new(),
            seat_number: seat_number.into(),
            seat_type,
            is_booked: false,
        }
    }
}

/// A scheduled screening of a movie at a theater.
///
/// The show is the only source of truth for price and start time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    /// Show id
    pub id: ShowId,
    /// Movie being screened
    pub movie_id: MovieId,
    /// Movie title, denormalized for display and search
    pub movie_title: String,
    /// Theater hosting the show
    pub theater_id: TheaterId,
    /// Start time
    pub starts_at: DateTime<Utc>,
    /// Price per seat
    pub price: Money,
    /// Whether the show accepts bookings
    pub is_active: bool,
    /// Seats bound to this show, in display order
    pub seats: Vec<SeatAssignment>,
}

impl Show {
    /// Looks up one of this show's seat assignments
    #[must_use]
    pub fn seat(&self, seat_id: &SeatAssignmentId) -> Option<&SeatAssignment> {
        self.seats.iter().find(|s| s.id == *seat_id)
    }

    /// Mutable lookup of one of this show's seat assignments
    pub fn seat_mut(&mut self, seat_id: &SeatAssignmentId) -> Option<&mut SeatAssignment> {
        self.seats.iter_mut().find(|s| s.id == *seat_id)
    }

    /// Whether the show has started as of `now`
    #[must_use]
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.starts_at
    }
}

// ============================================================================
// Tickets
// ============================================================================

/// Ticket lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Created but not yet paid
    Pending,
    /// Paid; the only cancellable status
    Paid,
    /// Cancelled and refunded (terminal)
    Cancelled,
    /// Admitted to the show (terminal)
    Used,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
            Self::Used => "used",
        };
        f.write_str(label)
    }
}

/// Outcome of paying a refund out after cancellation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefundSettlement {
    /// The processor accepted the refund
    Issued {
        /// Processor reference
        reference: String,
    },
    /// The processor rejected the refund; the owed amount is unchanged
    Failed {
        /// Failure description
        error: String,
    },
}

/// A purchase of one or more seats for one show by one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket id
    pub id: TicketId,
    /// Show the seats belong to
    pub show_id: ShowId,
    /// Purchasing user
    pub user_id: UserId,
    /// Movie title, denormalized for display and search
    pub movie_title: String,
    /// Seat assignments held by this ticket (non-empty, same show)
    pub seats: Vec<SeatAssignmentId>,
    /// Price paid
    pub total_price: Money,
    /// Lifecycle status
    pub status: TicketStatus,
    /// Show start time, copied from the show at purchase
    pub show_time: DateTime<Utc>,
    /// When the ticket was bought
    pub booked_at: DateTime<Utc>,
    /// Refund owed, set once on cancellation
    pub refund_amount: Option<Money>,
    /// Refund tier applied, set once on cancellation
    pub refund_percentage: Option<RefundPercentage>,
    /// Free-text reason given by the customer, stored verbatim
    pub cancellation_reason: Option<String>,
    /// When the ticket was cancelled
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Payout result, once known
    pub refund_settlement: Option<RefundSettlement>,
}

impl Ticket {
    /// Creates a paid ticket
    #[must_use]
    pub fn paid(
        id: TicketId,
        show: &Show,
        user_id: UserId,
        seats: Vec<SeatAssignmentId>,
        total_price: Money,
        booked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            show_id: show.id,
            user_id,
            movie_title: show.movie_title.clone(),
            seats,
            total_price,
            status: TicketStatus::Paid,
            show_time: show.starts_at,
            booked_at,
            refund_amount: None,
            refund_percentage: None,
            cancellation_reason: None,
            cancelled_at: None,
            refund_settlement: None,
        }
    }
}

// ============================================================================
// Box office state
// ============================================================================

/// Shows and tickets owned by one box office.
#[derive(Clone, Debug, Default)]
pub struct BoxOfficeState {
    /// Shows by id
    pub shows: HashMap<ShowId, Show>,
    /// Tickets by id
    pub tickets: HashMap<TicketId, Ticket>,
    /// Last validation error, cleared by the next successful event
    pub last_error: Option<crate::error::BookingError>,
}

impl BoxOfficeState {
    /// Creates an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a show
    #[must_use]
    pub fn show(&self, show_id: &ShowId) -> Option<&Show> {
        self.shows.get(show_id)
    }

    /// Looks up a ticket
    #[must_use]
    pub fn ticket(&self, ticket_id: &TicketId) -> Option<&Ticket> {
        self.tickets.get(ticket_id)
    }

    /// Tickets bought by one user, newest first
    #[must_use]
    pub fn tickets_for_user(&self, user_id: &UserId) -> Vec<&Ticket> {
        let mut tickets: Vec<&Ticket> = self
            .tickets
            .values()
            .filter(|t| t.user_id == *user_id)
            .collect();
        tickets.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
        tickets
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_decimal_prices() {
        assert_eq!(Money::parse_decimal("12.50").unwrap(), Money::from_cents(1250));
        assert_eq!(Money::parse_decimal("12.5").unwrap(), Money::from_cents(1250));
        assert_eq!(Money::parse_decimal("12").unwrap(), Money::from_cents(1200));
        assert_eq!(Money::parse_decimal(" 0.07 ").unwrap(), Money::from_cents(7));
    }

    #[test]
    fn rejects_malformed_decimals() {
        for text in ["", "-1.00", "1.005", "abc", ".50", "12.", "1,50", "+3"] {
            assert!(
                matches!(Money::parse_decimal(text), Err(MoneyError::InvalidAmount(_))),
                "{text:?} should be rejected"
            );
        }
        assert_eq!(
            Money::parse_decimal("999999999999999999999"),
            Err(MoneyError::Overflow)
        );
    }

    #[test]
    fn percentage_rounds_half_up_to_the_cent() {
        let pct = |p| RefundPercentage::new(p).unwrap();
        assert_eq!(Money::from_cents(4000).percentage(pct(50)), Money::from_cents(2000));
        // 75% of $12.50 = $9.375 -> $9.38
        assert_eq!(Money::from_cents(1250).percentage(pct(75)), Money::from_cents(938));
        // 50% of $0.01 = $0.005 -> $0.01
        assert_eq!(Money::from_cents(1).percentage(pct(50)), Money::from_cents(1));
        let max = Money::from_cents(u64::MAX);
        assert_eq!(max.percentage(RefundPercentage::FULL), max);
    }

    #[test]
    fn whole_dollars_convert_to_cents() {
        assert_eq!(Money::checked_from_dollars(12), Some(Money::from_cents(1200)));
        assert_eq!(Money::checked_from_dollars(u64::MAX), None);
    }

    #[test]
    fn ids_accept_api_keys_and_uuids() {
        let from_key: ShowId = serde_json::from_str("12").unwrap();
        assert_eq!(from_key, ShowId::from_key(12));
        assert_eq!(from_key.key(), Some(12));
        assert_eq!(serde_json::to_string(&from_key).unwrap(), "12");
        assert_eq!(from_key.to_string(), "12");

        let text = "\"6f1c4a8e-2b1f-4d7a-9c55-0a1b2c3d4e5f\"";
        let from_uuid: ShowId = serde_json::from_str(text).unwrap();
        assert_eq!(from_uuid.key(), None);
        assert_eq!(serde_json::to_string(&from_uuid).unwrap(), text);

        assert!(serde_json::from_str::<ShowId>("-4").is_err());
        assert!(serde_json::from_str::<ShowId>("\"seat-1\"").is_err());
    }

    #[test]
    fn money_display_and_wire_form() {
        let amount = Money::from_cents(2005);
        assert_eq!(amount.to_string(), "$20.05");
        assert_eq!(amount.to_decimal_string(), "20.05");
    }

    #[test]
    fn refund_percentage_rejects_above_hundred() {
        assert!(RefundPercentage::new(101).is_none());
        assert!(serde_json::from_str::<RefundPercentage>("150").is_err());
        assert_eq!(
            serde_json::from_str::<RefundPercentage>("75").unwrap().value(),
            75
        );
    }

    #[test]
    fn ticket_status_uses_api_labels() {
        assert_eq!(serde_json::to_string(&TicketStatus::Cancelled).unwrap(), "\"cancelled\"");
        assert_eq!(
            serde_json::from_str::<TicketStatus>("\"used\"").unwrap(),
            TicketStatus::Used
        );
    }

    #[test]
    fn seat_type_accepts_both_vip_spellings() {
        assert_eq!(serde_json::from_str::<SeatType>("\"VIP\"").unwrap(), SeatType::Vip);
        assert_eq!(serde_json::from_str::<SeatType>("\"vip\"").unwrap(), SeatType::Vip);
        assert_eq!(serde_json::from_str::<SeatType>("\"regular\"").unwrap(), SeatType::Regular);
    }
}
