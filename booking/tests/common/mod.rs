//! Shared fixtures for booking integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Duration, Utc};
use cinema_booking::{
    BoxOffice, BoxOfficeEnvironment, MockRefundIssuer, Money, MovieId, PaymentMethod,
    RefundIssuer, SeatAssignment, SeatAssignmentId, SeatType, Show, ShowId, TheaterId, Ticket,
    TicketId, UserId,
};
use cinema_core::environment::Clock;
use cinema_testing::{test_clock, ManualClock};
use std::sync::Arc;

/// The instant every fixture is anchored to (2025-01-01T00:00:00Z)
pub fn now() -> DateTime<Utc> {
    test_clock().now()
}

/// An active show starting `until_show` after [`now`], with `seats` open seats.
pub fn show_starting_in(until_show: Duration, seats: usize, price_cents: u64) -> Show {
    Show {
        id: ShowId::new(),
        movie_id: MovieId::new(),
        movie_title: "Metropolis".to_string(),
        theater_id: TheaterId::new(),
        starts_at: now() + until_show,
        price: Money::from_cents(price_cents),
        is_active: true,
        seats: (1..=seats)
            .map(|n| SeatAssignment::new(format!("R{n}"), SeatType::Regular))
            .collect(),
    }
}

/// A paid ticket for a show at `show_time` that cost `cents`.
pub fn paid_ticket(show_time: DateTime<Utc>, cents: u64) -> Ticket {
    let show = Show {
        starts_at: show_time,
        ..show_starting_in(Duration::zero(), 1, cents)
    };
    let seats: Vec<SeatAssignmentId> = show.seats.iter().map(|s| s.id).collect();
    Ticket::paid(
        TicketId::new(),
        &show,
        UserId::new(),
        seats,
        Money::from_cents(cents),
        show_time - Duration::days(7),
    )
}

/// A card that validates against [`now`]
pub fn card() -> PaymentMethod {
    PaymentMethod::CreditCard {
        card_number: "4111 1111 1111 1111".to_string(),
        expiry: "08/29".to_string(),
        cvv: "321".to_string(),
    }
}

/// A box office on a manual clock stopped at [`now`]
pub fn box_office() -> (BoxOffice, Arc<ManualClock>, Arc<MockRefundIssuer>) {
    let clock = Arc::new(ManualClock::new(now()));
    let refunds = Arc::new(MockRefundIssuer::new());
    let env = BoxOfficeEnvironment::new(
        Arc::clone(&clock) as Arc<dyn Clock>,
        Arc::clone(&refunds) as Arc<dyn RefundIssuer>,
    );
    (BoxOffice::new(env), clock, refunds)
}
