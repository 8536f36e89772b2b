//! Box Office Demo
//!
//! Walks one show through a small booking day:
//! - Two customers buy seats
//! - Seat availability is printed after each step
//! - One ticket is cancelled three hours before showtime (50% refund)
//! - A second cancellation of the same ticket is rejected
//! - The sales summary is printed
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --bin demo
//! ```

use anyhow::Context;
use chrono::Duration;
use cinema_booking::{
    BoxOffice, BoxOfficeEnvironment, Config, MockRefundIssuer, Money, MovieId, PaymentMethod,
    SalesSummary, SeatAssignment, SeatType, Show, ShowId, TheaterId, TicketFilter, UserId,
};
use cinema_core::environment::{Clock, SystemClock};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cinema_booking=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🎬 ============================================");
    println!("   Cinema Box Office - Live Demo");
    println!("============================================\n");

    // Load configuration
    let config = Config::from_env();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let env =
        BoxOfficeEnvironment::from_config(&config, Arc::clone(&clock), MockRefundIssuer::shared())
            .context("invalid cancellation policy configuration")?;
    let box_office = BoxOffice::new(env);

    // Step 1: Schedule a show
    let show = Show {
        id: ShowId::new(),
        movie_id: MovieId::new(),
        movie_title: "The Third Man".to_string(),
        theater_id: TheaterId::new(),
        starts_at: clock.now() + Duration::hours(3),
        price: Money::parse_decimal("12.50")?,
        is_active: true,
        seats: ["A1", "A2", "A3", "A4", "B1", "B2"]
            .iter()
            .enumerate()
            .map(|(i, number)| {
                let seat_type = if i < 2 { SeatType::Vip } else { SeatType::Regular };
                SeatAssignment::new(*number, seat_type)
            })
            .collect(),
    };
    let show_id = show.id;
    let seat_ids: Vec<_> = show.seats.iter().map(|seat| seat.id).collect();

    println!("1️⃣  Scheduling show: {} at {}", show.movie_title, show.starts_at);
    println!("   Price per seat: {}\n", show.price);
    box_office.sync_show(show).await;
    print_availability(&box_office, show_id).await?;

    // Step 2: Two purchases
    println!("2️⃣  Customers buying seats...");
    let alice = box_office
        .purchase(
            show_id,
            UserId::new(),
            vec![seat_ids[0], seat_ids[1]],
            PaymentMethod::CreditCard {
                card_number: "4242 4242 4242 4242".to_string(),
                expiry: "12/99".to_string(),
                cvv: "123".to_string(),
            },
        )
        .await?;
    println!("   ✓ Ticket {} paid: {}", alice.id, alice.total_price);

    let bob = box_office
        .purchase(
            show_id,
            UserId::new(),
            vec![seat_ids[4]],
            PaymentMethod::Venmo {
                handle: "@bob-at-the-movies".to_string(),
            },
        )
        .await?;
    println!("   ✓ Ticket {} paid: {}\n", bob.id, bob.total_price);
    print_availability(&box_office, show_id).await?;

    // Step 3: Try to take a seat that is gone
    println!("3️⃣  Trying to book an already booked seat...");
    match box_office
        .purchase(
            show_id,
            UserId::new(),
            vec![seat_ids[0]],
            PaymentMethod::PayPal {
                email: "late@example.com".to_string(),
            },
        )
        .await
    {
        Ok(ticket) => println!("   ✗ Unexpectedly booked {}", ticket.id),
        Err(e) => println!("   ✓ Rejected: {e}\n"),
    }

    // Step 4: Cancel
    println!("4️⃣  Cancelling the first ticket...");
    let cancelled = box_office
        .cancel(alice.id, Some("Change of plans".to_string()))
        .await?;
    let refund = cancelled.refund_amount.unwrap_or(Money::ZERO);
    let percentage = cancelled
        .refund_percentage
        .map_or_else(|| "0%".to_string(), |p| p.to_string());
    println!("   ✓ Status: {}", cancelled.status);
    println!("   ✓ Refund: {refund} ({percentage})");
    if let Some(settlement) = &cancelled.refund_settlement {
        println!("   ✓ Payout: {settlement:?}\n");
    }
    print_availability(&box_office, show_id).await?;

    // Step 5: Cancel again
    println!("5️⃣  Cancelling the same ticket again...");
    match box_office.cancel(alice.id, None).await {
        Ok(_) => println!("   ✗ Second cancellation unexpectedly accepted"),
        Err(e) => println!("   ✓ Rejected: {e}\n"),
    }

    // Step 6: Sales summary
    let summary = box_office
        .state(|state| SalesSummary::from_tickets(state.tickets.values(), &TicketFilter::all()))
        .await;
    println!("📊 Sales summary");
    println!("   Tickets:   {}", summary.total_tickets);
    println!("   Paid:      {}", summary.paid);
    println!("   Cancelled: {}", summary.cancelled);
    println!("   Revenue:   {}", summary.total_revenue);
    println!("   Refunded:  {}", summary.total_refunded);

    println!("\n============================================");
    println!("   Demo complete");
    println!("============================================\n");

    Ok(())
}

async fn print_availability(box_office: &BoxOffice, show_id: ShowId) -> anyhow::Result<()> {
    let available = box_office.available_seats(show_id).await?;
    let labels: Vec<&str> = available.iter().map(|seat| seat.seat_number.as_str()).collect();
    println!("   🪑 Available seats ({}): {}\n", available.len(), labels.join(", "));
    Ok(())
}
