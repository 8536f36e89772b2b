//! Cinema Booking - the decision core of a cinema box office
//!
//! Three pieces of pure logic sit at the centre, and everything else wires
//! them into a reducer-driven service:
//!
//! - **Seat availability**: which of a show's seats can still be picked
//! - **Booking totals**: price per seat times seats, exact to the cent
//! - **Cancellation**: whether a paid ticket may be cancelled now, and which
//!   refund tier applies
//!
//! # Architecture
//!
//! ```text
//!   Commands                         Events
//! ┌────────────────┐   validate   ┌──────────────────┐
//! │ PurchaseTickets│ ───────────► │ TicketPurchased  │
//! │ CancelTicket   │              │ TicketCancelled  │──► refund payout effect
//! │ MarkTicketUsed │              │ TicketUsed       │         │
//! └────────────────┘              └──────────────────┘         ▼
//!         ▲                                           RefundIssued / RefundFailed
//!         │
//!     BoxOffice (single writer lock, authoritative clock)
//! ```
//!
//! # Refund tiers
//!
//! ```text
//! more than 24h before showtime   100%
//! 6h to 24h                        75%
//! 1h up to 6h                      50%
//! under 1h                         rejected
//! ```
//!
//! The pure functions ([`resolve_available_seats`], [`compute_total`],
//! [`evaluate_cancellation`]) take `now` explicitly; the reducer reads it
//! from the environment's [`Clock`](cinema_core::environment::Clock).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregates;
pub mod app;
pub mod availability;
pub mod cancellation;
pub mod config;
pub mod error;
pub mod payment;
pub mod pricing;
pub mod projections;
pub mod refund;
pub mod snapshot;
pub mod types;

pub use aggregates::{BoxOfficeAction, BoxOfficeEnvironment, BoxOfficeReducer};
pub use app::BoxOffice;
pub use availability::resolve_available_seats;
pub use cancellation::{
    evaluate_cancellation, CancellationDecision, CancellationPolicy, RefundQuote,
};
pub use config::Config;
pub use error::{
    BookingError, ConfigError, MoneyError, PaymentError, PaymentFieldError, RefundError,
};
pub use payment::PaymentMethod;
pub use pricing::{compute_total, SeatSelection};
pub use projections::{SalesSummary, TicketFilter};
pub use refund::{MockRefundIssuer, RefundIssuer, RefundReceipt};
pub use snapshot::{SeatAssignmentSnapshot, ShowSnapshot, TicketSnapshot};
pub use types::*;
