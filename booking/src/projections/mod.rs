//! Read models built from box office state.

pub mod sales_summary;

pub use sales_summary::{SalesSummary, TicketFilter};
