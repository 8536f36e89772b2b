//! Sales summary for ticket management screens.
//!
//! Answers "how much did we take, and how much did we give back?" over a
//! filtered set of tickets.

use crate::types::{Money, Ticket, TicketStatus};
use serde::{Deserialize, Serialize};

/// Which tickets a summary covers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilter {
    /// Only tickets in this status; `None` means all
    pub status: Option<TicketStatus>,
    /// Case-insensitive match against movie title or ticket id; empty matches all
    pub search: String,
}

impl TicketFilter {
    /// Filter matching every ticket
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one status
    #[must_use]
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to a search term
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Whether `ticket` passes this filter
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.status.is_some_and(|status| status != ticket.status) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || ticket.movie_title.to_lowercase().contains(&needle)
            || ticket.id.to_string().contains(&needle)
    }
}

/// Aggregated sales figures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    /// Sum of totals of tickets still paid
    pub total_revenue: Money,
    /// Sum of refunds owed on cancelled tickets
    pub total_refunded: Money,
    /// Tickets matched by the filter
    pub total_tickets: usize,
    /// Matched tickets in `paid` status
    pub paid: usize,
    /// Matched tickets in `cancelled` status
    pub cancelled: usize,
    /// Matched tickets in `used` status
    pub used: usize,
}

impl SalesSummary {
    /// Summarizes the tickets that pass `filter`.
    #[must_use]
    pub fn from_tickets<'a>(
        tickets: impl IntoIterator<Item = &'a Ticket>,
        filter: &TicketFilter,
    ) -> Self {
        tickets
            .into_iter()
            .filter(|ticket| filter.matches(ticket))
            .fold(Self::default(), |mut summary, ticket| {
                summary.total_tickets += 1;
                match ticket.status {
                    TicketStatus::Paid => {
                        summary.paid += 1;
                        summary.total_revenue = summary
                            .total_revenue
                            .checked_add(ticket.total_price)
                            .unwrap_or(Money::from_cents(u64::MAX));
                    },
                    TicketStatus::Cancelled => {
                        summary.cancelled += 1;
                        let refund = ticket.refund_amount.unwrap_or(Money::ZERO);
                        summary.total_refunded = summary
                            .total_refunded
                            .checked_add(refund)
                            .unwrap_or(Money::from_cents(u64::MAX));
                    },
                    TicketStatus::Used => summary.used += 1,
                    TicketStatus::Pending => {},
                }
                summary
            })
    }
}
