//! Refund payout collaborator.
//!
//! Cancellation decides how much is owed; paying it back is delegated to the
//! payment processor behind [`RefundIssuer`]. The box office reducer only
//! describes the payout as an effect.

use crate::error::RefundError;
use crate::types::{Money, TicketId};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Processor confirmation for a refund
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundReceipt {
    /// Ticket refunded
    pub ticket_id: TicketId,
    /// Amount paid back
    pub amount: Money,
    /// Processor reference
    pub reference: String,
}

/// Pays refunds back to customers.
///
/// Returns a boxed future so the trait stays object-safe behind `Arc<dyn _>`.
pub trait RefundIssuer: Send + Sync {
    /// Pay `amount` back for `ticket_id`
    ///
    /// # Errors
    ///
    /// Returns [`RefundError`] if the processor refuses the refund.
    fn issue_refund(
        &self,
        ticket_id: TicketId,
        amount: Money,
    ) -> BoxFuture<'static, Result<RefundReceipt, RefundError>>;
}

/// In-process refund issuer for development and tests.
///
/// Approves every refund unless switched to declining.
#[derive(Debug, Default)]
pub struct MockRefundIssuer {
    declining: AtomicBool,
}

impl MockRefundIssuer {
    /// Creates an issuer that approves refunds
    #[must_use]
    pub const fn new() -> Self {
        Self {
            declining: AtomicBool::new(false),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared() -> Arc<dyn RefundIssuer> {
        Arc::new(Self::new())
    }

    /// Makes every following refund fail with [`RefundError::Declined`]
    pub fn decline_refunds(&self, declining: bool) {
        self.declining.store(declining, Ordering::SeqCst);
    }
}

impl RefundIssuer for MockRefundIssuer {
    fn issue_refund(
        &self,
        ticket_id: TicketId,
        amount: Money,
    ) -> BoxFuture<'static, Result<RefundReceipt, RefundError>> {
        let declining = self.declining.load(Ordering::SeqCst);
        Box::pin(async move {
            if declining {
                tracing::warn!(%ticket_id, amount = amount.cents(), "Mock refund declined");
                return Err(RefundError::Declined {
                    reason: "processor unavailable".to_string(),
                });
            }

            let reference = format!("mock_refund_{}", uuid::Uuid::new_v4());
            tracing::info!(
                %ticket_id,
                amount = amount.cents(),
                reference = %reference,
                "Mock refund processed successfully"
            );

            Ok(RefundReceipt {
                ticket_id,
                amount,
                reference,
            })
        })
    }
}
