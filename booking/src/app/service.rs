//! Box office service: owns the state and drives the reducer.
//!
//! All mutations run under one write lock, so two cancellations of the same
//! ticket are serialized and the second sees the first's result. Effects run
//! after the lock is released; actions they produce are fed back through the
//! reducer before `send` returns.

use crate::aggregates::box_office::{BoxOfficeAction, BoxOfficeEnvironment, BoxOfficeReducer};
use crate::availability::resolve_available_seats;
use crate::error::BookingError;
use crate::payment::PaymentMethod;
use crate::types::{
    BoxOfficeState, SeatAssignment, SeatAssignmentId, Show, ShowId, Ticket, TicketId, UserId,
};
use cinema_core::{effect::Effect, reducer::Reducer};
use futures::future::{join_all, BoxFuture};
use tokio::sync::RwLock;

/// Box office for a set of shows.
pub struct BoxOffice {
    state: RwLock<BoxOfficeState>,
    reducer: BoxOfficeReducer,
    env: BoxOfficeEnvironment,
}

impl BoxOffice {
    /// Creates a box office with no shows
    #[must_use]
    pub fn new(env: BoxOfficeEnvironment) -> Self {
        Self::with_state(BoxOfficeState::new(), env)
    }

    /// Creates a box office over existing state
    #[must_use]
    pub fn with_state(state: BoxOfficeState, env: BoxOfficeEnvironment) -> Self {
        Self {
            state: RwLock::new(state),
            reducer: BoxOfficeReducer::new(),
            env,
        }
    }

    /// Sends an action through the reducer and runs its effects.
    ///
    /// Feedback actions from effects (refund outcomes) are reduced before
    /// this returns; their own rejections are logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns the [`BookingError`] if `action` is a rejected command.
    #[tracing::instrument(skip(self, action), name = "box_office_send")]
    pub async fn send(&self, action: BoxOfficeAction) -> Result<(), BookingError> {
        let (result, effects) = self.reduce(action).await;

        let mut pending = Vec::new();
        for effect in effects {
            pending.extend(self.run_effect(effect).await);
        }
        while !pending.is_empty() {
            let mut next = Vec::new();
            for feedback in pending {
                let (outcome, effects) = self.reduce(feedback).await;
                if let Err(error) = outcome {
                    tracing::warn!(%error, "Feedback action rejected");
                }
                for effect in effects {
                    next.extend(self.run_effect(effect).await);
                }
            }
            pending = next;
        }

        result
    }

    /// Read state through a closure
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&BoxOfficeState) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Registers or refreshes a show from the catalog.
    pub async fn sync_show(&self, show: Show) {
        tracing::debug!(show_id = %show.id, seats = show.seats.len(), "Show synced");
        let _ = self.reduce(BoxOfficeAction::ShowSynced { show }).await;
    }

    /// Seats still open for `show_id`, in display order.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ShowNotFound`] for unknown shows.
    pub async fn available_seats(
        &self,
        show_id: ShowId,
    ) -> Result<Vec<SeatAssignment>, BookingError> {
        self.state(|state| {
            state
                .show(&show_id)
                .map(|show| {
                    resolve_available_seats(&show.seats)
                        .into_iter()
                        .cloned()
                        .collect()
                })
                .ok_or(BookingError::ShowNotFound(show_id))
        })
        .await
    }

    /// Buys seats and returns the paid ticket.
    ///
    /// # Errors
    ///
    /// Returns the [`BookingError`] explaining why the purchase was refused.
    pub async fn purchase(
        &self,
        show_id: ShowId,
        user_id: UserId,
        seat_ids: Vec<SeatAssignmentId>,
        payment: PaymentMethod,
    ) -> Result<Ticket, BookingError> {
        let ticket_id = TicketId::new();
        self.send(BoxOfficeAction::PurchaseTickets {
            ticket_id,
            show_id,
            user_id,
            seat_ids,
            payment,
        })
        .await?;
        self.ticket(ticket_id).await
    }

    /// Cancels a ticket and returns it with its refund recorded.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::TicketNotFound`], [`BookingError::InvalidState`]
    /// or [`BookingError::TooLateToCancel`]; the ticket is unchanged then.
    pub async fn cancel(
        &self,
        ticket_id: TicketId,
        reason: Option<String>,
    ) -> Result<Ticket, BookingError> {
        self.send(BoxOfficeAction::CancelTicket { ticket_id, reason })
            .await?;
        self.ticket(ticket_id).await
    }

    /// Admits a ticket to its show.
    ///
    /// # Errors
    ///
    /// Returns the [`BookingError`] explaining why admission was refused.
    pub async fn admit(&self, ticket_id: TicketId) -> Result<Ticket, BookingError> {
        self.send(BoxOfficeAction::MarkTicketUsed { ticket_id })
            .await?;
        self.ticket(ticket_id).await
    }

    /// Current snapshot of a ticket
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::TicketNotFound`] for unknown tickets.
    pub async fn ticket(&self, ticket_id: TicketId) -> Result<Ticket, BookingError> {
        self.state(|state| state.ticket(&ticket_id).cloned())
            .await
            .ok_or(BookingError::TicketNotFound(ticket_id))
    }

    /// Order history for `user_id`, newest purchase first
    pub async fn tickets_for_user(&self, user_id: UserId) -> Vec<Ticket> {
        self.state(|state| {
            state
                .tickets_for_user(&user_id)
                .into_iter()
                .cloned()
                .collect()
        })
        .await
    }

    async fn reduce(
        &self,
        action: BoxOfficeAction,
    ) -> (Result<(), BookingError>, Vec<Effect<BoxOfficeAction>>) {
        let mut state = self.state.write().await;
        let effects = self.reducer.reduce(&mut state, action, &self.env);
        let result = state.last_error.clone().map_or(Ok(()), Err);
        let effects = effects.into_iter().filter(|e| !e.is_noop()).collect();
        (result, effects)
    }

    fn run_effect(&self, effect: Effect<BoxOfficeAction>) -> BoxFuture<'_, Vec<BoxOfficeAction>> {
        Box::pin(async move {
            match effect {
                Effect::None => Vec::new(),
                Effect::Future(fut) => fut.await.into_iter().collect(),
                Effect::Sequential(effects) => {
                    let mut actions = Vec::new();
                    for effect in effects {
                        actions.extend(self.run_effect(effect).await);
                    }
                    actions
                },
                Effect::Parallel(effects) => {
                    join_all(effects.into_iter().map(|effect| self.run_effect(effect)))
                        .await
                        .into_iter()
                        .flatten()
                        .collect()
                },
            }
        })
    }
}

impl std::fmt::Debug for BoxOffice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxOffice")
            .field("reducer", &self.reducer)
            .field("policy", &self.env.policy)
            .finish_non_exhaustive()
    }
}
