//! Box office aggregate: ticket purchase, cancellation and admission.
//!
//! Every state change goes through a single event applied in one step. A
//! cancellation flips the ticket to `cancelled`, records the refund and
//! releases its seats in the same `TicketCancelled` event, so a ticket can
//! never be half-cancelled.

use crate::cancellation::CancellationPolicy;
use crate::config::Config;
use crate::error::{BookingError, ConfigError};
use crate::payment::PaymentMethod;
use crate::pricing::SeatSelection;
use crate::refund::RefundIssuer;
use crate::types::{
    BoxOfficeState, Money, RefundPercentage, RefundSettlement, SeatAssignmentId, Show, ShowId,
    Ticket, TicketId, TicketStatus, UserId,
};
use chrono::{DateTime, Utc};
use cinema_core::{
    async_effect, effect::Effect, environment::Clock, reducer::Reducer, smallvec, SmallVec,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Actions (Commands + Events)
// ============================================================================

/// Actions for the box office
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BoxOfficeAction {
    // Commands
    /// Buy seats for a show
    PurchaseTickets {
        /// Id for the new ticket
        ticket_id: TicketId,
        /// Show to book
        show_id: ShowId,
        /// Buyer
        user_id: UserId,
        /// Seat assignments picked by the buyer
        seat_ids: Vec<SeatAssignmentId>,
        /// Payment details
        payment: PaymentMethod,
    },

    /// Cancel a paid ticket and refund according to policy
    CancelTicket {
        /// Ticket to cancel
        ticket_id: TicketId,
        /// Optional free-text reason
        reason: Option<String>,
    },

    /// Admit a paid ticket once its show has started
    MarkTicketUsed {
        /// Ticket presented at the door
        ticket_id: TicketId,
    },

    // Events
    /// Latest snapshot of a show from the catalog
    ShowSynced {
        /// Show snapshot
        show: Show,
    },

    /// A ticket was issued and its seats booked
    TicketPurchased {
        /// The issued ticket
        ticket: Ticket,
    },

    /// A ticket was cancelled, refund fixed and seats released
    TicketCancelled {
        /// Cancelled ticket
        ticket_id: TicketId,
        /// Show whose seats are released
        show_id: ShowId,
        /// Seats made available again
        released_seats: Vec<SeatAssignmentId>,
        /// Refund owed
        refund_amount: Money,
        /// Refund tier applied
        refund_percentage: RefundPercentage,
        /// Customer's reason, verbatim
        reason: Option<String>,
        /// When cancelled
        cancelled_at: DateTime<Utc>,
    },

    /// A ticket was used for admission
    TicketUsed {
        /// Ticket admitted
        ticket_id: TicketId,
        /// When admitted
        used_at: DateTime<Utc>,
    },

    /// The refund was paid out
    RefundIssued {
        /// Ticket refunded
        ticket_id: TicketId,
        /// Processor reference
        reference: String,
    },

    /// The refund payout failed
    RefundFailed {
        /// Ticket whose refund failed
        ticket_id: TicketId,
        /// Failure description
        error: String,
    },

    /// A command was rejected
    ValidationFailed {
        /// Rejection reason
        error: BookingError,
    },
}

impl BoxOfficeAction {
    /// Returns true for requests that may be rejected
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::PurchaseTickets { .. } | Self::CancelTicket { .. } | Self::MarkTicketUsed { .. }
        )
    }

    /// Returns true for facts that are applied as-is
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the box office
#[derive(Clone)]
pub struct BoxOfficeEnvironment {
    /// Authoritative clock for cutoffs and timestamps
    pub clock: Arc<dyn Clock>,
    /// Refund tiers
    pub policy: CancellationPolicy,
    /// Maximum seats on one ticket
    pub max_seats_per_purchase: u32,
    /// Refund payout collaborator
    pub refunds: Arc<dyn RefundIssuer>,
}

impl BoxOfficeEnvironment {
    /// Creates an environment with the standard policy and an 8-seat limit
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, refunds: Arc<dyn RefundIssuer>) -> Self {
        Self {
            clock,
            policy: CancellationPolicy::standard(),
            max_seats_per_purchase: 8,
            refunds,
        }
    }

    /// Creates an environment from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configured refund tiers are inconsistent.
    pub fn from_config(
        config: &Config,
        clock: Arc<dyn Clock>,
        refunds: Arc<dyn RefundIssuer>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            clock,
            policy: config.cancellation_policy()?,
            max_seats_per_purchase: config.checkout.max_seats_per_purchase,
            refunds,
        })
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the box office
#[derive(Clone, Debug, Default)]
pub struct BoxOfficeReducer;

impl BoxOfficeReducer {
    /// Creates a new `BoxOfficeReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a purchase against the current show state.
    ///
    /// Returns the deduplicated seat selection and the price to charge.
    fn validate_purchase(
        state: &BoxOfficeState,
        env: &BoxOfficeEnvironment,
        ticket_id: TicketId,
        show_id: ShowId,
        seat_ids: Vec<SeatAssignmentId>,
        payment: &PaymentMethod,
    ) -> Result<(SeatSelection, Money), BookingError> {
        if state.tickets.contains_key(&ticket_id) {
            return Err(BookingError::TicketAlreadyExists(ticket_id));
        }

        let show = state
            .show(&show_id)
            .ok_or(BookingError::ShowNotFound(show_id))?;
        if !show.is_active {
            return Err(BookingError::ShowInactive(show_id));
        }
        let now = env.clock.now();
        if show.has_started(now) {
            return Err(BookingError::ShowAlreadyStarted(show_id));
        }

        let selection: SeatSelection = seat_ids.into_iter().collect();
        if selection.is_empty() {
            return Err(BookingError::EmptySelection);
        }
        if selection.len() > env.max_seats_per_purchase as usize {
            return Err(BookingError::TooManySeats {
                requested: selection.len(),
                max: env.max_seats_per_purchase,
            });
        }

        for seat_id in selection.seat_ids() {
            match show.seat(seat_id) {
                None => {
                    return Err(BookingError::SeatNotInShow {
                        seat_id: *seat_id,
                        show_id,
                    });
                },
                Some(seat) if seat.is_booked => {
                    return Err(BookingError::SeatUnavailable(*seat_id));
                },
                Some(_) => {},
            }
        }

        payment.validate(now)?;

        let total = selection.checkout_total(show.price)?;
        Ok((selection, total))
    }

    /// Applies an event to state
    fn apply_event(state: &mut BoxOfficeState, action: &BoxOfficeAction) {
        match action {
            BoxOfficeAction::ShowSynced { show } => {
                state.shows.insert(show.id, show.clone());
                state.last_error = None;
            },

            BoxOfficeAction::TicketPurchased { ticket } => {
                if let Some(show) = state.shows.get_mut(&ticket.show_id) {
                    for seat_id in &ticket.seats {
                        if let Some(seat) = show.seat_mut(seat_id) {
                            seat.is_booked = true;
                        }
                    }
                }
                state.tickets.insert(ticket.id, ticket.clone());
                state.last_error = None;
            },

            BoxOfficeAction::TicketCancelled {
                ticket_id,
                show_id,
                released_seats,
                refund_amount,
                refund_percentage,
                reason,
                cancelled_at,
            } => {
                if let Some(ticket) = state.tickets.get_mut(ticket_id) {
                    ticket.status = TicketStatus::Cancelled;
                    ticket.refund_amount = Some(*refund_amount);
                    ticket.refund_percentage = Some(*refund_percentage);
                    ticket.cancellation_reason.clone_from(reason);
                    ticket.cancelled_at = Some(*cancelled_at);
                }
                if let Some(show) = state.shows.get_mut(show_id) {
                    for seat_id in released_seats {
                        if let Some(seat) = show.seat_mut(seat_id) {
                            seat.is_booked = false;
                        }
                    }
                }
                state.last_error = None;
            },

            BoxOfficeAction::TicketUsed { ticket_id, .. } => {
                if let Some(ticket) = state.tickets.get_mut(ticket_id) {
                    ticket.status = TicketStatus::Used;
                }
                state.last_error = None;
            },

            BoxOfficeAction::RefundIssued {
                ticket_id,
                reference,
            } => {
                if let Some(ticket) = state.tickets.get_mut(ticket_id) {
                    ticket.refund_settlement = Some(RefundSettlement::Issued {
                        reference: reference.clone(),
                    });
                }
                state.last_error = None;
            },

            BoxOfficeAction::RefundFailed { ticket_id, error } => {
                if let Some(ticket) = state.tickets.get_mut(ticket_id) {
                    ticket.refund_settlement = Some(RefundSettlement::Failed {
                        error: error.clone(),
                    });
                }
                state.last_error = None;
            },

            BoxOfficeAction::ValidationFailed { error } => {
                state.last_error = Some(error.clone());
            },

            // Commands don't modify state
            BoxOfficeAction::PurchaseTickets { .. }
            | BoxOfficeAction::CancelTicket { .. }
            | BoxOfficeAction::MarkTicketUsed { .. } => {},
        }
    }

    fn reject(
        state: &mut BoxOfficeState,
        error: BookingError,
    ) -> SmallVec<[Effect<BoxOfficeAction>; 4]> {
        tracing::warn!(%error, "Box office command rejected");
        Self::apply_event(state, &BoxOfficeAction::ValidationFailed { error });
        SmallVec::new()
    }
}

impl Reducer for BoxOfficeReducer {
    type State = BoxOfficeState;
    type Action = BoxOfficeAction;
    type Environment = BoxOfficeEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Purchase ==========
            BoxOfficeAction::PurchaseTickets {
                ticket_id,
                show_id,
                user_id,
                seat_ids,
                payment,
            } => {
                let (selection, total) = match Self::validate_purchase(
                    state, env, ticket_id, show_id, seat_ids, &payment,
                ) {
                    Ok(validated) => validated,
                    Err(error) => return Self::reject(state, error),
                };

                let Some(show) = state.show(&show_id) else {
                    return Self::reject(state, BookingError::ShowNotFound(show_id));
                };
                let ticket = Ticket::paid(
                    ticket_id,
                    show,
                    user_id,
                    selection.seat_ids().to_vec(),
                    total,
                    env.clock.now(),
                );

                tracing::info!(
                    %ticket_id,
                    %show_id,
                    seats = ticket.seats.len(),
                    total = %total,
                    payment = %payment.display_label(),
                    "Ticket purchased"
                );
                Self::apply_event(state, &BoxOfficeAction::TicketPurchased { ticket });
                SmallVec::new()
            },

            // ========== Cancel ==========
            BoxOfficeAction::CancelTicket { ticket_id, reason } => {
                let Some(ticket) = state.ticket(&ticket_id) else {
                    return Self::reject(state, BookingError::TicketNotFound(ticket_id));
                };

                let now = env.clock.now();
                let quote = match env.policy.evaluate(ticket, now).into_result() {
                    Ok(quote) => quote,
                    Err(error) => return Self::reject(state, error),
                };

                let event = BoxOfficeAction::TicketCancelled {
                    ticket_id,
                    show_id: ticket.show_id,
                    released_seats: ticket.seats.clone(),
                    refund_amount: quote.amount,
                    refund_percentage: quote.percentage,
                    reason,
                    cancelled_at: now,
                };
                tracing::info!(
                    %ticket_id,
                    refund = %quote.amount,
                    percentage = quote.percentage.value(),
                    minutes_until_show = quote.until_show.num_minutes(),
                    "Ticket cancelled"
                );
                Self::apply_event(state, &event);

                if quote.amount.is_zero() {
                    return SmallVec::new();
                }

                let refunds = Arc::clone(&env.refunds);
                let amount = quote.amount;
                smallvec![async_effect! {
                    match refunds.issue_refund(ticket_id, amount).await {
                        Ok(receipt) => Some(BoxOfficeAction::RefundIssued {
                            ticket_id,
                            reference: receipt.reference,
                        }),
                        Err(e) => Some(BoxOfficeAction::RefundFailed {
                            ticket_id,
                            error: e.to_string(),
                        }),
                    }
                }]
            },

            // ========== Admission ==========
            BoxOfficeAction::MarkTicketUsed { ticket_id } => {
                let Some(ticket) = state.ticket(&ticket_id) else {
                    return Self::reject(state, BookingError::TicketNotFound(ticket_id));
                };
                if ticket.status != TicketStatus::Paid {
                    let error = BookingError::NotUsable {
                        ticket_id,
                        status: ticket.status,
                    };
                    return Self::reject(state, error);
                }
                let now = env.clock.now();
                if now < ticket.show_time {
                    let error = BookingError::ShowNotStarted(ticket.show_id);
                    return Self::reject(state, error);
                }

                tracing::debug!(%ticket_id, "Ticket admitted");
                Self::apply_event(
                    state,
                    &BoxOfficeAction::TicketUsed {
                        ticket_id,
                        used_at: now,
                    },
                );
                SmallVec::new()
            },

            // ========== Events ==========
            event => {
                Self::apply_event(state, &event);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::refund::MockRefundIssuer;
    use crate::types::{MovieId, SeatAssignment, SeatType, TheaterId};
    use chrono::Duration;
    use cinema_testing::{assertions, test_clock, ReducerTest};

    fn env() -> BoxOfficeEnvironment {
        BoxOfficeEnvironment::new(Arc::new(test_clock()), MockRefundIssuer::shared())
    }

    fn card() -> PaymentMethod {
        PaymentMethod::CreditCard {
            card_number: "4242424242424242".to_string(),
            expiry: "12/30".to_string(),
            cvv: "123".to_string(),
        }
    }

    fn show_in(hours: i64) -> Show {
        Show {
            id: ShowId::new(),
            movie_id: MovieId::new(),
            movie_title: "Alien".to_string(),
            theater_id: TheaterId::new(),
            starts_at: test_clock().now() + Duration::hours(hours),
            price: Money::from_cents(2000),
            is_active: true,
            seats: (1..=4)
                .map(|n| SeatAssignment::new(format!("A{n}"), SeatType::Regular))
                .collect(),
        }
    }

    fn state_with(show: &Show) -> BoxOfficeState {
        let mut state = BoxOfficeState::new();
        state.shows.insert(show.id, show.clone());
        state
    }

    fn state_with_ticket(show: &Show, seats: &[SeatAssignmentId]) -> (BoxOfficeState, TicketId) {
        let mut state = state_with(show);
        let ticket = Ticket::paid(
            TicketId::new(),
            show,
            UserId::new(),
            seats.to_vec(),
            show.price.checked_multiply(seats.len() as u64).unwrap(),
            test_clock().now() - Duration::days(1),
        );
        let ticket_id = ticket.id;
        BoxOfficeReducer::apply_event(&mut state, &BoxOfficeAction::TicketPurchased { ticket });
        (state, ticket_id)
    }

    #[test]
    fn purchase_books_seats_and_issues_paid_ticket() {
        let show = show_in(48);
        let seats = vec![show.seats[0].id, show.seats[2].id];
        let ticket_id = TicketId::new();
        let show_id = show.id;

        ReducerTest::new(BoxOfficeReducer::new())
            .with_env(env())
            .given_state(state_with(&show))
            .when_action(BoxOfficeAction::PurchaseTickets {
                ticket_id,
                show_id,
                user_id: UserId::new(),
                seat_ids: seats.clone(),
                payment: card(),
            })
            .then_state(move |state| {
                let ticket = state.ticket(&ticket_id).unwrap();
                assert_eq!(ticket.status, TicketStatus::Paid);
                assert_eq!(ticket.total_price, Money::from_cents(4000));
                assert_eq!(ticket.seats, seats);
                let show = state.show(&show_id).unwrap();
                let booked: Vec<bool> = show.seats.iter().map(|s| s.is_booked).collect();
                assert_eq!(booked, [true, false, true, false]);
                assert!(state.last_error.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn duplicate_seat_ids_are_charged_once() {
        let show = show_in(48);
        let seat = show.seats[1].id;
        let ticket_id = TicketId::new();

        ReducerTest::new(BoxOfficeReducer::new())
            .with_env(env())
            .given_state(state_with(&show))
            .when_action(BoxOfficeAction::PurchaseTickets {
                ticket_id,
                show_id: show.id,
                user_id: UserId::new(),
                seat_ids: vec![seat, seat],
                payment: card(),
            })
            .then_state(move |state| {
                let ticket = state.ticket(&ticket_id).unwrap();
                assert_eq!(ticket.seats, vec![seat]);
                assert_eq!(ticket.total_price, Money::from_cents(2000));
            })
            .run();
    }

    #[test]
    fn purchase_of_booked_seat_is_rejected() {
        let show = show_in(48);
        let seat = show.seats[0].id;
        let (state, _) = state_with_ticket(&show, &[seat]);

        ReducerTest::new(BoxOfficeReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(BoxOfficeAction::PurchaseTickets {
                ticket_id: TicketId::new(),
                show_id: show.id,
                user_id: UserId::new(),
                seat_ids: vec![seat],
                payment: card(),
            })
            .then_state(move |state| {
                assert_eq!(state.last_error, Some(BookingError::SeatUnavailable(seat)));
                assert_eq!(state.tickets.len(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn empty_purchase_is_rejected() {
        let show = show_in(48);

        ReducerTest::new(BoxOfficeReducer::new())
            .with_env(env())
            .given_state(state_with(&show))
            .when_action(BoxOfficeAction::PurchaseTickets {
                ticket_id: TicketId::new(),
                show_id: show.id,
                user_id: UserId::new(),
                seat_ids: Vec::new(),
                payment: card(),
            })
            .then_state(|state| {
                assert_eq!(state.last_error, Some(BookingError::EmptySelection));
                assert!(state.tickets.is_empty());
            })
            .run();
    }

    #[test]
    fn purchase_with_bad_payment_is_rejected() {
        let show = show_in(48);

        ReducerTest::new(BoxOfficeReducer::new())
            .with_env(env())
            .given_state(state_with(&show))
            .when_action(BoxOfficeAction::PurchaseTickets {
                ticket_id: TicketId::new(),
                show_id: show.id,
                user_id: UserId::new(),
                seat_ids: vec![show.seats[0].id],
                payment: PaymentMethod::Venmo {
                    handle: "nobody".to_string(),
                },
            })
            .then_state(|state| {
                assert!(matches!(
                    state.last_error,
                    Some(BookingError::InvalidPayment(_))
                ));
                assert!(state.shows.values().all(|s| s.seats.iter().all(|seat| !seat.is_booked)));
            })
            .run();
    }

    #[test]
    fn purchase_after_showtime_is_rejected() {
        let show = show_in(-1);

        ReducerTest::new(BoxOfficeReducer::new())
            .with_env(env())
            .given_state(state_with(&show))
            .when_action(BoxOfficeAction::PurchaseTickets {
                ticket_id: TicketId::new(),
                show_id: show.id,
                user_id: UserId::new(),
                seat_ids: vec![show.seats[0].id],
                payment: card(),
            })
            .then_state(move |state| {
                assert_eq!(state.last_error, Some(BookingError::ShowAlreadyStarted(show.id)));
            })
            .run();
    }

    #[test]
    fn cancel_two_hours_out_refunds_half_and_releases_seats() {
        let show = show_in(2);
        let seats = [show.seats[0].id, show.seats[1].id];
        let (state, ticket_id) = state_with_ticket(&show, &seats);
        let show_id = show.id;

        ReducerTest::new(BoxOfficeReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(BoxOfficeAction::CancelTicket {
                ticket_id,
                reason: Some("Running late".to_string()),
            })
            .then_state(move |state| {
                let ticket = state.ticket(&ticket_id).unwrap();
                assert_eq!(ticket.status, TicketStatus::Cancelled);
                assert_eq!(ticket.refund_amount, Some(Money::from_cents(2000)));
                assert_eq!(ticket.refund_percentage.map(|p| p.value()), Some(50));
                assert_eq!(ticket.cancellation_reason.as_deref(), Some("Running late"));
                assert_eq!(ticket.cancelled_at, Some(test_clock().now()));
                let show = state.show(&show_id).unwrap();
                assert!(show.seats.iter().all(|s| !s.is_booked));
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn cancel_inside_final_hour_changes_nothing() {
        let show = show_in(0);
        let seats = [show.seats[0].id];
        let (state, ticket_id) = state_with_ticket(&show, &seats);
        let show_id = show.id;

        ReducerTest::new(BoxOfficeReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(BoxOfficeAction::CancelTicket {
                ticket_id,
                reason: None,
            })
            .then_state(move |state| {
                assert!(matches!(
                    state.last_error,
                    Some(BookingError::TooLateToCancel { .. })
                ));
                let ticket = state.ticket(&ticket_id).unwrap();
                assert_eq!(ticket.status, TicketStatus::Paid);
                assert!(ticket.refund_amount.is_none());
                assert!(state.show(&show_id).unwrap().seats[0].is_booked);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn cancelled_ticket_cannot_be_cancelled_again() {
        let show = show_in(72);
        let seats = [show.seats[3].id];
        let (mut state, ticket_id) = state_with_ticket(&show, &seats);
        let env = env();
        let reducer = BoxOfficeReducer::new();

        reducer.reduce(
            &mut state,
            BoxOfficeAction::CancelTicket {
                ticket_id,
                reason: None,
            },
            &env,
        );
        let first = state.ticket(&ticket_id).unwrap().clone();

        let effects = reducer.reduce(
            &mut state,
            BoxOfficeAction::CancelTicket {
                ticket_id,
                reason: Some("again".to_string()),
            },
            &env,
        );

        assertions::assert_no_effects(&effects);
        assert_eq!(
            state.last_error,
            Some(BookingError::InvalidState {
                ticket_id,
                status: TicketStatus::Cancelled,
            })
        );
        assert_eq!(state.ticket(&ticket_id).unwrap(), &first);
    }

    #[test]
    fn cancelling_one_ticket_leaves_others_alone() {
        let show = show_in(30);
        let (mut state, ticket_a) = state_with_ticket(&show, &[show.seats[0].id]);
        let ticket_b = Ticket::paid(
            TicketId::new(),
            &show,
            UserId::new(),
            vec![show.seats[1].id],
            show.price,
            test_clock().now(),
        );
        let ticket_b_id = ticket_b.id;
        BoxOfficeReducer::apply_event(
            &mut state,
            &BoxOfficeAction::TicketPurchased { ticket: ticket_b },
        );
        let before = state.ticket(&ticket_b_id).unwrap().clone();

        BoxOfficeReducer::new().reduce(
            &mut state,
            BoxOfficeAction::CancelTicket {
                ticket_id: ticket_a,
                reason: None,
            },
            &env(),
        );

        assert_eq!(state.ticket(&ticket_b_id).unwrap(), &before);
        let seats = &state.show(&show.id).unwrap().seats;
        assert!(!seats[0].is_booked);
        assert!(seats[1].is_booked);
    }

    #[test]
    fn unknown_ticket_is_rejected() {
        let ticket_id = TicketId::new();

        ReducerTest::new(BoxOfficeReducer::new())
            .with_env(env())
            .given_state(BoxOfficeState::new())
            .when_action(BoxOfficeAction::CancelTicket {
                ticket_id,
                reason: None,
            })
            .then_state(move |state| {
                assert_eq!(state.last_error, Some(BookingError::TicketNotFound(ticket_id)));
            })
            .run();
    }

    #[test]
    fn ticket_cannot_be_used_before_showtime() {
        let show = show_in(3);
        let (state, ticket_id) = state_with_ticket(&show, &[show.seats[0].id]);
        let show_id = show.id;

        ReducerTest::new(BoxOfficeReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(BoxOfficeAction::MarkTicketUsed { ticket_id })
            .then_state(move |state| {
                assert_eq!(state.last_error, Some(BookingError::ShowNotStarted(show_id)));
                assert_eq!(state.ticket(&ticket_id).unwrap().status, TicketStatus::Paid);
            })
            .run();
    }

    #[test]
    fn refund_outcome_is_recorded_without_touching_amounts() {
        let show = show_in(30);
        let (mut state, ticket_id) = state_with_ticket(&show, &[show.seats[0].id]);
        let reducer = BoxOfficeReducer::new();
        reducer.reduce(
            &mut state,
            BoxOfficeAction::CancelTicket {
                ticket_id,
                reason: None,
            },
            &env(),
        );

        reducer.reduce(
            &mut state,
            BoxOfficeAction::RefundFailed {
                ticket_id,
                error: "processor unavailable".to_string(),
            },
            &env(),
        );

        let ticket = state.ticket(&ticket_id).unwrap();
        assert_eq!(ticket.refund_amount, Some(Money::from_cents(2000)));
        assert_eq!(ticket.refund_percentage, Some(RefundPercentage::FULL));
        assert!(matches!(
            ticket.refund_settlement,
            Some(RefundSettlement::Failed { .. })
        ));
    }

    #[test]
    fn commands_and_events_are_classified() {
        assert!(BoxOfficeAction::MarkTicketUsed { ticket_id: TicketId::new() }.is_command());
        assert!(BoxOfficeAction::ValidationFailed {
            error: BookingError::EmptySelection
        }
        .is_event());
    }
}
