//! Given-When-Then harness for reducers.
//!
//! A test seeds a state, feeds one or more actions through the reducer and
//! then checks the final state and the effects the last action returned.
//! Nothing is executed: effects are only inspected, so refund payouts and
//! other futures never run here.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use cinema_core::{effect::Effect, reducer::Reducer, SmallVec};

type StateCheck<S> = Box<dyn FnOnce(&S)>;

type EffectCheck<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Builder that runs a reducer against a seeded state.
///
/// # Example
///
/// ```ignore
/// use cinema_testing::ReducerTest;
///
/// ReducerTest::new(BoxOfficeReducer::new())
///     .with_env(environment())
///     .given_state(state_with_paid_ticket)
///     .when_action(BoxOfficeAction::CancelTicket { ticket_id, reason: None })
///     .then_state(move |state| {
///         assert_eq!(state.ticket(&ticket_id).unwrap().status, TicketStatus::Cancelled);
///     })
///     .then_effects(assertions::assert_has_future_effect)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    env: Option<E>,
    state: Option<S>,
    actions: Vec<A>,
    state_checks: Vec<StateCheck<S>>,
    effect_checks: Vec<EffectCheck<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Starts a test for `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            env: None,
            state: None,
            actions: Vec::new(),
            state_checks: Vec::new(),
            effect_checks: Vec::new(),
        }
    }

    /// Environment handed to every reduction (clock, policy, collaborators)
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.env = Some(env);
        self
    }

    /// State before the first action
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.state = Some(state);
        self
    }

    /// Queues one action; repeated calls reduce in call order
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Queues several actions, e.g. a purchase followed by its cancellation
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Checks the state after the last action
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_checks.push(Box::new(check));
        self
    }

    /// Checks the effects returned by the last action
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_checks.push(Box::new(check));
        self
    }

    /// Reduces every queued action, then runs the checks.
    ///
    /// # Panics
    ///
    /// Panics if the state, environment or actions were never supplied, or
    /// if a check fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self.state.expect("seed the state with given_state()");
        let env = self.env.expect("supply an environment with with_env()");
        assert!(
            !self.actions.is_empty(),
            "queue at least one action with when_action()"
        );

        let mut effects = SmallVec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env);
        }

        for check in self.state_checks {
            check(&state);
        }
        for check in self.effect_checks {
            check(&effects);
        }
    }
}

/// Effect checks for [`ReducerTest::then_effects`]
pub mod assertions {
    use cinema_core::effect::Effect;

    /// Nothing to execute: an empty list or a lone `Effect::None`
    ///
    /// # Panics
    ///
    /// Panics if any real effect was returned.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_noop),
            "expected no effects, got {effects:?}"
        );
    }

    /// Exactly `expected` effects, no-ops included
    ///
    /// # Panics
    ///
    /// Panics on any other count.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "expected {expected} effects, got {}",
            effects.len()
        );
    }

    /// At least one async effect, such as a refund payout
    ///
    /// # Panics
    ///
    /// Panics if no `Effect::Future` was returned.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "expected an async effect, got none"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinema_core::effect::Effect;
    use cinema_core::reducer::Reducer;

    #[derive(Debug)]
    struct Row {
        open: u32,
    }

    #[derive(Debug)]
    enum SeatAction {
        Hold,
        Release,
        SoldOut,
    }

    struct RowReducer;

    impl Reducer for RowReducer {
        type State = Row;
        type Action = SeatAction;
        type Environment = ();

        fn reduce(
            &self,
            row: &mut Row,
            action: SeatAction,
            _env: &(),
        ) -> SmallVec<[Effect<SeatAction>; 4]> {
            match action {
                SeatAction::Hold if row.open > 0 => {
                    row.open -= 1;
                    if row.open == 0 {
                        smallvec::smallvec![Effect::Future(Box::pin(async {
                            Some(SeatAction::SoldOut)
                        }))]
                    } else {
                        smallvec::smallvec![Effect::None]
                    }
                },
                SeatAction::Release => {
                    row.open += 1;
                    smallvec::smallvec![Effect::None]
                },
                SeatAction::Hold | SeatAction::SoldOut => SmallVec::new(),
            }
        }
    }

    #[test]
    fn hold_takes_one_seat() {
        ReducerTest::new(RowReducer)
            .with_env(())
            .given_state(Row { open: 3 })
            .when_action(SeatAction::Hold)
            .then_state(|row| assert_eq!(row.open, 2))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn actions_reduce_in_order() {
        ReducerTest::new(RowReducer)
            .with_env(())
            .given_state(Row { open: 2 })
            .when_actions([SeatAction::Hold, SeatAction::Hold])
            .when_action(SeatAction::Release)
            .then_state(|row| assert_eq!(row.open, 1))
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn only_last_action_effects_are_checked() {
        ReducerTest::new(RowReducer)
            .with_env(())
            .given_state(Row { open: 1 })
            .when_actions([SeatAction::Hold, SeatAction::Hold])
            .then_state(|row| assert_eq!(row.open, 0))
            .then_effects(|effects| assertions::assert_effects_count(effects, 0))
            .run();
    }

    #[test]
    fn last_seat_reports_sold_out() {
        ReducerTest::new(RowReducer)
            .with_env(())
            .given_state(Row { open: 1 })
            .when_action(SeatAction::Hold)
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    #[should_panic(expected = "queue at least one action")]
    fn running_without_actions_panics() {
        ReducerTest::new(RowReducer)
            .with_env(())
            .given_state(Row { open: 1 })
            .run();
    }
}
