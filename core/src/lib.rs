//! # Cinema Core
//!
//! Core traits and types shared by the cinema booking crates.
//!
//! Business logic is written as reducers: pure functions
//! `(State, Action, Environment) → (State, Effects)`. Everything a reducer
//! needs from the outside world (the current time, payment collaborators)
//! is injected through the environment, and every side effect is returned as
//! an [`Effect`](effect::Effect) description instead of being performed.
//!
//! ## Example
//!
//! ```ignore
//! use cinema_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! impl Reducer for BoxOfficeReducer {
//!     type State = BoxOfficeState;
//!     type Action = BoxOfficeAction;
//!     type Environment = BoxOfficeEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BoxOfficeState,
//!         action: BoxOfficeAction,
//!         env: &BoxOfficeEnvironment,
//!     ) -> SmallVec<[Effect<BoxOfficeAction>; 4]> {
//!         SmallVec::new()
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

mod effect_macros;

/// Reducer module - the trait every piece of business logic implements.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: Commands and events this reducer processes
    /// - `Environment`: Injected dependencies (clock, collaborators)
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Validates the action, updates `state` in place and returns the
        /// effects to run. Must not perform I/O itself.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions returned by reducers.
pub mod effect {
    use futures::future::BoxFuture;

    /// A side effect to be executed by the caller of a reducer.
    ///
    /// Effects are values. Returning one from a reducer does nothing until
    /// the owning service drives it.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// If the future resolves to `Some(action)`, that action is fed back
        /// into the reducer.
        Future(BoxFuture<'static, Option<Action>>),
    }

    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns true if running this effect can never produce an action
        #[must_use]
        pub fn is_noop(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_noop)
                },
                Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - dependency traits injected into reducers.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts "now" so cancellation windows can be tested
    /// against arbitrary instants.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time of the process that owns the booking state.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
