//! Declarative macros for building effects inside reducers.

/// Create an `Effect::Future` from an async block body.
///
/// The body must evaluate to `Option<Action>`; a `Some` result is fed back
/// into the reducer by whoever drives the effects.
///
/// # Example
///
/// ```rust,ignore
/// use cinema_core::async_effect;
///
/// async_effect! {
///     match issuer.issue_refund(ticket_id, amount).await {
///         Ok(reference) => Some(BoxOfficeAction::RefundIssued { ticket_id, reference }),
///         Err(e) => Some(BoxOfficeAction::RefundFailed { ticket_id, error: e.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
