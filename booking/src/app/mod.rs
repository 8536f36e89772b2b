//! Application layer: the [`BoxOffice`] service that owns state and runs
//! the box office reducer's effects.

pub mod service;

pub use service::BoxOffice;
