//! Aggregate reducers for the cinema box office.

pub mod box_office;

pub use box_office::{BoxOfficeAction, BoxOfficeEnvironment, BoxOfficeReducer};
