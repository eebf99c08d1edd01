//! Aggregation of metric records into the dashboard's comparison views.
//!
//! All functions here are pure functions of a borrowed [`Dataset`](crate::dataset::Dataset).

pub mod company;
pub mod grouping;
pub mod scoring;
pub mod year;

pub use company::*;
pub use grouping::*;
pub use scoring::*;
pub use year::*;
