//! esgdash - safety and environmental (ESG) metrics for construction companies.
//!
//! The crate turns a validated collection of per-company, per-year metric
//! records into two comparison views: one company across years, and several
//! companies within the latest year. A [`Session`](session::Session) tracks
//! which view is active and what was selected.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod report;
pub mod session;

pub use dataset::{Dataset, DatasetStore};
pub use error::DashboardError;
pub use session::{ModeState, Session, View};
