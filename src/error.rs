//! Error types for loading and querying ESG data.
//!
//! Load-time errors (`InvalidDocument`, `MalformedRecord`, `MissingField`,
//! `Io`, `Json`) are
//! fatal for a session. Query-time errors (`UnknownCompany`, `NoData`) are
//! reported per selection and never abort the rest of a view.

use crate::models::Company;
use std::fmt;
use thiserror::Error;

/// What a `NoData` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDataScope {
    /// The dataset holds no records at all.
    Dataset,
    /// No company has a record for this year.
    Year(i32),
    /// The company has no record for this year.
    CompanyYear { company: Company, year: i32 },
}

impl fmt::Display for NoDataScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDataScope::Dataset => write!(f, "dataset is empty"),
            NoDataScope::Year(year) => write!(f, "no company reported for {}", year),
            NoDataScope::CompanyYear { company, year } => {
                write!(f, "{} has no record for {}", company, year)
            }
        }
    }
}

/// Errors raised by the dataset loader and the aggregators.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Valid JSON, but neither a record array nor an object with `records`.
    #[error("Invalid data document: {0}")]
    InvalidDocument(String),

    /// A record is structurally invalid (duplicate key, unknown company, bad year).
    #[error("Malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// A metric field is absent or not numeric.
    #[error("Record #{index} is missing numeric field `{field}`")]
    MissingField { index: usize, field: String },

    /// The identifier is not one of the known companies.
    #[error("Unknown company identifier: {0}")]
    UnknownCompany(String),

    /// The selection matched no record.
    #[error("No data: {0}")]
    NoData(NoDataScope),

    /// The data file could not be read.
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),

    /// The data file is not valid JSON.
    #[error("Failed to parse data file: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    /// Returns true for errors that only affect a single selection.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DashboardError::UnknownCompany(_) | DashboardError::NoData(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
