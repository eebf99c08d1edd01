//! Year-oriented views: per-year snapshots and single-company trends.

use crate::dataset::Dataset;
use crate::error::{DashboardError, NoDataScope, Result};
use crate::models::{Company, MetricField, MetricRecord};
use serde::Serialize;
use tracing::{debug, warn};

/// One record per company for a single year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub year: i32,
    /// Rows ordered by company identifier.
    pub rows: Vec<MetricRecord>,
    /// Companies present in the dataset without a record for `year`.
    pub missing: Vec<Company>,
}

impl Snapshot {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Snapshot of every company at the dataset-wide latest year.
pub fn latest_snapshot(dataset: &Dataset) -> Result<Snapshot> {
    let year = dataset
        .latest_year()
        .ok_or(DashboardError::NoData(NoDataScope::Dataset))?;
    snapshot_at(dataset, year)
}

/// Snapshot of every company at `year`.
pub fn snapshot_at(dataset: &Dataset, year: i32) -> Result<Snapshot> {
    if dataset.is_empty() {
        return Err(DashboardError::NoData(NoDataScope::Dataset));
    }

    let mut rows = Vec::new();
    let mut missing = Vec::new();

    // `companies()` is already ordered by identifier.
    for company in dataset.companies() {
        match dataset.get(company, year) {
            Some(record) => rows.push(record.clone()),
            None => missing.push(company),
        }
    }

    if rows.is_empty() {
        return Err(DashboardError::NoData(NoDataScope::Year(year)));
    }

    if !missing.is_empty() {
        warn!(
            "{} of {} companies have no record for {}",
            missing.len(),
            missing.len() + rows.len(),
            year
        );
    }

    debug!("Snapshot for {}: {} rows", year, rows.len());
    Ok(Snapshot { year, rows, missing })
}

/// All records for a company, ascending by year.
///
/// A valid company without records yields an empty trend.
pub fn trend(dataset: &Dataset, company_id: &str) -> Result<Vec<MetricRecord>> {
    let company = Company::parse(company_id)?;
    let rows: Vec<MetricRecord> = dataset.records_for(company).cloned().collect();

    debug!("Trend for {}: {} years", company.id(), rows.len());
    Ok(rows)
}

/// The trend restricted to the inclusive range `from..=to`.
pub fn trend_in_range(
    dataset: &Dataset,
    company_id: &str,
    from: i32,
    to: i32,
) -> Result<Vec<MetricRecord>> {
    let (from, to) = if from <= to { (from, to) } else { (to, from) };
    let mut rows = trend(dataset, company_id)?;
    rows.retain(|r| (from..=to).contains(&r.year));
    Ok(rows)
}

/// Change of one metric between two consecutive trend rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearChange {
    pub field: MetricField,
    pub previous_year: i32,
    pub current_year: i32,
    pub previous: f64,
    pub current: f64,
    pub delta: f64,
}

impl YearChange {
    /// Whether the change moved in the desirable direction.
    pub fn is_improvement(&self) -> bool {
        if self.delta == 0.0 {
            return false;
        }
        (self.delta > 0.0) == self.field.higher_is_better()
    }
}

/// Per-field change between the last two rows of a year-ordered trend.
pub fn year_over_year(trend: &[MetricRecord]) -> Vec<YearChange> {
    let [.., previous, current] = trend else {
        return Vec::new();
    };

    MetricField::ALL
        .into_iter()
        .map(|field| {
            let before = field.value(previous);
            let after = field.value(current);
            YearChange {
                field,
                previous_year: previous.year,
                current_year: current.year,
                previous: before,
                current: after,
                delta: after - before,
            }
        })
        .collect()
}
