//! Per-session mode and selection state.
//!
//! A `Session` is owned by whoever drives the UI. It records which comparison
//! mode is active and what the user selected, and turns that into a [`View`]
//! by running the matching aggregation against a borrowed dataset.

use crate::analysis::{
    compare, latest_snapshot, rank, snapshot_at, trend, trend_in_range, year_over_year,
    Comparison, Ranking, ScoreWeights, Snapshot, YearChange,
};
use crate::dataset::Dataset;
use crate::error::{DashboardError, Result};
use crate::models::MetricRecord;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Which comparison mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeState {
    /// One company across years.
    #[default]
    Year,
    /// Several companies within the latest year.
    Company,
}

impl ModeState {
    /// Flip to the other mode.
    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    pub fn toggled(self) -> Self {
        match self {
            ModeState::Year => ModeState::Company,
            ModeState::Company => ModeState::Year,
        }
    }
}

impl fmt::Display for ModeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeState::Year => write!(f, "Year comparison"),
            ModeState::Company => write!(f, "Company comparison"),
        }
    }
}

/// Transient UI state for one user session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: ModeState,
    /// Year shown in the snapshot table; latest when unset.
    pub snapshot_year: Option<i32>,
    /// Company whose trend is shown in Year mode.
    pub company: Option<String>,
    /// Inclusive year range applied to the trend.
    pub year_range: Option<(i32, i32)>,
    /// Companies compared in Company mode, in click order.
    pub companies: Vec<String>,
    pub include_ranking: bool,
    pub weights: ScoreWeights,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ModeState {
        self.mode
    }

    pub fn toggle_mode(&mut self) {
        self.mode.toggle();
        debug!("Mode switched to {}", self.mode);
    }

    pub fn select_year(&mut self, year: Option<i32>) {
        self.snapshot_year = year;
    }

    pub fn select_company(&mut self, company: impl Into<String>) {
        self.company = Some(company.into());
    }

    pub fn set_year_range(&mut self, range: Option<(i32, i32)>) {
        self.year_range = range;
    }

    pub fn select_companies<I, S>(&mut self, companies: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.companies = companies.into_iter().map(Into::into).collect();
    }

    /// Run the aggregation for the active mode.
    ///
    /// Query errors are kept inside the view so one failing selection does
    /// not blank out the rest.
    pub fn view(&self, dataset: &Dataset) -> View {
        match self.mode {
            ModeState::Year => View::Year(self.year_view(dataset)),
            ModeState::Company => View::Company(self.company_view(dataset)),
        }
    }

    fn year_view(&self, dataset: &Dataset) -> YearView {
        let snapshot = match self.snapshot_year {
            Some(year) => snapshot_at(dataset, year),
            None => latest_snapshot(dataset),
        };

        let trend = self.company.as_ref().map(|company_id| {
            let rows = match self.year_range {
                Some((from, to)) => trend_in_range(dataset, company_id, from, to),
                None => trend(dataset, company_id),
            };
            let changes = rows
                .as_ref()
                .map(|rows| year_over_year(rows))
                .unwrap_or_default();
            TrendView {
                company_id: company_id.clone(),
                rows,
                changes,
            }
        });

        YearView { snapshot, trend }
    }

    fn company_view(&self, dataset: &Dataset) -> CompanyView {
        let comparison = compare(dataset, self.companies.as_slice());
        let ranking = match (&comparison, self.include_ranking) {
            (Ok(comparison), true) => Some(rank(comparison.records(), self.weights)),
            _ => None,
        };

        CompanyView {
            snapshot: latest_snapshot(dataset),
            comparison,
            ranking,
        }
    }
}

/// Trend of the company picked in Year mode.
#[derive(Debug)]
pub struct TrendView {
    pub company_id: String,
    pub rows: Result<Vec<MetricRecord>>,
    pub changes: Vec<YearChange>,
}

#[derive(Debug)]
pub struct YearView {
    pub snapshot: Result<Snapshot>,
    pub trend: Option<TrendView>,
}

#[derive(Debug)]
pub struct CompanyView {
    pub snapshot: Result<Snapshot>,
    pub comparison: Result<Comparison>,
    pub ranking: Option<Ranking>,
}

/// Output of one aggregation pass, consumed by the renderer.
#[derive(Debug)]
pub enum View {
    Year(YearView),
    Company(CompanyView),
}

impl View {
    pub fn mode(&self) -> ModeState {
        match self {
            View::Year(_) => ModeState::Year,
            View::Company(_) => ModeState::Company,
        }
    }

    /// All query errors captured in this view.
    pub fn errors(&self) -> Vec<&DashboardError> {
        let mut errors = Vec::new();

        match self {
            View::Year(view) => {
                errors.extend(view.snapshot.as_ref().err());
                if let Some(trend) = &view.trend {
                    errors.extend(trend.rows.as_ref().err());
                }
            }
            View::Company(view) => {
                errors.extend(view.snapshot.as_ref().err());
                match &view.comparison {
                    Ok(comparison) => errors.extend(comparison.errors()),
                    Err(e) => errors.push(e),
                }
            }
        }

        errors
    }

    /// True when no selection came back empty.
    pub fn is_complete(&self) -> bool {
        let snapshot = match self {
            View::Year(view) => &view.snapshot,
            View::Company(view) => &view.snapshot,
        };
        let snapshot_complete = snapshot.as_ref().map_or(true, Snapshot::is_complete);
        snapshot_complete && self.errors().is_empty()
    }
}
