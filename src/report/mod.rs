//! Rendering of session views into Markdown or JSON reports.
//!
//! A [`Report`] is a serializable snapshot of a [`View`]: every aggregator
//! output is passed through metric grouping and every query error is turned
//! into a per-section message.

pub mod generator;

pub use generator::*;

use crate::analysis::{group_rows, GroupedRow, Ranking, Snapshot, YearChange};
use crate::dataset::{Dataset, DatasetOverview};
use crate::error::{DashboardError, Result};
use crate::models::Company;
use crate::session::{ModeState, View};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Rendering options, usually taken from the `[report]` config section.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub include_overview: bool,
    /// Year-over-year changes at or below this magnitude are not listed.
    pub change_threshold: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_overview: true,
            change_threshold: 0.1,
        }
    }
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    /// Where the dataset was loaded from.
    pub data_source: String,
    pub mode: ModeState,
    pub latest_year: Option<i32>,
}

/// One titled table (rendered as a Safety and an Environment tab).
#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub rows: Vec<GroupedRow>,
    /// Companies with no record for the section's year.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<Company>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<YearChange>,
}

impl ReportSection {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
            missing: Vec::new(),
            errors: Vec::new(),
            changes: Vec::new(),
        }
    }

    fn failed(title: impl Into<String>, error: &DashboardError) -> Self {
        let mut section = Self::new(title);
        section.errors.push(error.to_string());
        section
    }
}

/// A complete rendered view.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<DatasetOverview>,
    pub sections: Vec<ReportSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Ranking>,
}

impl Report {
    /// Build a report from a view of `dataset`.
    pub fn from_view(
        view: &View,
        dataset: &Dataset,
        data_source: &str,
        options: &ReportOptions,
    ) -> Self {
        let metadata = ReportMetadata {
            generated_at: Utc::now(),
            data_source: data_source.to_string(),
            mode: view.mode(),
            latest_year: dataset.latest_year(),
        };

        let mut sections = Vec::new();
        let mut ranking = None;

        match view {
            View::Year(year_view) => {
                sections.push(snapshot_section(&year_view.snapshot));

                if let Some(trend) = &year_view.trend {
                    let title = format!("{} Yearly Trend", trend.company_id);
                    let section = match &trend.rows {
                        Ok(rows) => {
                            let mut section = ReportSection::new(title);
                            section.rows = group_rows(rows);
                            section.changes = trend
                                .changes
                                .iter()
                                .filter(|c| c.delta.abs() > options.change_threshold)
                                .cloned()
                                .collect();
                            section
                        }
                        Err(e) => ReportSection::failed(title, e),
                    };
                    sections.push(section);
                }
            }
            View::Company(company_view) => {
                sections.push(snapshot_section(&company_view.snapshot));

                let section = match &company_view.comparison {
                    Ok(comparison) => {
                        let title = match comparison.year {
                            Some(year) => format!("Company Comparison ({})", year),
                            None => "Company Comparison".to_string(),
                        };
                        let mut section = ReportSection::new(title);
                        section.rows = group_rows(comparison.records());
                        section.errors = comparison.errors().map(|e| e.to_string()).collect();
                        section
                    }
                    Err(e) => ReportSection::failed("Company Comparison", e),
                };
                sections.push(section);
                ranking = company_view.ranking.clone();
            }
        }

        Self {
            metadata,
            overview: options.include_overview.then(|| dataset.overview()),
            sections,
            ranking,
        }
    }
}

fn snapshot_section(snapshot: &Result<Snapshot>) -> ReportSection {
    match snapshot {
        Ok(snapshot) => {
            let mut section = ReportSection::new(format!("Year Data ({})", snapshot.year));
            section.rows = group_rows(&snapshot.rows);
            section.missing = snapshot.missing.clone();
            section
        }
        Err(e) => ReportSection::failed("Year Data", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_support::record;
    use crate::session::Session;

    fn scenario() -> Dataset {
        Dataset::from_records(vec![
            record(Company::Samsung, 2023, 1.0),
            record(Company::Samsung, 2024, 2.0),
            record(Company::Hyundai, 2024, 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_year_report_sections() {
        let dataset = scenario();
        let mut session = Session::new();
        session.select_company("Samsung");

        let report = Report::from_view(
            &session.view(&dataset),
            &dataset,
            "test.json",
            &ReportOptions::default(),
        );

        assert_eq!(report.metadata.mode, ModeState::Year);
        assert_eq!(report.metadata.latest_year, Some(2024));
        assert_eq!(report.sections.len(), 2);
        assert_eq!(report.sections[0].title, "Year Data (2024)");
        assert_eq!(report.sections[1].title, "Samsung Yearly Trend");
        assert_eq!(report.sections[1].rows.len(), 2);
        // Most seeded metrics move by well over 0.1 between seeds 1 and 2.
        assert!(!report.sections[1].changes.is_empty());
        assert!(report.overview.is_some());
        assert!(report.ranking.is_none());
    }

    #[test]
    fn test_change_threshold_filters() {
        let dataset = scenario();
        let mut session = Session::new();
        session.select_company("Samsung");

        let options = ReportOptions {
            include_overview: false,
            change_threshold: 1_000_000.0,
        };
        let report = Report::from_view(&session.view(&dataset), &dataset, "x", &options);

        assert!(report.sections[1].changes.is_empty());
        assert!(report.overview.is_none());
    }

    #[test]
    fn test_company_report_keeps_valid_rows() {
        let dataset = Dataset::from_records(vec![
            record(Company::Samsung, 2024, 1.0),
            record(Company::Gs, 2023, 1.0),
        ])
        .unwrap();
        let mut session = Session::new();
        session.toggle_mode();
        session.select_companies(["GS", "Samsung"]);
        session.include_ranking = true;

        let report = Report::from_view(
            &session.view(&dataset),
            &dataset,
            "x",
            &ReportOptions::default(),
        );

        let comparison = &report.sections[1];
        assert_eq!(comparison.title, "Company Comparison (2024)");
        assert_eq!(comparison.rows.len(), 1);
        assert_eq!(comparison.rows[0].company, Company::Samsung);
        assert_eq!(comparison.errors.len(), 1);
        assert!(comparison.errors[0].contains("GS E&C"));
        assert_eq!(report.sections[0].missing, vec![Company::Gs]);
        assert_eq!(report.ranking.unwrap().scores.len(), 1);
    }

    #[test]
    fn test_failed_section() {
        let dataset = Dataset::default();
        let session = Session::new();

        let report = Report::from_view(
            &session.view(&dataset),
            &dataset,
            "x",
            &ReportOptions::default(),
        );

        assert_eq!(report.sections.len(), 1);
        assert!(report.sections[0].rows.is_empty());
        assert!(report.sections[0].errors[0].contains("dataset is empty"));
    }
}
