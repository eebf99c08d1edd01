//! Multi-company comparison at the latest year.

use crate::dataset::Dataset;
use crate::error::{DashboardError, NoDataScope, Result};
use crate::models::{Company, MetricRecord};
use tracing::{debug, warn};

/// Result of comparing a selection of companies.
///
/// Each slot corresponds to one selected company, in selection order. A
/// company without a record at the comparison year keeps its slot with a
/// `NoData` error instead of being dropped.
#[derive(Debug)]
pub struct Comparison {
    /// Year the comparison was made for; `None` when nothing was selected
    /// from an empty dataset.
    pub year: Option<i32>,
    pub slots: Vec<ComparisonSlot>,
}

#[derive(Debug)]
pub struct ComparisonSlot {
    pub company: Company,
    pub outcome: Result<MetricRecord>,
}

impl Comparison {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when every selected company has a record.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.outcome.is_ok())
    }

    /// Records that were found, in selection order.
    pub fn records(&self) -> impl Iterator<Item = &MetricRecord> {
        self.slots.iter().filter_map(|s| s.outcome.as_ref().ok())
    }

    /// Per-selection errors, in selection order.
    pub fn errors(&self) -> impl Iterator<Item = &DashboardError> {
        self.slots.iter().filter_map(|s| s.outcome.as_ref().err())
    }

    /// All records, or the first per-selection error if any slot is missing.
    pub fn into_records(self) -> Result<Vec<MetricRecord>> {
        self.slots.into_iter().map(|s| s.outcome).collect()
    }
}

/// Compare the selected companies at the dataset-wide latest year.
///
/// Selection order is preserved and repeated identifiers keep their first
/// position. Any unknown identifier fails the whole comparison.
pub fn compare<S: AsRef<str>>(dataset: &Dataset, companies: &[S]) -> Result<Comparison> {
    let mut selection: Vec<Company> = Vec::with_capacity(companies.len());
    for id in companies {
        let company = Company::parse(id.as_ref())?;
        if !selection.contains(&company) {
            selection.push(company);
        }
    }

    let latest = dataset.latest_year();
    if selection.is_empty() {
        return Ok(Comparison {
            year: latest,
            slots: Vec::new(),
        });
    }

    let year = latest.ok_or(DashboardError::NoData(NoDataScope::Dataset))?;

    let slots: Vec<ComparisonSlot> = selection
        .into_iter()
        .map(|company| {
            let outcome = dataset.get(company, year).cloned().ok_or_else(|| {
                warn!("{} has no record for {}", company.id(), year);
                DashboardError::NoData(NoDataScope::CompanyYear { company, year })
            });
            ComparisonSlot { company, outcome }
        })
        .collect();

    debug!("Comparison for {}: {} selections", year, slots.len());
    Ok(Comparison {
        year: Some(year),
        slots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_support::record;

    fn scenario() -> Dataset {
        Dataset::from_records(vec![
            record(Company::Samsung, 2023, 1.0),
            record(Company::Samsung, 2024, 2.0),
            record(Company::Hyundai, 2024, 3.0),
            record(Company::Gs, 2023, 4.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_compare_empty_selection() {
        let empty: [&str; 0] = [];
        let comparison = compare(&scenario(), &empty).unwrap();

        assert!(comparison.is_empty());
        assert!(comparison.is_complete());
        assert_eq!(comparison.year, Some(2024));
    }

    #[test]
    fn test_compare_preserves_selection_order() {
        let comparison = compare(&scenario(), &["Hyundai", "Samsung"]).unwrap();
        let records = comparison.into_records().unwrap();

        assert_eq!(records[0], record(Company::Hyundai, 2024, 3.0));
        assert_eq!(records[1], record(Company::Samsung, 2024, 2.0));
    }

    #[test]
    fn test_compare_not_resorted() {
        let comparison = compare(&scenario(), &["Samsung", "Hyundai"]).unwrap();
        let companies: Vec<Company> = comparison.records().map(|r| r.company).collect();
        assert_eq!(companies, vec![Company::Samsung, Company::Hyundai]);
    }

    #[test]
    fn test_compare_deduplicates() {
        let comparison = compare(&scenario(), &["Samsung", "Hyundai", "samsung"]).unwrap();
        assert_eq!(comparison.len(), 2);
    }

    #[test]
    fn test_compare_unknown_company_fails() {
        let err = compare(&scenario(), &["Samsung", "Acme"]).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownCompany(ref id) if id == "Acme"));
    }

    #[test]
    fn test_compare_missing_record_is_collected() {
        let comparison = compare(&scenario(), &["GS", "Hyundai"]).unwrap();

        assert!(!comparison.is_complete());
        assert_eq!(comparison.len(), 2);
        assert_eq!(comparison.records().count(), 1);

        let errors: Vec<_> = comparison.errors().collect();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            DashboardError::NoData(NoDataScope::CompanyYear {
                company: Company::Gs,
                year: 2024
            })
        ));

        assert!(comparison.into_records().is_err());
    }

    #[test]
    fn test_compare_against_empty_dataset() {
        let err = compare(&Dataset::default(), &["Samsung"]).unwrap_err();
        assert!(matches!(err, DashboardError::NoData(NoDataScope::Dataset)));
    }
}
