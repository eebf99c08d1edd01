//! The validated, read-only collection of metric records.
//!
//! A `Dataset` holds at most one record per `(company, year)` pair. It is
//! built once by the loader and only ever handed out by reference.

pub mod loader;

pub use loader::*;

use crate::error::{DashboardError, Result};
use crate::models::{Company, MetricField, MetricRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Immutable collection of metric records keyed by `(company, year)`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: BTreeMap<(Company, i32), MetricRecord>,
}

/// Headline numbers describing a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub company_count: usize,
    pub record_count: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub indicator_count: usize,
}

impl Dataset {
    /// Build a dataset from typed records, rejecting duplicate keys.
    pub fn from_records(records: impl IntoIterator<Item = MetricRecord>) -> Result<Self> {
        let mut map = BTreeMap::new();

        for (index, record) in records.into_iter().enumerate() {
            let key = record.key();
            if map.insert(key, record).is_some() {
                return Err(DashboardError::MalformedRecord {
                    index,
                    reason: format!("duplicate record for {} in {}", key.0.id(), key.1),
                });
            }
        }

        Ok(Self { records: map })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records, ordered by company then year.
    pub fn records(&self) -> impl Iterator<Item = &MetricRecord> {
        self.records.values()
    }

    /// Look up the record for a company in a given year.
    pub fn get(&self, company: Company, year: i32) -> Option<&MetricRecord> {
        self.records.get(&(company, year))
    }

    /// Records for one company, ascending by year.
    pub fn records_for(&self, company: Company) -> impl Iterator<Item = &MetricRecord> {
        self.records
            .range((company, i32::MIN)..=(company, i32::MAX))
            .map(|(_, record)| record)
    }

    /// Dataset-wide latest year.
    pub fn latest_year(&self) -> Option<i32> {
        self.records.keys().map(|(_, year)| *year).max()
    }

    /// Latest year for which the company has a record.
    pub fn latest_year_for(&self, company: Company) -> Option<i32> {
        self.records_for(company).map(|r| r.year).max()
    }

    /// Companies present, ordered by identifier.
    pub fn companies(&self) -> Vec<Company> {
        let mut companies: Vec<Company> = self.records.keys().map(|(c, _)| *c).collect();
        companies.dedup();
        companies
    }

    /// Years present, ascending and unique.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.keys().map(|(_, y)| *y).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn overview(&self) -> DatasetOverview {
        let years = self.years();
        DatasetOverview {
            company_count: self.companies().len(),
            record_count: self.len(),
            first_year: years.first().copied(),
            last_year: years.last().copied(),
            indicator_count: MetricField::ALL.len(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;

    #[test]
    fn test_duplicate_key_rejected() {
        let result = Dataset::from_records(vec![
            record(Company::Samsung, 2024, 1.0),
            record(Company::Samsung, 2024, 2.0),
        ]);

        match result {
            Err(DashboardError::MalformedRecord { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("duplicate"));
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_latest_years() {
        let dataset = Dataset::from_records(vec![
            record(Company::Samsung, 2023, 1.0),
            record(Company::Samsung, 2024, 2.0),
            record(Company::Hyundai, 2022, 3.0),
        ])
        .unwrap();

        assert_eq!(dataset.latest_year(), Some(2024));
        assert_eq!(dataset.latest_year_for(Company::Samsung), Some(2024));
        assert_eq!(dataset.latest_year_for(Company::Hyundai), Some(2022));
        assert_eq!(dataset.latest_year_for(Company::Gs), None);
    }

    #[test]
    fn test_records_for_is_scoped_and_sorted() {
        let dataset = Dataset::from_records(vec![
            record(Company::Hyundai, 2024, 1.0),
            record(Company::Samsung, 2025, 2.0),
            record(Company::Samsung, 2023, 3.0),
        ])
        .unwrap();

        let years: Vec<i32> = dataset
            .records_for(Company::Samsung)
            .map(|r| r.year)
            .collect();
        assert_eq!(years, vec![2023, 2025]);
    }

    #[test]
    fn test_companies_sorted_by_identifier() {
        let dataset = Dataset::from_records(vec![
            record(Company::Samsung, 2024, 1.0),
            record(Company::Daewoo, 2024, 1.0),
            record(Company::Dl, 2024, 1.0),
            record(Company::Dl, 2023, 1.0),
        ])
        .unwrap();

        assert_eq!(
            dataset.companies(),
            vec![Company::Dl, Company::Daewoo, Company::Samsung]
        );

        let keys: Vec<_> = dataset.records().map(|r| r.key()).collect();
        assert_eq!(
            keys,
            vec![
                (Company::Dl, 2023),
                (Company::Dl, 2024),
                (Company::Daewoo, 2024),
                (Company::Samsung, 2024),
            ]
        );
    }

    #[test]
    fn test_overview() {
        let dataset = Dataset::from_records(vec![
            record(Company::Samsung, 2023, 1.0),
            record(Company::Gs, 2025, 1.0),
        ])
        .unwrap();

        let overview = dataset.overview();
        assert_eq!(overview.company_count, 2);
        assert_eq!(overview.record_count, 2);
        assert_eq!(overview.first_year, Some(2023));
        assert_eq!(overview.last_year, Some(2025));
        assert_eq!(overview.indicator_count, 9);

        let empty = Dataset::default().overview();
        assert_eq!(empty.first_year, None);
        assert_eq!(empty.company_count, 0);
    }
}
