//! Partition of metric fields into the Safety and Environment tabs.

use crate::models::{Category, Company, MetricField, MetricRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Category a metric field is displayed under.
pub fn category_of(field: MetricField) -> Category {
    match field {
        MetricField::IncidentRate
        | MetricField::FatalityCount
        | MetricField::AuditCompliance
        | MetricField::InsuranceClaims => Category::Safety,
        MetricField::CarbonEmissions
        | MetricField::EnergyUsage
        | MetricField::RenewableRatio
        | MetricField::WasteGenerated
        | MetricField::RecyclingRate => Category::Environment,
    }
}

/// Fields belonging to a category, in display order.
pub fn fields_in(category: Category) -> Vec<MetricField> {
    MetricField::ALL
        .into_iter()
        .filter(|f| category_of(*f) == category)
        .collect()
}

/// A record's metric values split by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupedMetrics {
    pub safety: BTreeMap<MetricField, f64>,
    pub environment: BTreeMap<MetricField, f64>,
}

impl GroupedMetrics {
    pub fn get(&self, category: Category) -> &BTreeMap<MetricField, f64> {
        match category {
            Category::Safety => &self.safety,
            Category::Environment => &self.environment,
        }
    }
}

/// A grouped record, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedRow {
    pub company: Company,
    pub year: i32,
    pub metrics: GroupedMetrics,
}

/// Split a record's fields into the Safety and Environment groups.
pub fn group_fields(record: &MetricRecord) -> GroupedMetrics {
    let mut grouped = GroupedMetrics::default();

    for field in MetricField::ALL {
        let value = field.value(record);
        match category_of(field) {
            Category::Safety => grouped.safety.insert(field, value),
            Category::Environment => grouped.environment.insert(field, value),
        };
    }

    grouped
}

/// Group a whole aggregator output, preserving row order.
pub fn group_rows<'a>(records: impl IntoIterator<Item = &'a MetricRecord>) -> Vec<GroupedRow> {
    records
        .into_iter()
        .map(|record| GroupedRow {
            company: record.company,
            year: record.year,
            metrics: group_fields(record),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_support::record;

    #[test]
    fn test_group_fields_partitions_all_fields() {
        let grouped = group_fields(&record(Company::Samsung, 2024, 2.0));

        assert_eq!(grouped.safety.len(), 4);
        assert_eq!(grouped.environment.len(), 5);

        for field in MetricField::ALL {
            let in_safety = grouped.safety.contains_key(&field);
            let in_env = grouped.environment.contains_key(&field);
            assert!(in_safety ^ in_env, "{:?} must be in exactly one group", field);
        }
    }

    #[test]
    fn test_group_fields_values() {
        let r = record(Company::Gs, 2023, 3.0);
        let grouped = group_fields(&r);

        assert_eq!(grouped.safety[&MetricField::FatalityCount], 3.0);
        assert_eq!(
            grouped.get(Category::Environment)[&MetricField::CarbonEmissions],
            r.carbon_emissions
        );
    }

    #[test]
    fn test_fields_in() {
        assert_eq!(
            fields_in(Category::Safety),
            vec![
                MetricField::IncidentRate,
                MetricField::FatalityCount,
                MetricField::AuditCompliance,
                MetricField::InsuranceClaims,
            ]
        );
        assert_eq!(fields_in(Category::Environment).len(), 5);
    }

    #[test]
    fn test_group_rows_keeps_order() {
        let records = vec![
            record(Company::Samsung, 2024, 1.0),
            record(Company::Dl, 2024, 1.0),
        ];
        let rows = group_rows(&records);

        assert_eq!(rows[0].company, Company::Samsung);
        assert_eq!(rows[1].company, Company::Dl);
    }
}
