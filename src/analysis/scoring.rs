//! ESG scoring and ranking for a set of comparison rows.
//!
//! Lower-is-better metrics are scored relative to the worst value in the set
//! (`100 - v / max * 50`). Audit compliance and recycling rate score their raw
//! percentage and the renewable ratio is weighted by 1.5. Insurance claims
//! are shown in the Safety tab but take no part in the safety score.

use super::grouping::fields_in;
use crate::models::{Category, Company, MetricField, MetricRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const RENEWABLE_WEIGHT: f64 = 1.5;

/// Fields averaged into the safety score.
const SAFETY_SCORED: [MetricField; 3] = [
    MetricField::IncidentRate,
    MetricField::FatalityCount,
    MetricField::AuditCompliance,
];

/// Fields averaged into a category score.
fn scored_fields(category: Category) -> Vec<MetricField> {
    match category {
        Category::Safety => SAFETY_SCORED.to_vec(),
        Category::Environment => fields_in(Category::Environment),
    }
}

/// Weights combining category scores into the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub safety: f64,
    pub environment: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            safety: 0.4,
            environment: 0.6,
        }
    }
}

/// Scores for one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EsgScore {
    pub company: Company,
    pub year: i32,
    pub safety: f64,
    pub environment: f64,
    pub overall: f64,
}

/// Companies ordered by overall score, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub scores: Vec<EsgScore>,
    /// Mean overall score across the ranked companies.
    pub average: f64,
}

impl Ranking {
    /// Companies scoring above the average.
    pub fn above_average(&self) -> impl Iterator<Item = &EsgScore> {
        self.scores.iter().filter(|s| s.overall > self.average)
    }
}

/// Score of a single field value against the worst value in the set.
fn field_score(field: MetricField, value: f64, max: f64) -> f64 {
    match field {
        MetricField::RenewableRatio => value * RENEWABLE_WEIGHT,
        f if f.higher_is_better() => value,
        // Normalised against at least one fatality.
        MetricField::FatalityCount => 100.0 - (value / max.max(1.0)) * 50.0,
        _ if max <= 0.0 => 100.0,
        _ => 100.0 - (value / max) * 50.0,
    }
}

/// Score and rank the given records.
pub fn rank<'a>(
    records: impl IntoIterator<Item = &'a MetricRecord>,
    weights: ScoreWeights,
) -> Ranking {
    let records: Vec<&MetricRecord> = records.into_iter().collect();
    if records.is_empty() {
        return Ranking {
            scores: Vec::new(),
            average: 0.0,
        };
    }

    let maxima: HashMap<MetricField, f64> = MetricField::ALL
        .into_iter()
        .map(|field| {
            let max = records
                .iter()
                .map(|r| field.value(r))
                .fold(f64::MIN, f64::max);
            (field, max)
        })
        .collect();

    let category_score = |record: &MetricRecord, category: Category| -> f64 {
        let fields = scored_fields(category);
        let total: f64 = fields
            .iter()
            .map(|f| field_score(*f, f.value(record), maxima[f]))
            .sum();
        total / fields.len() as f64
    };

    let mut scores: Vec<EsgScore> = records
        .iter()
        .map(|&record| {
            let safety = category_score(record, Category::Safety);
            let environment = category_score(record, Category::Environment);
            EsgScore {
                company: record.company,
                year: record.year,
                safety,
                environment,
                overall: weights.safety * safety + weights.environment * environment,
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        b.overall
            .partial_cmp(&a.overall)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let average = scores.iter().map(|s| s.overall).sum::<f64>() / scores.len() as f64;
    Ranking { scores, average }
}
