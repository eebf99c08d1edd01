//! Loading and validating metric records from JSON.
//!
//! The loader accepts either a bare array of records or an object of the form
//! `{"metadata": {...}, "records": [...]}`. Every entry is checked before any
//! record reaches the dataset, so aggregation never sees partial records.

use super::Dataset;
use crate::error::{DashboardError, Result};
use crate::models::{Company, MetricField, MetricRecord};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Owns the data file location and the dataset loaded from it.
///
/// The first successful `load()` reads and validates the file; later calls
/// return the same in-memory dataset without touching the disk. Failed loads
/// are not cached.
#[derive(Debug)]
pub struct DatasetStore {
    path: PathBuf,
    cached: OnceLock<Dataset>,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a dataset has already been loaded.
    pub fn is_loaded(&self) -> bool {
        self.cached.get().is_some()
    }

    /// Load the dataset, reading the file only on the first successful call.
    pub fn load(&self) -> Result<&Dataset> {
        if let Some(dataset) = self.cached.get() {
            debug!("Dataset cache hit for {}", self.path.display());
            return Ok(dataset);
        }

        let dataset = load_file(&self.path)?;
        Ok(self.cached.get_or_init(|| dataset))
    }
}

/// Read and validate a data file.
pub fn load_file(path: &Path) -> Result<Dataset> {
    debug!("Reading data file: {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let dataset = parse_dataset(&content)?;

    info!(
        "Loaded {} records for {} companies from {}",
        dataset.len(),
        dataset.companies().len(),
        path.display()
    );

    Ok(dataset)
}

/// Parse and validate a JSON document into a dataset.
pub fn parse_dataset(content: &str) -> Result<Dataset> {
    let document: Value = serde_json::from_str(content)?;
    let entries = record_entries(document)?;

    let records = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_record(index, entry))
        .collect::<Result<Vec<_>>>()?;

    Dataset::from_records(records)
}

/// Extract the list of record entries from either accepted document shape.
fn record_entries(document: Value) -> Result<Vec<Value>> {
    match document {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut object) => {
            if let Some(metadata) = object.get("metadata") {
                debug!("Ignoring dataset metadata: {}", metadata);
            }
            match object.remove("records") {
                Some(Value::Array(entries)) => Ok(entries),
                _ => Err(DashboardError::InvalidDocument(
                    "expected a `records` array".to_string(),
                )),
            }
        }
        _ => Err(DashboardError::InvalidDocument(
            "expected an array of records or an object with `records`".to_string(),
        )),
    }
}

/// Validate a single entry.
fn parse_record(index: usize, entry: &Value) -> Result<MetricRecord> {
    let object = entry
        .as_object()
        .ok_or_else(|| malformed(index, "entry is not an object"))?;

    let company_id = object
        .get("company")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(index, "missing company identifier"))?;
    let company = Company::parse(company_id)
        .map_err(|_| malformed(index, &format!("unknown company `{}`", company_id)))?;

    let year = object
        .get("year")
        .and_then(Value::as_i64)
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| malformed(index, "missing or non-integer year"))?;

    let metric = |field: MetricField| metric_value(object, index, field);

    Ok(MetricRecord {
        company,
        year,
        incident_rate: metric(MetricField::IncidentRate)?,
        fatality_count: metric(MetricField::FatalityCount)?,
        audit_compliance: metric(MetricField::AuditCompliance)?,
        insurance_claims: metric(MetricField::InsuranceClaims)?,
        carbon_emissions: metric(MetricField::CarbonEmissions)?,
        energy_usage: metric(MetricField::EnergyUsage)?,
        renewable_ratio: metric(MetricField::RenewableRatio)?,
        waste_generated: metric(MetricField::WasteGenerated)?,
        recycling_rate: metric(MetricField::RecyclingRate)?,
    })
}

fn metric_value(object: &Map<String, Value>, index: usize, field: MetricField) -> Result<f64> {
    object
        .get(field.key())
        .and_then(Value::as_f64)
        .ok_or_else(|| DashboardError::MissingField {
            index,
            field: field.key().to_string(),
        })
}

fn malformed(index: usize, reason: &str) -> DashboardError {
    DashboardError::MalformedRecord {
        index,
        reason: reason.to_string(),
    }
}
