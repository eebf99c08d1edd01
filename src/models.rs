//! Data models for the ESG dashboard.
//!
//! This module contains the core data structures used throughout
//! the application: companies, metric records and metric fields.

use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The fixed set of companies covered by the dataset.
///
/// Companies order by identifier, so dataset keys and listings agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Company {
    #[serde(rename = "Samsung")]
    Samsung,
    #[serde(rename = "Hyundai")]
    Hyundai,
    #[serde(rename = "GS")]
    Gs,
    #[serde(rename = "Daewoo")]
    Daewoo,
    #[serde(rename = "DL")]
    Dl,
}

impl Company {
    /// All companies, in declaration order.
    pub const ALL: [Company; 5] = [
        Company::Samsung,
        Company::Hyundai,
        Company::Gs,
        Company::Daewoo,
        Company::Dl,
    ];

    /// Returns the short identifier used in data files and selections.
    pub fn id(&self) -> &'static str {
        match self {
            Company::Samsung => "Samsung",
            Company::Hyundai => "Hyundai",
            Company::Gs => "GS",
            Company::Daewoo => "Daewoo",
            Company::Dl => "DL",
        }
    }

    /// Returns the full display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Company::Samsung => "Samsung C&T",
            Company::Hyundai => "Hyundai E&C",
            Company::Gs => "GS E&C",
            Company::Daewoo => "Daewoo E&C",
            Company::Dl => "DL E&C",
        }
    }

    /// Parse an identifier, reporting unknown ones as `UnknownCompany`.
    pub fn parse(id: &str) -> Result<Self, DashboardError> {
        let trimmed = id.trim();
        Company::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DashboardError::UnknownCompany(trimmed.to_string()))
    }
}

impl Ord for Company {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id().cmp(other.id())
    }
}

impl PartialOrd for Company {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Company {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Company::parse(s)
    }
}

/// Display category of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Safety,
    Environment,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Safety => write!(f, "Safety"),
            Category::Environment => write!(f, "Environment"),
        }
    }
}

impl Category {
    /// Returns an emoji representation of the category.
    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Safety => "🔒",
            Category::Environment => "🌱",
        }
    }
}

/// Unit a metric is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    PerMille,
    Persons,
    Percent,
    KrwMillion,
    TonnesCo2e,
    KwhPerSquareMeter,
    Tonnes,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::PerMille => "‰",
            Unit::Persons => "persons",
            Unit::Percent => "%",
            Unit::KrwMillion => "KRW million",
            Unit::TonnesCo2e => "tCO₂e",
            Unit::KwhPerSquareMeter => "kWh/㎡",
            Unit::Tonnes => "ton",
        }
    }
}

/// One of the nine metric fields carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricField {
    IncidentRate,
    FatalityCount,
    AuditCompliance,
    InsuranceClaims,
    CarbonEmissions,
    EnergyUsage,
    RenewableRatio,
    WasteGenerated,
    RecyclingRate,
}

impl MetricField {
    pub const ALL: [MetricField; 9] = [
        MetricField::IncidentRate,
        MetricField::FatalityCount,
        MetricField::AuditCompliance,
        MetricField::InsuranceClaims,
        MetricField::CarbonEmissions,
        MetricField::EnergyUsage,
        MetricField::RenewableRatio,
        MetricField::WasteGenerated,
        MetricField::RecyclingRate,
    ];

    /// Key used in the input record format.
    pub fn key(&self) -> &'static str {
        match self {
            MetricField::IncidentRate => "incidentRate",
            MetricField::FatalityCount => "fatalityCount",
            MetricField::AuditCompliance => "auditCompliance",
            MetricField::InsuranceClaims => "insuranceClaims",
            MetricField::CarbonEmissions => "carbonEmissions",
            MetricField::EnergyUsage => "energyUsage",
            MetricField::RenewableRatio => "renewableRatio",
            MetricField::WasteGenerated => "wasteGenerated",
            MetricField::RecyclingRate => "recyclingRate",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            MetricField::IncidentRate => "Incident Rate",
            MetricField::FatalityCount => "Fatalities",
            MetricField::AuditCompliance => "Safety Audit Compliance",
            MetricField::InsuranceClaims => "Insurance Claims",
            MetricField::CarbonEmissions => "Carbon Emissions",
            MetricField::EnergyUsage => "Energy Usage",
            MetricField::RenewableRatio => "Renewable Energy Ratio",
            MetricField::WasteGenerated => "Construction Waste",
            MetricField::RecyclingRate => "Recycling Rate",
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            MetricField::IncidentRate => Unit::PerMille,
            MetricField::FatalityCount => Unit::Persons,
            MetricField::AuditCompliance => Unit::Percent,
            MetricField::InsuranceClaims => Unit::KrwMillion,
            MetricField::CarbonEmissions => Unit::TonnesCo2e,
            MetricField::EnergyUsage => Unit::KwhPerSquareMeter,
            MetricField::RenewableRatio => Unit::Percent,
            MetricField::WasteGenerated => Unit::Tonnes,
            MetricField::RecyclingRate => Unit::Percent,
        }
    }

    /// Whether a larger value is the better outcome.
    pub fn higher_is_better(&self) -> bool {
        matches!(
            self,
            MetricField::AuditCompliance | MetricField::RenewableRatio | MetricField::RecyclingRate
        )
    }

    /// Read this field from a record.
    pub fn value(&self, record: &MetricRecord) -> f64 {
        match self {
            MetricField::IncidentRate => record.incident_rate,
            MetricField::FatalityCount => record.fatality_count,
            MetricField::AuditCompliance => record.audit_compliance,
            MetricField::InsuranceClaims => record.insurance_claims,
            MetricField::CarbonEmissions => record.carbon_emissions,
            MetricField::EnergyUsage => record.energy_usage,
            MetricField::RenewableRatio => record.renewable_ratio,
            MetricField::WasteGenerated => record.waste_generated,
            MetricField::RecyclingRate => record.recycling_rate,
        }
    }

    /// Column header, e.g. `Carbon Emissions (tCO₂e)`.
    pub fn header(&self) -> String {
        format!("{} ({})", self.label(), self.unit().symbol())
    }

    /// Format a value for display according to the field's unit.
    pub fn format_value(&self, value: f64) -> String {
        match self.unit() {
            Unit::Percent => format!("{:.1}%", value),
            Unit::PerMille => format!("{:.1}‰", value),
            Unit::TonnesCo2e | Unit::Tonnes | Unit::KrwMillion => group_thousands(value),
            Unit::Persons => format!("{:.0}", value),
            Unit::KwhPerSquareMeter => format!("{:.1}", value),
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Round to an integer and insert `,` every three digits.
fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

/// One observation for one company in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub company: Company,
    pub year: i32,
    /// Incidents per thousand workers.
    pub incident_rate: f64,
    pub fatality_count: f64,
    /// Share of passed safety audits.
    pub audit_compliance: f64,
    pub insurance_claims: f64,
    pub carbon_emissions: f64,
    /// Energy usage intensity per floor area.
    pub energy_usage: f64,
    pub renewable_ratio: f64,
    pub waste_generated: f64,
    pub recycling_rate: f64,
}

impl MetricRecord {
    /// Returns the `(company, year)` key identifying this record.
    pub fn key(&self) -> (Company, i32) {
        (self.company, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_parse() {
        assert_eq!(Company::parse("Samsung").unwrap(), Company::Samsung);
        assert_eq!(Company::parse(" hyundai ").unwrap(), Company::Hyundai);
        assert_eq!("dl".parse::<Company>().unwrap(), Company::Dl);

        let err = Company::parse("Acme").unwrap_err();
        assert!(matches!(err, DashboardError::UnknownCompany(ref id) if id == "Acme"));
    }

    #[test]
    fn test_company_order_follows_id() {
        let mut companies = Company::ALL.to_vec();
        companies.sort();

        let ids: Vec<&str> = companies.iter().map(|c| c.id()).collect();
        let mut sorted_ids = ids.clone();
        sorted_ids.sort_unstable();
        assert_eq!(ids, sorted_ids);
        assert!(Company::Dl < Company::Samsung);
    }

    #[test]
    fn test_company_serde_uses_id() {
        let json = serde_json::to_string(&Company::Gs).unwrap();
        assert_eq!(json, "\"GS\"");
    }

    #[test]
    fn test_field_keys_unique() {
        let mut keys: Vec<_> = MetricField::ALL.iter().map(|f| f.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), MetricField::ALL.len());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(MetricField::RecyclingRate.format_value(87.26), "87.3%");
        assert_eq!(MetricField::IncidentRate.format_value(0.42), "0.4‰");
        assert_eq!(MetricField::CarbonEmissions.format_value(1234567.4), "1,234,567");
        assert_eq!(MetricField::WasteGenerated.format_value(999.0), "999");
        assert_eq!(MetricField::FatalityCount.format_value(3.0), "3");
    }

    #[test]
    fn test_group_thousands_negative() {
        assert_eq!(group_thousands(-12345.0), "-12,345");
        assert_eq!(group_thousands(0.0), "0");
    }

    #[test]
    fn test_header() {
        assert_eq!(MetricField::EnergyUsage.header(), "Energy Usage (kWh/㎡)");
    }
}
