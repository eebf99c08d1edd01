//! Markdown and JSON report generation.
//!
//! Each report section is rendered as two tables, one per metric category,
//! mirroring the Safety and Environment tabs of the dashboard.

use super::{Report, ReportMetadata, ReportSection};
use crate::analysis::{category_of, fields_in, GroupedRow, Ranking, YearChange};
use crate::dataset::DatasetOverview;
use crate::models::{Category, Company, MetricField};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# ESG Dashboard Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));

    if let Some(ref overview) = report.overview {
        output.push_str(&generate_overview_section(overview));
    }

    for section in &report.sections {
        output.push_str(&generate_section(section));
    }

    if let Some(ref ranking) = report.ranking {
        output.push_str(&generate_ranking_section(ranking));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Data Source:** `{}`\n", metadata.data_source));
    section.push_str(&format!("- **Mode:** {}\n", metadata.mode));
    if let Some(year) = metadata.latest_year {
        section.push_str(&format!("- **Latest Year:** {}\n", year));
    }
    section.push('\n');

    section
}

/// Generate the data overview section.
fn generate_overview_section(overview: &DatasetOverview) -> String {
    let period = match (overview.first_year, overview.last_year) {
        (Some(first), Some(last)) if first != last => format!("{} - {}", first, last),
        (Some(first), _) => first.to_string(),
        _ => "-".to_string(),
    };

    let mut section = String::new();
    section.push_str("## 📋 Data Overview\n\n");
    section.push_str("| Companies | Data Period | ESG Indicators | Records |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        overview.company_count, period, overview.indicator_count, overview.record_count
    ));

    section
}

/// Generate one report section with a table per category.
fn generate_section(section: &ReportSection) -> String {
    let mut out = String::new();

    out.push_str(&format!("## {}\n\n", section.title));

    for error in &section.errors {
        out.push_str(&format!("> ⚠️ {}\n\n", error));
    }

    if !section.missing.is_empty() {
        let names: Vec<String> = section.missing.iter().map(|c| c.to_string()).collect();
        out.push_str(&format!("*No data for: {}*\n\n", names.join(", ")));
    }

    if section.rows.is_empty() {
        if section.errors.is_empty() {
            out.push_str("No records for this selection.\n\n");
        }
        return out;
    }

    for category in [Category::Safety, Category::Environment] {
        out.push_str(&generate_category_table(category, &section.rows));
    }

    if !section.changes.is_empty() {
        out.push_str(&generate_changes_block(&section.changes));
    }

    out
}

/// Generate the table for one category.
fn generate_category_table(category: Category, rows: &[GroupedRow]) -> String {
    let fields = fields_in(category);
    let mut table = String::new();

    let title = match category {
        Category::Safety => "Safety Metrics",
        Category::Environment => "Environmental Metrics",
    };
    table.push_str(&format!("### {} {}\n\n", category.emoji(), title));

    let headers: Vec<String> = fields.iter().map(|f| f.header()).collect();
    table.push_str(&format!("| Company | Year | {} |\n", headers.join(" | ")));
    table.push_str(&format!("|:---|:---:|{}\n", "---:|".repeat(fields.len())));

    for row in rows {
        let values: Vec<String> = fields
            .iter()
            .map(|f| {
                row.metrics
                    .get(category)
                    .get(f)
                    .map(|v| f.format_value(*v))
                    .unwrap_or_else(|| "N/A".to_string())
            })
            .collect();
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            row.company,
            row.year,
            values.join(" | ")
        ));
    }
    table.push('\n');

    table
}

/// Generate the year-over-year change list.
fn generate_changes_block(changes: &[YearChange]) -> String {
    let mut block = String::new();

    block.push_str("### Year-over-Year Change\n\n");
    for change in changes {
        let arrow = if change.delta < 0.0 { "🔻" } else { "🔺" };
        let direction = if change.delta < 0.0 {
            "decrease"
        } else {
            "increase"
        };
        let verdict = if change.is_improvement() { "✅" } else { "⚠️" };
        block.push_str(&format!(
            "- {} {} **{}**: {} {} vs {} ({} → {})\n",
            verdict,
            arrow,
            change.field,
            change.field.format_value(change.delta.abs()),
            direction,
            change.previous_year,
            change.field.format_value(change.previous),
            change.field.format_value(change.current),
        ));
    }
    block.push('\n');

    block
}

/// Generate the ranking section.
fn generate_ranking_section(ranking: &Ranking) -> String {
    let mut section = String::new();

    section.push_str("## 🏆 Overall Ranking\n\n");

    if ranking.scores.is_empty() {
        section.push_str("No companies to rank.\n\n");
        return section;
    }

    section.push_str("| Rank | Company | ESG Overall Score | Safety Score | Environmental Score |\n");
    section.push_str("|:---:|:---|:---:|:---:|:---:|\n");

    for (i, score) in ranking.scores.iter().enumerate() {
        let medal = match i {
            0 => "🥇",
            1 => "🥈",
            2 => "🥉",
            _ => "",
        };
        section.push_str(&format!(
            "| {} {} | {} | {:.1} | {:.1} | {:.1} |\n",
            medal,
            i + 1,
            score.company,
            score.overall,
            score.safety,
            score.environment
        ));
    }

    section.push_str(&format!(
        "\n*Industry average: {:.1} points*\n\n",
        ranking.average
    ));

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by esgdash v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Write the Markdown report to a file.
pub fn write_report(report: &Report, path: &Path) -> Result<()> {
    let content = generate_markdown_report(report);

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a JSON report to a file.
pub fn write_json_report(report: &Report, path: &Path) -> Result<()> {
    let content = generate_json_report(report)?;

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// One table row of a CSV report, using the input record keys as headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRow {
    pub section: String,
    pub company: Company,
    pub year: i32,
    pub incident_rate: Option<f64>,
    pub fatality_count: Option<f64>,
    pub audit_compliance: Option<f64>,
    pub insurance_claims: Option<f64>,
    pub carbon_emissions: Option<f64>,
    pub energy_usage: Option<f64>,
    pub renewable_ratio: Option<f64>,
    pub waste_generated: Option<f64>,
    pub recycling_rate: Option<f64>,
}

impl CsvRow {
    fn new(section: &str, row: &GroupedRow) -> Self {
        let value = |field: MetricField| {
            row.metrics
                .get(category_of(field))
                .get(&field)
                .copied()
        };

        Self {
            section: section.to_string(),
            company: row.company,
            year: row.year,
            incident_rate: value(MetricField::IncidentRate),
            fatality_count: value(MetricField::FatalityCount),
            audit_compliance: value(MetricField::AuditCompliance),
            insurance_claims: value(MetricField::InsuranceClaims),
            carbon_emissions: value(MetricField::CarbonEmissions),
            energy_usage: value(MetricField::EnergyUsage),
            renewable_ratio: value(MetricField::RenewableRatio),
            waste_generated: value(MetricField::WasteGenerated),
            recycling_rate: value(MetricField::RecyclingRate),
        }
    }
}

/// Generate a CSV report holding the table rows of every section.
///
/// Overview, change list and ranking are left out.
pub fn generate_csv_report(report: &Report) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for section in &report.sections {
        for row in &section.rows {
            writer.serialize(CsvRow::new(&section.title, row))?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Write a CSV report to a file.
pub fn write_csv_report(report: &Report, path: &Path) -> Result<()> {
    let content = generate_csv_report(report)?;

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
