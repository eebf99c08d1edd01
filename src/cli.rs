//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// esgdash - Safety and environmental metrics for construction companies
///
/// Shows ESG metrics either for one company across years (year mode) or
/// for several companies within the latest year (company mode).
///
/// Examples:
///   esgdash
///   esgdash --company Samsung --from-year 2023 --to-year 2025
///   esgdash --mode company --companies Hyundai,Samsung,GS --rank
///   esgdash --mode company --companies DL,Daewoo --format json -o report.json
///   esgdash --format csv -o ESG_Data.csv
///   esgdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the JSON record collection
    ///
    /// Overrides the `[data] path` setting of the config file.
    #[arg(short, long, value_name = "FILE", env = "ESGDASH_DATA")]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .esgdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comparison mode to start in
    #[arg(short, long, default_value = "year", value_name = "MODE")]
    pub mode: ModeArg,

    /// Year for the snapshot table (defaults to the latest year)
    #[arg(short, long, value_name = "YEAR")]
    pub year: Option<i32>,

    /// Company whose yearly trend is shown (year mode)
    #[arg(long, value_name = "ID")]
    pub company: Option<String>,

    /// First year of the trend range (year mode)
    #[arg(long, value_name = "YEAR")]
    pub from_year: Option<i32>,

    /// Last year of the trend range (year mode)
    #[arg(long, value_name = "YEAR")]
    pub to_year: Option<i32>,

    /// Companies to compare, in display order (company mode, comma-separated)
    ///
    /// Example: --companies Hyundai,Samsung
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub companies: Option<Vec<String>>,

    /// Include the overall ESG ranking (company mode)
    #[arg(long)]
    pub rank: bool,

    /// Output format (markdown, json, csv)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path for the report (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .esgdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Comparison mode selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ModeArg {
    /// One company across years (default)
    #[default]
    Year,
    /// Several companies in the latest year
    Company,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
    /// CSV of the table rows only
    Csv,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let (Some(from), Some(to)) = (self.from_year, self.to_year) {
            if from > to {
                return Err(format!(
                    "--from-year ({}) must not be after --to-year ({})",
                    from, to
                ));
            }
        }

        match self.mode {
            ModeArg::Year => {
                if self.companies.is_some() {
                    return Err("--companies only applies to --mode company".to_string());
                }
                if self.rank {
                    return Err("--rank only applies to --mode company".to_string());
                }
                if self.company.is_none() && (self.from_year.is_some() || self.to_year.is_some())
                {
                    return Err("--from-year/--to-year require --company".to_string());
                }
            }
            ModeArg::Company => {
                if self.company.is_some() || self.from_year.is_some() || self.to_year.is_some() {
                    return Err(
                        "--company, --from-year and --to-year only apply to --mode year"
                            .to_string(),
                    );
                }
                if self.year.is_some() {
                    return Err("--year only applies to --mode year".to_string());
                }
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Trend year range, with an open bound filled in.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        match (self.from_year, self.to_year) {
            (None, None) => None,
            (from, to) => Some((from.unwrap_or(i32::MIN), to.unwrap_or(i32::MAX))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            data: Some(PathBuf::from("data/esg_data.json")),
            config: None,
            mode: ModeArg::Year,
            year: None,
            company: None,
            from_year: None,
            to_year: None,
            companies: None,
            rank: false,
            format: OutputFormat::Markdown,
            output: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_company_mode() {
        let args = Args::parse_from([
            "esgdash",
            "--mode",
            "company",
            "--companies",
            "Hyundai,Samsung",
            "--rank",
        ]);

        assert_eq!(args.mode, ModeArg::Company);
        assert_eq!(
            args.companies,
            Some(vec!["Hyundai".to_string(), "Samsung".to_string()])
        );
        assert!(args.rank);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_csv_format() {
        let args = Args::parse_from(["esgdash", "--format", "csv"]);
        assert_eq!(args.format, OutputFormat::Csv);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_year_range() {
        let mut args = make_args();
        args.company = Some("Samsung".to_string());
        args.from_year = Some(2025);
        args.to_year = Some(2023);
        assert!(args.validate().is_err());

        args.to_year = Some(2025);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_mode_specific_flags() {
        let mut args = make_args();
        args.companies = Some(vec!["GS".to_string()]);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.mode = ModeArg::Company;
        args.company = Some("GS".to_string());
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.from_year = Some(2023);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_year_range() {
        let mut args = make_args();
        assert_eq!(args.year_range(), None);

        args.from_year = Some(2024);
        assert_eq!(args.year_range(), Some((2024, i32::MAX)));

        args.to_year = Some(2025);
        assert_eq!(args.year_range(), Some((2024, 2025)));
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
