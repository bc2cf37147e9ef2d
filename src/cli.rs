use clap::{Parser, Subcommand};
use opendart::dart::{RecordKind, ReportPeriod};
use opendart::export::OutputFormat;

#[derive(Parser)]
#[command(name = "opendart")]
#[command(about = "Typed access to OpenDART business reports for Korean listed companies")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one business report for a company
    Report {
        /// Report kind (capital-variation, dividend, treasury-shares, major-shareholders,
        /// largest-shareholder-changes, minority-shareholders)
        #[arg(short, long)]
        kind: String,

        /// Eight-digit DART corporation code
        #[arg(short, long)]
        corp: String,

        /// Business year (YYYY)
        #[arg(short, long)]
        year: i32,

        /// Report period (q1, half, q3, annual)
        #[arg(short, long, default_value = "annual")]
        period: String,

        /// Output format (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Fetch every supported business report for a company and print counts
    All {
        /// Eight-digit DART corporation code
        #[arg(short, long)]
        corp: String,

        /// Business year (YYYY)
        #[arg(short, long)]
        year: i32,

        /// Report period (q1, half, q3, annual)
        #[arg(short, long, default_value = "annual")]
        period: String,
    },

    /// Print an OpenDART code table
    Codes {
        /// Table name (market, report-period, fs-division, sort, disclosure-type,
        /// disclosure-detail, statement-detail)
        table: String,
    },
}

impl Commands {
    pub fn parse_kind(kind: &str) -> Result<RecordKind, anyhow::Error> {
        RecordKind::from_slug(kind).ok_or_else(|| {
            let supported: Vec<&str> = RecordKind::ALL.iter().map(|k| k.slug()).collect();
            anyhow::anyhow!("Unsupported report kind: {}. Supported kinds: {}", kind, supported.join(", "))
        })
    }

    pub fn parse_period(period: &str) -> Result<ReportPeriod, anyhow::Error> {
        ReportPeriod::from_slug(period)
            .or_else(|| ReportPeriod::lookup(period).ok())
            .ok_or_else(|| {
                anyhow::anyhow!("Unsupported report period: {}. Supported periods: q1, half, q3, annual", period)
            })
    }

    pub fn parse_output_format(format: &str) -> Result<OutputFormat, anyhow::Error> {
        OutputFormat::parse(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_accepts_slugs_and_codes() {
        assert_eq!(Commands::parse_period("half").unwrap(), ReportPeriod::SemiAnnual);
        assert_eq!(Commands::parse_period("11014").unwrap(), ReportPeriod::Q3);
        assert!(Commands::parse_period("q9").is_err());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(Commands::parse_kind("treasury-shares").unwrap(), RecordKind::TreasurySharesStatus);
        let err = Commands::parse_kind("directors").unwrap_err();
        assert!(err.to_string().contains("minority-shareholders"));
    }

    #[test]
    fn test_cli_parses_report_command() {
        let cli = Cli::try_parse_from([
            "opendart", "report", "--kind", "dividend", "--corp", "00126380", "--year", "2023",
        ])
        .unwrap();
        match cli.command {
            Commands::Report { kind, period, format, output, .. } => {
                assert_eq!(kind, "dividend");
                assert_eq!(period, "annual");
                assert_eq!(format, "table");
                assert!(output.is_none());
            }
            _ => panic!("expected report command"),
        }
    }
}
