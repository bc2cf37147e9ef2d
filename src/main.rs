use clap::Parser;
use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::path::Path;
use tracing::{info, error};

mod cli;

use cli::{Cli, Commands};
use opendart::config::Config;
use opendart::dart::{
    BusinessReports, DisclosureType, DisclosureTypeDetail, FinancialStatementDivision,
    FinancialStatementTypeDetail, HttpTransport, Market, RecordKind, ReportPeriod, SortBy,
};
use opendart::export;

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "opendart=info");
    }

    let config = Config::from_env()?;

    // Initialize logging to both console and file
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

    let log_dir = config.log_file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let log_name = config.log_file.file_name().context("OPENDART_LOG_FILE must name a file")?;
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env())
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Report { kind, corp, year, period, format, output } => {
            let kind = Commands::parse_kind(kind)?;
            let period = Commands::parse_period(period)?;
            let format = Commands::parse_output_format(format)?;

            let reports = connect(&config)?;
            info!("Fetching {} for {} ({} {})", kind, corp, year, period);

            let records = match reports.fetch_kind(kind, corp, *year, period).await {
                Ok(records) => records,
                Err(e) => {
                    error!("Fetching {} failed: {}", kind, e);
                    return Err(e.into());
                }
            };

            match output {
                Some(path) => {
                    export::write_records_to_file(&records, format, Path::new(path))?;
                    info!("Wrote {} records to {}", records.len(), path);
                }
                None => export::write_records(&records, format, std::io::stdout().lock())?,
            }
        }

        Commands::All { corp, year, period } => {
            let period = Commands::parse_period(period)?;
            let reports = connect(&config)?;

            let results = try_join_all(
                RecordKind::ALL
                    .iter()
                    .map(|kind| reports.fetch_kind(*kind, corp, *year, period)),
            )
            .await?;

            println!("Business reports for {} ({} {}):", corp, year, period.label());
            for records in results {
                println!("  {:<30} {}", records.kind().slug(), records.len());
            }
        }

        Commands::Codes { table } => print_code_table(table)?,
    }

    Ok(())
}

fn connect(config: &Config) -> Result<BusinessReports<HttpTransport>> {
    config.validate()?;
    let transport = HttpTransport::from_config(config)?;
    Ok(BusinessReports::new(transport))
}

fn print_code_table(table: &str) -> Result<()> {
    let entries: Vec<(&str, &str)> = match table.to_lowercase().as_str() {
        "market" => Market::ALL.iter().map(|m| (m.code(), m.label())).collect(),
        "report-period" => ReportPeriod::ALL.iter().map(|p| (p.code(), p.label())).collect(),
        "fs-division" => FinancialStatementDivision::ALL.iter().map(|d| (d.code(), d.label())).collect(),
        "sort" => SortBy::ALL.iter().map(|s| (s.code(), s.label())).collect(),
        "disclosure-type" => DisclosureType::ALL.iter().map(|t| (t.code(), t.label())).collect(),
        "disclosure-detail" => DisclosureTypeDetail::ALL.iter().map(|d| (d.code(), d.label())).collect(),
        "statement-detail" => FinancialStatementTypeDetail::ALL.iter().map(|d| (d.code(), d.label())).collect(),
        other => anyhow::bail!(
            "Unknown code table: {}. Supported tables: market, report-period, fs-division, sort, \
             disclosure-type, disclosure-detail, statement-detail",
            other
        ),
    };

    for (code, label) in entries {
        println!("{:<8} {}", code, label);
    }
    Ok(())
}
