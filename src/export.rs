//! Rendering decoded records as CSV, JSON or an aligned text table

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

use crate::dart::{
    CapitalVariation, DividendInfo, Filing, LargestShareholderChange, MajorShareholder,
    MinorityShareholdersStatus, Number, ReportRecords, TreasurySharesStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self> {
        match format.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow::anyhow!(
                "Unsupported output format: {}. Supported formats: table, csv, json",
                other
            )),
        }
    }
}

/// A record that can be flattened into one row of named columns
pub trait Tabular {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

const FILING_HEADERS: [&str; 4] = ["receipt_no", "market", "corporation_code", "corporation_name"];

fn filing_cells(filing: &Filing) -> Vec<String> {
    vec![
        filing.receipt_no.clone(),
        filing.market.to_string(),
        filing.corporation_code.clone(),
        filing.corporation_name.clone(),
    ]
}

fn with_filing(extra: &[&'static str]) -> Vec<&'static str> {
    FILING_HEADERS.iter().chain(extra.iter()).copied().collect()
}

fn optional_number(value: &Option<Number>) -> String {
    value.as_ref().map(|n| n.to_string()).unwrap_or_default()
}

fn optional_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn optional_date(value: &Option<NaiveDate>) -> String {
    value.as_ref().map(|d| d.to_string()).unwrap_or_default()
}

impl Tabular for CapitalVariation {
    fn headers() -> Vec<&'static str> {
        with_filing(&["issue_date", "title", "stock_type", "quantity", "face_value", "issue_price"])
    }

    fn row(&self) -> Vec<String> {
        let mut cells = filing_cells(&self.filing);
        cells.extend([
            optional_date(&self.issue_date),
            optional_text(&self.title),
            optional_text(&self.stock_type),
            self.quantity.to_string(),
            self.face_value.to_string(),
            self.issue_price.to_string(),
        ]);
        cells
    }
}

impl Tabular for DividendInfo {
    fn headers() -> Vec<&'static str> {
        with_filing(&["title", "stock_type", "current_term", "prev_term", "prev_prev_term"])
    }

    fn row(&self) -> Vec<String> {
        let mut cells = filing_cells(&self.filing);
        cells.extend([
            optional_text(&self.title),
            optional_text(&self.stock_type),
            self.current_term.to_string(),
            self.prev_term.to_string(),
            self.prev_prev_term.to_string(),
        ]);
        cells
    }
}

impl Tabular for TreasurySharesStatus {
    fn headers() -> Vec<&'static str> {
        with_filing(&[
            "stock_type",
            "acquisition_method_1",
            "acquisition_method_2",
            "acquisition_method_3",
            "quantity_term_start",
            "acquired",
            "disposed",
            "retired",
            "quantity_term_end",
            "remarks",
        ])
    }

    fn row(&self) -> Vec<String> {
        let mut cells = filing_cells(&self.filing);
        cells.push(optional_text(&self.stock_type));
        cells.extend(self.acquisition_methods.iter().map(optional_text));
        cells.extend([
            optional_number(&self.quantity_term_start),
            optional_number(&self.acquired),
            optional_number(&self.disposed),
            optional_number(&self.retired),
            optional_number(&self.quantity_term_end),
            optional_text(&self.remarks),
        ]);
        cells
    }
}

impl Tabular for MajorShareholder {
    fn headers() -> Vec<&'static str> {
        with_filing(&[
            "name",
            "relation",
            "stock_type",
            "term_start_quantity",
            "term_start_ratio",
            "term_end_quantity",
            "term_end_ratio",
            "remarks",
        ])
    }

    fn row(&self) -> Vec<String> {
        let mut cells = filing_cells(&self.filing);
        cells.extend([
            optional_text(&self.name),
            optional_text(&self.relation),
            optional_text(&self.stock_type),
            optional_number(&self.term_start.quantity),
            optional_number(&self.term_start.shareholding_ratio),
            optional_number(&self.term_end.quantity),
            optional_number(&self.term_end.shareholding_ratio),
            optional_text(&self.remarks),
        ]);
        cells
    }
}

impl Tabular for LargestShareholderChange {
    fn headers() -> Vec<&'static str> {
        with_filing(&[
            "changed_at",
            "largest_shareholder_name",
            "quantity",
            "shareholding_ratio",
            "cause",
            "remarks",
        ])
    }

    fn row(&self) -> Vec<String> {
        let mut cells = filing_cells(&self.filing);
        cells.extend([
            self.changed_at.to_string(),
            optional_text(&self.largest_shareholder_name),
            self.quantity.to_string(),
            self.shareholding_ratio.to_string(),
            optional_text(&self.cause),
            optional_text(&self.remarks),
        ]);
        cells
    }
}

impl Tabular for MinorityShareholdersStatus {
    fn headers() -> Vec<&'static str> {
        with_filing(&[
            "minority_shareholders_count",
            "total_shareholders_count",
            "minority_shareholders_ratio",
            "minority_shares",
            "total_shares",
            "minority_shares_ratio",
        ])
    }

    fn row(&self) -> Vec<String> {
        let mut cells = filing_cells(&self.filing);
        cells.extend([
            self.minority_shareholders_count.to_string(),
            optional_number(&self.total_shareholders_count),
            self.minority_shareholders_ratio.to_string(),
            self.minority_shares.to_string(),
            optional_number(&self.total_shares),
            self.minority_shares_ratio.to_string(),
        ]);
        cells
    }
}

pub fn write_csv<R: Tabular, W: Write>(records: &[R], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(R::headers())?;
    for record in records {
        csv_writer.write_record(record.row())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Columns padded by display width so Hangul lines up
pub fn render_table<R: Tabular>(records: &[R]) -> String {
    let headers = R::headers();
    let rows: Vec<Vec<String>> = records.iter().map(Tabular::row).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let format_line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{}{}", cell, " ".repeat(width - cell.width())))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(headers.clone())];
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &rows {
        lines.push(format_line(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

fn write_as<R, W>(records: &[R], format: OutputFormat, mut writer: W) -> Result<()>
where
    R: Tabular + serde::Serialize,
    W: Write,
{
    match format {
        OutputFormat::Csv => write_csv(records, writer),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, records)?;
            writeln!(writer)?;
            Ok(())
        }
        OutputFormat::Table => {
            writeln!(writer, "{}", render_table(records))?;
            Ok(())
        }
    }
}

/// Write records of any kind in the requested format
pub fn write_records<W: Write>(records: &ReportRecords, format: OutputFormat, writer: W) -> Result<()> {
    match records {
        ReportRecords::CapitalVariation(r) => write_as(r, format, writer),
        ReportRecords::DividendInfo(r) => write_as(r, format, writer),
        ReportRecords::TreasurySharesStatus(r) => write_as(r, format, writer),
        ReportRecords::MajorShareholder(r) => write_as(r, format, writer),
        ReportRecords::LargestShareholderChange(r) => write_as(r, format, writer),
        ReportRecords::MinorityShareholdersStatus(r) => write_as(r, format, writer),
    }
}

pub fn write_records_to_file(records: &ReportRecords, format: OutputFormat, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create output directory: {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create output file: {}", path.display()))?;
    write_records(records, format, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dart::{Decode, Market, RawRow};
    use tempfile::TempDir;

    fn dividend(title: &str, current: &str) -> DividendInfo {
        let row: RawRow = [
            ("rcept_no", "20240312000736"),
            ("corp_cls", "Y"),
            ("corp_code", "00126380"),
            ("corp_name", "삼성전자"),
            ("se", title),
            ("stock_knd", "보통주"),
            ("thstrm", current),
            ("frmtrm", "1,444"),
            ("lwfr", "2,994"),
        ]
        .into_iter()
        .collect();
        DividendInfo::decode(&row).unwrap()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("CSV").unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::parse("table").unwrap(), OutputFormat::Table);
        assert!(OutputFormat::parse("xml").is_err());
    }

    #[test]
    fn test_write_csv() {
        let mut buffer = Vec::new();
        write_csv(&[dividend("주당 현금배당금(원)", "1,444")], &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "receipt_no,market,corporation_code,corporation_name,title,stock_type,current_term,prev_term,prev_prev_term"
        );
        assert_eq!(
            lines.next().unwrap(),
            "20240312000736,KOSPI,00126380,삼성전자,주당 현금배당금(원),보통주,1444,1444,2994"
        );
    }

    #[test]
    fn test_render_table_aligns_wide_characters() {
        let table = render_table(&[dividend("현금배당성향(%)", "26.0")]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        let header_title = lines[0].find("title").unwrap();
        assert!(lines[1].starts_with("--------------"));
        assert!(lines[2].contains("26.0"));
        assert!(header_title > 0);
    }

    #[test]
    fn test_headers_match_row_length() {
        let record = dividend("주당 현금배당금(원)", "100");
        assert_eq!(DividendInfo::headers().len(), record.row().len());
        assert_eq!(record.filing.market, Market::Kospi);
    }

    #[test]
    fn test_write_json_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("dividend.json");
        let records = ReportRecords::DividendInfo(vec![dividend("주당 현금배당금(원)", "361")]);

        write_records_to_file(&records, OutputFormat::Json, &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written[0]["current_term"], 361);
        assert_eq!(written[0]["filing"]["market"], "Kospi");
    }
}
