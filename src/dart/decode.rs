//! Raw row access and the decode/filter contract shared by all report kinds

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::codes::Market;
use super::errors::{DecodeError, FieldError, ParseError};
use super::normalize::{self, Number, SENTINEL};
use super::records::Filing;

/// One element of an OpenDART `list`: raw field name to string value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(HashMap<String, Option<String>>);

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `field`; missing keys and JSON nulls are both `None`
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|value| value.as_deref())
    }

    /// Whether `field` holds exactly the `"-"` no-data marker
    pub fn is_sentinel(&self, field: &str) -> bool {
        self.get(field) == Some(SENTINEL)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), Some(value.into()));
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawRow(
            iter.into_iter()
                .map(|(field, value)| (field.into(), Some(value.into())))
                .collect(),
        )
    }
}

/// The business-report kinds this client can fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    CapitalVariation,
    DividendInfo,
    TreasurySharesStatus,
    MajorShareholder,
    LargestShareholderChange,
    MinorityShareholdersStatus,
}

impl RecordKind {
    pub const ALL: &'static [RecordKind] = &[
        RecordKind::CapitalVariation,
        RecordKind::DividendInfo,
        RecordKind::TreasurySharesStatus,
        RecordKind::MajorShareholder,
        RecordKind::LargestShareholderChange,
        RecordKind::MinorityShareholdersStatus,
    ];

    /// OpenDART endpoint name, without the `.json` suffix
    pub fn endpoint(&self) -> &'static str {
        match self {
            RecordKind::CapitalVariation => "irdsSttus",
            RecordKind::DividendInfo => "alotMatter",
            RecordKind::TreasurySharesStatus => "tesstkAcqsDspsSttus",
            RecordKind::MajorShareholder => "hyslrSttus",
            RecordKind::LargestShareholderChange => "hyslrChgSttus",
            RecordKind::MinorityShareholdersStatus => "mrhlSttus",
        }
    }

    /// Command-line spelling
    pub fn slug(&self) -> &'static str {
        match self {
            RecordKind::CapitalVariation => "capital-variation",
            RecordKind::DividendInfo => "dividend",
            RecordKind::TreasurySharesStatus => "treasury-shares",
            RecordKind::MajorShareholder => "major-shareholders",
            RecordKind::LargestShareholderChange => "largest-shareholder-changes",
            RecordKind::MinorityShareholdersStatus => "minority-shareholders",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.to_lowercase();
        Self::ALL.iter().copied().find(|kind| kind.slug() == slug)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::CapitalVariation => "capital variation",
            RecordKind::DividendInfo => "dividend info",
            RecordKind::TreasurySharesStatus => "treasury shares status",
            RecordKind::MajorShareholder => "major shareholder",
            RecordKind::LargestShareholderChange => "largest shareholder change",
            RecordKind::MinorityShareholdersStatus => "minority shareholders status",
        };
        f.write_str(name)
    }
}

/// Typed field access over one raw row, attaching kind and field name to failures
pub struct RowReader<'a> {
    kind: RecordKind,
    row: &'a RawRow,
}

impl<'a> RowReader<'a> {
    pub fn new(kind: RecordKind, row: &'a RawRow) -> Self {
        Self { kind, row }
    }

    fn fail(&self, field: &'static str, source: impl Into<FieldError>) -> DecodeError {
        DecodeError {
            kind: self.kind,
            field,
            source: source.into(),
        }
    }

    fn required(&self, field: &'static str) -> Result<&'a str, DecodeError> {
        self.row
            .get(field)
            .ok_or_else(|| self.fail(field, ParseError::Missing))
    }

    pub fn text(&self, field: &'static str) -> Result<String, DecodeError> {
        self.required(field).map(str::to_string)
    }

    /// Text kept verbatim, `"-"` included; `None` only for a missing key or null
    pub fn raw_text(&self, field: &'static str) -> Option<String> {
        self.row.get(field).map(str::to_string)
    }

    /// Text that is `None` when missing, empty or `"-"`
    pub fn optional_text(&self, field: &'static str) -> Option<String> {
        self.row
            .get(field)
            .map(str::trim)
            .filter(|value| !value.is_empty() && *value != SENTINEL)
            .map(str::to_string)
    }

    pub fn numeric(&self, field: &'static str) -> Result<Number, DecodeError> {
        normalize::parse_numeric(self.required(field)?).map_err(|e| self.fail(field, e))
    }

    /// Number that is `None` when missing or `"-"`
    pub fn numeric_or_absent(&self, field: &'static str) -> Result<Option<Number>, DecodeError> {
        match self.row.get(field) {
            Some(raw) => normalize::parse_numeric_or_absent(raw, SENTINEL).map_err(|e| self.fail(field, e)),
            None => Ok(None),
        }
    }

    pub fn percentage(&self, field: &'static str) -> Result<Number, DecodeError> {
        normalize::parse_percentage(self.required(field)?).map_err(|e| self.fail(field, e))
    }

    /// Percentage that is `None` when missing or `"-"`
    pub fn percentage_or_absent(&self, field: &'static str) -> Result<Option<Number>, DecodeError> {
        match self.row.get(field) {
            None | Some(SENTINEL) => Ok(None),
            Some(raw) => normalize::parse_percentage(raw)
                .map(Some)
                .map_err(|e| self.fail(field, e)),
        }
    }

    pub fn korean_date(&self, field: &'static str) -> Result<NaiveDate, DecodeError> {
        normalize::parse_korean_date(self.required(field)?).map_err(|e| self.fail(field, e))
    }

    /// Loosely formatted date; missing, empty and `"-"` are all absent
    pub fn optional_date(&self, field: &'static str) -> Result<Option<NaiveDate>, DecodeError> {
        let raw = self.row.get(field).filter(|value| *value != SENTINEL);
        normalize::parse_flexible_date(raw).map_err(|e| self.fail(field, e))
    }

    pub fn market(&self) -> Market {
        Market::lookup(self.row.get("corp_cls"))
    }

    /// Header fields every business-report row carries
    pub fn filing(&self) -> Result<Filing, DecodeError> {
        Ok(Filing {
            receipt_no: self.text("rcept_no")?,
            market: self.market(),
            corporation_code: self.text("corp_code")?,
            corporation_name: self.text("corp_name")?,
        })
    }
}

/// Conversion of one raw row into a typed record, all-or-nothing
pub trait Decode: Sized {
    const KIND: RecordKind;

    fn decode(row: &RawRow) -> Result<Self, DecodeError>;
}

/// A business report: its decoder plus the rule for spotting "no data" rows
pub trait BusinessReport: Decode {
    /// Whether `row` carries real data rather than an upstream no-data marker
    fn is_data_row(_row: &RawRow) -> bool {
        true
    }

    /// Rows of one response page worth decoding, in upstream order
    fn select_rows(rows: Vec<RawRow>) -> Vec<RawRow> {
        let total = rows.len();
        let selected: Vec<RawRow> = rows.into_iter().filter(Self::is_data_row).collect();
        if selected.len() < total {
            debug!(
                kind = %Self::KIND,
                dropped = total - selected.len(),
                "Dropped no-data rows"
            );
        }
        selected
    }

    /// Filter then decode a whole page; any decode failure fails the page
    fn decode_page(rows: Vec<RawRow>) -> Result<Vec<Self>, DecodeError> {
        Self::select_rows(rows).iter().map(Self::decode).collect()
    }
}
