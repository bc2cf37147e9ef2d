//! Typed business-report records
//!
//! Each record is built from exactly one raw row by its [`Decode`] impl and
//! never changes afterwards. The [`BusinessReport`] impls carry the per-kind
//! rules for rows OpenDART sends to mean "no data".

use chrono::NaiveDate;
use serde::Serialize;

use super::codes::Market;
use super::decode::{BusinessReport, Decode, RawRow, RecordKind, RowReader};
use super::errors::DecodeError;
use super::normalize::Number;

/// Identifies the filing a business-report row came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filing {
    /// Receipt number, unique per filing (`rcept_no`)
    pub receipt_no: String,
    /// `corp_cls`
    pub market: Market,
    /// Eight-digit DART corporation code (`corp_code`)
    pub corporation_code: String,
    /// `corp_name`
    pub corporation_name: String,
}

/// Capital increase or decrease (증자(감자) 현황)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapitalVariation {
    pub filing: Filing,
    /// `stock_isu_dcrs_de`
    pub issue_date: Option<NaiveDate>,
    /// `isu_dcrs_stle`
    pub title: Option<String>,
    /// `isu_dcrs_stock_knd`
    pub stock_type: Option<String>,
    /// `isu_dcrs_qy`
    pub quantity: Number,
    /// `isu_dcrs_mstvdv_fval_amount`
    pub face_value: Number,
    /// `isu_dcrs_mstvdv_amount`
    pub issue_price: Number,
}

impl Decode for CapitalVariation {
    const KIND: RecordKind = RecordKind::CapitalVariation;

    fn decode(row: &RawRow) -> Result<Self, DecodeError> {
        let r = RowReader::new(Self::KIND, row);
        Ok(Self {
            filing: r.filing()?,
            issue_date: r.optional_date("stock_isu_dcrs_de")?,
            title: r.raw_text("isu_dcrs_stle"),
            stock_type: r.raw_text("isu_dcrs_stock_knd"),
            quantity: r.numeric("isu_dcrs_qy")?,
            face_value: r.numeric("isu_dcrs_mstvdv_fval_amount")?,
            issue_price: r.numeric("isu_dcrs_mstvdv_amount")?,
        })
    }
}

impl BusinessReport for CapitalVariation {
    /// A page holding a single row whose quantity is `"-"` means no filings
    fn select_rows(rows: Vec<RawRow>) -> Vec<RawRow> {
        if rows.len() == 1 && rows[0].is_sentinel("isu_dcrs_qy") {
            return Vec::new();
        }
        rows
    }
}

/// Dividend line item (배당에 관한 사항)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DividendInfo {
    pub filing: Filing,
    /// `se`
    pub title: Option<String>,
    /// `stock_knd`
    pub stock_type: Option<String>,
    /// `thstrm`
    pub current_term: Number,
    /// `frmtrm`
    pub prev_term: Number,
    /// `lwfr`
    pub prev_prev_term: Number,
}

impl Decode for DividendInfo {
    const KIND: RecordKind = RecordKind::DividendInfo;

    fn decode(row: &RawRow) -> Result<Self, DecodeError> {
        let r = RowReader::new(Self::KIND, row);
        Ok(Self {
            filing: r.filing()?,
            title: r.raw_text("se"),
            stock_type: r.optional_text("stock_knd"),
            current_term: r.numeric("thstrm")?,
            prev_term: r.numeric("frmtrm")?,
            prev_prev_term: r.numeric("lwfr")?,
        })
    }
}

impl BusinessReport for DividendInfo {
    fn is_data_row(row: &RawRow) -> bool {
        !row.is_sentinel("thstrm")
    }
}

/// Treasury share acquisitions and disposals (자기주식 취득 및 처분 현황)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreasurySharesStatus {
    pub filing: Filing,
    /// `stock_knd`
    pub stock_type: Option<String>,
    /// `acqs_mth1`, `acqs_mth2`, `acqs_mth3`
    pub acquisition_methods: [Option<String>; 3],
    /// `bsis_qy`
    pub quantity_term_start: Option<Number>,
    /// `change_qy_acqs`
    pub acquired: Option<Number>,
    /// `change_qy_dsps`
    pub disposed: Option<Number>,
    /// `change_qy_incnr`
    pub retired: Option<Number>,
    /// `trmend_qy`
    pub quantity_term_end: Option<Number>,
    /// `rm`
    pub remarks: Option<String>,
}

impl Decode for TreasurySharesStatus {
    const KIND: RecordKind = RecordKind::TreasurySharesStatus;

    fn decode(row: &RawRow) -> Result<Self, DecodeError> {
        let r = RowReader::new(Self::KIND, row);
        Ok(Self {
            filing: r.filing()?,
            stock_type: r.raw_text("stock_knd"),
            acquisition_methods: [r.raw_text("acqs_mth1"), r.raw_text("acqs_mth2"), r.raw_text("acqs_mth3")],
            quantity_term_start: r.numeric_or_absent("bsis_qy")?,
            acquired: r.numeric_or_absent("change_qy_acqs")?,
            disposed: r.numeric_or_absent("change_qy_dsps")?,
            retired: r.numeric_or_absent("change_qy_incnr")?,
            quantity_term_end: r.numeric_or_absent("trmend_qy")?,
            remarks: r.raw_text("rm"),
        })
    }
}

impl BusinessReport for TreasurySharesStatus {
    fn is_data_row(row: &RawRow) -> bool {
        !row.is_sentinel("trmend_qy")
    }
}

/// Shares held and stake at one end of the reporting term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuantityAndRatio {
    pub quantity: Option<Number>,
    pub shareholding_ratio: Option<Number>,
}

/// Largest shareholder or a related party (최대주주 현황)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MajorShareholder {
    pub filing: Filing,
    /// `nm`
    pub name: Option<String>,
    /// `relate`
    pub relation: Option<String>,
    /// `stock_knd`
    pub stock_type: Option<String>,
    /// `bsis_posesn_stock_co`, `bsis_posesn_stock_qota_rt`
    pub term_start: QuantityAndRatio,
    /// `trmend_posesn_stock_co`, `trmend_posesn_stock_qota_rt`
    pub term_end: QuantityAndRatio,
    /// `rm`
    pub remarks: Option<String>,
}

impl Decode for MajorShareholder {
    const KIND: RecordKind = RecordKind::MajorShareholder;

    fn decode(row: &RawRow) -> Result<Self, DecodeError> {
        let r = RowReader::new(Self::KIND, row);
        Ok(Self {
            filing: r.filing()?,
            name: r.raw_text("nm"),
            relation: r.raw_text("relate"),
            stock_type: r.raw_text("stock_knd"),
            term_start: QuantityAndRatio {
                quantity: r.numeric_or_absent("bsis_posesn_stock_co")?,
                shareholding_ratio: r.percentage_or_absent("bsis_posesn_stock_qota_rt")?,
            },
            term_end: QuantityAndRatio {
                quantity: r.numeric_or_absent("trmend_posesn_stock_co")?,
                shareholding_ratio: r.percentage_or_absent("trmend_posesn_stock_qota_rt")?,
            },
            remarks: r.raw_text("rm"),
        })
    }
}

impl BusinessReport for MajorShareholder {
    fn is_data_row(row: &RawRow) -> bool {
        !row.is_sentinel("trmend_posesn_stock_co")
    }
}

/// Change of largest shareholder (최대주주 변동현황)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LargestShareholderChange {
    pub filing: Filing,
    /// `change_on`, written as `YYYY년 MM월 DD일`
    pub changed_at: NaiveDate,
    /// `mxmm_shrholdr_nm`
    pub largest_shareholder_name: Option<String>,
    /// `posesn_stock_co`
    pub quantity: Number,
    /// `qota_rt`
    pub shareholding_ratio: Number,
    /// `change_cause`
    pub cause: Option<String>,
    /// `rm`
    pub remarks: Option<String>,
}

impl Decode for LargestShareholderChange {
    const KIND: RecordKind = RecordKind::LargestShareholderChange;

    fn decode(row: &RawRow) -> Result<Self, DecodeError> {
        let r = RowReader::new(Self::KIND, row);
        Ok(Self {
            filing: r.filing()?,
            changed_at: r.korean_date("change_on")?,
            largest_shareholder_name: r.raw_text("mxmm_shrholdr_nm"),
            quantity: r.numeric("posesn_stock_co")?,
            shareholding_ratio: r.percentage("qota_rt")?,
            cause: r.raw_text("change_cause"),
            remarks: r.raw_text("rm"),
        })
    }
}

impl BusinessReport for LargestShareholderChange {
    fn is_data_row(row: &RawRow) -> bool {
        !row.is_sentinel("change_on")
    }
}

/// Minority shareholder distribution (소액주주 현황)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinorityShareholdersStatus {
    pub filing: Filing,
    /// `shrholdr_co`
    pub minority_shareholders_count: Number,
    /// `shrholdr_tot_co`
    pub total_shareholders_count: Option<Number>,
    /// `shrholdr_rate`
    pub minority_shareholders_ratio: Number,
    /// `hold_stock_co`
    pub minority_shares: Number,
    /// `stock_tot_co`
    pub total_shares: Option<Number>,
    /// `hold_stock_rate`
    pub minority_shares_ratio: Number,
}

impl Decode for MinorityShareholdersStatus {
    const KIND: RecordKind = RecordKind::MinorityShareholdersStatus;

    fn decode(row: &RawRow) -> Result<Self, DecodeError> {
        let r = RowReader::new(Self::KIND, row);
        Ok(Self {
            filing: r.filing()?,
            minority_shareholders_count: r.numeric("shrholdr_co")?,
            total_shareholders_count: r.numeric_or_absent("shrholdr_tot_co")?,
            minority_shareholders_ratio: r.percentage("shrholdr_rate")?,
            minority_shares: r.numeric("hold_stock_co")?,
            total_shares: r.numeric_or_absent("stock_tot_co")?,
            minority_shares_ratio: r.percentage("hold_stock_rate")?,
        })
    }
}

impl BusinessReport for MinorityShareholdersStatus {}
