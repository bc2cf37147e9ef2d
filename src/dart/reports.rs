//! Business-report fetch operations
//!
//! Each operation issues one transport call, drops the rows OpenDART uses to
//! mean "no data", and decodes the rest in upstream order.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::codes::ReportPeriod;
use super::decode::{BusinessReport, RawRow, RecordKind};
use super::errors::{DartError, TransportError};
use super::records::{
    CapitalVariation, DividendInfo, LargestShareholderChange, MajorShareholder,
    MinorityShareholdersStatus, TreasurySharesStatus,
};
use super::transport::Transport;
use super::types::DartListResponse;

/// Records of one kind, for callers that pick the kind at runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportRecords {
    CapitalVariation(Vec<CapitalVariation>),
    DividendInfo(Vec<DividendInfo>),
    TreasurySharesStatus(Vec<TreasurySharesStatus>),
    MajorShareholder(Vec<MajorShareholder>),
    LargestShareholderChange(Vec<LargestShareholderChange>),
    MinorityShareholdersStatus(Vec<MinorityShareholdersStatus>),
}

impl ReportRecords {
    pub fn kind(&self) -> RecordKind {
        match self {
            ReportRecords::CapitalVariation(_) => RecordKind::CapitalVariation,
            ReportRecords::DividendInfo(_) => RecordKind::DividendInfo,
            ReportRecords::TreasurySharesStatus(_) => RecordKind::TreasurySharesStatus,
            ReportRecords::MajorShareholder(_) => RecordKind::MajorShareholder,
            ReportRecords::LargestShareholderChange(_) => RecordKind::LargestShareholderChange,
            ReportRecords::MinorityShareholdersStatus(_) => RecordKind::MinorityShareholdersStatus,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReportRecords::CapitalVariation(records) => records.len(),
            ReportRecords::DividendInfo(records) => records.len(),
            ReportRecords::TreasurySharesStatus(records) => records.len(),
            ReportRecords::MajorShareholder(records) => records.len(),
            ReportRecords::LargestShareholderChange(records) => records.len(),
            ReportRecords::MinorityShareholdersStatus(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Client for the periodic business-report (사업보고서 주요정보) endpoints
pub struct BusinessReports<T> {
    transport: T,
}

impl<T: Transport> BusinessReports<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch and decode one report kind for a company, year and period
    pub async fn fetch<R: BusinessReport>(
        &self,
        corporation_code: &str,
        business_year: i32,
        report_period: ReportPeriod,
    ) -> Result<Vec<R>, DartError> {
        let endpoint = R::KIND.endpoint();
        let params = [
            ("corp_code", corporation_code.to_string()),
            ("bsns_year", business_year.to_string()),
            ("reprt_code", report_period.code().to_string()),
        ];

        let payload = self.transport.fetch_json(endpoint, &params).await?;
        let rows = extract_rows(endpoint, payload)?;
        debug!(kind = %R::KIND, rows = rows.len(), "Received business report rows");

        let records = R::decode_page(rows)?;

        info!(
            kind = %R::KIND,
            corp_code = corporation_code,
            year = business_year,
            period = %report_period,
            count = records.len(),
            "Fetched business report"
        );
        Ok(records)
    }

    /// 증자(감자) 현황
    pub async fn get_capital_variation(
        &self,
        corporation_code: &str,
        business_year: i32,
        report_period: ReportPeriod,
    ) -> Result<Vec<CapitalVariation>, DartError> {
        self.fetch(corporation_code, business_year, report_period).await
    }

    /// 배당에 관한 사항
    pub async fn get_dividend_info(
        &self,
        corporation_code: &str,
        business_year: i32,
        report_period: ReportPeriod,
    ) -> Result<Vec<DividendInfo>, DartError> {
        self.fetch(corporation_code, business_year, report_period).await
    }

    /// 자기주식 취득 및 처분 현황
    pub async fn get_treasury_shares_status(
        &self,
        corporation_code: &str,
        business_year: i32,
        report_period: ReportPeriod,
    ) -> Result<Vec<TreasurySharesStatus>, DartError> {
        self.fetch(corporation_code, business_year, report_period).await
    }

    /// 최대주주 현황
    pub async fn get_major_shareholders_status(
        &self,
        corporation_code: &str,
        business_year: i32,
        report_period: ReportPeriod,
    ) -> Result<Vec<MajorShareholder>, DartError> {
        self.fetch(corporation_code, business_year, report_period).await
    }

    /// 최대주주 변동현황
    pub async fn get_largest_shareholder_changes(
        &self,
        corporation_code: &str,
        business_year: i32,
        report_period: ReportPeriod,
    ) -> Result<Vec<LargestShareholderChange>, DartError> {
        self.fetch(corporation_code, business_year, report_period).await
    }

    /// 소액주주 현황
    pub async fn get_minority_shareholders_status(
        &self,
        corporation_code: &str,
        business_year: i32,
        report_period: ReportPeriod,
    ) -> Result<Vec<MinorityShareholdersStatus>, DartError> {
        self.fetch(corporation_code, business_year, report_period).await
    }

    /// Fetch a report kind chosen at runtime
    pub async fn fetch_kind(
        &self,
        kind: RecordKind,
        corporation_code: &str,
        business_year: i32,
        report_period: ReportPeriod,
    ) -> Result<ReportRecords, DartError> {
        let (code, year, period) = (corporation_code, business_year, report_period);
        let records = match kind {
            RecordKind::CapitalVariation => ReportRecords::CapitalVariation(self.fetch(code, year, period).await?),
            RecordKind::DividendInfo => ReportRecords::DividendInfo(self.fetch(code, year, period).await?),
            RecordKind::TreasurySharesStatus => {
                ReportRecords::TreasurySharesStatus(self.fetch(code, year, period).await?)
            }
            RecordKind::MajorShareholder => ReportRecords::MajorShareholder(self.fetch(code, year, period).await?),
            RecordKind::LargestShareholderChange => {
                ReportRecords::LargestShareholderChange(self.fetch(code, year, period).await?)
            }
            RecordKind::MinorityShareholdersStatus => {
                ReportRecords::MinorityShareholdersStatus(self.fetch(code, year, period).await?)
            }
        };
        Ok(records)
    }
}

/// Pull the `list` rows out of a payload; no `list` means no filings
fn extract_rows(endpoint: &str, payload: Value) -> Result<Vec<RawRow>, TransportError> {
    let response: DartListResponse =
        serde_json::from_value(payload).map_err(|source| TransportError::InvalidPayload {
            endpoint: endpoint.to_string(),
            source,
        })?;
    Ok(response.list.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dart::errors::DecodeError;
    use crate::dart::normalize::Number;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    type Call = (String, Vec<(String, String)>);

    struct FakeTransport {
        response: Mutex<Option<Result<Value, TransportError>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeTransport {
        fn replying(payload: Value) -> Self {
            Self {
                response: Mutex::new(Some(Ok(payload))),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: TransportError) -> Self {
            Self {
                response: Mutex::new(Some(Err(error))),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn fetch_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, TransportError> {
            self.calls.lock().unwrap().push((
                endpoint.to_string(),
                params.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            ));
            self.response
                .lock()
                .unwrap()
                .take()
                .expect("transport called more than once")
        }
    }

    fn header() -> serde_json::Map<String, Value> {
        json!({
            "rcept_no": "20240312000736",
            "corp_cls": "Y",
            "corp_code": "00126380",
            "corp_name": "삼성전자"
        })
        .as_object()
        .unwrap()
        .clone()
    }

    fn with_header(fields: Value) -> Value {
        let mut row = header();
        row.extend(fields.as_object().unwrap().clone());
        Value::Object(row)
    }

    #[tokio::test]
    async fn test_request_parameters() {
        let reports = BusinessReports::new(FakeTransport::replying(json!({"status": "000", "list": []})));
        reports
            .get_dividend_info("00126380", 2023, ReportPeriod::Annual)
            .await
            .unwrap();

        let calls = reports.transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (endpoint, params) = &calls[0];
        assert_eq!(endpoint, "alotMatter");
        assert_eq!(
            params,
            &vec![
                ("corp_code".to_string(), "00126380".to_string()),
                ("bsns_year".to_string(), "2023".to_string()),
                ("reprt_code".to_string(), "11011".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_list_is_empty() {
        let reports = BusinessReports::new(FakeTransport::replying(json!({
            "status": "013",
            "message": "조회된 데이타가 없습니다."
        })));
        let records = reports
            .get_minority_shareholders_status("00126380", 2023, ReportPeriod::Q1)
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_capital_variation_sentinel_page() {
        let reports = BusinessReports::new(FakeTransport::replying(json!({
            "list": [{"isu_dcrs_qy": "-"}]
        })));
        let records = reports
            .get_capital_variation("00126380", 2023, ReportPeriod::Annual)
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_dividend_rows_are_filtered_and_decoded() {
        let reports = BusinessReports::new(FakeTransport::replying(json!({
            "status": "000",
            "list": [
                with_header(json!({"se": "주식배당수익률(%)", "stock_knd": "보통주", "thstrm": "-", "frmtrm": "-", "lwfr": "-"})),
                with_header(json!({"se": "주당 현금배당금(원)", "stock_knd": "보통주", "thstrm": "100", "frmtrm": "1,444", "lwfr": "2,994"})),
            ]
        })));
        let records = reports
            .get_dividend_info("00126380", 2023, ReportPeriod::Annual)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].current_term, Number::Integer(100));
        assert_eq!(records[0].prev_term, Number::Integer(1444));
    }

    #[tokio::test]
    async fn test_decode_failure_fails_whole_fetch() {
        let reports = BusinessReports::new(FakeTransport::replying(json!({
            "list": [
                with_header(json!({"change_on": "2023년 03월 15일", "mxmm_shrholdr_nm": "홍길동", "posesn_stock_co": "10", "qota_rt": "1.5%", "change_cause": "상속", "rm": "-"})),
                with_header(json!({"change_on": "2023/03/15", "mxmm_shrholdr_nm": "홍길동", "posesn_stock_co": "10", "qota_rt": "1.5%", "change_cause": "상속", "rm": "-"})),
            ]
        })));
        let err = reports
            .get_largest_shareholder_changes("00126380", 2023, ReportPeriod::Annual)
            .await
            .unwrap_err();
        match err {
            DartError::Decode(DecodeError { kind, field, .. }) => {
                assert_eq!(kind, RecordKind::LargestShareholderChange);
                assert_eq!(field, "change_on");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let reports = BusinessReports::new(FakeTransport::failing(TransportError::MissingApiKey));
        let err = reports
            .get_treasury_shares_status("00126380", 2023, ReportPeriod::Q3)
            .await
            .unwrap_err();
        assert!(matches!(err, DartError::Transport(TransportError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_malformed_list_is_a_transport_error() {
        let reports = BusinessReports::new(FakeTransport::replying(json!({"list": "nope"})));
        let err = reports
            .get_major_shareholders_status("00126380", 2023, ReportPeriod::Annual)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DartError::Transport(TransportError::InvalidPayload { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_kind_dispatches() {
        let reports = BusinessReports::new(FakeTransport::replying(json!({
            "list": [with_header(json!({
                "shrholdr_co": "10", "shrholdr_tot_co": "-", "shrholdr_rate": "50%",
                "hold_stock_co": "100", "stock_tot_co": "-", "hold_stock_rate": "10%"
            }))]
        })));
        let records = reports
            .fetch_kind(RecordKind::MinorityShareholdersStatus, "00126380", 2023, ReportPeriod::SemiAnnual)
            .await
            .unwrap();
        assert_eq!(records.kind(), RecordKind::MinorityShareholdersStatus);
        assert_eq!(records.len(), 1);

        let calls = reports.transport.calls.lock().unwrap();
        assert_eq!(calls[0].0, "mrhlSttus");
        assert_eq!(calls[0].1[2].1, "11012");
    }
}
