//! OpenDART wire types and API constants

use serde::Deserialize;

use super::decode::RawRow;

/// Envelope shared by the list-returning OpenDART endpoints
#[derive(Debug, Deserialize)]
pub struct DartListResponse {
    /// Three-digit result code, `"000"` on success
    #[serde(default)]
    pub status: Option<String>,
    /// Result message accompanying `status`
    #[serde(default)]
    pub message: Option<String>,
    /// Result rows; absent when there is nothing to report
    #[serde(default)]
    pub list: Option<Vec<RawRow>>,
}

/// OpenDART result codes the client treats as non-errors
pub struct DartStatus;

impl DartStatus {
    /// 정상
    pub const NORMAL: &'static str = "000";
    /// 조회된 데이타가 없습니다
    pub const NO_DATA: &'static str = "013";

    /// Whether a payload with this status should reach the caller
    pub fn is_success(status: &str) -> bool {
        status == Self::NORMAL || status == Self::NO_DATA
    }
}

/// OpenDART API endpoints and constants
pub struct DartApi;

impl DartApi {
    /// Base URL for OpenDART API
    pub const BASE_URL: &'static str = "https://opendart.fss.or.kr/api";
    /// Query parameter carrying the API key
    pub const API_KEY_PARAM: &'static str = "crtfc_key";
}
