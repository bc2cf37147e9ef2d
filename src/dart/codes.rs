//! Closed code tables used by the OpenDART API
//!
//! Every table maps a short upstream code to a variant and a Korean display
//! label. Lookups of unknown codes fail with [`UnknownCodeError`], except
//! [`Market`] which falls back to [`Market::Unknown`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::UnknownCodeError;

macro_rules! code_table {
    (
        $(#[$meta:meta])*
        $name:ident, $table:literal {
            $($variant:ident => ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every entry, in table order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Human-readable table name used in errors
            pub const TABLE: &'static str = $table;

            /// Code as sent and received by the API
            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Korean display label
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn lookup(code: &str) -> Result<Self, UnknownCodeError> {
                match code.trim() {
                    $($code => Ok($name::$variant),)+
                    other => Err(UnknownCodeError {
                        table: $table,
                        code: other.to_string(),
                    }),
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownCodeError;

            fn from_str(code: &str) -> Result<Self, Self::Err> {
                Self::lookup(code)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:?}", self)
            }
        }
    };
}

/// Market segment a corporation is listed on (`corp_cls`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    Kospi,
    Kosdaq,
    Konex,
    Etc,
    /// Code missing or not recognized
    Unknown,
}

impl Market {
    pub const ALL: &'static [Market] = &[Market::Kospi, Market::Kosdaq, Market::Konex, Market::Etc];

    pub fn code(&self) -> &'static str {
        match self {
            Market::Kospi => "Y",
            Market::Kosdaq => "K",
            Market::Konex => "N",
            Market::Etc => "E",
            Market::Unknown => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Market::Kospi => "유가증권시장",
            Market::Kosdaq => "코스닥",
            Market::Konex => "코넥스",
            Market::Etc => "기타법인",
            Market::Unknown => "알 수 없음",
        }
    }

    /// Never fails: an unrecognized or missing code yields [`Market::Unknown`]
    pub fn lookup(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("Y") => Market::Kospi,
            Some("K") => Market::Kosdaq,
            Some("N") => Market::Konex,
            Some("E") => Market::Etc,
            _ => Market::Unknown,
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Market::Kospi => "KOSPI",
            Market::Kosdaq => "KOSDAQ",
            Market::Konex => "KONEX",
            Market::Etc => "ETC",
            Market::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

code_table! {
    /// Periodic report a business-report request targets (`reprt_code`)
    ReportPeriod, "report period" {
        Q1 => ("11013", "1분기보고서"),
        SemiAnnual => ("11012", "반기보고서"),
        Q3 => ("11014", "3분기보고서"),
        Annual => ("11011", "사업보고서"),
    }
}

impl ReportPeriod {
    /// Position within the business year
    fn rank(&self) -> u8 {
        match self {
            ReportPeriod::Q1 => 1,
            ReportPeriod::SemiAnnual => 2,
            ReportPeriod::Q3 => 3,
            ReportPeriod::Annual => 4,
        }
    }

    /// Parse the command-line spelling (`q1`, `half`, `q3`, `annual`)
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.to_lowercase().as_str() {
            "q1" | "1q" => Some(ReportPeriod::Q1),
            "half" | "semi-annual" | "semiannual" | "h1" | "q2" => Some(ReportPeriod::SemiAnnual),
            "q3" | "3q" => Some(ReportPeriod::Q3),
            "annual" | "q4" | "year" => Some(ReportPeriod::Annual),
            _ => None,
        }
    }
}

impl PartialOrd for ReportPeriod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReportPeriod {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

code_table! {
    /// Separate or consolidated statements (`fs_div`)
    FinancialStatementDivision, "financial statement division" {
        Separate => ("OFS", "재무제표"),
        Consolidated => ("CFS", "연결재무제표"),
    }
}

code_table! {
    /// Sort key for disclosure searches (`sort`)
    SortBy, "sort order" {
        Date => ("date", "접수일자"),
        CorporationName => ("crp", "회사명"),
        ReportName => ("rpt", "보고서명"),
    }
}

code_table! {
    /// Top-level disclosure category (`pblntf_ty`)
    DisclosureType, "disclosure type" {
        Periodic => ("A", "정기공시"),
        MajorIssues => ("B", "주요사항보고"),
        Issuance => ("C", "발행공시"),
        Shareholding => ("D", "지분공시"),
        Other => ("E", "기타공시"),
        ExternalAudit => ("F", "외부감사관련"),
        Fund => ("G", "펀드공시"),
        AssetSecuritization => ("H", "자산유동화"),
        Exchange => ("I", "거래소공시"),
        FairTradeCommission => ("J", "공정위공시"),
    }
}

code_table! {
    /// Fine-grained disclosure type (`pblntf_detail_ty`)
    DisclosureTypeDetail, "disclosure type detail" {
        A001 => ("A001", "사업보고서"),
        A002 => ("A002", "반기보고서"),
        A003 => ("A003", "분기보고서"),
        A004 => ("A004", "등록법인결산서류(자본시장법이전)"),
        A005 => ("A005", "소액공모법인결산서류"),
        B001 => ("B001", "주요사항보고서"),
        B002 => ("B002", "주요경영사항신고(자본시장법 이전)"),
        B003 => ("B003", "최대주주등과의거래신고(자본시장법 이전)"),
        C001 => ("C001", "증권신고(지분증권)"),
        C002 => ("C002", "증권신고(채무증권)"),
        C003 => ("C003", "증권신고(파생결합증권)"),
        C004 => ("C004", "증권신고(합병등)"),
        C005 => ("C005", "증권신고(기타)"),
        C006 => ("C006", "소액공모(지분증권)"),
        C007 => ("C007", "소액공모(채무증권)"),
        C008 => ("C008", "소액공모(파생결합증권)"),
        C009 => ("C009", "소액공모(합병등)"),
        C010 => ("C010", "소액공모(기타)"),
        C011 => ("C011", "호가중개시스템을통한소액매출"),
        D001 => ("D001", "주식등의대량보유상황보고서"),
        D002 => ("D002", "임원ㆍ주요주주특정증권등소유상황보고서"),
        D003 => ("D003", "의결권대리행사권유"),
        D004 => ("D004", "공개매수"),
        E001 => ("E001", "자기주식취득/처분"),
        E002 => ("E002", "신탁계약체결/해지"),
        E003 => ("E003", "합병등종료보고서"),
        E004 => ("E004", "주식매수선택권부여에관한신고"),
        E005 => ("E005", "사외이사에관한신고"),
        E006 => ("E006", "주주총회소집공고"),
        E007 => ("E007", "시장조성/안정조작"),
        E008 => ("E008", "합병등신고서(자본시장법 이전)"),
        E009 => ("E009", "금융위등록/취소(자본시장법 이전)"),
        F001 => ("F001", "감사보고서"),
        F002 => ("F002", "연결감사보고서"),
        F003 => ("F003", "결합감사보고서"),
        F004 => ("F004", "회계법인사업보고서"),
        F005 => ("F005", "감사전재무제표미제출신고서"),
        G001 => ("G001", "증권신고(집합투자증권-신탁형)"),
        G002 => ("G002", "증권신고(집합투자증권-회사형)"),
        G003 => ("G003", "증권신고(집합투자증권-합병)"),
        H001 => ("H001", "자산유동화계획/양도등록"),
        H002 => ("H002", "사업/반기/분기보고서"),
        H003 => ("H003", "증권신고(유동화증권등)"),
        H004 => ("H004", "채권유동화계획/양도등록"),
        H005 => ("H005", "수시보고"),
        H006 => ("H006", "주요사항보고서"),
        I001 => ("I001", "수시공시"),
        I002 => ("I002", "공정공시"),
        I003 => ("I003", "시장조치/안내"),
        I004 => ("I004", "지분공시"),
        I005 => ("I005", "증권투자회사"),
        I006 => ("I006", "채권공시"),
        J001 => ("J001", "대규모내부거래관련"),
        J002 => ("J002", "대규모내부거래관련(구)"),
        J004 => ("J004", "기업집단현황공시"),
        J005 => ("J005", "비상장회사중요사항공시"),
        J006 => ("J006", "기타공정위공시"),
    }
}

impl DisclosureTypeDetail {
    /// Top-level category this detail code belongs to
    pub fn category(&self) -> DisclosureType {
        match self.code().as_bytes()[0] {
            b'A' => DisclosureType::Periodic,
            b'B' => DisclosureType::MajorIssues,
            b'C' => DisclosureType::Issuance,
            b'D' => DisclosureType::Shareholding,
            b'E' => DisclosureType::Other,
            b'F' => DisclosureType::ExternalAudit,
            b'G' => DisclosureType::Fund,
            b'H' => DisclosureType::AssetSecuritization,
            b'I' => DisclosureType::Exchange,
            _ => DisclosureType::FairTradeCommission,
        }
    }
}

code_table! {
    /// Statement kind, consolidation and presentation method (`sj_div` detail)
    FinancialStatementTypeDetail, "financial statement type detail" {
        Bs1 => ("BS1", "재무상태표 | 연결 | 유동/비유동법"),
        Bs2 => ("BS2", "재무상태표 | 개별 | 유동/비유동법"),
        Bs3 => ("BS3", "재무상태표 | 연결 | 유동성배열법"),
        Bs4 => ("BS4", "재무상태표 | 개별 | 유동성배열법"),
        Is1 => ("IS1", "별개의 손익계산서 | 연결 | 기능별분류"),
        Is2 => ("IS2", "별개의 손익계산서 | 개별 | 기능별분류"),
        Is3 => ("IS3", "별개의 손익계산서 | 연결 | 성격별분류"),
        Is4 => ("IS4", "별개의 손익계산서 | 개별 | 성격별분류"),
        Cis1 => ("CIS1", "포괄손익계산서 | 연결 | 세후"),
        Cis2 => ("CIS2", "포괄손익계산서 | 개별 | 세후"),
        Cis3 => ("CIS3", "포괄손익계산서 | 연결 | 세전"),
        Cis4 => ("CIS4", "포괄손익계산서 | 개별 | 세전"),
        Dcis1 => ("DCIS1", "단일 포괄손익계산서 | 연결 | 기능별분류 | 세후포괄손익"),
        Dcis2 => ("DCIS2", "단일 포괄손익계산서 | 개별 | 기능별분류 | 세후포괄손익"),
        Dcis3 => ("DCIS3", "단일 포괄손익계산서 | 연결 | 기능별분류 | 세전"),
        Dcis4 => ("DCIS4", "단일 포괄손익계산서 | 개별 | 기능별분류 | 세전"),
        Dcis5 => ("DCIS5", "단일 포괄손익계산서 | 연결 | 성격별분류 | 세후포괄손익"),
        Dcis6 => ("DCIS6", "단일 포괄손익계산서 | 개별 | 성격별분류 | 세후포괄손익"),
        Dcis7 => ("DCIS7", "단일 포괄손익계산서 | 연결 | 성격별분류 | 세전"),
        Dcis8 => ("DCIS8", "단일 포괄손익계산서 | 개별 | 성격별분류 | 세전"),
        Cf1 => ("CF1", "현금흐름표 | 연결 | 직접법"),
        Cf2 => ("CF2", "현금흐름표 | 개별 | 직접법"),
        Cf3 => ("CF3", "현금흐름표 | 연결 | 간접법"),
        Cf4 => ("CF4", "현금흐름표 | 개별 | 간접법"),
        Sce1 => ("SCE1", "자본변동표 | 연결"),
        Sce2 => ("SCE2", "자본변동표 | 개별"),
    }
}

impl FinancialStatementTypeDetail {
    /// Whether this layout is the consolidated variant
    pub fn is_consolidated(&self) -> bool {
        self.label().split(" | ").nth(1) == Some("연결")
    }
}
