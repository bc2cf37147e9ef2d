//! OpenDART (Korea Financial Supervisory Service) module
//!
//! This module provides a typed client for the OpenDART business-report
//! endpoints. Raw rows are filtered for upstream "no data" markers and
//! decoded into immutable records.

pub mod codes;
pub mod decode;
pub mod errors;
pub mod normalize;
pub mod records;
pub mod reports;
pub mod transport;
pub mod types;

pub use codes::*;
pub use decode::{BusinessReport, Decode, RawRow, RecordKind, RowReader};
pub use errors::{DartError, DecodeError, FieldError, ParseError, TransportError, UnknownCodeError};
pub use normalize::Number;
pub use records::*;
pub use reports::{BusinessReports, ReportRecords};
pub use transport::{HttpTransport, Transport};
pub use types::{DartApi, DartListResponse, DartStatus};
