use chrono::NaiveDate;
use thiserror::Error;

use crate::transaction::PageNumber;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("page URL template `{0}` has no `{{page}}` placeholder")]
    InvalidUrlTemplate(String),
    #[error("failed to set up HTTP client, reason: `{0}`")]
    ClientSetup(String),
    #[error("GET request to `{url}` timed out")]
    Timeout { url: String },
    #[error("could not connect to server while accessing `{url}`, reason: `{reason}`")]
    Connection { url: String, reason: String },
    #[error("GET request to `{url}` failed, reason: `{reason}`")]
    Request { url: String, reason: String },
    #[error("server responded to `{url}` with status {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("failed to parse page, reason: `{0}`")]
    ParsingFailure(String),
    #[error("asked for page {requested}, but server responded with page {received}")]
    PageMismatch {
        requested: PageNumber,
        received: PageNumber,
    },
    #[error("total count on page {page} ({found}) does not match the first page ({expected})")]
    TotalCountMismatch {
        page: PageNumber,
        expected: usize,
        found: usize,
    },
    #[error("page {page} is empty while only {read} of {expected} records were read")]
    PaginationEndedEarly {
        page: PageNumber,
        read: usize,
        expected: usize,
    },
    #[error("invalid transaction record, reason: `{0}`")]
    InvalidRecord(String),
    #[error("balance overflowed while adding the transactions of {0}")]
    BalanceOverflow(NaiveDate),
}
