use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

pub type PageNumber = u32;

pub const FIRST_PAGE: PageNumber = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub ledger: String,
    pub amount: Decimal,
    pub company: String,
}

/// One page of the transaction API.
/// `record_count` is the number of records the server sent, which may be
/// larger than `transactions.len()` when some of them could not be decoded.
#[derive(Debug, PartialEq)]
pub struct Page {
    pub number: PageNumber,
    pub total_count: usize,
    pub record_count: usize,
    pub transactions: Vec<Transaction>,
}

/// Balance at the end of `date`, all earlier days included.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DailyBalance {
    pub date: NaiveDate,
    pub balance: Decimal,
}
