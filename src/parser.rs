use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::{
    error::Error,
    transaction::{Page, PageNumber, Transaction},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Deserialize, Debug)]
struct ParsedPage {
    #[serde(rename = "totalCount")]
    total_count: usize,
    page: PageNumber,
    transactions: Vec<Value>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct ParsedTransaction {
    date: String,
    ledger: String,
    amount: ParsedAmount,
    company: String,
}

/// The API sends amounts as strings, but plain JSON numbers are accepted too.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ParsedAmount {
    Text(String),
    Number(serde_json::Number),
}

impl ParsedAmount {
    fn to_decimal(&self) -> Result<Decimal, Error> {
        let raw = match self {
            ParsedAmount::Text(text) => text.trim().to_string(),
            ParsedAmount::Number(number) => number.to_string(),
        };
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| Error::InvalidRecord(format!("amount `{}` is not a number", raw)))
    }
}

/// Decode a page body, checking it is the page that was asked for.
/// Records which cannot be decoded are skipped, but still counted in `record_count`.
pub fn parse_page(body: &str, requested: PageNumber) -> Result<Page, Error> {
    let page: ParsedPage =
        serde_json::from_str(body).map_err(|e| Error::ParsingFailure(e.to_string()))?;

    if page.page != requested {
        return Err(Error::PageMismatch {
            requested,
            received: page.page,
        });
    }

    let record_count = page.transactions.len();
    let transactions = page
        .transactions
        .into_iter()
        .filter_map(|record| match parse_transaction(record) {
            Ok(transaction) => Some(transaction),
            Err(error) => {
                warn!(page = requested, "skipping record: {}", error);
                None
            }
        })
        .collect();

    Ok(Page {
        number: page.page,
        total_count: page.total_count,
        record_count,
        transactions,
    })
}

pub fn parse_transaction(record: Value) -> Result<Transaction, Error> {
    let trans: ParsedTransaction =
        serde_json::from_value(record).map_err(|e| Error::InvalidRecord(e.to_string()))?;

    let date = NaiveDate::parse_from_str(trans.date.trim(), DATE_FORMAT).map_err(|_| {
        Error::InvalidRecord(format!("date `{}` is not a YYYY-MM-DD date", trans.date))
    })?;

    Ok(Transaction {
        date,
        amount: trans.amount.to_decimal()?,
        ledger: trans.ledger,
        company: trans.company,
    })
}
