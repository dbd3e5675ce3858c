use itertools::Itertools;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    client::PageSource,
    error::Error,
    transaction::{DailyBalance, Page, Transaction, FIRST_PAGE},
};

/// Every transaction read so far, kept in arrival order.
#[derive(Debug, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Pull pages one after the other until the total count announced by the
    /// first page has been read. Returns the number of records read, including
    /// the ones that were skipped because they could not be decoded.
    ///
    /// The page count is not known upfront, hence no concurrent requests.
    /// On error the ledger is left as it was before the call.
    pub fn pull_all(&mut self, source: &impl PageSource) -> Result<usize, Error> {
        let mut page = source.fetch_page(FIRST_PAGE)?;
        let total_count = page.total_count;
        let mut records_read = 0;
        let mut pulled = Vec::new();

        loop {
            Self::check_page(&page, total_count, records_read)?;
            info!("read page {} with {} records", page.number, page.record_count);
            records_read += page.record_count;
            pulled.extend(page.transactions);

            if records_read >= total_count {
                break;
            }
            page = source.fetch_page(page.number + 1)?;
        }

        info!(records = records_read, "done reading all records");
        self.transactions.extend(pulled);
        Ok(records_read)
    }

    fn check_page(page: &Page, total_count: usize, records_read: usize) -> Result<(), Error> {
        if page.total_count != total_count {
            return Err(Error::TotalCountMismatch {
                page: page.number,
                expected: total_count,
                found: page.total_count,
            });
        }
        if page.record_count == 0 && records_read < total_count {
            return Err(Error::PaginationEndedEarly {
                page: page.number,
                read: records_read,
                expected: total_count,
            });
        }
        Ok(())
    }

    pub fn total_balance(&self) -> Result<Decimal, Error> {
        checked_sum(self.transactions.iter())
    }

    /// Balance at the end of each day that has transactions, oldest first.
    /// Transactions are sorted by date beforehand; the sort is stable so
    /// same-day transactions keep their arrival order.
    pub fn running_daily_balance(&self) -> Result<Vec<DailyBalance>, Error> {
        let days = self
            .transactions
            .iter()
            .sorted_by_key(|t| t.date)
            .group_by(|t| t.date);

        let mut balance = Decimal::ZERO;
        let mut running = Vec::new();
        for (date, day) in &days {
            balance = balance
                .checked_add(checked_sum(day)?)
                .ok_or(Error::BalanceOverflow(date))?;
            running.push(DailyBalance { date, balance });
        }
        Ok(running)
    }
}

fn checked_sum<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Result<Decimal, Error> {
    transactions.fold(Ok(Decimal::ZERO), |sum, t| {
        sum?.checked_add(t.amount).ok_or(Error::BalanceOverflow(t.date))
    })
}

impl Extend<Transaction> for Ledger {
    fn extend<I: IntoIterator<Item = Transaction>>(&mut self, iter: I) {
        self.transactions.extend(iter)
    }
}

impl From<Vec<Transaction>> for Ledger {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }
}
