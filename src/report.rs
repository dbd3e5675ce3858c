use std::io::Write;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::{error::Error, ledger::Ledger, transaction::DailyBalance};

const DISPLAY_DECIMALS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown output format `{}`, expected one of: text, csv, json",
                other
            )),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Report {
    pub total: Decimal,
    pub daily: Vec<DailyBalance>,
}

impl TryFrom<&Ledger> for Report {
    type Error = Error;

    fn try_from(ledger: &Ledger) -> Result<Self, Error> {
        Ok(Self {
            total: ledger.total_balance()?,
            daily: ledger.running_daily_balance()?,
        })
    }
}

fn rounded(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

impl Report {
    /// Text output rounds amounts to cents; CSV and JSON keep them exact.
    pub fn serialize(
        &self,
        format: OutputFormat,
        mut output: impl Write,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match format {
            OutputFormat::Text => {
                writeln!(output, "** total balance: {:.2}", rounded(self.total))?;
                writeln!(output)?;
                for day in &self.daily {
                    writeln!(
                        output,
                        "date: {}\trunning balance: {:.2}",
                        day.date,
                        rounded(day.balance)
                    )?;
                }
                output.flush()?;
            }
            OutputFormat::Csv => {
                // The header is written upfront so that it is there even without any day.
                let mut writer = csv::WriterBuilder::new()
                    .has_headers(false)
                    .from_writer(output);
                writer.write_record(["date", "balance"])?;
                for day in &self.daily {
                    writer.serialize(day)?
                }
                writer.flush()?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut output, self)?;
                writeln!(output)?;
                output.flush()?;
            }
        }
        Ok(())
    }
}
