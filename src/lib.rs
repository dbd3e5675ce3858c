pub mod client;
pub mod error;
pub mod ledger;
pub mod parser;
pub mod report;
pub mod transaction;
