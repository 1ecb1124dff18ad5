mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod grid;
pub mod model;
pub mod report;
mod utils;

#[cfg(test)]
mod test;

pub use api::{ledger, Ledger, Mode, TEST_MODE_ENV};
pub use config::{Config, DEFAULT_WORKSHEET};
pub use error::{error_type, Error, ErrorType, Result};
