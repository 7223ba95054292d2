//! Core types shared by the extractor, the transports and the CLI

pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod rate;

// Re-export main types for cleaner imports
pub use currency::{CurrencyQuote, TargetCurrencySet};
pub use error::{AppError, ExtractionFailure, FetchError};
pub use rate::{RateProvider, RateSnapshot};
