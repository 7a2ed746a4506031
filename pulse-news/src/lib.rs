//! Financial news ingestion for the FinPulse dashboard
//!
//! Fetches headlines from the Google News RSS search feed and normalizes
//! them into [`pulse_core::NewsArticle`] values.

pub mod error;
pub mod finance_feed;

pub use error::NewsError;
pub use finance_feed::{FinanceNewsClient, DEFAULT_FEED_URL};
