//! # Domain Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TradeDate`] | ISO 8601 calendar date of an observation |
//! | [`DailyRecord`] | Persisted daily OHLC prices, each possibly absent |
//! | [`DailyBar`] | Daily OHLC bar with all prices present |

mod record;
mod trade_date;

pub use record::{DailyBar, DailyRecord};
pub use trade_date::TradeDate;
