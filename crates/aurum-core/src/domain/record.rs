use serde::{Deserialize, Serialize};

use crate::TradeDate;

/// One persisted daily observation, prices per gram.
///
/// Any price may be absent when the provider omitted it. The usual
/// `low <= open, close <= high` ordering is neither checked nor relied upon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: TradeDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

impl DailyRecord {
    pub fn new(
        date: TradeDate,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }

    /// Returns the record as a [`DailyBar`] when all four prices are usable.
    pub fn complete(&self) -> Option<DailyBar> {
        Some(DailyBar {
            date: self.date,
            open: usable(self.open)?,
            high: usable(self.high)?,
            low: usable(self.low)?,
            close: usable(self.close)?,
        })
    }

    /// Close price if present and usable as a comparison baseline.
    pub fn usable_close(&self) -> Option<f64> {
        usable(self.close)
    }
}

/// Daily OHLC bar with every price present; the element type of a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: TradeDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl DailyBar {
    pub fn new(date: TradeDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }
}

impl From<DailyBar> for DailyRecord {
    fn from(bar: DailyBar) -> Self {
        Self::new(
            bar.date,
            Some(bar.open),
            Some(bar.high),
            Some(bar.low),
            Some(bar.close),
        )
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|price| price.is_finite() && *price > 0.0)
}
