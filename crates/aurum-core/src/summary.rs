//! Trend, change and extremum statistics over a window.

use serde::Serialize;
use thiserror::Error;

use crate::window::Window;
use crate::{DailyBar, DailyRecord, TradeDate};

/// Not enough data for a computation. Rendered as a notice, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("window holds {found} bars; at least 2 are required")]
    InsufficientData { found: usize },
    #[error("series holds no record with a usable close")]
    NoHistory,
}

/// Direction of a window, first close against last close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Uptrend,
    Downtrend,
    Flat,
}

/// Sign of a price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    fn of(change: f64) -> Self {
        if change > 0.0 {
            Self::Up
        } else if change < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

/// Single-day candle shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Candle {
    Bullish,
    Bearish,
    Neutral,
}

/// A day picked out of a window together with the price that selected it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremum {
    pub date: TradeDate,
    pub price: f64,
}

impl Extremum {
    pub fn weekday_label(&self) -> &'static str {
        self.date.weekday_label()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub start_date: TradeDate,
    pub end_date: TradeDate,
    pub trend: Trend,
    /// Last close against first open, in percent.
    pub percent_change: f64,
    pub first_open: f64,
    pub last_close: f64,
    pub highest: Extremum,
    pub lowest: Extremum,
    pub mean_close: Option<f64>,
    pub up_days: usize,
    pub down_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyComparison {
    pub today_price: f64,
    pub previous_date: TradeDate,
    pub previous_close: f64,
    pub change: f64,
    pub percent_change: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub bar: DailyBar,
    /// Close against open, in percent.
    pub percent_change: f64,
    pub candle: Candle,
}

/// Window and day statistics.
///
/// `include_mean_close` toggles the weekly mean close, which only one of the
/// two alert flows reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summarizer {
    pub include_mean_close: bool,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self {
            include_mean_close: true,
        }
    }
}

impl Summarizer {
    pub const fn new(include_mean_close: bool) -> Self {
        Self { include_mean_close }
    }

    pub fn summarize_week(&self, window: &Window) -> Result<WeeklySummary, SummaryError> {
        let bars = window.bars();
        let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
            return Err(SummaryError::InsufficientData { found: bars.len() });
        };
        if bars.len() < 2 {
            return Err(SummaryError::InsufficientData { found: bars.len() });
        }

        let trend = if first.close < last.close {
            Trend::Uptrend
        } else if first.close > last.close {
            Trend::Downtrend
        } else {
            Trend::Flat
        };

        // Ties keep the earliest day: only a strictly better price replaces it.
        let mut highest = first;
        let mut lowest = first;
        for bar in &bars[1..] {
            if bar.high > highest.high {
                highest = bar;
            }
            if bar.low < lowest.low {
                lowest = bar;
            }
        }

        let mean_close = self
            .include_mean_close
            .then(|| bars.iter().map(|bar| bar.close).sum::<f64>() / bars.len() as f64);

        Ok(WeeklySummary {
            start_date: first.date,
            end_date: last.date,
            trend,
            percent_change: percent(last.close - first.open, first.open),
            first_open: first.open,
            last_close: last.close,
            highest: Extremum {
                date: highest.date,
                price: highest.high,
            },
            lowest: Extremum {
                date: lowest.date,
                price: lowest.low,
            },
            mean_close,
            up_days: bars.iter().filter(|bar| bar.close > bar.open).count(),
            down_days: bars.iter().filter(|bar| bar.close < bar.open).count(),
        })
    }

    /// Compares a live price with the chronologically last stored close.
    ///
    /// The baseline is the latest dated record with a usable close, whatever
    /// its distance from today, so weekends and missed days are bridged.
    pub fn summarize_day_vs_yesterday(
        &self,
        today_price: f64,
        series: &[DailyRecord],
    ) -> Result<DailyComparison, SummaryError> {
        let (previous_date, previous_close) = series
            .iter()
            .filter_map(|record| record.usable_close().map(|close| (record.date, close)))
            .max_by_key(|(date, _)| *date)
            .ok_or(SummaryError::NoHistory)?;

        let change = today_price - previous_close;
        Ok(DailyComparison {
            today_price,
            previous_date,
            previous_close,
            change,
            percent_change: percent(change, previous_close),
            direction: Direction::of(change),
        })
    }

    pub fn summarize_day(&self, bar: &DailyBar) -> DaySummary {
        let candle = if bar.close > bar.open {
            Candle::Bullish
        } else if bar.close < bar.open {
            Candle::Bearish
        } else {
            Candle::Neutral
        };

        DaySummary {
            bar: *bar,
            percent_change: percent(bar.close - bar.open, bar.open),
            candle,
        }
    }
}

fn percent(change: f64, base: f64) -> f64 {
    change / base * 100.0
}
