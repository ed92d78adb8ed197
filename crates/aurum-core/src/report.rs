//! Assembly of the messages sent after each run.

use serde::Serialize;
use tracing::{error, info};

use crate::message::MessageFormatter;
use crate::store::SeriesStore;
use crate::summary::Summarizer;
use crate::window::{select_window, WindowPolicy};
use crate::{TradeDate, ValidationError};

/// Everything `compose` needs besides the series itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSettings {
    pub window: WindowPolicy,
    pub summarizer: Summarizer,
    pub formatter: MessageFormatter,
}

/// Rendered messages, each independent of the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub weekly: String,
    pub day: String,
    pub live: Option<String>,
}

impl Report {
    /// Messages in send order.
    pub fn messages(&self) -> Vec<&str> {
        let mut messages = vec![self.weekly.as_str(), self.day.as_str()];
        if let Some(live) = &self.live {
            messages.push(live);
        }
        messages
    }
}

/// Renders the weekly summary, the latest day's candle and, when a live price
/// is given, the comparison against the last stored close.
///
/// Missing data never fails the report: each message falls back to its notice.
pub fn compose<S>(
    store: &S,
    settings: &ReportSettings,
    today: TradeDate,
    live_price: Option<f64>,
) -> Result<Report, ValidationError>
where
    S: SeriesStore + ?Sized,
{
    let formatter = &settings.formatter;
    let window = select_window(store, settings.window, today)?;
    info!(policy = %settings.window, bars = window.len(), "window selected");

    let weekly = match settings.summarizer.summarize_week(&window) {
        Ok(summary) => formatter.weekly(&summary),
        Err(reason) => {
            info!(%reason, "weekly summary skipped");
            formatter.insufficient_week()
        }
    };

    let day = match window.last() {
        Some(bar) => formatter.day(&settings.summarizer.summarize_day(bar)),
        None => formatter.no_day(),
    };

    let live = live_price.map(|price| {
        let records = store.records().unwrap_or_else(|err| {
            error!(error = %err, "series unreadable; comparing against no history");
            Vec::new()
        });
        match settings.summarizer.summarize_day_vs_yesterday(price, &records) {
            Ok(comparison) => formatter.comparison(&comparison),
            Err(reason) => {
                info!(%reason, "live comparison skipped");
                formatter.no_history()
            }
        }
    });

    Ok(Report { weekly, day, live })
}
