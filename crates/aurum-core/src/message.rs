//! Fixed Markdown templates for outbound alerts.
//!
//! Alert prices and percentages use 2 decimals; the series file keeps 4.

use crate::summary::{Candle, DailyComparison, DaySummary, Direction, Trend, WeeklySummary};

/// Renders summaries for one metal/currency pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFormatter {
    metal: String,
    quote_currency: String,
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new("Gold", "MYR")
    }
}

impl MessageFormatter {
    pub fn new(metal: impl Into<String>, quote_currency: impl Into<String>) -> Self {
        Self {
            metal: metal.into(),
            quote_currency: quote_currency.into(),
        }
    }

    pub fn weekly(&self, summary: &WeeklySummary) -> String {
        let trend = match summary.trend {
            Trend::Uptrend => "📈 Uptrend",
            Trend::Downtrend => "📉 Downtrend",
            Trend::Flat => "➖ Flat",
        };
        let mean_close = summary
            .mean_close
            .map(|mean| format!("📈 Avg Close: {mean:.2}\n"))
            .unwrap_or_default();

        format!(
            "📊 *Weekly {metal} Price Summary ({quote}/g)*\n\
             \n\
             🗓️ {start} to {end}\n\
             {trend}\n\
             📊 Weekly Change: {change:+.2}%\n\
             🔺 Highest: {high:.2} on {high_day} ({high_date})\n\
             🔻 Lowest: {low:.2} on {low_day} ({low_date})\n\
             {mean_close}\
             🟢 Open: {open:.2}\n\
             🔴 Close: {close:.2}\n\
             📈 Up Days: {up} | 📉 Down Days: {down}\n",
            metal = self.metal,
            quote = self.quote_currency,
            start = summary.start_date,
            end = summary.end_date,
            change = summary.percent_change,
            high = summary.highest.price,
            high_day = summary.highest.weekday_label(),
            high_date = summary.highest.date,
            low = summary.lowest.price,
            low_day = summary.lowest.weekday_label(),
            low_date = summary.lowest.date,
            open = summary.first_open,
            close = summary.last_close,
            up = summary.up_days,
            down = summary.down_days,
        )
    }

    pub fn insufficient_week(&self) -> String {
        String::from("Not enough data for the week.")
    }

    pub fn day(&self, summary: &DaySummary) -> String {
        let candle = match summary.candle {
            Candle::Bullish => "🟢 Bullish Day",
            Candle::Bearish => "🔴 Bearish Day",
            Candle::Neutral => "➖ Neutral Day",
        };
        let bar = &summary.bar;

        format!(
            "📅 *{metal} Daily Summary ({day}, {date})*\n\
             \n\
             🟢 Open: {open:.2}\n\
             🔺 High: {high:.2}\n\
             🔻 Low: {low:.2}\n\
             🔴 Close: {close:.2}\n\
             📊 Change: {change:+.2}%\n\
             {candle}\n",
            metal = self.metal,
            day = bar.date.weekday_label(),
            date = bar.date,
            open = bar.open,
            high = bar.high,
            low = bar.low,
            close = bar.close,
            change = summary.percent_change,
        )
    }

    pub fn no_day(&self) -> String {
        String::from("No data for today.")
    }

    pub fn comparison(&self, comparison: &DailyComparison) -> String {
        let direction = match comparison.direction {
            Direction::Up => "🟢 Up",
            Direction::Down => "🔴 Down",
            Direction::Flat => "➖ Unchanged",
        };

        format!(
            "💰 *{metal} Live Price ({quote}/g)*\n\
             \n\
             Now: {now:.2}\n\
             Last close: {previous:.2} ({day}, {date})\n\
             Change: {change:+.2} ({percent:+.2}%)\n\
             {direction}\n",
            metal = self.metal,
            quote = self.quote_currency,
            now = comparison.today_price,
            previous = comparison.previous_close,
            day = comparison.previous_date.weekday_label(),
            date = comparison.previous_date,
            change = comparison.change,
            percent = comparison.percent_change,
        )
    }

    pub fn no_history(&self) -> String {
        String::from("No stored prices to compare against.")
    }
}
