//! Window selection over the persisted series.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::store::SeriesStore;
use crate::{DailyBar, TradeDate, ValidationError};

/// Longest accepted trailing window, in days.
pub const MAX_TRAILING_DAYS: u32 = 31;

/// Policy deciding which dates a window covers, relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// `[reference - n days, reference]`, both ends inclusive.
    TrailingDays(u32),
    /// From the most recent Monday (the reference itself on a Monday) to the reference.
    SinceMostRecentMonday,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::TrailingDays(7)
    }
}

impl WindowPolicy {
    pub fn trailing(days: u32) -> Result<Self, ValidationError> {
        if days > MAX_TRAILING_DAYS {
            return Err(ValidationError::WindowTooLong {
                days,
                max: MAX_TRAILING_DAYS,
            });
        }
        Ok(Self::TrailingDays(days))
    }

    /// Inclusive date bounds for `reference`.
    pub fn bounds(self, reference: TradeDate) -> Result<(TradeDate, TradeDate), ValidationError> {
        let span = match self {
            Self::TrailingDays(days) => i64::from(days),
            Self::SinceMostRecentMonday => i64::from(reference.days_since_monday()),
        };
        Ok((reference.checked_sub_days(span)?, reference))
    }
}

impl Display for WindowPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrailingDays(days) => write!(f, "trailing:{days}"),
            Self::SinceMostRecentMonday => f.write_str("week"),
        }
    }
}

impl FromStr for WindowPolicy {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized == "week" || normalized == "since-monday" {
            return Ok(Self::SinceMostRecentMonday);
        }

        let invalid = || ValidationError::InvalidWindowPolicy {
            value: value.to_owned(),
        };
        let days = normalized
            .strip_prefix("trailing:")
            .ok_or_else(invalid)?
            .parse::<u32>()
            .map_err(|_| invalid())?;
        Self::trailing(days)
    }
}

/// Date-ordered slice of complete daily bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Window {
    bars: Vec<DailyBar>,
}

impl Window {
    /// Builds a window, sorting bars by date. Storage order is not trusted.
    pub fn from_bars(mut bars: Vec<DailyBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);
        Self { bars }
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&DailyBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&DailyBar> {
        self.bars.last()
    }
}

/// Reads the window selected by `policy` around `reference` from `store`.
pub fn select_window<S>(
    store: &S,
    policy: WindowPolicy,
    reference: TradeDate,
) -> Result<Window, ValidationError>
where
    S: SeriesStore + ?Sized,
{
    let (from, to) = policy.bounds(reference)?;
    Ok(Window::from_bars(store.read_window(from, to)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySeries;
    use crate::DailyRecord;

    fn date(value: &str) -> TradeDate {
        TradeDate::parse(value).expect("date")
    }

    fn record(value: &str) -> DailyRecord {
        DailyRecord::new(date(value), Some(1.0), Some(2.0), Some(0.5), Some(1.5))
    }

    #[test]
    fn trailing_bounds_are_inclusive() {
        let (from, to) = WindowPolicy::TrailingDays(7)
            .bounds(date("2024-01-10"))
            .expect("bounds");
        assert_eq!(from.to_string(), "2024-01-03");
        assert_eq!(to.to_string(), "2024-01-10");
    }

    #[test]
    fn since_monday_starts_on_monday() {
        // 2024-01-11 is a Thursday.
        let (from, _) = WindowPolicy::SinceMostRecentMonday
            .bounds(date("2024-01-11"))
            .expect("bounds");
        assert_eq!(from.to_string(), "2024-01-08");

        let (from, to) = WindowPolicy::SinceMostRecentMonday
            .bounds(date("2024-01-08"))
            .expect("bounds");
        assert_eq!(from, to);
    }

    #[test]
    fn selected_window_is_sorted_by_date() {
        let series = MemorySeries::with_records(vec![
            record("2024-01-05"),
            record("2024-01-03"),
            record("2024-01-04"),
            record("2023-12-20"),
        ]);

        let window = select_window(&series, WindowPolicy::TrailingDays(7), date("2024-01-06"))
            .expect("window");
        let dates: Vec<String> = window.bars().iter().map(|bar| bar.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-04", "2024-01-05"]);
    }

    #[test]
    fn parses_policies() {
        assert_eq!(
            "trailing:5".parse::<WindowPolicy>().expect("parse"),
            WindowPolicy::TrailingDays(5)
        );
        assert_eq!(
            "week".parse::<WindowPolicy>().expect("parse"),
            WindowPolicy::SinceMostRecentMonday
        );
        assert!(matches!(
            "monthly".parse::<WindowPolicy>(),
            Err(ValidationError::InvalidWindowPolicy { .. })
        ));
        assert!(matches!(
            "trailing:90".parse::<WindowPolicy>(),
            Err(ValidationError::WindowTooLong { .. })
        ));
    }
}
