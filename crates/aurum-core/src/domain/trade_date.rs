use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, Weekday};

use crate::ValidationError;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar date of a daily observation, rendered as ISO 8601 `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeDate(Date);

impl TradeDate {
    /// Current calendar date in UTC.
    pub fn today_utc() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), ISO_DATE)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// Days elapsed since the most recent Monday (Monday = 0, Sunday = 6).
    pub fn days_since_monday(self) -> u8 {
        self.0.weekday().number_days_from_monday()
    }

    /// Three-letter English weekday label, e.g. `Mon`.
    pub fn weekday_label(self) -> &'static str {
        match self.0.weekday() {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        }
    }

    pub fn checked_sub_days(self, days: i64) -> Result<Self, ValidationError> {
        self.0
            .checked_sub(Duration::days(days))
            .map(Self)
            .ok_or_else(|| ValidationError::DateOutOfRange {
                date: self.to_string(),
                days: -days,
            })
    }

    pub fn checked_add_days(self, days: i64) -> Result<Self, ValidationError> {
        self.0
            .checked_add(Duration::days(days))
            .map(Self)
            .ok_or_else(|| ValidationError::DateOutOfRange {
                date: self.to_string(),
                days,
            })
    }

    pub fn format_iso(self) -> String {
        // Every `time::Date` in the supported year range renders with this description.
        self.0
            .format(ISO_DATE)
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }
}

impl Display for TradeDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl FromStr for TradeDate {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for TradeDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradeDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_iso_dates() {
        let date = TradeDate::parse("2024-01-02").expect("must parse");
        assert_eq!(date.to_string(), "2024-01-02");
        assert_eq!(date.weekday_label(), "Tue");
        assert_eq!(date.days_since_monday(), 1);
    }

    #[test]
    fn rejects_non_iso_dates() {
        let err = TradeDate::parse("02/01/2024").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
        assert!(TradeDate::parse("2024-02-30").is_err());
    }

    #[test]
    fn day_arithmetic_crosses_month_boundaries() {
        let date = TradeDate::parse("2024-03-01").expect("must parse");
        assert_eq!(
            date.checked_sub_days(1).expect("in range").to_string(),
            "2024-02-29"
        );
        assert_eq!(
            date.checked_add_days(31).expect("in range").to_string(),
            "2024-04-01"
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let date = TradeDate::parse("2024-01-07").expect("must parse");
        assert_eq!(
            serde_json::to_string(&date).expect("serialize"),
            "\"2024-01-07\""
        );
        assert_eq!(date.weekday_label(), "Sun");
        assert_eq!(date.days_since_monday(), 6);
    }
}
