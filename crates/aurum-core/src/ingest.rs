//! Incremental ingestion of one daily observation.
//!
//! The pipeline, not the store, owns idempotence: a date already present in
//! the series is skipped before the provider response is even inspected.

use std::fmt::{Display, Formatter};

use tracing::{info, warn};

use crate::source::{OhlcRequest, PriceSource, RateResponse};
use crate::store::SeriesStore;
use crate::units::to_per_gram;
use crate::{DailyRecord, TradeDate, ValidationError};

/// Why an ingestion call did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyPresent,
}

/// Why an ingestion call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestFailure {
    /// The provider call failed or returned an unusable response.
    Provider(String),
    /// The series could not be read or written.
    StorageUnavailable(String),
}

impl Display for IngestFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(message) => write!(f, "provider error: {message}"),
            Self::StorageUnavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

/// Result of one ingestion attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Appended(DailyRecord),
    Skipped(SkipReason),
    Failed(IngestFailure),
}

impl IngestOutcome {
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Appends the provider's rate for `target_date` unless that date is already stored.
pub fn ingest<S>(store: &mut S, target_date: TradeDate, raw: &RateResponse) -> IngestOutcome
where
    S: SeriesStore + ?Sized,
{
    match store.exists(target_date) {
        Ok(true) => {
            info!(date = %target_date, "record already present; skipping");
            return IngestOutcome::Skipped(SkipReason::AlreadyPresent);
        }
        Ok(false) => {}
        Err(err) => {
            warn!(date = %target_date, error = %err, "cannot check series for existing record");
            return IngestOutcome::Failed(IngestFailure::StorageUnavailable(err.to_string()));
        }
    }

    let record = match to_record(target_date, raw) {
        Ok(record) => record,
        Err(message) => {
            warn!(date = %target_date, %message, "provider response rejected");
            return IngestOutcome::Failed(IngestFailure::Provider(message));
        }
    };

    if let Err(err) = store.append(&record) {
        warn!(date = %target_date, error = %err, "failed to append record");
        return IngestOutcome::Failed(IngestFailure::StorageUnavailable(err.to_string()));
    }

    info!(
        date = %record.date,
        open = ?record.open,
        high = ?record.high,
        low = ?record.low,
        close = ?record.close,
        "appended daily record (per gram)"
    );
    IngestOutcome::Appended(record)
}

/// Fetches the OHLC rate for `req.date` and ingests it.
///
/// The existence check runs first so that no provider call is made for a date
/// that is already stored. Provider errors are reported, never retried.
pub async fn fetch_and_ingest<S>(
    source: &dyn PriceSource,
    store: &mut S,
    req: OhlcRequest,
) -> IngestOutcome
where
    S: SeriesStore + ?Sized,
{
    let Some(target_date) = req.date else {
        return IngestOutcome::Failed(IngestFailure::Provider(String::from(
            "ingestion requires an explicit target date",
        )));
    };

    match store.exists(target_date) {
        Ok(true) => {
            info!(date = %target_date, "record already present; not fetching");
            return IngestOutcome::Skipped(SkipReason::AlreadyPresent);
        }
        Ok(false) => {}
        Err(err) => {
            warn!(date = %target_date, error = %err, "cannot check series for existing record");
            return IngestOutcome::Failed(IngestFailure::StorageUnavailable(err.to_string()));
        }
    }

    info!(date = %target_date, source = source.name(), "fetching OHLC rate");
    match source.ohlc(req).await {
        Ok(raw) => ingest(store, target_date, &raw),
        Err(err) => {
            warn!(date = %target_date, error = %err, "provider call failed");
            IngestOutcome::Failed(IngestFailure::Provider(err.to_string()))
        }
    }
}

fn to_record(date: TradeDate, raw: &RateResponse) -> Result<DailyRecord, String> {
    if !raw.success {
        return Err(raw
            .error_message()
            .map(str::to_owned)
            .unwrap_or_else(|| String::from("provider reported failure")));
    }

    let rate = match &raw.rate {
        Some(rate) if !rate.is_empty() => rate,
        _ => return Err(String::from("provider returned an empty rate payload")),
    };

    for (field, value) in rate.fields() {
        if let Some(value) = value {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteValue { field }.to_string());
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeValue { field }.to_string());
            }
        }
    }

    Ok(DailyRecord::new(
        date,
        to_per_gram(rate.open),
        to_per_gram(rate.high),
        to_per_gram(rate.low),
        to_per_gram(rate.close),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::OhlcRate;
    use crate::store::MemorySeries;
    use crate::units::GRAMS_PER_TROY_OUNCE;

    fn date(value: &str) -> TradeDate {
        TradeDate::parse(value).expect("date")
    }

    fn rate(open: f64, high: f64, low: f64, close: f64) -> RateResponse {
        RateResponse::ohlc(OhlcRate {
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
        })
    }

    #[test]
    fn second_ingestion_of_same_date_is_skipped() {
        let mut series = MemorySeries::new();
        let raw = rate(9_800.0, 9_900.0, 9_700.0, 9_850.0);

        let first = ingest(&mut series, date("2024-01-02"), &raw);
        let second = ingest(&mut series, date("2024-01-02"), &raw);

        assert!(matches!(first, IngestOutcome::Appended(_)));
        assert_eq!(second, IngestOutcome::Skipped(SkipReason::AlreadyPresent));
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn converts_prices_to_per_gram() {
        let mut series = MemorySeries::new();
        let raw = rate(
            GRAMS_PER_TROY_OUNCE * 300.0,
            GRAMS_PER_TROY_OUNCE * 306.0,
            GRAMS_PER_TROY_OUNCE * 299.0,
            GRAMS_PER_TROY_OUNCE * 305.0,
        );

        let IngestOutcome::Appended(record) = ingest(&mut series, date("2024-01-01"), &raw) else {
            panic!("expected append");
        };
        let bar = record.complete().expect("complete");
        assert!((bar.open - 300.0).abs() < 1e-9);
        assert!((bar.close - 305.0).abs() < 1e-9);
    }

    #[test]
    fn missing_fields_are_stored_as_absent() {
        let mut series = MemorySeries::new();
        let raw = RateResponse::ohlc(OhlcRate {
            open: Some(9_800.0),
            high: None,
            low: Some(0.0),
            close: Some(9_850.0),
        });

        let outcome = ingest(&mut series, date("2024-01-03"), &raw);
        let IngestOutcome::Appended(record) = outcome else {
            panic!("expected append");
        };
        assert!(record.open.is_some());
        assert_eq!(record.high, None);
        assert_eq!(record.low, None);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn unsuccessful_response_appends_nothing() {
        let mut series = MemorySeries::new();
        let outcome = ingest(
            &mut series,
            date("2024-01-02"),
            &RateResponse::failure("invalid api key"),
        );

        assert_eq!(
            outcome,
            IngestOutcome::Failed(IngestFailure::Provider(String::from("invalid api key")))
        );
        assert!(series.is_empty());
    }

    #[test]
    fn empty_payload_is_a_provider_error() {
        let mut series = MemorySeries::new();
        let raw = RateResponse::ohlc(OhlcRate::default());
        let outcome = ingest(&mut series, date("2024-01-02"), &raw);
        assert!(matches!(
            outcome,
            IngestOutcome::Failed(IngestFailure::Provider(_))
        ));
        assert!(series.is_empty());
    }

    #[test]
    fn unavailable_store_fails_without_panicking() {
        let mut series = MemorySeries::unavailable();
        let outcome = ingest(&mut series, date("2024-01-02"), &rate(1.0, 1.0, 1.0, 1.0));
        assert!(matches!(
            outcome,
            IngestOutcome::Failed(IngestFailure::StorageUnavailable(_))
        ));
    }
}
