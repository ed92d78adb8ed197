//! Price source trait and request/response types.
//!
//! A [`PriceSource`] returns the provider's raw [`RateResponse`] untouched;
//! deciding whether that response is usable belongs to the ingestion pipeline.
//!
//! | Endpoint | Request | Description |
//! |----------|---------|-------------|
//! | OHLC | [`OhlcRequest`] | Daily open/high/low/close for one date |
//! | Latest | [`LatestRequest`] | Most recent spot rate |

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::domain::TradeDate;
use crate::error::ValidationError;

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    InvalidRequest,
    InvalidResponse,
}

/// Structured source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidResponse,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::InvalidResponse => "source.invalid_response",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Validate and normalize an asset or currency code to uppercase 3 letters.
pub fn validate_asset_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidAssetCode {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}

/// Request payload for the daily OHLC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OhlcRequest {
    pub base: String,
    pub quote: String,
    /// `None` asks the provider for its latest available day.
    pub date: Option<TradeDate>,
}

impl OhlcRequest {
    pub fn new(
        base: &str,
        quote: &str,
        date: Option<TradeDate>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            base: validate_asset_code(base)?,
            quote: validate_asset_code(quote)?,
            date,
        })
    }
}

/// Request payload for the latest-rate endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestRequest {
    pub base: String,
    pub quote: String,
}

impl LatestRequest {
    pub fn new(base: &str, quote: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            base: validate_asset_code(base)?,
            quote: validate_asset_code(quote)?,
        })
    }
}

/// Per-troy-ounce OHLC payload as sent by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcRate {
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
}

impl OhlcRate {
    pub fn is_empty(&self) -> bool {
        self.open.is_none() && self.high.is_none() && self.low.is_none() && self.close.is_none()
    }

    pub(crate) fn fields(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
    }
}

/// Error body attached to unsuccessful provider responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default, rename = "statusCode")]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Raw provider response, shared by the OHLC and latest endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateResponse {
    #[serde(default)]
    pub success: bool,
    /// OHLC payload (`/ohlc`).
    #[serde(default)]
    pub rate: Option<OhlcRate>,
    /// Currency to rate map (`/latest`).
    #[serde(default)]
    pub rates: Option<BTreeMap<String, Option<f64>>>,
    #[serde(default)]
    pub error: Option<ProviderErrorBody>,
}

impl RateResponse {
    pub fn ohlc(rate: OhlcRate) -> Self {
        Self {
            success: true,
            rate: Some(rate),
            ..Self::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(ProviderErrorBody {
                status_code: None,
                message: Some(message.into()),
            }),
            ..Self::default()
        }
    }

    /// Provider-supplied failure description, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().and_then(|error| error.message.as_deref())
    }

    /// Spot rate for `quote` from a latest-rate response.
    pub fn latest_rate(&self, quote: &str) -> Option<f64> {
        self.rates.as_ref()?.get(quote).copied().flatten()
    }
}

/// Price provider contract.
///
/// Implementations make at most one upstream call per method and never retry.
pub trait PriceSource: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Fetches the per-troy-ounce OHLC rate for one day.
    fn ohlc<'a>(
        &'a self,
        req: OhlcRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RateResponse, SourceError>> + Send + 'a>>;

    /// Fetches the latest spot rate.
    fn latest<'a>(
        &'a self,
        req: LatestRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RateResponse, SourceError>> + Send + 'a>>;
}
