//! # Aurum Core
//!
//! Ingestion and summarization engine for a daily precious-metal price digest.
//!
//! ## Overview
//!
//! - **Domain models** for trade dates and daily OHLC records (per gram)
//! - **Record store contract** for the append-only daily series
//! - **Ingestion pipeline** that appends one day at most once
//! - **Window selection and summary statistics** over the series
//! - **Message templates** for the outbound alerts
//! - **Provider and channel adapters** behind [`PriceSource`] and [`Notifier`]
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | metalpriceapi.com source and Telegram notifier |
//! | [`config`] | Environment-backed process configuration |
//! | [`domain`] | Domain models (TradeDate, DailyRecord, DailyBar) |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`ingest`] | Incremental, idempotent ingestion |
//! | [`message`] | Markdown alert templates |
//! | [`notify`] | Notification channel contract |
//! | [`report`] | Per-run message assembly |
//! | [`source`] | Price provider contract and wire types |
//! | [`store`] | Series store contract and in-memory store |
//! | [`summary`] | Trend, change and extremum statistics |
//! | [`units`] | Troy ounce to gram conversion |
//! | [`window`] | Date-bounded window selection |
//!
//! ## Flow
//!
//! ```text
//! PriceSource ──▶ ingest ──▶ SeriesStore ──▶ select_window ──▶ Summarizer
//!                                                                  │
//!                                  Notifier ◀── MessageFormatter ◀─┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use aurum_core::{compose, DailyRecord, MemorySeries, ReportSettings, TradeDate};
//!
//! let date = TradeDate::parse("2024-01-02").unwrap();
//! let series = MemorySeries::with_records(vec![DailyRecord::new(
//!     date,
//!     Some(305.0),
//!     Some(307.0),
//!     Some(297.0),
//!     Some(298.0),
//! )]);
//!
//! let report = compose(&series, &ReportSettings::default(), date, None).unwrap();
//! assert_eq!(report.weekly, "Not enough data for the week.");
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod ingest;
pub mod message;
pub mod notify;
pub mod report;
pub mod source;
pub mod store;
pub mod summary;
pub mod units;
pub mod window;

// Adapter implementations
pub use adapters::{MetalPriceAdapter, TelegramNotifier};

// Configuration
pub use config::{AppConfig, ConfigError, TelegramConfig};

// Domain models
pub use domain::{DailyBar, DailyRecord, TradeDate};

// Error types
pub use error::ValidationError;

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Ingestion
pub use ingest::{fetch_and_ingest, ingest, IngestFailure, IngestOutcome, SkipReason};

// Rendering and reporting
pub use message::MessageFormatter;
pub use report::{compose, Report, ReportSettings};

// Notification
pub use notify::{MarkupMode, Notifier, NotifyError, OutboundMessage};

// Price source
pub use source::{
    LatestRequest, OhlcRate, OhlcRequest, PriceSource, RateResponse, SourceError, SourceErrorKind,
};

// Storage
pub use store::{MemorySeries, SeriesStore, StorageError};

// Statistics
pub use summary::{
    Candle, DailyComparison, DaySummary, Direction, Summarizer, SummaryError, Trend, WeeklySummary,
};
pub use units::{to_per_gram, GRAMS_PER_TROY_OUNCE};
pub use window::{select_window, Window, WindowPolicy};
