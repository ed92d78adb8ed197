mod ingest;
mod report;
mod run;
mod series;

use std::sync::Arc;

use aurum_core::{
    AppConfig, HttpClient, MessageFormatter, MetalPriceAdapter, ReportSettings,
    ReqwestHttpClient, Summarizer, TelegramNotifier, TradeDate,
};
use aurum_store::CsvSeries;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// How a command finished when it did not error out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Complete,
    /// Ingestion failed or a message could not be delivered.
    Partial,
}

impl Completion {
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Complete => 0,
            Self::Partial => 3,
        }
    }

    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Complete, Self::Complete) => Self::Complete,
            _ => Self::Partial,
        }
    }
}

/// Per-invocation settings: the environment config with CLI overrides applied.
pub struct Context {
    pub config: AppConfig,
    pub today: TradeDate,
    pub pretty: bool,
    http_client: Arc<dyn HttpClient>,
}

impl Context {
    pub fn new(cli: &Cli, mut config: AppConfig) -> Result<Self, CliError> {
        if let Some(path) = &cli.series {
            config.series_path = path.clone();
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        let today = match &cli.today {
            Some(value) => TradeDate::parse(value)?,
            None => TradeDate::today_utc(),
        };

        Ok(Self {
            config,
            today,
            pretty: cli.pretty,
            http_client: Arc::new(ReqwestHttpClient::new()),
        })
    }

    pub fn store(&self) -> CsvSeries {
        CsvSeries::new(self.config.series_path.clone())
    }

    pub fn price_source(&self) -> Result<MetalPriceAdapter, CliError> {
        let api_key = self.config.require_api_key()?;
        Ok(MetalPriceAdapter::new(Arc::clone(&self.http_client), api_key)
            .with_base_url(self.config.provider_base_url.as_str())
            .with_timeout_ms(self.config.timeout_ms))
    }

    pub fn notifier(&self) -> Result<(TelegramNotifier, String), CliError> {
        let telegram = self.config.require_telegram()?;
        let notifier = TelegramNotifier::new(Arc::clone(&self.http_client), telegram.token.as_str())
            .with_timeout_ms(self.config.timeout_ms);
        Ok((notifier, telegram.chat_id.clone()))
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            window: self.config.window,
            summarizer: Summarizer::new(self.config.include_mean_close),
            formatter: MessageFormatter::new(
                self.config.metal_name.as_str(),
                self.config.quote.as_str(),
            ),
        }
    }
}

pub async fn run(cli: &Cli, config: AppConfig) -> Result<Completion, CliError> {
    let context = Context::new(cli, config)?;

    match &cli.command {
        Command::Ingest(args) => ingest::run(args, &context).await,
        Command::Report(args) => report::run(args, &context).await,
        Command::Run(args) => run::run(args, &context).await,
        Command::Series(args) => series::run(args, &context),
    }
}
