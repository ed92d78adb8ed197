use aurum_core::{
    fetch_and_ingest, IngestOutcome, OhlcRequest, PriceSource, SeriesStore, TradeDate,
};
use serde_json::{json, Value};

use crate::cli::IngestArgs;
use crate::error::CliError;
use crate::output;

use super::{Completion, Context};

pub async fn run(args: &IngestArgs, context: &Context) -> Result<Completion, CliError> {
    let target = match &args.date {
        Some(value) => TradeDate::parse(value)?,
        None => default_target(context)?,
    };
    let source = context.price_source()?;
    let mut store = context.store();

    let outcome = ingest_one(&source, &mut store, context, target).await?;
    output::render(&describe(target, &outcome), context.pretty)?;

    Ok(completion(&outcome))
}

/// Today minus the settlement lag; the provider publishes a day's OHLC late.
pub(super) fn default_target(context: &Context) -> Result<TradeDate, CliError> {
    Ok(context
        .today
        .checked_sub_days(i64::from(context.config.settlement_lag_days))?)
}

pub(super) async fn ingest_one<S>(
    source: &dyn PriceSource,
    store: &mut S,
    context: &Context,
    target: TradeDate,
) -> Result<IngestOutcome, CliError>
where
    S: SeriesStore + ?Sized,
{
    let request = OhlcRequest::new(&context.config.base, &context.config.quote, Some(target))?;
    Ok(fetch_and_ingest(source, store, request).await)
}

pub(super) fn describe(target: TradeDate, outcome: &IngestOutcome) -> Value {
    match outcome {
        IngestOutcome::Appended(record) => json!({
            "date": target,
            "outcome": "appended",
            "record": record,
        }),
        IngestOutcome::Skipped(_) => json!({
            "date": target,
            "outcome": "skipped",
            "reason": "already_present",
        }),
        IngestOutcome::Failed(failure) => json!({
            "date": target,
            "outcome": "failed",
            "error": failure.to_string(),
        }),
    }
}

pub(super) fn completion(outcome: &IngestOutcome) -> Completion {
    if outcome.is_failure() {
        Completion::Partial
    } else {
        Completion::Complete
    }
}
