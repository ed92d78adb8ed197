use aurum_core::{
    compose, to_per_gram, LatestRequest, Notifier, OutboundMessage, PriceSource, Report,
};
use serde_json::json;
use tracing::{info, warn};

use crate::cli::ReportArgs;
use crate::error::CliError;
use crate::output;

use super::{Completion, Context};

pub async fn run(args: &ReportArgs, context: &Context) -> Result<Completion, CliError> {
    let (live_price, live_status) = if args.live {
        fetch_live_price(context).await?
    } else {
        (None, Completion::Complete)
    };

    let store = context.store();
    let report = compose(&store, &context.report_settings(), context.today, live_price)?;

    let delivery = if args.dry_run {
        output::render(&report, context.pretty)?;
        Completion::Complete
    } else {
        deliver(&report, context).await?
    };

    Ok(live_status.and(delivery))
}

/// Latest spot price per gram. A provider failure drops the live message only.
async fn fetch_live_price(context: &Context) -> Result<(Option<f64>, Completion), CliError> {
    let source = context.price_source()?;
    let request = LatestRequest::new(&context.config.base, &context.config.quote)?;

    match source.latest(request).await {
        Ok(response) if response.success => {
            match to_per_gram(response.latest_rate(&context.config.quote)) {
                Some(price) => Ok((Some(price), Completion::Complete)),
                None => {
                    warn!(quote = %context.config.quote, "latest response carries no usable rate");
                    Ok((None, Completion::Partial))
                }
            }
        }
        Ok(response) => {
            warn!(
                error = response.error_message().unwrap_or("provider reported failure"),
                "latest price unavailable"
            );
            Ok((None, Completion::Partial))
        }
        Err(error) => {
            warn!(error = %error, code = error.code(), "latest price unavailable");
            Ok((None, Completion::Partial))
        }
    }
}

/// Sends every message, continuing past failures.
async fn deliver(report: &Report, context: &Context) -> Result<Completion, CliError> {
    let (notifier, chat_id) = context.notifier()?;

    let mut sent = 0_usize;
    let mut failed = 0_usize;
    for text in report.messages() {
        let message = OutboundMessage::markdown(chat_id.as_str(), text);
        match notifier.send(&message).await {
            Ok(()) => sent += 1,
            Err(error) => {
                warn!(error = %error, "message delivery failed");
                failed += 1;
            }
        }
    }
    info!(sent, failed, "report delivered");

    output::render(&json!({ "sent": sent, "failed": failed }), context.pretty)?;
    Ok(if failed == 0 {
        Completion::Complete
    } else {
        Completion::Partial
    })
}
