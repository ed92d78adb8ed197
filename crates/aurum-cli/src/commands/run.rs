use tracing::warn;

use crate::cli::ReportArgs;
use crate::error::CliError;
use crate::output;

use super::{ingest, report, Completion, Context};

/// Daily cron entry point: ingest the settled day, then report.
///
/// A failed ingestion does not stop the report; the series may still hold
/// enough history for every message.
pub async fn run(args: &ReportArgs, context: &Context) -> Result<Completion, CliError> {
    let target = ingest::default_target(context)?;
    let source = context.price_source()?;
    let mut store = context.store();

    let outcome = ingest::ingest_one(&source, &mut store, context, target).await?;
    if outcome.is_failure() {
        warn!(date = %target, "ingestion failed; reporting on stored history");
    }
    output::render(&ingest::describe(target, &outcome), context.pretty)?;

    let reported = report::run(args, context).await?;
    Ok(ingest::completion(&outcome).and(reported))
}
