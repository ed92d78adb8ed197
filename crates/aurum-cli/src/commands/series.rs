use aurum_core::{select_window, WindowPolicy};
use serde_json::json;

use crate::cli::SeriesArgs;
use crate::error::CliError;
use crate::output;

use super::{Completion, Context};

pub fn run(args: &SeriesArgs, context: &Context) -> Result<Completion, CliError> {
    let policy = match args.days {
        Some(days) => WindowPolicy::trailing(days)?,
        None => context.config.window,
    };
    let (from, to) = policy.bounds(context.today)?;
    let window = select_window(&context.store(), policy, context.today)?;

    output::render(
        &json!({
            "policy": policy.to_string(),
            "from": from,
            "to": to,
            "bars": window.bars(),
        }),
        context.pretty,
    )?;
    Ok(Completion::Complete)
}
