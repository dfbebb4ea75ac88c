use super::*;
use crate::context::VerbosityLevel;
use crate::format::log::track_spinner;
use tracing::info;

/// Handle the list command
pub async fn handle_list(ctx: &AppContext, args: &ListArgs) {
    let formatter = ctx.formatter();
    let config = effective_config(ctx, args);
    let format = config.output.format;

    let regls = match build_regls(&config, args) {
        Ok(regls) => regls,
        Err(e) => {
            formatter.error(&e.to_string());
            std::process::exit(1);
        }
    };

    info!(
        registry = regls.registry_url(),
        prefix = ?regls.options().prefix,
        all = regls.options().show_all,
        "listing registry"
    );

    // Warnings still reach stderr at this level, so the log sink suspends the spinner for them
    let spinner = (ctx.verbosity == VerbosityLevel::Normal && format == OutputFormat::Pretty)
        .then(|| formatter.spinner("Fetching registry inventory..."));
    let tracked = spinner.as_ref().map(track_spinner);

    let result = regls.list().await;

    drop(tracked);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let inventory = match result {
        Ok(inventory) => inventory,
        Err(e) => {
            formatter.error(&e.to_string());
            std::process::exit(1);
        }
    };

    if let Some(summary) = skipped_summary(&inventory) {
        formatter.warning(&summary);
    }

    match render_rows(&inventory.rows, format) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            formatter.error(&e);
            std::process::exit(1);
        }
    }
}
