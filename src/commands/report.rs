use crate::api::Mode;
use crate::args::{ReportArgs, ReportFormat};
use crate::commands::{open_ledger, Out};
use crate::report::Summary;
use crate::{Config, Result};
use anyhow::Context;

/// Loads the sheet fresh and summarizes it: the total spent and, when the total is positive, the
/// breakdown by category.
pub async fn report(config: Config, mode: Mode, args: ReportArgs) -> Result<Out<Summary>> {
    let mut ledger = open_ledger(&config, mode).await?;
    let table = ledger.load().await;
    let summary = Summary::new(&table);
    let display = match args.format() {
        ReportFormat::Text => summary.render(),
        ReportFormat::Json => {
            let mut json = serde_json::to_string_pretty(&summary)
                .context("Unable to serialize the summary")?;
            json.push('\n');
            json
        }
    };
    let message = format!("Total spent: {}", summary.total.grouped());
    Ok(Out::new(message, summary).with_display(display))
}
