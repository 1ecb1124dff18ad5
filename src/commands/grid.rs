//! The `expense export` and `expense apply` commands, which move the edit grid through a CSV file.

use crate::api::Mode;
use crate::args::{ApplyAction, ApplyArgs, ExportArgs};
use crate::commands::{open_ledger, plural, save, Out};
use crate::error::{ErrorType, IntoResult};
use crate::grid::EditGrid;
use crate::model::Table;
use crate::{utils, Config, Result};
use anyhow::Context;

/// Loads the sheet and writes it as an edit grid to `--output`, or to stdout.
pub async fn export(config: Config, mode: Mode, args: ExportArgs) -> Result<Out<()>> {
    let mut ledger = open_ledger(&config, mode).await?;
    let table = ledger.load().await;
    let grid = EditGrid::new(&table);

    let mut csv = Vec::new();
    grid.write_csv(&mut csv)?;
    let rows = plural(grid.len(), "row", "rows");

    match args.output() {
        Some(path) => {
            utils::write(path, &csv)
                .await
                .pub_result(ErrorType::Request)?;
            Ok(format!("Exported {rows} to {}", path.display()).into())
        }
        None => {
            let display = String::from_utf8(csv).context("The grid was not valid UTF-8")?;
            Ok(Out::new_message(format!("Exported {rows}")).with_display(display))
        }
    }
}

/// Reads an edited grid and writes it to the sheet, either keeping every row or dropping the rows
/// marked in the `Delete` column. The grid replaces the whole table.
///
/// # Errors
/// - A request error if the file cannot be read or is not a valid grid. Nothing is written.
/// - A store error if the sheet cannot be written.
pub async fn apply(config: Config, mode: Mode, args: ApplyArgs) -> Result<Out<Table>> {
    let content = utils::read(args.file())
        .await
        .pub_result(ErrorType::Request)?;
    let grid = EditGrid::read_csv(content.as_bytes())
        .with_context(|| format!("Unable to read the grid in {}", args.file().display()))
        .pub_result(ErrorType::Request)?;
    let marked = grid.marked().len();

    let (table, message) = match args.action() {
        ApplyAction::Save => {
            let table = grid.save_edits();
            let message = format!("Saved {}", plural(table.len(), "row", "rows"));
            (table, message)
        }
        ApplyAction::DeleteMarked => {
            let table = grid.delete_marked();
            let message = format!(
                "Deleted {}, saved {}",
                plural(marked, "row", "rows"),
                plural(table.len(), "row", "rows")
            );
            (table, message)
        }
    };

    let mut ledger = open_ledger(&config, mode).await?;
    save(ledger.as_mut(), &table).await?;
    Ok(Out::new(message, table))
}
