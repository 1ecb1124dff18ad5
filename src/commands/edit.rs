use crate::api::Mode;
use crate::args::EditArgs;
use crate::commands::{open_ledger, save, Out};
use crate::error::{ErrorType, IntoResult};
use crate::grid::EditGrid;
use crate::model::Expense;
use crate::{Config, Result};
use anyhow::bail;

/// Changes the given cells of one row and writes the whole table back.
///
/// # Errors
/// - A request error if nothing would change or the row does not exist. Nothing is written.
/// - A store error if the sheet cannot be written.
pub async fn edit(config: Config, mode: Mode, args: EditArgs) -> Result<Out<Expense>> {
    check_edit(&args).pub_result(ErrorType::Request)?;
    let mut ledger = open_ledger(&config, mode).await?;
    let table = ledger.load().await;

    let mut grid = EditGrid::new(&table);
    let expense = grid.expense_mut(args.row()).pub_result(ErrorType::Request)?;
    if let Some(date) = args.date() {
        expense.date = Some(date);
    }
    if let Some(category) = args.category() {
        expense.category = category.into();
    }
    if let Some(amount) = args.amount() {
        expense.amount = amount;
    }
    if let Some(description) = args.description() {
        expense.description = description.to_string();
    }
    let edited = expense.clone();

    save(ledger.as_mut(), &grid.save_edits()).await?;
    Ok(Out::new(format!("Updated row {}", args.row()), edited))
}

fn check_edit(args: &EditArgs) -> Result<()> {
    if args.is_empty() {
        bail!("Nothing to change, pass at least one of --date, --category, --amount, --description");
    }
    Ok(())
}
