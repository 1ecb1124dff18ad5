//! The `expense delete` command.

use crate::api::Mode;
use crate::args::DeleteArgs;
use crate::commands::{open_ledger, plural, save, Out};
use crate::error::{ErrorType, IntoResult};
use crate::grid::EditGrid;
use crate::model::Expense;
use crate::{Config, Result};

/// Deletes the given rows and writes the remaining rows back.
///
/// Every row is checked before anything is written: if any row number does not exist the command
/// fails with a request error and the sheet is left alone.
pub async fn delete(config: Config, mode: Mode, args: DeleteArgs) -> Result<Out<Vec<Expense>>> {
    let mut ledger = open_ledger(&config, mode).await?;
    let table = ledger.load().await;

    let mut grid = EditGrid::new(&table);
    for &row in args.rows() {
        grid.mark(row).pub_result(ErrorType::Request)?;
    }
    let deleted: Vec<Expense> = grid
        .marked()
        .into_iter()
        .map(|row| table.rows()[row - 1].clone())
        .collect();

    let remaining = grid.delete_marked();
    save(ledger.as_mut(), &remaining).await?;

    let message = format!(
        "Deleted {}, {} left",
        plural(deleted.len(), "row", "rows"),
        remaining.len()
    );
    Ok(Out::new(message, deleted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type;
    use crate::model::HEADERS;
    use crate::test::{rows, TestEnv};

    fn seed(env: &TestEnv) {
        env.seed(rows(&[
            &HEADERS,
            &["2024-01-01", "Food", "10.00", "a"],
            &["2024-01-02", "Transport", "5.50", "b"],
            &["2024-01-03", "Health", "0.00", "c"],
        ]));
    }

    #[tokio::test]
    async fn test_delete_middle_row() {
        let env = TestEnv::new().await;
        seed(&env);
        let out = delete(env.config(), Mode::Testing, DeleteArgs::new(vec![2]))
            .await
            .unwrap();
        assert_eq!(out.message(), "Deleted 1 row, 2 left");
        assert_eq!(out.structure().unwrap()[0].description, "b");
        assert_eq!(
            env.sheet_rows(),
            rows(&[
                &HEADERS,
                &["2024-01-01", "Food", "10.00", "a"],
                &["2024-01-03", "Health", "0.00", "c"],
            ])
        );
    }

    #[tokio::test]
    async fn test_delete_repeated_and_all_rows() {
        let env = TestEnv::new().await;
        seed(&env);
        let out = delete(env.config(), Mode::Testing, DeleteArgs::new(vec![3, 1, 2, 3]))
            .await
            .unwrap();
        assert_eq!(out.message(), "Deleted 3 rows, 0 left");
        assert_eq!(env.sheet_rows(), rows(&[&HEADERS]));
    }

    #[tokio::test]
    async fn test_delete_out_of_range_writes_nothing() {
        let env = TestEnv::new().await;
        seed(&env);
        let before = env.sheet_rows();
        let err = delete(env.config(), Mode::Testing, DeleteArgs::new(vec![1, 4]))
            .await
            .unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::Request));
        assert_eq!(env.sheet_rows(), before);
    }
}
