use crate::api::Mode;
use crate::args::AddArgs;
use crate::commands::{open_ledger, save, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{format_date, Amount, Expense};
use crate::{Config, Result};
use anyhow::bail;
use chrono::Local;
use rust_decimal::Decimal;

/// Appends one expense as the last row of the sheet.
///
/// The current table is loaded, the new expense is pushed onto the end, and the whole table is
/// written back. The date defaults to today in local time.
///
/// # Errors
/// - A request error if the amount is less than 0.01.
/// - A store error if the sheet cannot be written.
pub async fn add(config: Config, mode: Mode, args: AddArgs) -> Result<Out<Expense>> {
    check_amount(args.amount()).pub_result(ErrorType::Request)?;
    let date = args.date().unwrap_or_else(|| Local::now().date_naive());
    let expense = Expense::new(date, args.category(), args.amount(), args.description());

    let mut ledger = open_ledger(&config, mode).await?;
    let mut table = ledger.load().await;
    table.push(expense.clone());
    save(ledger.as_mut(), &table).await?;

    let message = format!(
        "Added {} {} on {} as row {}",
        expense.category,
        expense.amount,
        format_date(expense.date),
        table.len()
    );
    Ok(Out::new(message, expense))
}

fn check_amount(amount: Amount) -> Result<()> {
    let minimum = Amount::new(Decimal::new(1, 2));
    if amount < minimum {
        bail!("The amount must be at least {minimum}, got {amount}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestSheetState;
    use crate::error::error_type;
    use crate::model::{Category, HEADERS};
    use crate::test::{rows, TestEnv};
    use chrono::NaiveDate;

    fn args(amount: &str, date: Option<NaiveDate>) -> AddArgs {
        AddArgs::new(Category::Food, amount.parse().unwrap(), date, "Lunch")
    }

    #[tokio::test]
    async fn test_add_appends_row() {
        let env = TestEnv::new().await;
        env.seed(rows(&[&HEADERS, &["2024-01-10", "Transport", "12.00", "Bus"]]));

        let out = add(
            env.config(),
            Mode::Testing,
            args("42.5", NaiveDate::from_ymd_opt(2024, 1, 15)),
        )
        .await
        .unwrap();
        assert_eq!(out.message(), "Added Food 42.50 on 2024-01-15 as row 2");

        assert_eq!(
            env.sheet_rows(),
            rows(&[
                &HEADERS,
                &["2024-01-10", "Transport", "12.00", "Bus"],
                &["2024-01-15", "Food", "42.50", "Lunch"],
            ])
        );
    }

    #[tokio::test]
    async fn test_add_to_empty_sheet_defaults_to_today() {
        let env = TestEnv::new().await;
        env.seed(Vec::new());
        let out = add(env.config(), Mode::Testing, args("3", None))
            .await
            .unwrap();
        let today = Local::now().date_naive();
        assert_eq!(out.structure().unwrap().date, Some(today));

        let sheet = env.sheet_rows();
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet[0], rows(&[&HEADERS])[0]);
        assert_eq!(sheet[1][2], "3.00");
    }

    #[tokio::test]
    async fn test_add_rejects_small_amount() {
        let env = TestEnv::new().await;
        env.seed(rows(&[&HEADERS]));
        for amount in ["0", "0.004", "-5"] {
            let err = add(env.config(), Mode::Testing, args(amount, None))
                .await
                .unwrap_err();
            assert_eq!(error_type(&err), Some(ErrorType::Request));
        }
        assert_eq!(env.sheet_rows(), rows(&[&HEADERS]));
    }

    #[tokio::test]
    async fn test_add_write_failure() {
        let env = TestEnv::new().await;
        env.set_state(TestSheetState {
            fail_writes: true,
            ..TestSheetState::with_tab(env.config().worksheet(), rows(&[&HEADERS]))
        });
        let err = add(env.config(), Mode::Testing, args("1", None))
            .await
            .unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::Store));
        assert_eq!(env.sheet_rows(), rows(&[&HEADERS]));
    }
}
