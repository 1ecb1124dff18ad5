use crate::api::Mode;
use crate::args::{ListArgs, ListFormat};
use crate::commands::{open_ledger, plural, Out};
use crate::model::Table;
use crate::{Config, Result};
use anyhow::Context;

/// Loads the sheet and renders every expense in the requested format.
///
/// Loading never fails, so an unreachable sheet simply lists no expenses.
pub async fn list(config: Config, mode: Mode, args: ListArgs) -> Result<Out<Table>> {
    let mut ledger = open_ledger(&config, mode).await?;
    let table = ledger.load().await;
    let display = match args.format() {
        ListFormat::Table => table.render(),
        ListFormat::Csv => to_csv(&table)?,
        ListFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(&table).context("Unable to serialize the table")?;
            json.push('\n');
            json
        }
    };
    let message = plural(table.len(), "expense", "expenses");
    Ok(Out::new(message, table).with_display(display))
}

fn to_csv(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in table.to_sheet() {
        writer
            .write_record(&row)
            .context("Unable to write a CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .context("Unable to finish writing the CSV")?;
    String::from_utf8(bytes).context("The CSV was not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HEADERS;
    use crate::test::{rows, TestEnv};

    async fn seeded() -> TestEnv {
        let env = TestEnv::new().await;
        env.seed(rows(&[
            &HEADERS,
            &["2024-01-15", "Food", "42.5", "Lunch, with friends"],
            &["", "Pets", "oops"],
        ]));
        env
    }

    #[tokio::test]
    async fn test_list_table() {
        let env = TestEnv::new().await;
        env.seed(rows(&[&HEADERS, &["2024-01-15", "Food", "42.5", "Lunch"]]));
        let out = list(env.config(), Mode::Testing, ListArgs::new(ListFormat::Table))
            .await
            .unwrap();
        assert_eq!(out.message(), "1 expense");
        let display = out.display().unwrap();
        let lines: Vec<&str> = display.lines().collect();
        assert_eq!(lines[0], "#  Date        Category  Amount  Description");
        assert_eq!(lines[1], "1  2024-01-15  Food      42.50   Lunch");
    }

    #[tokio::test]
    async fn test_list_csv() {
        let env = seeded().await;
        let out = list(env.config(), Mode::Testing, ListArgs::new(ListFormat::Csv))
            .await
            .unwrap();
        assert_eq!(
            out.display().unwrap(),
            "Date,Category,Amount,Description\n\
            2024-01-15,Food,42.50,\"Lunch, with friends\"\n\
            ,Pets,0.00,\n"
        );
    }

    #[tokio::test]
    async fn test_list_json() {
        let env = seeded().await;
        let out = list(env.config(), Mode::Testing, ListArgs::new(ListFormat::Json))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(out.display().unwrap()).unwrap();
        assert_eq!(value[0]["amount"], "42.50");
        assert_eq!(value[1]["date"], serde_json::Value::Null);
        assert_eq!(value[1]["category"], "Pets");
    }

    #[tokio::test]
    async fn test_list_unreachable_sheet() {
        let env = TestEnv::new().await;
        let out = list(env.config(), Mode::Testing, ListArgs::new(ListFormat::Csv))
            .await
            .unwrap();
        assert_eq!(out.message(), "0 expenses");
        assert_eq!(out.display().unwrap(), "Date,Category,Amount,Description\n");
    }
}
