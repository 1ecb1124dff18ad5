//! Implements the `Sheet` trait using the `sheets::Client` to interact with a Google sheet.

use crate::api::{A1Range, Sheet, SheetRange, TokenProvider, LAST_COLUMN};
use crate::Result;
use anyhow::Context;
use sheets::types::{
    BatchClearValuesRequest, BatchUpdateValuesRequest, DateTimeRenderOption, Dimension,
    ValueInputOption, ValueRange, ValueRenderOption,
};
use sheets::ClientError;
use tracing::trace;

/// Implements the `Sheet` trait using the `sheets::Client` to interact with a Google sheet. It
/// takes a `TokenProvider`, on which it calls refresh to keep the token up-to-date.
pub(super) struct GoogleSheet {
    spreadsheet_id: String,
    token_provider: TokenProvider,
    client: sheets::Client,
}

impl GoogleSheet {
    pub(super) async fn new(
        spreadsheet_id: impl Into<String>,
        mut token_provider: TokenProvider,
    ) -> Result<Self> {
        let client = create_sheets_client(&mut token_provider).await?;
        Ok(Self {
            spreadsheet_id: spreadsheet_id.into(),
            token_provider,
            client,
        })
    }

    /// Refreshes the sheets client with a new access token if needed
    async fn refresh_client(&mut self) -> Result<()> {
        self.client = create_sheets_client(&mut self.token_provider).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Sheet for GoogleSheet {
    async fn get(&mut self, tab: &str) -> Result<Vec<Vec<String>>> {
        trace!("get for {tab}");
        self.refresh_client().await?;
        let range = A1Range::block(tab, 0, 0, LAST_COLUMN).to_string();
        let response = self
            .client
            .spreadsheets()
            .values_get(
                &self.spreadsheet_id,
                &range,
                DateTimeRenderOption::FormattedString,
                Dimension::Rows,
                ValueRenderOption::FormattedValue,
            )
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to fetch {tab} sheet data"))?;
        Ok(response.body.values)
    }

    async fn locale(&mut self) -> Result<String> {
        trace!("locale");
        self.refresh_client().await?;
        let response = self
            .client
            .spreadsheets()
            .get(&self.spreadsheet_id, false, &[])
            .await
            .map_err(map_client_error)
            .context("Failed to fetch the spreadsheet properties")?;
        Ok(response
            .body
            .properties
            .map(|properties| properties.locale)
            .unwrap_or_default())
    }

    async fn clear_ranges(&mut self, ranges: &[&str]) -> Result<()> {
        trace!("clear_ranges {ranges:?}");
        self.refresh_client().await?;
        let request = BatchClearValuesRequest {
            ranges: ranges.iter().map(|s| s.to_string()).collect(),
        };
        self.client
            .spreadsheets()
            .values_batch_clear(&self.spreadsheet_id, &request)
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to clear ranges: {:?}", ranges))?;
        Ok(())
    }

    async fn write_ranges(&mut self, data: &[SheetRange]) -> Result<()> {
        trace!("write_ranges to {} ranges", data.len());
        self.refresh_client().await?;
        let request = batch_update_request(data);
        self.client
            .spreadsheets()
            .values_batch_update(&self.spreadsheet_id, &request)
            .await
            .map_err(map_client_error)
            .context("Failed to write ranges")?;
        Ok(())
    }
}

/// Builds the write request for `data`. Values are sent `RAW` so that Sheets stores each string
/// exactly as given: `42.50` and `2024-01-15` stay in the form we read back, and a description
/// like `=1+1` or `007` is never turned into a formula or a number.
fn batch_update_request(data: &[SheetRange]) -> BatchUpdateValuesRequest {
    let value_ranges: Vec<ValueRange> = data
        .iter()
        .map(|sr| ValueRange {
            major_dimension: Some(Dimension::Rows),
            range: sr.range.clone(),
            values: sr.values.clone(),
        })
        .collect();

    BatchUpdateValuesRequest {
        data: value_ranges,
        include_values_in_response: Some(false),
        response_date_time_render_option: None,
        response_value_render_option: None,
        value_input_option: Some(ValueInputOption::Raw),
    }
}

/// Creates a new sheets client with a refreshed access token.
async fn create_sheets_client(token_provider: &mut TokenProvider) -> Result<sheets::Client> {
    let access_token = token_provider.token_with_refresh().await?;

    // The sheets crate wants the full OAuth client settings, but API calls only need the access
    // token; refreshing is done by the `TokenProvider`.
    Ok(sheets::Client::new(
        String::new(),
        String::new(),
        String::new(),
        access_token.to_string(),
        String::new(),
    ))
}

fn map_client_error(e: ClientError) -> anyhow::Error {
    let error_name = match &e {
        ClientError::HttpError { .. } => "Google Sheets API returned an HTTP error",
        _ => "Google Sheets API client error",
    };
    anyhow::Error::new(e).context(error_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::rows;

    #[test]
    fn test_batch_update_request_is_raw() {
        let values = rows(&[
            &["Date", "Category", "Amount", "Description"],
            &["2024-01-15", "Food", "42.50", "=1+1"],
            &["2024-01-16", "Other", "0.00", "007"],
        ]);
        let data = [SheetRange {
            range: "'Sheet1'!A1".into(),
            values: values.clone(),
        }];
        let request = batch_update_request(&data);
        assert_eq!(request.value_input_option, Some(ValueInputOption::Raw));
        assert_eq!(request.data.len(), 1);
        assert_eq!(request.data[0].range, "'Sheet1'!A1");
        assert_eq!(request.data[0].values, values);
    }
}
