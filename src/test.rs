//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::api::{TestSheet, TestSheetState};
use crate::Config;
use std::path::Path;
use tempfile::TempDir;
use uuid::Uuid;

/// Test environment that sets up an expense home directory with a Config pointing at its own
/// in-memory spreadsheet. Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with a Config whose spreadsheet id is unique to this test.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("expenses");
        let secret_path = temp_dir.path().join("client_secret.json");

        // Create minimal client_secret.json
        let secret_content = r#"{
            "installed": {
                "client_id": "test-client-id",
                "client_secret": "test-secret",
                "redirect_uris": ["http://localhost"],
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token"
            }
        }"#;
        std::fs::write(&secret_path, secret_content).unwrap();

        let rand = Uuid::new_v4().to_string().replace('-', "");
        let sheet_url = format!("https://docs.google.com/spreadsheets/d/{}/edit", rand);
        let config = Config::create(&root, &secret_path, None, &sheet_url, "Sheet1")
            .await
            .unwrap();

        Self { temp_dir, config }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// A scratch directory that lives as long as the environment.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Gets the current state of the TestSheet associated with this environment.
    pub fn get_state(&self) -> TestSheetState {
        let test_sheet = TestSheet::new(self.config.spreadsheet_id());
        test_sheet.get_state()
    }

    /// Sets the state of the TestSheet associated with this environment.
    pub fn set_state(&self, state: TestSheetState) {
        let test_sheet = TestSheet::new(self.config.spreadsheet_id());
        test_sheet.set_state(state)
    }

    /// Replaces the configured worksheet with `rows`.
    pub fn seed(&self, rows: Vec<Vec<String>>) {
        self.set_state(TestSheetState::with_tab(self.config.worksheet(), rows));
    }

    /// The current rows of the configured worksheet.
    pub fn sheet_rows(&self) -> Vec<Vec<String>> {
        self.get_state()
            .tabs
            .get(self.config.worksheet())
            .cloned()
            .unwrap_or_default()
    }
}

/// Builds sheet values from string literals.
pub fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect()
}
