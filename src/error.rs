//! Error handling. Internally everything is an `anyhow::Error`; errors that leave a command are
//! tagged with an `ErrorType` so that `main` can pick an exit code.

use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a failure that is reported to the user.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorType {
    /// The home directory or config file is missing or invalid.
    Config,
    /// OAuth credentials are missing, invalid or could not be refreshed.
    Auth,
    /// The spreadsheet could not be written.
    Store,
    /// The request itself was invalid, e.g. a row number that does not exist.
    Request,
}

impl ErrorType {
    /// The process exit code used when a command fails with this type of error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorType::Config => 2,
            ErrorType::Auth => 3,
            ErrorType::Store => 4,
            ErrorType::Request => 5,
        }
    }
}

impl Display for ErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorType::Config => "Configuration error",
            ErrorType::Auth => "Authentication error",
            ErrorType::Store => "Spreadsheet error",
            ErrorType::Request => "Invalid request",
        };
        f.write_str(s)
    }
}

/// Tags an error result with an `ErrorType` before it is returned from a command.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Result<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.context(error_type))
    }
}

/// Finds the `ErrorType` that an error was tagged with, if any.
pub fn error_type(e: &Error) -> Option<ErrorType> {
    e.downcast_ref::<ErrorType>().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_pub_result_tags_error() {
        let result: Result<()> = Err(anyhow!("the sheet is gone"));
        let e = result.pub_result(ErrorType::Store).unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Store));
        let chain = format!("{e:#}");
        assert!(chain.contains("Spreadsheet error"));
        assert!(chain.contains("the sheet is gone"));
    }

    #[test]
    fn test_untagged_error() {
        let e = anyhow!("plain");
        assert_eq!(error_type(&e), None);
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            ErrorType::Config.exit_code(),
            ErrorType::Auth.exit_code(),
            ErrorType::Store.exit_code(),
            ErrorType::Request.exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert!(codes.iter().all(|&c| c > 1));
    }
}
