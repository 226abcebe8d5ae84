// Error types for the routing dump tool

use thiserror::Error;

/// A line or token that does not match the dump grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}: {input:?}")]
pub struct FormatError {
    pub input: String,
    pub reason: String,
}

impl FormatError {
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        FormatError {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Line {line_no}: {source}")]
    Parse { line_no: usize, source: FormatError },

    #[error("Bad format: {0}")]
    Format(#[from] FormatError),

    #[error("Invalid routing table document: {0}")]
    InvalidDocument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Convert error to user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::Parse { line_no, .. } => {
                format!("Routing dump has bad format at line {}.", line_no)
            }
            AppError::Format(_) => {
                "Route age has bad format. Expected [<weeks>w][<days>d] HH:MM:SS.".to_string()
            }
            AppError::InvalidDocument(_) => {
                "JSON file is not a valid routing table document.".to_string()
            }
            AppError::Io(_) => {
                "File system error. Check paths and permissions.".to_string()
            }
            AppError::Serialization(_) => "JSON file has bad format.".to_string(),
            AppError::Storage(_) => {
                "Database error. Check that the file is a writable SQLite database.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display_includes_input() {
        let err = FormatError::new("1:2", "expected HH:MM:SS");
        assert_eq!(err.to_string(), "expected HH:MM:SS: \"1:2\"");
    }

    #[test]
    fn test_parse_error_carries_line_number() {
        let err = AppError::Parse {
            line_no: 7,
            source: FormatError::new("garbage", "too few tokens"),
        };
        assert!(err.to_string().starts_with("Line 7:"));
        assert!(err.user_message().contains("line 7"));
    }

    #[test]
    fn test_json_error_message() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::from(json_err);
        assert_eq!(err.user_message(), "JSON file has bad format.");
    }
}
