// Typed errors with thiserror. Surface meaningful messages to JS.

use thiserror::Error;

/// UI core error types.
#[derive(Error, Debug)]
pub enum UiError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Storage error for key {key}: {message}")]
    Storage { key: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for UiError {
    fn from(err: serde_json::Error) -> Self {
        UiError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UiError::InvalidConfig("missing field".to_string());
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn storage_error_names_key() {
        let err = UiError::Storage {
            key: "spireAscent_tutorialDone".to_string(),
            message: "quota exceeded".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("spireAscent_tutorialDone"));
        assert!(text.contains("quota exceeded"));
    }

    #[test]
    fn json_errors_convert() {
        let parse: Result<Vec<String>, _> = serde_json::from_str("{not json");
        let err: UiError = parse.unwrap_err().into();
        assert!(matches!(err, UiError::Serialization(_)));
    }
}
