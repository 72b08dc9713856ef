//! Structured error types for the Folio layout engine.
//!
//! Composition never fails. Everything here surfaces at render or
//! generation time and travels up to `Document::generate` unchanged.

use thiserror::Error;

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// A backend was asked to draw before any configuration reached it.
    #[error("Missing configuration: {0}")]
    ConfigMissing(String),

    /// A backend draw call failed. Passed through untouched.
    #[error("Provider failed to draw: {0}")]
    ProviderDraw(String),

    /// Content the backend could not interpret (bad image bytes, QR payload too large, ...).
    #[error("Malformed content: {0}")]
    MalformedContent(String),

    /// Header rows are taller than the usable page area.
    #[error("Header height {height:.2} is greater than the usable page height {available:.2}")]
    HeaderTooLarge { height: f64, available: f64 },

    /// Footer rows are taller than the usable page area.
    #[error("Footer height {height:.2} is greater than the usable page height {available:.2}")]
    FooterTooLarge { height: f64, available: f64 },

    /// JSON input failed to parse as a valid Folio document.
    #[error("Failed to parse document: {source}{}", hint_suffix(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// I/O error when writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the Folio document schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::ParseError { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_syntax_hint() {
        let err: FolioError = serde_json::from_str::<serde_json::Value>("{ \"a\": 1, }")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse document"));
        assert!(msg.contains("trailing commas"));
    }

    #[test]
    fn parse_error_on_truncated_input() {
        let err: FolioError = serde_json::from_str::<serde_json::Value>("{ \"a\": ")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn header_too_large_message() {
        let err = FolioError::HeaderTooLarge {
            height: 900.0,
            available: 785.2,
        };
        assert_eq!(
            err.to_string(),
            "Header height 900.00 is greater than the usable page height 785.20"
        );
    }
}
