//! Error types shared across Folio crates.

use std::path::PathBuf;

/// Top-level error type for Folio operations.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error("Input error: {message}")]
    Input { message: String },

    #[error("Motion error: {message}")]
    Motion { message: String },

    #[error("Preference error: {message}")]
    Preference { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FolioError.
pub type FolioResult<T> = Result<T, FolioError>;

impl FolioError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    pub fn motion(msg: impl Into<String>) -> Self {
        Self::Motion {
            message: msg.into(),
        }
    }

    pub fn preference(msg: impl Into<String>) -> Self {
        Self::Preference {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FolioError::input("unknown node 7").to_string(),
            "Input error: unknown node 7"
        );
        assert_eq!(
            FolioError::preference("store locked").to_string(),
            "Preference error: store locked"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<bool>("maybe").unwrap_err();
        let folio: FolioError = err.into();
        assert!(matches!(folio, FolioError::Json(_)));
    }
}
