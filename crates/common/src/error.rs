//! Error types shared across Turntable crates.

use std::path::PathBuf;

/// Top-level error type for Turntable operations.
#[derive(Debug, thiserror::Error)]
pub enum TurntableError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Frame store error: {message}")]
    FrameStore { message: String },

    #[error("Input error: {message}")]
    Input { message: String },

    #[error("Sequence error: {message}")]
    Sequence { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TurntableError.
pub type TurntableResult<T> = Result<T, TurntableError>;

impl TurntableError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn frame_store(msg: impl Into<String>) -> Self {
        Self::FrameStore {
            message: msg.into(),
        }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    pub fn sequence(msg: impl Into<String>) -> Self {
        Self::Sequence {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TurntableError::config("track width must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration error: track width must be positive"
        );

        let err = TurntableError::FileNotFound {
            path: PathBuf::from("/frames/threesixty_1.jpg"),
        };
        assert_eq!(err.to_string(), "File not found: /frames/threesixty_1.jpg");
    }

    #[test]
    fn test_io_error_converts() {
        fn fails() -> TurntableResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(TurntableError::Io(_))));
    }
}
