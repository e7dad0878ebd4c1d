// ABOUTME: Error types for host service failures surfaced by the workflows
// ABOUTME: User cancellation and validation problems are not errors and never appear here

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatusMarkError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum StatusMarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read setting '{key}': {source}")]
    SettingsRead {
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to write settings: {source}")]
    SettingsWrite {
        #[source]
        source: BoxError,
    },

    #[error("Failed to access color customizations: {source}")]
    ColorCustomizations {
        #[source]
        source: BoxError,
    },

    #[error("Prompt failed: {reason}")]
    Prompt { reason: String },
}

impl StatusMarkError {
    /// Create a settings read error for a setting name
    pub fn settings_read<E>(key: impl Into<String>, error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::SettingsRead {
            key: key.into(),
            source: error.into(),
        }
    }

    /// Create a settings write error
    pub fn settings_write<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::SettingsWrite {
            source: error.into(),
        }
    }

    /// Create a color customization store error
    pub fn color_customizations<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::ColorCustomizations {
            source: error.into(),
        }
    }

    /// Create a prompt surface error
    pub fn prompt<S: Into<String>>(reason: S) -> Self {
        Self::Prompt {
            reason: reason.into(),
        }
    }

    /// Whether the error came from one of the persisted stores
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::SettingsRead { .. }
                | Self::SettingsWrite { .. }
                | Self::ColorCustomizations { .. }
        )
    }
}
