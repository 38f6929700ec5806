//! Marquee Core - Shared configuration and preference state
//!
//! This crate provides the pieces every Marquee front-end needs regardless of
//! which catalogue views it drives: configuration management, tracing setup,
//! and the persisted light/dark theme preference.

pub mod config;
pub mod theme;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::MarqueeConfig;
pub use theme::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Theme, ThemeState};

/// Core errors that can bubble up from configuration or preference handling.
#[derive(Debug, thiserror::Error)]
pub enum MarqueeError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Preference storage error: {reason}")]
    Storage { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MarqueeError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            MarqueeError::Configuration { reason } => format!("Configuration problem: {reason}"),
            MarqueeError::Storage { .. } => "Could not save your preferences".to_string(),
            MarqueeError::Io(_) => "File system error occurred".to_string(),
            MarqueeError::Serialization(_) => "Preference file is corrupted".to_string(),
        }
    }

    /// Checks if this error is due to user-supplied settings.
    pub fn is_user_error(&self) -> bool {
        matches!(self, MarqueeError::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, MarqueeError>;
