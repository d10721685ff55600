//! Error types and handling for `WeatherPro`

use thiserror::Error;

/// Main error type for the `WeatherPro` application
#[derive(Error, Debug)]
pub enum WeatherProError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Geocoding search returned no candidates
    #[error("No results for '{query}'. Enter the city name in English and check the spelling.")]
    NotFound { query: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl WeatherProError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new not-found error for a geocoding query
    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherProError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            WeatherProError::Api { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            WeatherProError::NotFound { query } => {
                format!(
                    "No results for '{query}'. Enter the city name in English and check the spelling."
                )
            }
            WeatherProError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WeatherProError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache directory.".to_string()
            }
            WeatherProError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            WeatherProError::General { message } => message.clone(),
        }
    }
}
