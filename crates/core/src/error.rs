//! Error taxonomy for cells-json
//!
//! Every failure carries the runtime type name of the value that caused it.
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | `Serialization` | value could not be reduced to a JSON tree |
//! | `CircularReference` | value is its own ancestor and circular references are fatal |
//! | `Unsupported` | no conversion rule and no capability applies |
//! | `Backend` | the encoding backend rejected the input or output |
//! | `Config` | the adapter could not be configured as requested |
//! | `Io` | sink or file failure |
//!
//! The first four form the serialization family: [`Error::is_serialization`]
//! is true for each of them.

use thiserror::Error;

/// All cells-json errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Value could not be reduced to the JSON tree universe
    #[error("{message}")]
    Serialization {
        /// Runtime type name of the offending value
        type_name: String,
        /// Human-readable reason
        message: String,
    },

    /// Self-referential value graph under `fail_on_circular`
    #[error(
        "Circular reference detected for object of type {type_name}{}",
        path_suffix(.path)
    )]
    CircularReference {
        /// Runtime type name of the value that closed the cycle
        type_name: String,
        /// Location of the cyclic slot, empty when unknown
        path: String,
    },

    /// No applicable rule and no capability detected
    #[error("Unsupported type: {type_name}{}", hint_suffix(.hint))]
    Unsupported {
        /// Runtime type name of the unsupported value
        type_name: String,
        /// Optional remediation hint
        hint: Option<String>,
    },

    /// Encoding or decoding failure raised inside a backend
    #[error("{backend} backend error: {message}")]
    Backend {
        /// Backend that failed ("text" or "accelerated")
        backend: &'static str,
        /// Backend-provided reason
        message: String,
    },

    /// Invalid adapter configuration (unknown or unavailable backend)
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cells-json operations.
pub type Result<T> = std::result::Result<T, Error>;

fn path_suffix(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at path: {}", path)
    }
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(h) if !h.is_empty() => format!(". {}", h),
        _ => String::new(),
    }
}

impl Error {
    /// Base serialization failure with the default message.
    pub fn not_serializable(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Error::Serialization {
            message: format!("Object of type {} is not JSON serializable", type_name),
            type_name,
        }
    }

    /// Base serialization failure with a custom message.
    pub fn serialization(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Serialization {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Unsupported-type failure with an optional hint.
    pub fn unsupported(type_name: impl Into<String>, hint: Option<&str>) -> Self {
        Error::Unsupported {
            type_name: type_name.into(),
            hint: hint.map(str::to_string),
        }
    }

    /// Check if this error belongs to the serialization family.
    pub fn is_serialization(&self) -> bool {
        matches!(
            self,
            Error::Serialization { .. }
                | Error::CircularReference { .. }
                | Error::Unsupported { .. }
                | Error::Backend { .. }
        )
    }

    /// Check if this is a circular-reference error.
    pub fn is_circular(&self) -> bool {
        matches!(self, Error::CircularReference { .. })
    }

    /// Check if this is an unsupported-type error.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported { .. })
    }

    /// Runtime type name of the offending value, when the error carries one.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Error::Serialization { type_name, .. }
            | Error::CircularReference { type_name, .. }
            | Error::Unsupported { type_name, .. } => Some(type_name),
            _ => None,
        }
    }
}

// Convert from serde_json errors raised by backends
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Backend {
            backend: "accelerated",
            message: e.to_string(),
        }
    }
}
