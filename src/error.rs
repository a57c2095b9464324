use thiserror::Error;

/// Errors raised by mixing, lookup, configuration and run validation.
///
/// Every fallible operation is all-or-nothing: when one of these is returned
/// the bin state passed in has not been touched.
#[derive(Debug, Error)]
pub enum CompostError {
    #[error("waste '{name}' cannot be processed (timeframe: {timeframe})")]
    NonProcessableWaste { name: String, timeframe: String },
    #[error("waste type not found: {name}")]
    NotFound { name: String },
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
    #[error("invalid waste mass: {0} kg")]
    InvalidMass(f64),
    #[error("invalid bin state: {0}")]
    InvalidState(String),
    #[error("malformed {property} value: {value:?}")]
    MalformedProperty { property: &'static str, value: String },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
