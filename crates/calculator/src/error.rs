use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Invalid argument for {0}: {1}")]
    InvalidArgument(String, String),

    #[error("The calculation worker is no longer running")]
    WorkerUnavailable,

    #[error("The calculation worker failed while computing '{0}': {1}")]
    WorkerFailed(String, String),

    #[error("The calculation worker answered '{0}' with an unexpected response")]
    UnexpectedResponse(String),
}

impl CalcError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CalcError::InvalidArgument(field.to_string(), reason.into())
    }
}

impl From<CoreError> for CalcError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidArgument(field, reason) => CalcError::InvalidArgument(field, reason),
        }
    }
}

/// Rejects NaN and infinities before they can leak into a result record.
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid(field, format!("must be a finite number, got {}", value)))
    }
}

pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<f64, CalcError> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(CalcError::invalid(field, format!("must not be negative, got {}", value)));
    }
    Ok(value)
}

pub(crate) fn ensure_positive(field: &str, value: f64) -> Result<f64, CalcError> {
    ensure_finite(field, value)?;
    if value <= 0.0 {
        return Err(CalcError::invalid(field, format!("must be greater than zero, got {}", value)));
    }
    Ok(value)
}
