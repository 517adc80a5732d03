use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid argument for {0}: {1}")]
    InvalidArgument(String, String),
}

impl CoreError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidArgument(field.to_string(), reason.into())
    }
}
