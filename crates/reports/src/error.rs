use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid report filter: {0}")]
    InvalidFilter(String),

    #[error("Failed to format report value: {0}")]
    Format(#[from] calculator::CalcError),
}
