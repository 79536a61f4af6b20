// Domain errors
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    #[error("unknown page: {0}")]
    UnknownPage(String),

    #[error("history window must be between 1 and {max} days, got {requested}")]
    InvalidDays { requested: u32, max: u32 },
}
