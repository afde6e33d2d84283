use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("insufficient history: need at least {required} years, got {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("invalid historical data: {message}")]
    InvalidHistory { message: String },

    #[error("failed to read historical CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn invalid_history(message: impl Into<String>) -> Self {
        Self::InvalidHistory {
            message: message.into(),
        }
    }
}
