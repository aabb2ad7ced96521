use thiserror::Error;

use crate::data_provider::ProviderError;

/// TUI-specific errors
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Action channel closed")]
    ActionChannelClosed,
}

/// Result type for TUI operations
pub type TuiResult<T> = Result<T, TuiError>;
