use thiserror::Error;

/// Failure of a handler that could not be turned into a reply.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),
}

pub type RelayResult<T = ()> = Result<T, RelayError>;
