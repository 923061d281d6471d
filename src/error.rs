use thiserror::Error;

#[derive(Error, Debug)]
pub enum OsaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Connection timeout")]
    ConnectTimeout,
    #[error("Instrument unreachable: {0}")]
    Unreachable(String),
    #[error("Receive timeout")]
    RecvTimeout,
    #[error("Connection closed by instrument")]
    Closed,
    #[error("Authentication rejected, instrument replied: {0:?}")]
    Authentication(String),
    #[error("Invalid argument: {0}")]
    Validation(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
