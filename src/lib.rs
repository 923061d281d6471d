pub mod client;
pub mod config;
pub mod encode;
pub mod error;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

pub use client::{OsaClient, OsaClientBuilder};
pub use config::{load_config, SessionConfig};
pub use encode::encode_exponential;
pub use error::OsaError;
pub use session::{Session, SessionState, REPLY_BUF_SIZE};
pub use transport::{AddrFamily, Endpoint, Transport, WriteOutcome};
pub use types::{DisplayScale, FileFormat, MemoryTarget, SweepMode, TraceMath};
