use crate::config::SessionConfig;
use crate::error::OsaError;
use crate::transport::{Endpoint, Transport, WriteOutcome};
use log::{debug, warn};

/// Default size of a single reply read. One read is not guaranteed to
/// capture a complete multi-part response.
pub const REPLY_BUF_SIZE: usize = 1024;

/// Lifecycle of the login handshake. Transitions are forward-only;
/// `Authenticated` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    AwaitingPasswordPrompt,
    Authenticated,
    Failed,
}

/// An authenticated command session with the instrument.
///
/// Construction performs the full login handshake; a `Session` value
/// therefore always represents an authenticated connection, and command
/// traffic cannot be issued before authentication by construction. Any
/// connect or handshake failure is fatal to the attempt: there is no
/// internal retry, the caller opens a new session instead (the instrument's
/// handshake is stateful and resuming it mid-way is undefined).
///
/// The protocol has no request identifiers or pipelining. Callers must
/// consume the expected reply of one command before issuing the next; the
/// session does not enforce this ordering.
#[derive(Debug)]
pub struct Session {
    transport: Transport,
    state: SessionState,
}

impl Session {
    /// Connect and authenticate.
    ///
    /// Sends `open "<username>"`, reads the banner reply, sends the
    /// password verbatim (no quoting or escaping), and reads the verdict.
    /// The login is accepted iff the verdict's first five characters are
    /// the literal `ready`.
    pub fn open(config: &SessionConfig) -> Result<Self, OsaError> {
        let endpoint = Endpoint {
            host: config.host.clone(),
            port: config.port,
            addr_family: config.addr_family,
            timeout: config.timeout(),
        };

        let mut session = Self {
            transport: Transport::connect(&endpoint)?,
            state: SessionState::Connecting,
        };

        session.handshake(&config.username, &config.password).inspect_err(|e| {
            warn!("Handshake with {}:{} failed: {e}", config.host, config.port);
        })?;

        Ok(session)
    }

    fn handshake(&mut self, username: &str, password: &str) -> Result<(), OsaError> {
        let banner = self
            .exchange(&format!("open \"{username}\""))
            .inspect_err(|_| self.state = SessionState::Failed)?;
        debug!("Instrument banner: {banner:?}");
        self.state = SessionState::AwaitingPasswordPrompt;

        let verdict = self
            .exchange(password)
            .inspect_err(|_| self.state = SessionState::Failed)?;

        if verdict.as_bytes().starts_with(b"ready") {
            debug!("User {username:?} authenticated");
            self.state = SessionState::Authenticated;
            Ok(())
        } else {
            self.state = SessionState::Failed;
            Err(OsaError::Authentication(verdict))
        }
    }

    /// One handshake step: send a line as-is, read one reply.
    fn exchange(&mut self, text: &str) -> Result<String, OsaError> {
        self.transport.send_bytes(text.as_bytes())?;
        let bytes = self.transport.recv_bytes(REPLY_BUF_SIZE)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Send one command string to the instrument.
    ///
    /// Performs a single write and reports whether it was complete. A short
    /// write is returned as [`WriteOutcome::Short`], never as an error;
    /// whether to retry is the caller's decision.
    pub fn send_command(&mut self, text: &str) -> Result<WriteOutcome, OsaError> {
        debug!("Sending command {text:?}");
        let written = self.transport.send_bytes(text.as_bytes())?;
        let outcome = WriteOutcome::classify(written, text.len());
        if let WriteOutcome::Short { written, expected } = outcome {
            warn!("Command {text:?} sent incompletely ({written} of {expected} bytes)");
        }
        Ok(outcome)
    }

    /// Read one reply of at most [`REPLY_BUF_SIZE`] bytes.
    pub fn receive_reply(&mut self) -> Result<String, OsaError> {
        self.receive_reply_limit(REPLY_BUF_SIZE)
    }

    /// Read one reply of at most `max_bytes`. The bytes are decoded as
    /// text (the instrument speaks ASCII); protocol terminators are neither
    /// stripped nor validated.
    pub fn receive_reply_limit(&mut self, max_bytes: usize) -> Result<String, OsaError> {
        let bytes = self.transport.recv_bytes(max_bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Explicitly release the connection. Dropping the session has the
    /// same effect.
    pub fn close(self) {}
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("Closing OSA session");
        self.transport.shutdown();
    }
}
