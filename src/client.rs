use crate::config::SessionConfig;
use crate::encode::encode_exponential;
use crate::error::OsaError;
use crate::session::Session;
use crate::transport::AddrFamily;
use crate::types::{DisplayScale, FileFormat, MemoryTarget, SweepMode, TraceMath};
use log::warn;
use std::time::Duration;

/// Builder for [`OsaClient`] instances.
///
/// Starts from [`SessionConfig::default()`] (user `anonymous`, single-space
/// password, 10 s timeout, IPv4); host and port must be supplied.
///
/// # Examples
/// ```no_run
/// use osa_remote::OsaClient;
///
/// let client = OsaClient::builder()
///     .host("192.168.1.100")
///     .port(10001)
///     .build()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Default)]
pub struct OsaClientBuilder {
    host: Option<String>,
    port: Option<u16>,
    config: SessionConfig,
}

impl OsaClientBuilder {
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn username(mut self, username: &str) -> Self {
        self.config.username = username.to_string();
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.config.password = password.to_string();
        self
    }

    /// Connect/read/write timeout. [`SessionConfig`] carries whole
    /// seconds, so sub-second durations are rounded up, never down to a
    /// zero timeout the OS would reject.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self
    }

    pub fn addr_family(mut self, family: AddrFamily) -> Self {
        self.config.addr_family = family;
        self
    }

    /// Replace the whole configuration, e.g. one loaded from file.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.host = Some(config.host.clone());
        self.port = Some(config.port);
        self.config = config;
        self
    }

    /// Connect, authenticate and return the ready client.
    pub fn build(self) -> Result<OsaClient, OsaError> {
        let host = self
            .host
            .ok_or_else(|| OsaError::Validation("host must be specified".to_string()))?;
        let port = self
            .port
            .ok_or_else(|| OsaError::Validation("port must be specified".to_string()))?;

        let config = SessionConfig { host, port, ..self.config };
        Ok(OsaClient {
            session: Session::open(&config)?,
        })
    }
}

/// High-level client for an AQ6370-class optical spectrum analyzer.
///
/// Wraps an authenticated [`Session`] and exposes the instrument's soft-key
/// operations as methods. Each method formats the instrument's hierarchical
/// command mnemonics and hands them to the session in order; replies, where
/// the caller expects one, are read with [`OsaClient::receive_reply`] or
/// [`OsaClient::query`]. The protocol has no pipelining, so consume the
/// expected reply of one command before issuing the next.
///
/// # Examples
/// ```no_run
/// use osa_remote::OsaClient;
///
/// let mut osa = OsaClient::new("192.168.1.100", 10001)?;
/// osa.reset()?;
/// osa.span(1520, 1600)?;
/// osa.sweep("single")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct OsaClient {
    session: Session,
}

impl OsaClient {
    /// Connect with default credentials and timeouts.
    pub fn new(host: &str, port: u16) -> Result<Self, OsaError> {
        Self::builder().host(host).port(port).build()
    }

    pub fn builder() -> OsaClientBuilder {
        OsaClientBuilder::default()
    }

    /// The underlying session, for raw commands the catalogue lacks.
    pub fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Send a raw command and read one reply.
    pub fn query(&mut self, command: &str) -> Result<String, OsaError> {
        self.session.send_command(command)?;
        self.session.receive_reply()
    }

    /// Read one pending reply without sending anything.
    pub fn receive_reply(&mut self) -> Result<String, OsaError> {
        self.session.receive_reply()
    }

    /// Instrument reset (`*RST`).
    pub fn reset(&mut self) -> Result<(), OsaError> {
        self.session.send_command("*RST")?;
        Ok(())
    }

    /// SWEEP soft key: select the sweep mode and start a sweep.
    ///
    /// `mode` is parsed case-insensitively (`AUTO`, `REPEAT`, `SINGLE`, or
    /// the numeric aliases 3/2/1). An unknown mode is a [`OsaError::Validation`]
    /// error and nothing is sent.
    pub fn sweep(&mut self, mode: &str) -> Result<(), OsaError> {
        let mode: SweepMode = mode.parse()?;
        self.session.send_command(&format!(":INITIATE:SMODE {mode}"))?;
        self.session.send_command(":INITIATE")?;
        Ok(())
    }

    /// SPAN soft key: set start and stop wavelength, in whole nanometers.
    pub fn span(&mut self, start: u32, stop: u32) -> Result<(), OsaError> {
        self.session
            .send_command(&format!(":SENSE:WAVELENGTH:START {start}NM"))?;
        self.session
            .send_command(&format!(":SENSE:WAVELENGTH:STOP {stop}NM"))?;
        Ok(())
    }

    /// LEVEL soft key: vertical display scaling.
    ///
    /// Sends the main per-division scale, then either the automatic or the
    /// manual reference-level command, then the sub-scale per-division
    /// value, then sub-scale auto ON, or auto OFF followed by the offset
    /// level. Real values are encoded exponentially.
    pub fn level(&mut self, scale: &DisplayScale) -> Result<(), OsaError> {
        self.session.send_command(&format!(
            ":DISPLAY:WINDOW:TRACE:Y1:SCALE:PDIVISION {}",
            encode_exponential(scale.log_scale)
        ))?;
        if scale.auto_ref_level {
            self.session
                .send_command("CALCULATE:MARKER:MAXIMUM:SRLEVEL:AUTO")?;
        } else {
            self.session.send_command(&format!(
                ":DISPLAY:WINDOW:Y1:SCALE:RELVEL {}",
                encode_exponential(scale.ref_level)
            ))?;
        }
        self.session.send_command(&format!(
            ":DISPLAY:WINDOW:TRACE:Y2:SCALE:PDIVISION {}",
            encode_exponential(scale.sub_log)
        ))?;
        if scale.auto_sub_scale {
            self.session
                .send_command(":DISPLAY:WINDOW:TRACE:Y2:SCALE:AUTO ON")?;
        } else {
            self.session
                .send_command(":DISPLAY:WINDOW:TRACE:Y2:SCALE:AUTO OFF")?;
            self.session.send_command(&format!(
                ":DISPLAY:WINDOW:TRACE:Y2:SCALE:OLEVEL {}",
                encode_exponential(scale.offset_level)
            ))?;
        }
        Ok(())
    }

    /// TRACE soft key: activate a channel, set its display state, and
    /// optionally program the computed channel C.
    ///
    /// `channel` is folded to upper case; channels outside A..G are logged
    /// as unsuitable but the commands are still issued for that channel
    /// (the instrument rejects them itself). `_write` selects write/fix
    /// arming on the front panel; no command is transmitted for it.
    pub fn trace(
        &mut self,
        channel: char,
        _write: bool,
        disp: bool,
        math: TraceMath,
    ) -> Result<(), OsaError> {
        let channel = channel.to_ascii_uppercase();
        if !('A'..='G').contains(&channel) {
            warn!("Unsuitable trace channel {channel:?}");
        }
        self.session
            .send_command(&format!(":TRACE:ACTIVE TR{channel}"))?;
        let switch = if disp { "ON" } else { "OFF" };
        self.session
            .send_command(&format!(":TRACE:STATE:TR{channel} {switch}"))?;
        if let Some(expr) = math.expression() {
            self.session
                .send_command(&format!(":CALCULATE:MATH:TRC {expr}"))?;
        }
        Ok(())
    }

    /// Store a trace to a file on the instrument side.
    ///
    /// Channels outside A..C are logged as unsuitable but the store command
    /// is still issued for that channel (the instrument rejects it itself).
    pub fn save_file(
        &mut self,
        filename: &str,
        form: FileFormat,
        channel: char,
        memory: MemoryTarget,
    ) -> Result<(), OsaError> {
        let channel = channel.to_ascii_uppercase();
        if !('A'..='C').contains(&channel) {
            warn!("Unsuitable store channel {channel:?}");
        }
        self.session.send_command(&format!(
            ":MMEMORY:STORE:TRACE TR{channel},{}\"{filename}\",{}",
            form.as_str(),
            memory.as_str()
        ))?;
        Ok(())
    }

    /// Explicitly release the connection; dropping has the same effect.
    pub fn close(self) {
        self.session.close();
    }
}
