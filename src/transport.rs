use crate::error::OsaError;
use log::debug;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Address family used when resolving the instrument host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum AddrFamily {
    #[default]
    Ipv4,
    Ipv6,
}

impl AddrFamily {
    fn matches(self, addr: &SocketAddr) -> bool {
        match self {
            AddrFamily::Ipv4 => addr.is_ipv4(),
            AddrFamily::Ipv6 => addr.is_ipv6(),
        }
    }
}

/// Where and how to reach the instrument. Immutable once built; owned by
/// the transport for the life of the connection.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub addr_family: AddrFamily,
    /// Applied to connect, and then to every blocking read and write.
    pub timeout: Duration,
}

/// Outcome of a single command write. A short write is reported, not
/// raised; retrying is the caller's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Complete,
    Short { written: usize, expected: usize },
}

impl WriteOutcome {
    pub fn classify(written: usize, expected: usize) -> Self {
        if written == expected {
            WriteOutcome::Complete
        } else {
            WriteOutcome::Short { written, expected }
        }
    }

    pub fn is_complete(self) -> bool {
        matches!(self, WriteOutcome::Complete)
    }
}

/// Owns the raw TCP connection to the instrument. Blocking, single-shot
/// send and receive primitives; no buffering, no retries.
#[derive(Debug)]
pub struct Transport {
    stream: TcpStream,
}

impl Transport {
    /// Resolve the endpoint and connect with the configured timeout.
    ///
    /// A timeout elapsing maps to [`OsaError::ConnectTimeout`]; every other
    /// resolve or connect failure (DNS, refused, network unreachable) maps
    /// to [`OsaError::Unreachable`]. The endpoint timeout is then installed
    /// as the read and write timeout for all later traffic.
    pub fn connect(endpoint: &Endpoint) -> Result<Self, OsaError> {
        let addr = resolve(endpoint)?;
        debug!("Connecting to OSA at {addr}");

        let stream = TcpStream::connect_timeout(&addr, endpoint.timeout).map_err(|e| {
            if e.kind() == ErrorKind::TimedOut {
                OsaError::ConnectTimeout
            } else {
                OsaError::Unreachable(format!("{}:{}: {e}", endpoint.host, endpoint.port))
            }
        })?;

        stream.set_read_timeout(Some(endpoint.timeout))?;
        stream.set_write_timeout(Some(endpoint.timeout))?;

        debug!("Connected to OSA at {addr}");
        Ok(Self { stream })
    }

    /// Single write; returns how many bytes the OS accepted. Does not loop
    /// to guarantee full delivery.
    pub fn send_bytes(&mut self, data: &[u8]) -> Result<usize, OsaError> {
        write_once(&mut self.stream, data)
    }

    /// Single bounded read of at most `max_bytes`.
    pub fn recv_bytes(&mut self, max_bytes: usize) -> Result<Vec<u8>, OsaError> {
        read_once(&mut self.stream, max_bytes)
    }

    pub fn shutdown(&self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

fn resolve(endpoint: &Endpoint) -> Result<SocketAddr, OsaError> {
    let mut addrs = (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()
        .map_err(|e| OsaError::Unreachable(format!("{}: {e}", endpoint.host)))?;

    addrs
        .find(|a| endpoint.addr_family.matches(a))
        .ok_or_else(|| {
            OsaError::InvalidAddress(format!(
                "{} has no {:?} address",
                endpoint.host, endpoint.addr_family
            ))
        })
}

pub(crate) fn write_once(writer: &mut dyn Write, data: &[u8]) -> Result<usize, OsaError> {
    let written = writer.write(data)?;
    debug!("Wrote {written} of {} bytes", data.len());
    Ok(written)
}

pub(crate) fn read_once(reader: &mut dyn Read, max_bytes: usize) -> Result<Vec<u8>, OsaError> {
    // A zero-length read would be indistinguishable from peer close.
    if max_bytes == 0 {
        return Ok(Vec::new());
    }
    let mut buf = vec![0u8; max_bytes];
    match reader.read(&mut buf) {
        Ok(0) => Err(OsaError::Closed),
        Ok(n) => {
            debug!("Read {n} bytes");
            buf.truncate(n);
            Ok(buf)
        }
        Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
            Err(OsaError::RecvTimeout)
        }
        Err(e) => Err(OsaError::Io(e)),
    }
}
