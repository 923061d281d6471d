//! In-process fake instrument for session and catalogue tests.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// Route crate `log` output into the test harness. Safe to call from
/// every test; only the first call installs the logger.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Everything the fake instrument saw from the client, split by
/// handshake phase.
pub struct Captured {
    pub login: Vec<u8>,
    pub password: Vec<u8>,
    /// All bytes received after the authentication verdict was sent,
    /// concatenated in arrival order.
    pub commands: Vec<u8>,
}

/// A single-connection fake OSA on a loopback port.
///
/// Serves the login handshake (banner, then the configured verdict),
/// optionally answers the first post-login command with a canned reply,
/// and records all traffic until the client closes the connection.
pub struct MockOsa {
    host: String,
    port: u16,
    handle: JoinHandle<Captured>,
}

impl MockOsa {
    pub fn spawn(auth_verdict: &'static [u8]) -> Self {
        Self::start(auth_verdict, None)
    }

    pub fn spawn_with_reply(auth_verdict: &'static [u8], reply: &'static [u8]) -> Self {
        Self::start(auth_verdict, Some(reply))
    }

    fn start(auth_verdict: &'static [u8], reply: Option<&'static [u8]>) -> Self {
        init_test_logging();
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock listener");
        let addr = listener.local_addr().expect("mock local addr");

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept client");
            serve(stream, auth_verdict, reply)
        });

        Self {
            host: addr.ip().to_string(),
            port: addr.port(),
            handle,
        }
    }

    pub fn host(&self) -> String {
        self.host.clone()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Wait for the client to disconnect and return the recorded traffic.
    pub fn finish(self) -> Captured {
        self.handle.join().expect("mock instrument thread")
    }
}

fn serve(mut stream: TcpStream, auth_verdict: &'static [u8], reply: Option<&'static [u8]>) -> Captured {
    let mut buf = [0u8; 1024];

    let n = stream.read(&mut buf).expect("read login");
    let login = buf[..n].to_vec();
    stream.write_all(b"AQ6370C remote access").expect("send banner");

    let n = stream.read(&mut buf).expect("read password");
    let password = buf[..n].to_vec();
    stream.write_all(auth_verdict).expect("send verdict");

    let mut commands = Vec::new();
    let mut pending_reply = reply;
    loop {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                commands.extend_from_slice(&buf[..n]);
                if let Some(text) = pending_reply.take() {
                    stream.write_all(text).expect("send canned reply");
                }
            }
        }
    }

    Captured { login, password, commands }
}
