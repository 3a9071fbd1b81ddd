//! Blocking client for the external decision service.
//!
//! Each call opens a fresh TCP connection, writes one framed request, reads
//! exactly one reply, and closes the socket. There is no pooling and no
//! retry: any failure comes back as a single `DecisionError` and the caller
//! picks its fallback.

use std::io;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use crate::config::AgentConfig;
use crate::protocol::frame::{read_i32, read_line, write_text_frame, FrameError};
use crate::protocol::WireMessage;

/// Shape of the reply a request expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// One big-endian i32.
    Index,
    /// One text line.
    Line,
}

/// A decoded reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionReply {
    Index(i32),
    Line(String),
}

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("connection to decision service failed: {0}")]
    Connection(#[source] io::Error),
    #[error("decision service did not reply in time")]
    Timeout,
    #[error("malformed reply from decision service: {0}")]
    Protocol(String),
}

impl From<FrameError> for DecisionError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Io(io) => classify_io(io),
            other => DecisionError::Protocol(other.to_string()),
        }
    }
}

fn classify_io(e: io::Error) -> DecisionError {
    match e.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => DecisionError::Timeout,
        _ => DecisionError::Connection(e),
    }
}

/// Something that can answer a formatted decision request.
pub trait DecisionService {
    fn decide(&self, message: &WireMessage, kind: ReplyKind)
        -> Result<DecisionReply, DecisionError>;
}

/// One-connection-per-call TCP client.
#[derive(Debug, Clone)]
pub struct TcpDecisionClient {
    endpoint: String,
    timeout: Duration,
}

impl TcpDecisionClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        TcpDecisionClient {
            endpoint: endpoint.into(),
            timeout: timeout.max(Duration::from_millis(1)),
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.endpoint.clone(), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn connect(&self) -> Result<TcpStream, DecisionError> {
        let addrs: Vec<SocketAddr> = self
            .endpoint
            .to_socket_addrs()
            .map_err(DecisionError::Connection)?
            .collect();
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(match last_err {
            Some(e) => classify_io(e),
            None => DecisionError::Connection(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no address for '{}'", self.endpoint),
            )),
        })
    }

    fn exchange(
        &self,
        stream: &mut TcpStream,
        message: &WireMessage,
        kind: ReplyKind,
    ) -> Result<DecisionReply, DecisionError> {
        stream
            .set_read_timeout(Some(self.timeout))
            .map_err(DecisionError::Connection)?;
        stream
            .set_write_timeout(Some(self.timeout))
            .map_err(DecisionError::Connection)?;
        write_text_frame(stream, message.as_str())?;
        let reply = match kind {
            ReplyKind::Index => DecisionReply::Index(read_i32(stream)?),
            ReplyKind::Line => DecisionReply::Line(read_line(stream)?),
        };
        Ok(reply)
    }
}

impl DecisionService for TcpDecisionClient {
    fn decide(
        &self,
        message: &WireMessage,
        kind: ReplyKind,
    ) -> Result<DecisionReply, DecisionError> {
        let start = Instant::now();
        debug!(endpoint = %self.endpoint, tag = %message.tag(), "sending {}", message);
        let mut stream = self.connect()?;
        let result = self.exchange(&mut stream, message, kind);
        if let Err(e) = stream.shutdown(Shutdown::Both) {
            debug!(error = %e, "closing decision socket failed");
        }
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "decision round trip finished"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{format, DecisionTag};
    use std::net::TcpListener;

    fn message() -> WireMessage {
        format(DecisionTag::Trade, &[1, 2], &[1, 1]).unwrap()
    }

    #[test]
    fn frame_errors_classify() {
        let timeout: DecisionError =
            FrameError::Io(io::Error::new(io::ErrorKind::WouldBlock, "slow")).into();
        assert!(matches!(timeout, DecisionError::Timeout));
        let reset: DecisionError =
            FrameError::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset")).into();
        assert!(matches!(reset, DecisionError::Connection(_)));
        let eof: DecisionError = FrameError::UnexpectedEof.into();
        assert!(matches!(eof, DecisionError::Protocol(_)));
    }

    #[test]
    fn refused_connection_is_an_error() {
        // Bind then drop to get a port nothing listens on.
        let port = {
            let l = TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let client = TcpDecisionClient::new(format!("127.0.0.1:{}", port), Duration::from_secs(1));
        let err = client.decide(&message(), ReplyKind::Index).unwrap_err();
        assert!(matches!(
            err,
            DecisionError::Connection(_) | DecisionError::Timeout
        ));
    }

    #[test]
    fn unresolvable_endpoint_is_an_error() {
        let client = TcpDecisionClient::new("not-an-endpoint", Duration::from_secs(1));
        assert!(matches!(
            client.decide(&message(), ReplyKind::Line),
            Err(DecisionError::Connection(_))
        ));
    }

    #[test]
    fn socket_is_closed_after_reply() {
        use crate::protocol::frame::{read_text_frame, write_i32};
        use std::io::Read;
        use std::thread;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_text_frame(&mut stream).unwrap();
            write_i32(&mut stream, 9).unwrap();
            // Blocks until the client closes its side.
            let mut rest = Vec::new();
            stream.read_to_end(&mut rest).unwrap();
            (request, rest.len())
        });

        let client = TcpDecisionClient::new(addr.to_string(), Duration::from_secs(5));
        let reply = client.decide(&message(), ReplyKind::Index).unwrap();
        assert_eq!(reply, DecisionReply::Index(9));
        let (request, trailing) = server.join().unwrap();
        assert_eq!(request, "trade|1|2");
        assert_eq!(trailing, 0);
    }

    #[test]
    fn peer_closing_first_keeps_the_reply() {
        use crate::protocol::frame::{read_text_frame, write_i32};
        use std::thread;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_text_frame(&mut stream).unwrap();
            write_i32(&mut stream, 4).unwrap();
            drop(stream);
        });

        let client = TcpDecisionClient::new(addr.to_string(), Duration::from_secs(5));
        let reply = client.decide(&message(), ReplyKind::Index);
        server.join().unwrap();
        assert_eq!(reply.unwrap(), DecisionReply::Index(4));
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let client = TcpDecisionClient::new("localhost:2004", Duration::ZERO);
        assert_eq!(client.timeout(), Duration::from_millis(1));
        assert_eq!(client.endpoint(), "localhost:2004");
    }
}
