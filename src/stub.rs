//! In-process stand-in for the decision service.
//!
//! Speaks the same framing as the real service so the client and agent can
//! be exercised end to end without it. Used by the integration tests and by
//! the `policy-stub` binary.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::protocol::frame::{read_text_frame, write_i32, FrameError};

/// What the stub does with one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubReply {
    /// Reply with a big-endian i32.
    Index(i32),
    /// Reply with a text line (a newline is appended).
    Line(String),
    /// Never reply; hold the connection until the client gives up.
    Silent,
    /// Close the connection without replying.
    Hangup,
}

/// Handles a single connection: read one request, record it, answer it.
fn handle_connection<F>(
    mut stream: TcpStream,
    responder: &mut F,
    log: Option<&Mutex<Vec<String>>>,
) -> Result<(), FrameError>
where
    F: FnMut(&str) -> StubReply,
{
    let request = read_text_frame(&mut stream)?;
    debug!("stub received {}", request);
    let reply = responder(&request);
    if let Some(Ok(mut log)) = log.map(|l| l.lock()) {
        log.push(request);
    }
    match reply {
        StubReply::Index(v) => write_i32(&mut stream, v)?,
        StubReply::Line(line) => {
            stream.write_all(line.as_bytes())?;
            stream.write_all(b"\n")?;
            stream.flush()?;
        }
        StubReply::Silent => {
            // Drain until the client closes its side.
            let mut sink = [0u8; 64];
            while matches!(stream.read(&mut sink), Ok(n) if n > 0) {}
        }
        StubReply::Hangup => {}
    }
    Ok(())
}

/// Serves connections one at a time until `stop` is set.
///
/// Requests are appended to `log` when one is given.
pub fn serve<F>(
    listener: &TcpListener,
    stop: &AtomicBool,
    mut responder: F,
    log: Option<&Mutex<Vec<String>>>,
) where
    F: FnMut(&str) -> StubReply,
{
    for conn in listener.incoming() {
        if stop.load(Ordering::SeqCst) {
            break;
        }
        let stream = match conn {
            Ok(s) => s,
            Err(e) => {
                warn!("stub accept failed: {}", e);
                continue;
            }
        };
        if let Err(e) = handle_connection(stream, &mut responder, log) {
            warn!("stub connection failed: {}", e);
        }
    }
}

/// A stub service running on a background thread.
///
/// Stops and joins its thread on drop.
pub struct StubService {
    addr: SocketAddr,
    stop: Arc<AtomicBool>,
    requests: Arc<Mutex<Vec<String>>>,
    handle: Option<JoinHandle<()>>,
}

impl StubService {
    /// Binds an ephemeral localhost port and starts answering with `responder`.
    pub fn spawn<F>(responder: F) -> io::Result<Self>
    where
        F: FnMut(&str) -> StubReply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let stop = Arc::new(AtomicBool::new(false));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let thread_stop = Arc::clone(&stop);
        let thread_requests = Arc::clone(&requests);
        let handle = thread::Builder::new()
            .name("policy-stub".to_string())
            .spawn(move || serve(&listener, &thread_stop, responder, Some(&*thread_requests)))?;

        Ok(StubService {
            addr,
            stop,
            requests,
            handle: Some(handle),
        })
    }

    /// `host:port` string for the client configuration.
    pub fn endpoint(&self) -> String {
        self.addr.to_string()
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Drop for StubService {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        // Wake the blocking accept.
        let _ = TcpStream::connect(self.addr);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Number of land tiles in a robber request (length of its first section).
pub fn land_tiles_in(request: &str) -> Option<usize> {
    let section = request.split('|').nth(1)?;
    Some(section.split(',').count())
}

/// Random legal answers, reproducible from `seed`.
pub struct RandomPolicy {
    rng: SmallRng,
    accept_rate: f64,
}

impl RandomPolicy {
    pub fn new(seed: u64, accept_rate: f64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        RandomPolicy {
            rng,
            accept_rate: accept_rate.clamp(0.0, 1.0),
        }
    }

    pub fn respond(&mut self, request: &str) -> StubReply {
        if request.starts_with("robber|") {
            let tiles = land_tiles_in(request).unwrap_or(1).max(1);
            StubReply::Index(self.rng.gen_range(0..tiles) as i32)
        } else if request.starts_with("trade|") {
            let accept = self.rng.gen_bool(self.accept_rate);
            StubReply::Line(if accept { "1" } else { "0" }.to_string())
        } else {
            StubReply::Hangup
        }
    }
}
