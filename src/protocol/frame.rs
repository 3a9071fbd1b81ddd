//! Stream framing used by the decision service.
//!
//! Requests are length-prefixed: a u16 big-endian byte count followed by the
//! UTF-8 payload. Robber replies are a single i32 big-endian; trade replies
//! are one `\n`-terminated line.

use std::io::{self, Read, Write};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("frame too large: {len} > {max}")]
    TooLarge { len: usize, max: usize },
    #[error("unexpected EOF while reading frame")]
    UnexpectedEof,
    #[error("reply line is not valid UTF-8")]
    InvalidUtf8,
}

pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Longest reply line accepted before giving up.
pub const MAX_LINE_LEN: usize = 4096;

/// Writes one length-prefixed text frame and flushes.
pub fn write_text_frame<W: Write>(w: &mut W, payload: &str) -> Result<(), FrameError> {
    let bytes = payload.as_bytes();
    let len = u16::try_from(bytes.len()).map_err(|_| FrameError::TooLarge {
        len: bytes.len(),
        max: MAX_FRAME_LEN,
    })?;
    let mut buf = Vec::with_capacity(2 + bytes.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(bytes);
    w.write_all(&buf)?;
    w.flush()?;
    Ok(())
}

/// Reads one length-prefixed text frame.
pub fn read_text_frame<R: Read>(r: &mut R) -> Result<String, FrameError> {
    let mut len_bytes = [0u8; 2];
    read_exact_or_eof(r, &mut len_bytes)?;
    let len = u16::from_be_bytes(len_bytes) as usize;
    let mut payload = vec![0u8; len];
    read_exact_or_eof(r, &mut payload)?;
    String::from_utf8(payload).map_err(|_| FrameError::InvalidUtf8)
}

pub fn write_i32<W: Write>(w: &mut W, v: i32) -> Result<(), FrameError> {
    w.write_all(&v.to_be_bytes())?;
    w.flush()?;
    Ok(())
}

pub fn read_i32<R: Read>(r: &mut R) -> Result<i32, FrameError> {
    let mut buf = [0u8; 4];
    read_exact_or_eof(r, &mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

/// Reads bytes up to `\n` or EOF, dropping the terminator and any `\r`.
///
/// EOF before any byte is an error; EOF after some bytes ends the line.
pub fn read_line<R: Read>(r: &mut R) -> Result<String, FrameError> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match r.read(&mut byte) {
            Ok(0) if line.is_empty() => return Err(FrameError::UnexpectedEof),
            Ok(0) => break,
            Ok(_) => {
                if byte[0] == b'\n' {
                    break;
                }
                line.push(byte[0]);
                if line.len() > MAX_LINE_LEN {
                    return Err(FrameError::TooLarge {
                        len: line.len(),
                        max: MAX_LINE_LEN,
                    });
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    String::from_utf8(line).map_err(|_| FrameError::InvalidUtf8)
}

fn read_exact_or_eof<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<(), FrameError> {
    let mut off = 0usize;
    while off < buf.len() {
        match r.read(&mut buf[off..]) {
            Ok(0) => return Err(FrameError::UnexpectedEof),
            Ok(n) => off += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
