//! Protocol handling.
//!
//! The wire format spoken with the decision service (tagged pipe/comma
//! lines, length-prefixed framing) and the line protocol the host game uses
//! to drive the agent.

pub mod frame;
pub mod parser;
pub mod wire;

pub use frame::{read_i32, read_line, read_text_frame, write_i32, write_text_frame, FrameError};
pub use parser::{parse_command, Command, OfferArgs};
pub use wire::{format, format_features, parse, DecisionTag, WireError, WireMessage};
