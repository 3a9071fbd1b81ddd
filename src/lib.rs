//! Settlers robot decision offload.
//!
//! Encodes a player-relative view of the game into fixed-schema feature
//! vectors, sends them to an external decision service, and turns the reply
//! into a robber move or a trade verdict. Exposes the board model, encoders,
//! wire protocol, client, strategies, and host session for the binaries and
//! integration tests.

pub mod agent;
pub mod board;
pub mod client;
pub mod config;
pub mod features;
pub mod host;
pub mod logging;
pub mod protocol;
pub mod strategy;
pub mod stub;
