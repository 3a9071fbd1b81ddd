//! Feature encoding for the external decision service.
//!
//! Turns a `GameView` into the fixed-layout integer vectors sent on the
//! wire. Per-player blocks are ordered relative to the deciding player.

pub mod encoding;
pub mod relative;
pub mod schema;

pub use encoding::{encode_robber_features, encode_trade_features, FeatureVector};
pub use relative::{relative_slot, RelativeSeating};
pub use schema::{
    FeatureSchema, OCCUPANCY_SLOTS, STANDARD_LAND_TILES, STANDARD_MAX_PLAYERS, TRADE_SEGMENTS,
};
