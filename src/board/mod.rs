//! Board representation and game-state types.
//!
//! Contains resources, player seats, land tiles and pieces, trade offers,
//! and the snapshot/query surface the decision code reads.

pub mod player;
pub mod resource;
pub mod state;
pub mod tile;
pub mod trade;

pub use player::{check_seat_count, PlayerSlot, PlayerState, SlotError, MAX_SEATS};
pub use resource::{
    encode, ResourceError, ResourceKind, ResourceSet, ResourceVector, ALL_RESOURCES,
    RESOURCE_KINDS,
};
pub use state::{GameState, GameView, StateError};
pub use tile::{HexCoord, LandTile, Piece, PieceKind};
pub use trade::{OfferVerdict, TradeOffer};
