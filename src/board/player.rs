//! Player seats and per-player observable state.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::resource::ResourceSet;

/// Largest seat count the host game supports.
pub const MAX_SEATS: usize = 6;

/// Errors from constructing a player slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("player number {slot} out of range for a {max_players}-seat game")]
    OutOfRange { slot: usize, max_players: usize },

    #[error("unsupported seat count {0} (expected 2..=6)")]
    BadSeatCount(usize),
}

/// An absolute seat number assigned by the game, in `[0, max_players)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerSlot(u8);

impl PlayerSlot {
    /// Creates a slot, validating it against the game's seat count.
    pub fn new(slot: usize, max_players: usize) -> Result<Self, SlotError> {
        check_seat_count(max_players)?;
        if slot >= max_players {
            return Err(SlotError::OutOfRange { slot, max_players });
        }
        Ok(PlayerSlot(slot as u8))
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every seat of a `max_players`-seat table in seat order.
    pub fn all(max_players: usize) -> impl Iterator<Item = PlayerSlot> {
        (0..max_players.min(MAX_SEATS)).map(|i| PlayerSlot(i as u8))
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejects seat counts the board schema cannot describe.
pub fn check_seat_count(max_players: usize) -> Result<(), SlotError> {
    if (2..=MAX_SEATS).contains(&max_players) {
        Ok(())
    } else {
        Err(SlotError::BadSeatCount(max_players))
    }
}

/// What the agent can observe about one seated player.
///
/// `total_vp` includes hidden victory-point cards and is only meaningful for
/// the agent's own seat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    #[serde(default)]
    pub resources: ResourceSet,
    #[serde(default)]
    pub unplayed_dev_cards: u32,
    #[serde(default)]
    pub public_vp: u32,
    #[serde(default)]
    pub total_vp: u32,
}
