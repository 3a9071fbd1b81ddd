//! Game snapshot and the query surface decisions read from.
//!
//! The host game owns the real board. Decisions only see it through
//! `GameView`, which answers per-seat questions and returns `None` for seats
//! that are out of range or unoccupied. `GameState` is the plain snapshot
//! implementation the host protocol deserializes from JSON.

use serde::{Deserialize, Serialize};

use super::player::{check_seat_count, PlayerSlot, PlayerState, SlotError};
use super::resource::ResourceSet;
use super::tile::{HexCoord, LandTile, Piece};

/// Read-only access to the parts of the game a decision may observe.
pub trait GameView {
    /// Number of seats at the table, occupied or not.
    fn max_players(&self) -> usize;

    /// Land tiles in the board's stable enumeration order.
    fn land_tiles(&self) -> &[LandTile];

    /// All settlements and cities on the board.
    fn pieces(&self) -> &[Piece];

    /// Hex currently holding the robber.
    fn robber_hex(&self) -> HexCoord;

    fn resources_of(&self, slot: PlayerSlot) -> Option<ResourceSet>;

    fn public_victory_points_of(&self, slot: PlayerSlot) -> Option<u32>;

    /// Victory points including hidden cards. Only the agent's own seat
    /// should ever be asked.
    fn total_victory_points_of(&self, slot: PlayerSlot) -> Option<u32>;

    fn development_card_count_of(&self, slot: PlayerSlot) -> Option<u32>;
}

/// Errors from loading or validating a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error("snapshot lists {players} seats but the game has {max_players}")]
    TooManySeats { players: usize, max_players: usize },

    #[error("board has no land tiles")]
    NoLandTiles,
}

/// A complete snapshot of the observable game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub max_players: usize,
    pub land_tiles: Vec<LandTile>,
    #[serde(default)]
    pub pieces: Vec<Piece>,
    pub robber_hex: HexCoord,
    /// Indexed by seat; `None` for a vacant seat.
    #[serde(default)]
    pub players: Vec<Option<PlayerState>>,
}

impl GameState {
    /// Creates a snapshot with the given tiles, no pieces, and all seats vacant.
    pub fn new(max_players: usize, land_tiles: Vec<LandTile>, robber_hex: HexCoord) -> Self {
        GameState {
            max_players,
            land_tiles,
            pieces: Vec::new(),
            robber_hex,
            players: vec![None; max_players],
        }
    }

    /// Parses and validates a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        let state: GameState = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }

    /// Checks seat numbers and board shape.
    pub fn validate(&self) -> Result<(), StateError> {
        check_seat_count(self.max_players)?;
        if self.players.len() > self.max_players {
            return Err(StateError::TooManySeats {
                players: self.players.len(),
                max_players: self.max_players,
            });
        }
        if self.land_tiles.is_empty() {
            return Err(StateError::NoLandTiles);
        }
        for piece in &self.pieces {
            PlayerSlot::new(piece.owner.index(), self.max_players)?;
        }
        Ok(())
    }

    /// Seats a player, replacing whatever was there.
    pub fn seat(&mut self, slot: PlayerSlot, player: PlayerState) {
        let idx = slot.index();
        if self.players.len() <= idx {
            self.players.resize(idx + 1, None);
        }
        self.players[idx] = Some(player);
    }

    pub fn place(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    fn player(&self, slot: PlayerSlot) -> Option<&PlayerState> {
        if slot.index() >= self.max_players {
            return None;
        }
        self.players.get(slot.index())?.as_ref()
    }
}

impl GameView for GameState {
    fn max_players(&self) -> usize {
        self.max_players
    }

    fn land_tiles(&self) -> &[LandTile] {
        &self.land_tiles
    }

    fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    fn robber_hex(&self) -> HexCoord {
        self.robber_hex
    }

    fn resources_of(&self, slot: PlayerSlot) -> Option<ResourceSet> {
        self.player(slot).map(|p| p.resources)
    }

    fn public_victory_points_of(&self, slot: PlayerSlot) -> Option<u32> {
        self.player(slot).map(|p| p.public_vp)
    }

    fn total_victory_points_of(&self, slot: PlayerSlot) -> Option<u32> {
        self.player(slot).map(|p| p.total_vp)
    }

    fn development_card_count_of(&self, slot: PlayerSlot) -> Option<u32> {
        self.player(slot).map(|p| p.unplayed_dev_cards)
    }
}
