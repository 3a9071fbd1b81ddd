//! Land tiles and the settlements/cities that touch them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::player::PlayerSlot;

/// Board coordinate of a hex, as assigned by the host game's board layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexCoord(pub u32);

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// A land hex with its dice production number (0 for the desert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandTile {
    pub coord: HexCoord,
    #[serde(default)]
    pub number: u8,
}

impl LandTile {
    /// Number of dice combinations that roll this tile's number.
    pub fn pips(&self) -> u32 {
        match self.number {
            2..=12 => 6 - (7 - self.number as i32).unsigned_abs(),
            _ => 0,
        }
    }
}

/// Kind of a placed piece that collects resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Settlement,
    City,
}

impl PieceKind {
    /// Resource cards collected per production roll.
    pub const fn weight(self) -> i32 {
        match self {
            PieceKind::Settlement => 1,
            PieceKind::City => 2,
        }
    }
}

/// A settlement or city with its owner and the hexes it touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: PlayerSlot,
    #[serde(default)]
    pub adjacent_hexes: Vec<HexCoord>,
}
