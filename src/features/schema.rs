//! Fixed feature layouts for the two decision types.
//!
//! Robber layout for N land tiles and P seats (offsets in parentheses):
//!   tile values         N      (0)
//!   occupancy           4 x N  (N)       self, then three opponents
//!   dev cards           P      (5N)      self, then opponents
//!   resource totals     P      (5N+P)    self, then opponents
//!   victory points      P      (5N+2P)   self total, opponents public
//!   previous robber     N      (5N+3P)   one-hot
//!
//! On the wire each per-player block is split into a one-value self section
//! and a (P-1)-value opponent section, giving 12 sections.

/// Player feature slots carried by the occupancy block.
pub const OCCUPANCY_SLOTS: usize = 4;

/// Land tiles on the standard board.
pub const STANDARD_LAND_TILES: usize = 19;

/// Seats in a standard game.
pub const STANDARD_MAX_PLAYERS: usize = 4;

/// Wire sections of a trade request:
/// self vp | proposer vp | self resources | proposer resources | get | give.
pub const TRADE_SEGMENTS: [usize; 6] = [1, 1, 5, 5, 5, 5];

/// Shape of a robber feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureSchema {
    pub land_tiles: usize,
    pub max_players: usize,
}

impl FeatureSchema {
    pub const STANDARD: FeatureSchema = FeatureSchema {
        land_tiles: STANDARD_LAND_TILES,
        max_players: STANDARD_MAX_PLAYERS,
    };

    pub const fn new(land_tiles: usize, max_players: usize) -> Self {
        FeatureSchema {
            land_tiles,
            max_players,
        }
    }

    /// Total number of features.
    pub const fn len(&self) -> usize {
        self.land_tiles + OCCUPANCY_SLOTS * self.land_tiles + 3 * self.max_players + self.land_tiles
    }

    pub const fn tile_values(&self) -> usize {
        0
    }

    /// Start of the occupancy row for relative slot `slot` (0 = self).
    pub const fn occupancy(&self, slot: usize) -> usize {
        self.land_tiles + slot * self.land_tiles
    }

    pub const fn dev_cards(&self) -> usize {
        self.occupancy(OCCUPANCY_SLOTS)
    }

    pub const fn resources(&self) -> usize {
        self.dev_cards() + self.max_players
    }

    pub const fn victory_points(&self) -> usize {
        self.resources() + self.max_players
    }

    pub const fn prev_robber(&self) -> usize {
        self.victory_points() + self.max_players
    }

    /// Wire section lengths in order; they always sum to `len()`.
    pub fn segment_lengths(&self) -> Vec<usize> {
        let n = self.land_tiles;
        let opponents = self.max_players.saturating_sub(1);
        let mut lengths = vec![n; 1 + OCCUPANCY_SLOTS];
        for _ in 0..3 {
            lengths.push(1);
            lengths.push(opponents);
        }
        lengths.push(n);
        lengths
    }
}
