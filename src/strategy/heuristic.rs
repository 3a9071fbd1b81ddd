//! Local robber placement.
//!
//! Scores each land tile by how much production the robber would take away
//! from opponents versus from us. Used as a standalone tile strategy and as
//! the optional fallback when the decision service is unavailable.

use super::{DecisionContext, TileStrategy};
use crate::board::{GameView, PlayerSlot};
use crate::features::{encode_robber_features, FeatureSchema, OCCUPANCY_SLOTS};

/// Best tile to block for `me`.
///
/// The tile currently holding the robber is never chosen. Ties go to the
/// lowest index; if no tile is eligible the answer is 0.
pub fn heuristic_tile(game: &dyn GameView, me: PlayerSlot) -> usize {
    let tiles = game.land_tiles();
    let n = tiles.len();
    let schema = FeatureSchema::new(n, game.max_players());
    let fv = encode_robber_features(game, me);
    let values = fv.values();

    let mut best: Option<(usize, i64)> = None;
    for (i, tile) in tiles.iter().enumerate() {
        if values[schema.prev_robber() + i] == 1 {
            continue;
        }
        let own = i64::from(values[schema.occupancy(0) + i]);
        let theirs: i64 = (1..OCCUPANCY_SLOTS)
            .map(|slot| i64::from(values[schema.occupancy(slot) + i]))
            .sum();
        let score = i64::from(tile.pips()) * (theirs - own);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    best.map_or(0, |(i, _)| i)
}

/// Tile strategy backed by `heuristic_tile`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTileStrategy;

impl TileStrategy for HeuristicTileStrategy {
    fn choose_tile(&mut self, ctx: &DecisionContext<'_>) -> usize {
        heuristic_tile(ctx.game, ctx.me)
    }
}
