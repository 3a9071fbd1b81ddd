//! Game state -> integer feature vectors for the decision service.
//!
//! `encode_robber_features` follows the layout in `schema`; the trade
//! encoder produces the six `TRADE_SEGMENTS` sections. Both are pure and
//! never fail: pieces touching hexes outside the land-tile enumeration,
//! owners outside the table, and vacant seats all leave zeros behind.

use std::collections::HashMap;

use tracing::debug;

use super::relative::RelativeSeating;
use super::schema::{FeatureSchema, OCCUPANCY_SLOTS, TRADE_SEGMENTS};
use crate::board::{encode, GameView, HexCoord, PlayerSlot, TradeOffer};

/// A flat feature vector with the wire section lengths it splits into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    values: Vec<i32>,
    segment_lengths: Vec<usize>,
}

impl FeatureVector {
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn segment_lengths(&self) -> &[usize] {
        &self.segment_lengths
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The `index`-th wire section.
    pub fn segment(&self, index: usize) -> Option<&[i32]> {
        let len = *self.segment_lengths.get(index)?;
        let start: usize = self.segment_lengths[..index].iter().sum();
        self.values.get(start..start + len)
    }
}

/// Position of each land hex in the board's enumeration.
fn tile_index(view: &dyn GameView) -> HashMap<HexCoord, usize> {
    let mut index = HashMap::with_capacity(view.land_tiles().len());
    for (i, tile) in view.land_tiles().iter().enumerate() {
        index.entry(tile.coord).or_insert(i);
    }
    index
}

/// Encodes the state seen by `me` before choosing where to move the robber.
pub fn encode_robber_features(view: &dyn GameView, me: PlayerSlot) -> FeatureVector {
    let tiles = view.land_tiles();
    let n = tiles.len();
    let schema = FeatureSchema::new(n, view.max_players());
    let seating = RelativeSeating::new(me, view.max_players());
    let mut values = vec![0i32; schema.len()];

    for (i, tile) in tiles.iter().enumerate() {
        values[schema.tile_values() + i] = i32::from(tile.number);
    }

    let index = tile_index(view);
    for piece in view.pieces() {
        let slot = match seating.position(piece.owner) {
            Some(s) if s < OCCUPANCY_SLOTS => s,
            _ => continue,
        };
        let row = schema.occupancy(slot);
        for hex in &piece.adjacent_hexes {
            if let Some(&t) = index.get(hex) {
                values[row + t] += piece.kind.weight();
            }
        }
    }

    for (slot, pos) in seating.seats() {
        let dev = view.development_card_count_of(slot).unwrap_or(0);
        let res = view.resources_of(slot).map(|r| r.total()).unwrap_or(0);
        let vp = if slot == me {
            view.total_victory_points_of(slot)
        } else {
            view.public_victory_points_of(slot)
        }
        .unwrap_or(0);
        values[schema.dev_cards() + pos] = saturate(dev);
        values[schema.resources() + pos] = saturate(res);
        values[schema.victory_points() + pos] = saturate(vp);
    }

    let robber = view.robber_hex();
    for (i, tile) in tiles.iter().enumerate() {
        if tile.coord == robber {
            values[schema.prev_robber() + i] = 1;
        }
    }

    debug!(
        me = %me,
        land_tiles = n,
        tiles = ?&values[..n],
        occupancy = ?&values[schema.occupancy(0)..schema.dev_cards()],
        dev_cards = ?&values[schema.dev_cards()..schema.resources()],
        resources = ?&values[schema.resources()..schema.victory_points()],
        vps = ?&values[schema.victory_points()..schema.prev_robber()],
        prev_robber = ?&values[schema.prev_robber()..],
        "robber features"
    );

    FeatureVector {
        values,
        segment_lengths: schema.segment_lengths(),
    }
}

/// Encodes a trade offer received by `me`.
///
/// Both victory-point sections carry public points, so the proposer's hidden
/// cards never leak and the agent's own count is on the same footing.
pub fn encode_trade_features(
    view: &dyn GameView,
    me: PlayerSlot,
    offer: &TradeOffer,
) -> FeatureVector {
    let my_vp = view.public_victory_points_of(me).unwrap_or(0);
    let their_vp = view.public_victory_points_of(offer.from).unwrap_or(0);
    let mine = view.resources_of(me).map(|r| encode(&r)).unwrap_or_default();
    let theirs = view
        .resources_of(offer.from)
        .map(|r| encode(&r))
        .unwrap_or_default();

    let mut values = Vec::with_capacity(TRADE_SEGMENTS.iter().sum());
    values.push(saturate(my_vp));
    values.push(saturate(their_vp));
    for v in [mine, theirs, encode(&offer.get), encode(&offer.give)] {
        values.extend_from_slice(v.as_slice());
    }

    FeatureVector {
        values,
        segment_lengths: TRADE_SEGMENTS.to_vec(),
    }
}

fn saturate(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
