//! Decision strategies.
//!
//! The agent holds one `TileStrategy` and one `TradeStrategy`, chosen when it
//! is built. Offloaded strategies ask the external service and fall back on
//! failure; local strategies decide in-process.

pub mod heuristic;
pub mod negotiation;
pub mod offload;

use crate::board::{GameView, OfferVerdict, PlayerSlot, TradeOffer};

pub use heuristic::{heuristic_tile, HeuristicTileStrategy};
pub use negotiation::{DefaultNegotiator, LocalTradeStrategy, NegotiationCounter};
pub use offload::{OffloadTileStrategy, OffloadTradeStrategy};

/// What a strategy sees when asked for a decision.
#[derive(Clone, Copy)]
pub struct DecisionContext<'a> {
    pub game: &'a dyn GameView,
    pub me: PlayerSlot,
}

/// Chooses where to move the robber.
pub trait TileStrategy {
    /// Returns an index into `ctx.game.land_tiles()`.
    fn choose_tile(&mut self, ctx: &DecisionContext<'_>) -> usize;
}

/// Answers trade offers.
pub trait TradeStrategy {
    /// `declined` is the agent's per-turn count of offers it turned down.
    fn consider_offer(
        &mut self,
        ctx: &DecisionContext<'_>,
        offer: &TradeOffer,
        declined: &mut NegotiationCounter,
    ) -> OfferVerdict;
}
