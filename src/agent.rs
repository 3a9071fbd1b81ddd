//! The robot's decision session.
//!
//! An `Agent` owns one tile strategy, one trade strategy, and the per-turn
//! negotiation counter. The host calls it when the game needs a robber move
//! or an answer to an offer, and at turn and plan boundaries.

use tracing::{info, warn};

use crate::board::{GameView, HexCoord, OfferVerdict, PlayerSlot, TradeOffer};
use crate::client::TcpDecisionClient;
use crate::config::{AgentConfig, StrategyKind};
use crate::strategy::{
    DecisionContext, HeuristicTileStrategy, LocalTradeStrategy, NegotiationCounter,
    OffloadTileStrategy, OffloadTradeStrategy, TileStrategy, TradeStrategy,
};

/// Actions the agent can take in the game.
pub trait GameActions {
    fn move_robber(&mut self, hex: HexCoord);

    fn respond_to_offer(&mut self, offer: &TradeOffer, verdict: OfferVerdict);
}

pub struct Agent {
    me: PlayerSlot,
    tile_strategy: Box<dyn TileStrategy>,
    trade_strategy: Box<dyn TradeStrategy>,
    declined: NegotiationCounter,
}

impl Agent {
    pub fn new(
        me: PlayerSlot,
        tile_strategy: Box<dyn TileStrategy>,
        trade_strategy: Box<dyn TradeStrategy>,
    ) -> Self {
        Agent {
            me,
            tile_strategy,
            trade_strategy,
            declined: NegotiationCounter::new(),
        }
    }

    /// Builds the strategies named in `config`.
    pub fn from_config(me: PlayerSlot, config: &AgentConfig) -> Self {
        let (tile, trade) = strategies(config);
        Agent::new(me, tile, trade)
    }

    /// Rebuilds the strategies after a configuration change. The negotiation
    /// counter is kept.
    pub fn reconfigure(&mut self, config: &AgentConfig) {
        let (tile, trade) = strategies(config);
        self.tile_strategy = tile;
        self.trade_strategy = trade;
    }

    pub fn me(&self) -> PlayerSlot {
        self.me
    }

    pub fn set_player(&mut self, me: PlayerSlot) {
        self.me = me;
    }

    pub fn declined_trades(&self) -> u32 {
        self.declined.get()
    }

    /// Chooses a tile and moves the robber there exactly once.
    ///
    /// Returns `None` without acting only if the board has no land tiles.
    pub fn move_robber(
        &mut self,
        game: &dyn GameView,
        actions: &mut dyn GameActions,
    ) -> Option<HexCoord> {
        let tiles = game.land_tiles();
        if tiles.is_empty() {
            warn!("cannot move robber: board has no land tiles");
            return None;
        }
        let ctx = DecisionContext { game, me: self.me };
        let index = self.tile_strategy.choose_tile(&ctx);
        let tile = match tiles.get(index) {
            Some(t) => t,
            None => {
                warn!(index, "tile strategy returned an index off the board; using tile 0");
                &tiles[0]
            }
        };
        info!(me = %self.me, hex = %tile.coord, "moving robber");
        actions.move_robber(tile.coord);
        Some(tile.coord)
    }

    /// Decides on `offer` and reports the verdict to the game once.
    pub fn consider_offer(
        &mut self,
        game: &dyn GameView,
        offer: &TradeOffer,
        actions: &mut dyn GameActions,
    ) -> OfferVerdict {
        let ctx = DecisionContext { game, me: self.me };
        let verdict = self
            .trade_strategy
            .consider_offer(&ctx, offer, &mut self.declined);
        info!(
            me = %self.me,
            from = %offer.from,
            verdict = verdict.as_str(),
            declined = self.declined.get(),
            "answered offer"
        );
        actions.respond_to_offer(offer, verdict);
        verdict
    }

    pub fn reset_at_end_turn(&mut self) {
        self.declined.reset();
    }

    pub fn reset_building_plan(&mut self) {
        self.declined.reset();
    }
}

fn strategies(config: &AgentConfig) -> (Box<dyn TileStrategy>, Box<dyn TradeStrategy>) {
    let tile: Box<dyn TileStrategy> = match config.tile_strategy {
        StrategyKind::Offload => Box::new(OffloadTileStrategy::new(
            TcpDecisionClient::from_config(config),
            config.fallback,
        )),
        StrategyKind::Local => Box::new(HeuristicTileStrategy),
    };
    let trade: Box<dyn TradeStrategy> = match config.trade_strategy {
        StrategyKind::Offload => Box::new(OffloadTradeStrategy::new(
            TcpDecisionClient::from_config(config),
        )),
        StrategyKind::Local => Box::new(LocalTradeStrategy::new(config.decline_threshold)),
    };
    (tile, trade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{GameState, LandTile, PlayerState, ResourceSet};

    #[derive(Default)]
    struct Recorder {
        robber: Vec<HexCoord>,
        verdicts: Vec<OfferVerdict>,
    }

    impl GameActions for Recorder {
        fn move_robber(&mut self, hex: HexCoord) {
            self.robber.push(hex);
        }

        fn respond_to_offer(&mut self, _offer: &TradeOffer, verdict: OfferVerdict) {
            self.verdicts.push(verdict);
        }
    }

    struct Fixed(usize);

    impl TileStrategy for Fixed {
        fn choose_tile(&mut self, _ctx: &DecisionContext<'_>) -> usize {
            self.0
        }
    }

    fn board() -> GameState {
        let tiles = (0..5)
            .map(|i| LandTile {
                coord: HexCoord(0x51 + i),
                number: 8,
            })
            .collect();
        let mut state = GameState::new(4, tiles, HexCoord(0x51));
        state.seat(
            PlayerSlot::new(0, 4).unwrap(),
            PlayerState {
                resources: ResourceSet::from_counts([0, 1, 0, 0, 0]),
                ..PlayerState::default()
            },
        );
        state
    }

    fn agent(tile: usize) -> Agent {
        Agent::new(
            PlayerSlot::new(0, 4).unwrap(),
            Box::new(Fixed(tile)),
            Box::new(LocalTradeStrategy::default()),
        )
    }

    fn ore_for_wood() -> TradeOffer {
        TradeOffer {
            from: PlayerSlot::new(1, 4).unwrap(),
            to: vec![PlayerSlot::new(0, 4).unwrap()],
            give: ResourceSet::from_counts([0, 0, 0, 1, 0]),
            get: ResourceSet::from_counts([0, 1, 0, 0, 0]),
        }
    }

    #[test]
    fn moves_robber_once() {
        let state = board();
        let mut actions = Recorder::default();
        let hex = agent(3).move_robber(&state, &mut actions);
        assert_eq!(hex, Some(HexCoord(0x54)));
        assert_eq!(actions.robber, vec![HexCoord(0x54)]);
    }

    #[test]
    fn off_board_index_uses_first_tile() {
        let state = board();
        let mut actions = Recorder::default();
        assert_eq!(
            agent(42).move_robber(&state, &mut actions),
            Some(HexCoord(0x51))
        );
        assert_eq!(actions.robber.len(), 1);
    }

    #[test]
    fn declines_accumulate_until_reset() {
        let state = board();
        let mut actions = Recorder::default();
        let mut a = agent(0);
        let offer = ore_for_wood();
        for _ in 0..3 {
            assert_eq!(
                a.consider_offer(&state, &offer, &mut actions),
                OfferVerdict::Reject
            );
        }
        assert_eq!(a.declined_trades(), 3);
        // Past the threshold the negotiator takes the fair trade.
        assert_eq!(
            a.consider_offer(&state, &offer, &mut actions),
            OfferVerdict::Accept
        );
        assert_eq!(actions.verdicts.len(), 4);

        a.reset_at_end_turn();
        assert_eq!(a.declined_trades(), 0);
        assert_eq!(
            a.consider_offer(&state, &offer, &mut actions),
            OfferVerdict::Reject
        );
        a.reset_building_plan();
        assert_eq!(a.declined_trades(), 0);
    }

    #[test]
    fn local_config_needs_no_service() {
        let config = AgentConfig {
            tile_strategy: StrategyKind::Local,
            ..AgentConfig::default()
        };
        let state = board();
        let mut actions = Recorder::default();
        let mut a = Agent::from_config(PlayerSlot::new(0, 4).unwrap(), &config);
        // Robber sits on tile 0 and nobody has built, so tile 1 wins.
        assert_eq!(a.move_robber(&state, &mut actions), Some(HexCoord(0x52)));
    }
}
