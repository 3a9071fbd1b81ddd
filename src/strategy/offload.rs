//! Strategies that ask the external decision service.
//!
//! Both encode the relevant state, send one request through a
//! `DecisionService`, and decode the reply. Failures never reach the caller:
//! robber decisions fall back to the configured `FallbackPolicy`, trade
//! decisions fall back to rejecting the offer.

use tracing::{info, warn};

use super::heuristic::heuristic_tile;
use super::{DecisionContext, NegotiationCounter, TileStrategy, TradeStrategy};
use crate::board::{OfferVerdict, TradeOffer};
use crate::client::{DecisionError, DecisionReply, DecisionService, ReplyKind};
use crate::config::FallbackPolicy;
use crate::features::{encode_robber_features, encode_trade_features};
use crate::protocol::{format_features, DecisionTag};

/// Robber placement chosen by the decision service.
pub struct OffloadTileStrategy<S> {
    service: S,
    fallback: FallbackPolicy,
}

impl<S: DecisionService> OffloadTileStrategy<S> {
    pub fn new(service: S, fallback: FallbackPolicy) -> Self {
        OffloadTileStrategy { service, fallback }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn request(&self, ctx: &DecisionContext<'_>) -> Result<usize, DecisionError> {
        let n = ctx.game.land_tiles().len();
        let fv = encode_robber_features(ctx.game, ctx.me);
        let msg = format_features(DecisionTag::Robber, &fv)
            .map_err(|e| DecisionError::Protocol(e.to_string()))?;
        match self.service.decide(&msg, ReplyKind::Index)? {
            DecisionReply::Index(i) => usize::try_from(i)
                .ok()
                .filter(|&i| i < n)
                .ok_or_else(|| {
                    DecisionError::Protocol(format!("tile index {} outside 0..{}", i, n))
                }),
            DecisionReply::Line(line) => Err(DecisionError::Protocol(format!(
                "expected a tile index, got line '{}'",
                line
            ))),
        }
    }

    fn fallback_tile(&self, ctx: &DecisionContext<'_>) -> usize {
        match self.fallback {
            FallbackPolicy::FirstTile => 0,
            FallbackPolicy::Heuristic => heuristic_tile(ctx.game, ctx.me),
        }
    }
}

impl<S: DecisionService> TileStrategy for OffloadTileStrategy<S> {
    fn choose_tile(&mut self, ctx: &DecisionContext<'_>) -> usize {
        match self.request(ctx) {
            Ok(index) => {
                info!(index, "decision service chose tile");
                index
            }
            Err(e) => {
                let index = self.fallback_tile(ctx);
                warn!(error = %e, fallback = ?self.fallback, index, "robber decision fell back");
                index
            }
        }
    }
}

/// Trade verdicts from the decision service.
pub struct OffloadTradeStrategy<S> {
    service: S,
}

impl<S: DecisionService> OffloadTradeStrategy<S> {
    pub fn new(service: S) -> Self {
        OffloadTradeStrategy { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn request(
        &self,
        ctx: &DecisionContext<'_>,
        offer: &TradeOffer,
    ) -> Result<OfferVerdict, DecisionError> {
        let fv = encode_trade_features(ctx.game, ctx.me, offer);
        let msg = format_features(DecisionTag::Trade, &fv)
            .map_err(|e| DecisionError::Protocol(e.to_string()))?;
        match self.service.decide(&msg, ReplyKind::Line)? {
            DecisionReply::Line(line) => Ok(verdict_from_line(&line)),
            DecisionReply::Index(i) => Err(DecisionError::Protocol(format!(
                "expected a verdict line, got index {}",
                i
            ))),
        }
    }
}

/// Any `0` in the reply means reject.
pub fn verdict_from_line(line: &str) -> OfferVerdict {
    if line.contains('0') {
        OfferVerdict::Reject
    } else {
        OfferVerdict::Accept
    }
}

impl<S: DecisionService> TradeStrategy for OffloadTradeStrategy<S> {
    fn consider_offer(
        &mut self,
        ctx: &DecisionContext<'_>,
        offer: &TradeOffer,
        _declined: &mut NegotiationCounter,
    ) -> OfferVerdict {
        if !offer.is_addressed_to(ctx.me) {
            return OfferVerdict::Ignore;
        }
        match self.request(ctx, offer) {
            Ok(verdict) => {
                info!(verdict = verdict.as_str(), from = %offer.from, "decision service answered offer");
                verdict
            }
            Err(e) => {
                warn!(error = %e, "trade decision fell back to reject");
                OfferVerdict::Reject
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{
        GameState, HexCoord, LandTile, Piece, PieceKind, PlayerSlot, ResourceSet,
    };
    use crate::protocol::WireMessage;
    use std::cell::RefCell;

    /// Replays canned replies and records requests.
    struct Scripted {
        replies: RefCell<Vec<Result<DecisionReply, DecisionError>>>,
        seen: RefCell<Vec<(String, ReplyKind)>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<DecisionReply, DecisionError>>) -> Self {
            Scripted {
                replies: RefCell::new(replies),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl DecisionService for Scripted {
        fn decide(
            &self,
            message: &WireMessage,
            kind: ReplyKind,
        ) -> Result<DecisionReply, DecisionError> {
            self.seen
                .borrow_mut()
                .push((message.as_str().to_string(), kind));
            self.replies.borrow_mut().remove(0)
        }
    }

    fn board() -> GameState {
        let tiles = (0..19)
            .map(|i| LandTile {
                coord: HexCoord(0x20 + i),
                number: 6,
            })
            .collect();
        let mut state = GameState::new(4, tiles, HexCoord(0x20));
        state.place(Piece {
            kind: PieceKind::City,
            owner: PlayerSlot::new(1, 4).unwrap(),
            adjacent_hexes: vec![HexCoord(0x25)],
        });
        state
    }

    fn me() -> PlayerSlot {
        PlayerSlot::new(0, 4).unwrap()
    }

    #[test]
    fn uses_service_index() {
        let state = board();
        let ctx = DecisionContext { game: &state, me: me() };
        let mut s = OffloadTileStrategy::new(
            Scripted::new(vec![Ok(DecisionReply::Index(5))]),
            FallbackPolicy::FirstTile,
        );
        assert_eq!(s.choose_tile(&ctx), 5);
        let seen = s.service().seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.starts_with("robber|6,6,"));
        assert_eq!(seen[0].1, ReplyKind::Index);
    }

    #[test]
    fn failure_falls_back_to_first_tile() {
        let state = board();
        let ctx = DecisionContext { game: &state, me: me() };
        let mut s = OffloadTileStrategy::new(
            Scripted::new(vec![Err(DecisionError::Timeout)]),
            FallbackPolicy::FirstTile,
        );
        assert_eq!(s.choose_tile(&ctx), 0);
    }

    #[test]
    fn failure_can_fall_back_to_heuristic() {
        let state = board();
        let ctx = DecisionContext { game: &state, me: me() };
        let mut s = OffloadTileStrategy::new(
            Scripted::new(vec![Err(DecisionError::Timeout)]),
            FallbackPolicy::Heuristic,
        );
        assert_eq!(s.choose_tile(&ctx), 5);
    }

    #[test]
    fn out_of_range_or_wrong_reply_falls_back() {
        let state = board();
        let ctx = DecisionContext { game: &state, me: me() };
        let mut s = OffloadTileStrategy::new(
            Scripted::new(vec![
                Ok(DecisionReply::Index(19)),
                Ok(DecisionReply::Index(-1)),
                Ok(DecisionReply::Line("3".into())),
            ]),
            FallbackPolicy::FirstTile,
        );
        assert_eq!(s.choose_tile(&ctx), 0);
        assert_eq!(s.choose_tile(&ctx), 0);
        assert_eq!(s.choose_tile(&ctx), 0);
    }

    #[test]
    fn verdict_lines() {
        assert_eq!(verdict_from_line("0"), OfferVerdict::Reject);
        assert_eq!(verdict_from_line("10"), OfferVerdict::Reject);
        assert_eq!(verdict_from_line("1"), OfferVerdict::Accept);
        assert_eq!(verdict_from_line("accept"), OfferVerdict::Accept);
    }

    #[test]
    fn trade_offload() {
        let state = board();
        let ctx = DecisionContext { game: &state, me: me() };
        let them = PlayerSlot::new(1, 4).unwrap();
        let o = TradeOffer {
            from: them,
            to: vec![me()],
            give: ResourceSet::from_counts([0, 0, 0, 1, 0]),
            get: ResourceSet::from_counts([1, 0, 0, 0, 0]),
        };
        let mut s = OffloadTradeStrategy::new(Scripted::new(vec![
            Ok(DecisionReply::Line("1".into())),
            Ok(DecisionReply::Line("0".into())),
            Err(DecisionError::Protocol("eof".into())),
        ]));
        let mut declined = NegotiationCounter::new();
        assert_eq!(s.consider_offer(&ctx, &o, &mut declined), OfferVerdict::Accept);
        assert_eq!(s.consider_offer(&ctx, &o, &mut declined), OfferVerdict::Reject);
        assert_eq!(s.consider_offer(&ctx, &o, &mut declined), OfferVerdict::Reject);
        let seen = s.service().seen.borrow();
        assert_eq!(
            seen[0].0,
            "trade|0|0|0,0,0,0,0|0,0,0,0,0|1,0,0,0,0|0,0,0,1,0"
        );
        assert_eq!(seen[0].1, ReplyKind::Line);
    }

    #[test]
    fn trade_offload_ignores_offers_to_others() {
        let state = board();
        let ctx = DecisionContext { game: &state, me: me() };
        let o = TradeOffer {
            from: PlayerSlot::new(1, 4).unwrap(),
            to: vec![PlayerSlot::new(2, 4).unwrap()],
            give: ResourceSet::default(),
            get: ResourceSet::default(),
        };
        let mut s = OffloadTradeStrategy::new(Scripted::new(Vec::new()));
        let mut declined = NegotiationCounter::new();
        assert_eq!(s.consider_offer(&ctx, &o, &mut declined), OfferVerdict::Ignore);
        assert!(s.service().seen.borrow().is_empty());
    }
}
