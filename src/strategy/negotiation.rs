//! Local trade evaluation.
//!
//! Offers whose `get` set holds no clay or sheep are turned down until we
//! have declined more than the configured number in a row this turn; after
//! that (or whenever clay or sheep are in the `get` set) the default
//! negotiator decides.

use super::{DecisionContext, TradeStrategy};
use crate::board::{encode, OfferVerdict, ResourceKind, TradeOffer};
use crate::config::DEFAULT_DECLINE_THRESHOLD;

/// Consecutive offers the agent declined during the current turn.
///
/// Owned by the agent session; reset at the end of each turn and whenever a
/// new building plan is made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NegotiationCounter {
    declined: u32,
}

impl NegotiationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u32 {
        self.declined
    }

    pub fn record_decline(&mut self) {
        self.declined = self.declined.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.declined = 0;
    }
}

/// Accepts fair trades the agent can pay for.
///
/// An offer is accepted when the agent holds everything the proposer asks
/// for and receives at least as many cards as it gives up.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNegotiator;

impl DefaultNegotiator {
    pub fn consider(&self, ctx: &DecisionContext<'_>, offer: &TradeOffer) -> OfferVerdict {
        let hand = ctx.game.resources_of(ctx.me).unwrap_or_default();
        if hand.covers(&offer.get) && offer.give.total() >= offer.get.total() {
            OfferVerdict::Accept
        } else {
            OfferVerdict::Reject
        }
    }
}

/// Clay-or-sheep trade filter in front of the default negotiator.
#[derive(Debug, Clone, Copy)]
pub struct LocalTradeStrategy {
    threshold: u32,
    negotiator: DefaultNegotiator,
}

impl LocalTradeStrategy {
    pub fn new(threshold: u32) -> Self {
        LocalTradeStrategy {
            threshold,
            negotiator: DefaultNegotiator,
        }
    }
}

impl Default for LocalTradeStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_DECLINE_THRESHOLD)
    }
}

impl TradeStrategy for LocalTradeStrategy {
    fn consider_offer(
        &mut self,
        ctx: &DecisionContext<'_>,
        offer: &TradeOffer,
        declined: &mut NegotiationCounter,
    ) -> OfferVerdict {
        if !offer.is_addressed_to(ctx.me) {
            return OfferVerdict::Ignore;
        }
        let get = encode(&offer.get);
        let wanted =
            get.0[ResourceKind::Clay.index()] > 0 || get.0[ResourceKind::Sheep.index()] > 0;
        if !wanted && declined.get() <= self.threshold {
            declined.record_decline();
            return OfferVerdict::Reject;
        }
        self.negotiator.consider(ctx, offer)
    }
}
