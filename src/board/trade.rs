//! Trade offers and the agent's response to them.

use super::player::PlayerSlot;
use super::resource::ResourceSet;

/// A trade proposed by another player.
///
/// `give` is what the proposer surrenders (and a recipient receives);
/// `get` is what the proposer wants in return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOffer {
    pub from: PlayerSlot,
    pub to: Vec<PlayerSlot>,
    pub give: ResourceSet,
    pub get: ResourceSet,
}

impl TradeOffer {
    /// True if `slot` is one of the offer's recipients.
    pub fn is_addressed_to(&self, slot: PlayerSlot) -> bool {
        self.to.contains(&slot)
    }
}

/// How the agent answers an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfferVerdict {
    Accept,
    Reject,
    /// The offer was not addressed to the agent.
    Ignore,
}

impl OfferVerdict {
    pub const fn as_str(self) -> &'static str {
        match self {
            OfferVerdict::Accept => "accept",
            OfferVerdict::Reject => "reject",
            OfferVerdict::Ignore => "ignore",
        }
    }
}
