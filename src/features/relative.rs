//! Player-relative seat ordering.
//!
//! Every per-player feature block puts the deciding player first. The other
//! seats keep their seating order: seats before the decider move up one
//! position and seats after it keep their absolute number.

use crate::board::PlayerSlot;

/// Feature position of `absolute` when `me` is deciding.
///
/// Returns `None` if either seat is outside `[0, max_players)`.
pub fn relative_slot(absolute: usize, me: usize, max_players: usize) -> Option<usize> {
    if absolute >= max_players || me >= max_players {
        return None;
    }
    Some(if absolute == me {
        0
    } else if absolute < me {
        absolute + 1
    } else {
        absolute
    })
}

/// Seating of one decision, computed fresh for each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeSeating {
    me: PlayerSlot,
    max_players: usize,
}

impl RelativeSeating {
    pub fn new(me: PlayerSlot, max_players: usize) -> Self {
        RelativeSeating { me, max_players }
    }

    /// Feature position of `slot`, or `None` for a seat outside the table.
    pub fn position(&self, slot: PlayerSlot) -> Option<usize> {
        relative_slot(slot.index(), self.me.index(), self.max_players)
    }

    /// Every seat paired with its feature position, in absolute seat order.
    pub fn seats(&self) -> impl Iterator<Item = (PlayerSlot, usize)> + '_ {
        PlayerSlot::all(self.max_players).filter_map(move |s| self.position(s).map(|p| (s, p)))
    }
}
