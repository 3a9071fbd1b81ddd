//! Host session state.
//!
//! Holds the current game snapshot, the agent's seat, its configuration, and
//! the agent itself between host commands. Decisions are written back to the
//! host as `moverobber 0x<hex>` and `offerverdict <verdict>` lines.

use std::io::{self, Write};

use tracing::warn;

use crate::agent::{Agent, GameActions};
use crate::board::{
    check_seat_count, GameState, HexCoord, OfferVerdict, PlayerSlot, SlotError, StateError,
    TradeOffer, MAX_SEATS,
};
use crate::config::{AgentConfig, ConfigError};
use crate::protocol::OfferArgs;

/// Reports agent actions as host protocol lines.
///
/// Keeps the first write error so the caller can stop on a closed pipe.
pub struct WriterActions<'a, W: Write> {
    out: &'a mut W,
    result: io::Result<()>,
}

impl<'a, W: Write> WriterActions<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        WriterActions { out, result: Ok(()) }
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if self.result.is_ok() {
            self.result = writeln!(self.out, "{}", line);
        }
    }

    /// Flushes and returns the first error seen.
    pub fn finish(self) -> io::Result<()> {
        self.result?;
        self.out.flush()
    }
}

impl<W: Write> GameActions for WriterActions<'_, W> {
    fn move_robber(&mut self, hex: HexCoord) {
        self.emit(format_args!("moverobber {}", hex));
    }

    fn respond_to_offer(&mut self, _offer: &TradeOffer, verdict: OfferVerdict) {
        self.emit(format_args!("offerverdict {}", verdict.as_str()));
    }
}

/// Mutable state of the host session between commands.
pub struct Session {
    pub config: AgentConfig,
    pub position: Option<GameState>,
    agent: Option<Agent>,
}

impl Session {
    pub fn new(config: AgentConfig) -> Self {
        Session {
            config,
            position: None,
            agent: None,
        }
    }

    pub fn agent(&self) -> Option<&Agent> {
        self.agent.as_ref()
    }

    /// Applies a `setoption` and rebuilds the agent's strategies.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), ConfigError> {
        self.config.set_option(name, value)?;
        if let Some(agent) = self.agent.as_mut() {
            agent.reconfigure(&self.config);
        }
        Ok(())
    }

    /// Replaces the game snapshot. A bad snapshot leaves the old one in place.
    ///
    /// If the agent's seat is not at the new table the agent is dropped and
    /// the host must `setplayer` again before the next decision.
    pub fn set_position(&mut self, json: &str) -> Result<(), StateError> {
        let state = GameState::from_json(json)?;
        if let Some(me) = self.agent.as_ref().map(Agent::me) {
            if me.index() >= state.max_players {
                warn!(me = %me, max_players = state.max_players, "agent seat is off the new table; unseating");
                self.agent = None;
            }
        }
        self.position = Some(state);
        Ok(())
    }

    /// Seats the agent, creating it on first use.
    pub fn set_player(&mut self, slot: usize) -> Result<(), SlotError> {
        let me = PlayerSlot::new(slot, self.seat_count())?;
        match self.agent.as_mut() {
            Some(agent) => agent.set_player(me),
            None => self.agent = Some(Agent::from_config(me, &self.config)),
        }
        Ok(())
    }

    fn seat_count(&self) -> usize {
        self.position
            .as_ref()
            .map_or(MAX_SEATS, |p| p.max_players)
    }

    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles `robber`: picks a tile and prints `moverobber`.
    pub fn handle_robber<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let state = match &self.position {
            Some(s) => s,
            None => {
                warn!("robber: no position set");
                return Ok(());
            }
        };
        let agent = match self.agent.as_mut() {
            Some(a) => a,
            None => {
                warn!("robber: no player set");
                return Ok(());
            }
        };
        let mut actions = WriterActions::new(out);
        agent.move_robber(state, &mut actions);
        actions.finish()
    }

    /// Handles `offer`: prints `offerverdict`.
    pub fn handle_offer<W: Write>(&mut self, args: &OfferArgs, out: &mut W) -> io::Result<()> {
        let state = match &self.position {
            Some(s) => s,
            None => {
                warn!("offer: no position set");
                return Ok(());
            }
        };
        let agent = match self.agent.as_mut() {
            Some(a) => a,
            None => {
                warn!("offer: no player set");
                return Ok(());
            }
        };
        let mut actions = WriterActions::new(out);
        match trade_offer(args, state.max_players) {
            Ok(offer) => {
                agent.consider_offer(state, &offer, &mut actions);
            }
            Err(e) => {
                warn!("offer: {}", e);
                actions.emit(format_args!("offerverdict {}", OfferVerdict::Ignore.as_str()));
            }
        }
        actions.finish()
    }

    pub fn new_turn(&mut self) {
        if let Some(agent) = self.agent.as_mut() {
            agent.reset_at_end_turn();
        }
    }

    pub fn new_plan(&mut self) {
        if let Some(agent) = self.agent.as_mut() {
            agent.reset_building_plan();
        }
    }
}

/// Validates the seats of a parsed offer against the table size.
fn trade_offer(args: &OfferArgs, max_players: usize) -> Result<TradeOffer, SlotError> {
    check_seat_count(max_players)?;
    let from = PlayerSlot::new(args.from, max_players)?;
    let to = args
        .to
        .iter()
        .map(|&s| PlayerSlot::new(s, max_players))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TradeOffer {
        from,
        to,
        give: args.give,
        get: args.get,
    })
}
