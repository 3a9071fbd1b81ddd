//! Host command parser.
//!
//! Parses the line commands a host game sends on stdin into structured
//! `Command` variants that the main loop dispatches on.

use tracing::warn;

use crate::board::ResourceSet;

/// A trade offer as written on the command line, before seat validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferArgs {
    pub from: usize,
    pub to: Vec<usize>,
    pub give: ResourceSet,
    pub get: ResourceSet,
}

/// A parsed host-to-agent command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; the agent must reply `readyok`.
    IsReady,

    /// Set an option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Replace the game snapshot: `position <json>`.
    Position { json: String },

    /// Set the agent's seat: `setplayer <n>`.
    SetPlayer { slot: usize },

    /// Choose where to move the robber.
    Robber,

    /// Evaluate a trade offer:
    /// `offer from <n> to <a,b,..> give <c,w,s,o,wh> get <c,w,s,o,wh>`.
    Offer(OfferArgs),

    /// The agent's turn ended.
    NewTurn,

    /// The agent computed a new building plan.
    NewPlan,

    /// Terminate the agent process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();

    match tokens[0] {
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "robber" => Some(Command::Robber),
        "newturn" => Some(Command::NewTurn),
        "newplan" => Some(Command::NewPlan),

        "setoption" => parse_setoption(&tokens),
        "position" => parse_position(trimmed),
        "setplayer" => parse_setplayer(&tokens),
        "offer" => parse_offer(&tokens),

        other => {
            warn!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                warn!("malformed setoption: empty name");
                return None;
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `position <json>`; the snapshot is everything after the keyword.
fn parse_position(line: &str) -> Option<Command> {
    let json = line.strip_prefix("position").unwrap_or("").trim();
    if json.is_empty() {
        warn!("malformed position: expected 'position <json>'");
        return None;
    }
    Some(Command::Position {
        json: json.to_string(),
    })
}

/// Parses `setplayer <n>`.
fn parse_setplayer(tokens: &[&str]) -> Option<Command> {
    let Some(arg) = tokens.get(1) else {
        warn!("malformed setplayer: expected 'setplayer <n>'");
        return None;
    };
    match arg.parse::<usize>() {
        Ok(slot) => Some(Command::SetPlayer { slot }),
        Err(_) => {
            warn!("invalid player number: '{}'", arg);
            None
        }
    }
}

/// Parses `offer from <n> to <a,b,..> give <csv> get <csv>` (keys in any order).
fn parse_offer(tokens: &[&str]) -> Option<Command> {
    let mut from = None;
    let mut to = None;
    let mut give = None;
    let mut get = None;

    let mut i = 1;
    while i < tokens.len() {
        let key = tokens[i];
        let Some(&value) = tokens.get(i + 1) else {
            warn!("offer: missing value for '{}'", key);
            return None;
        };
        match key {
            "from" => match value.parse::<usize>() {
                Ok(v) => from = Some(v),
                Err(_) => {
                    warn!("offer: invalid proposer '{}'", value);
                    return None;
                }
            },
            "to" => {
                let parsed: Result<Vec<usize>, _> =
                    value.split(',').map(|s| s.trim().parse::<usize>()).collect();
                match parsed {
                    Ok(v) => to = Some(v),
                    Err(_) => {
                        warn!("offer: invalid recipients '{}'", value);
                        return None;
                    }
                }
            }
            "give" | "get" => match ResourceSet::from_csv(value) {
                Ok(set) if key == "give" => give = Some(set),
                Ok(set) => get = Some(set),
                Err(e) => {
                    warn!("offer: bad {} set: {}", key, e);
                    return None;
                }
            },
            other => {
                warn!("offer: unknown field '{}'", other);
                return None;
            }
        }
        i += 2;
    }

    match (from, to, give, get) {
        (Some(from), Some(to), Some(give), Some(get)) => Some(Command::Offer(OfferArgs {
            from,
            to,
            give,
            get,
        })),
        _ => {
            warn!("malformed offer: expected 'offer from <n> to <a,..> give <csv> get <csv>'");
            None
        }
    }
}
