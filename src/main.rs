//! settlers-oracle -- a Settlers robot decision agent driven over stdin.
//!
//! Reads host commands from stdin and writes `moverobber`, `offerverdict`,
//! and `readyok` lines to stdout. Robber and trade decisions go to the
//! configured decision service; logs go to stderr.
//!
//! Usage:
//!   settlers-oracle [--config FILE]

use std::env;
use std::io::{self, BufRead};
use std::process;

use tracing::{error, info, warn};

use settlers_oracle::config::AgentConfig;
use settlers_oracle::host::Session;
use settlers_oracle::logging;
use settlers_oracle::protocol::parser::{parse_command, Command};

fn load_config() -> AgentConfig {
    let args: Vec<String> = env::args().collect();
    let mut config = AgentConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = match args.get(i) {
                    Some(p) => p,
                    None => {
                        error!("--config needs a path");
                        process::exit(2);
                    }
                };
                config = match AgentConfig::load(path) {
                    Ok(c) => c,
                    Err(e) => {
                        error!("{}: {}", path, e);
                        process::exit(2);
                    }
                };
            }
            "--help" | "-h" => {
                eprintln!("Usage: settlers-oracle [--config FILE]");
                process::exit(0);
            }
            other => {
                error!("unknown argument: {}", other);
                process::exit(2);
            }
        }
        i += 1;
    }
    config
}

/// Runs the host protocol loop until `quit` or end of input.
fn main() {
    logging::init();
    let config = load_config();
    info!(endpoint = %config.endpoint, timeout_ms = config.timeout_ms, "agent starting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut session = Session::new(config);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        let written = match cmd {
            Command::IsReady => session.handle_isready(&mut out),
            Command::SetOption { name, value } => {
                if let Err(e) = session.set_option(&name, value.as_deref()) {
                    warn!("setoption: {}", e);
                }
                Ok(())
            }
            Command::Position { json } => {
                if let Err(e) = session.set_position(&json) {
                    warn!("position: {}", e);
                }
                Ok(())
            }
            Command::SetPlayer { slot } => {
                if let Err(e) = session.set_player(slot) {
                    warn!("setplayer: {}", e);
                }
                Ok(())
            }
            Command::Robber => session.handle_robber(&mut out),
            Command::Offer(args) => session.handle_offer(&args, &mut out),
            Command::NewTurn => {
                session.new_turn();
                Ok(())
            }
            Command::NewPlan => {
                session.new_plan();
                Ok(())
            }
            Command::Quit => break,
        };

        if let Err(e) = written {
            error!("host output closed: {}", e);
            break;
        }
    }
}
