//! Stand-in decision service for local play and manual testing.
//!
//! Answers robber requests with a random tile index and trade requests with
//! a random verdict line.
//!
//! Usage:
//!   cargo run --bin policy-stub -- [OPTIONS]
//!
//! Options:
//!   --port N          Port to listen on (default: 2004)
//!   --seed N          Random seed, 0 for entropy (default: 0)
//!   --accept-rate P   Probability of accepting a trade (default: 0.5)

use std::env;
use std::net::TcpListener;
use std::process;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;

use tracing::{error, info};

use settlers_oracle::logging;
use settlers_oracle::stub::{serve, RandomPolicy};

struct StubArgs {
    port: u16,
    seed: u64,
    accept_rate: f64,
}

fn value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).and_then(|v| v.parse().ok()) {
        Some(v) => v,
        None => {
            error!("invalid {} value", flag);
            print_usage();
            process::exit(1);
        }
    }
}

fn parse_args() -> StubArgs {
    let args: Vec<String> = env::args().collect();
    let mut parsed = StubArgs {
        port: 2004,
        seed: 0,
        accept_rate: 0.5,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                i += 1;
                parsed.port = value(&args, i, "--port");
            }
            "--seed" => {
                i += 1;
                parsed.seed = value(&args, i, "--seed");
            }
            "--accept-rate" => {
                i += 1;
                parsed.accept_rate = value(&args, i, "--accept-rate");
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                error!("unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }
    parsed
}

fn print_usage() {
    eprintln!("Usage: policy-stub [--port N] [--seed N] [--accept-rate P]");
}

fn main() {
    logging::init();
    let args = parse_args();

    let listener = match TcpListener::bind(("0.0.0.0", args.port)) {
        Ok(l) => l,
        Err(e) => {
            error!("cannot bind port {}: {}", args.port, e);
            process::exit(1);
        }
    };
    info!(port = args.port, seed = args.seed, accept_rate = args.accept_rate, "policy stub listening");

    let mut policy = RandomPolicy::new(args.seed, args.accept_rate);
    let stop = AtomicBool::new(false);
    serve(&listener, &stop, |req| policy.respond(req), None);
}
