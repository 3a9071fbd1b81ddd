//! Integration tests for the settlers-oracle binary.
//!
//! Spawns the agent process, sends host commands via stdin, and checks the
//! lines it writes to stdout.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

use settlers_oracle::stub::{StubReply, StubService};

/// Sends a sequence of commands to the agent and collects stdout lines.
fn run_agent(commands: &[&str]) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_settlers-oracle");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start settlers-oracle");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        writeln!(stdin, "{}", cmd).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

/// Four seats, five land tiles, robber on the desert at 0x51.
const POSITION: &str = concat!(
    "position {\"max_players\":4,",
    "\"land_tiles\":[{\"coord\":81,\"number\":0},{\"coord\":82,\"number\":6},",
    "{\"coord\":83,\"number\":9},{\"coord\":84,\"number\":4},{\"coord\":85,\"number\":11}],",
    "\"pieces\":[{\"kind\":\"settlement\",\"owner\":0,\"adjacent_hexes\":[82]},",
    "{\"kind\":\"city\",\"owner\":3,\"adjacent_hexes\":[83,84]}],",
    "\"robber_hex\":81,",
    "\"players\":[{\"resources\":{\"wood\":2,\"sheep\":1,\"ore\":1},\"public_vp\":3,\"total_vp\":4},",
    "{\"public_vp\":2},{\"public_vp\":2},{\"public_vp\":5,\"unplayed_dev_cards\":1}]}"
);

#[test]
fn isready_response() {
    let lines = run_agent(&["isready", "quit"]);
    assert_eq!(lines, vec!["readyok".to_string()]);
}

#[test]
fn unknown_commands_are_ignored() {
    let lines = run_agent(&["foobar", "", "setoption name Threads value 4", "isready", "quit"]);
    assert_eq!(lines, vec!["readyok".to_string()]);
}

#[test]
fn robber_without_position_prints_nothing() {
    let lines = run_agent(&["setplayer 0", "robber", "isready", "quit"]);
    assert_eq!(lines, vec!["readyok".to_string()]);
}

#[test]
fn local_robber_blocks_opponent_city() {
    let lines = run_agent(&[
        "setoption name TileStrategy value local",
        POSITION,
        "setplayer 0",
        "robber",
        "quit",
    ]);
    // Seat 3's city on the 9 outscores it on the 4.
    assert_eq!(lines, vec!["moverobber 0x53".to_string()]);
}

#[test]
fn offloaded_robber_uses_service_reply() {
    let stub = StubService::spawn(|_| StubReply::Index(4)).unwrap();
    let endpoint = format!("setoption name Endpoint value {}", stub.endpoint());
    let lines = run_agent(&[&endpoint, POSITION, "setplayer 0", "robber", "quit"]);
    assert_eq!(lines, vec!["moverobber 0x55".to_string()]);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("robber|0,6,9,4,11|0,1,0,0,0|"));
}

#[test]
fn unreachable_service_falls_back_to_first_tile() {
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let endpoint = format!("setoption name Endpoint value 127.0.0.1:{}", port);
    let lines = run_agent(&[
        &endpoint,
        "setoption name TimeoutMs value 500",
        POSITION,
        "setplayer 0",
        "robber",
        "quit",
    ]);
    assert_eq!(lines, vec!["moverobber 0x51".to_string()]);
}

#[test]
fn local_trade_session() {
    let lines = run_agent(&[
        POSITION,
        "setplayer 0",
        "offer from 1 to 0 give 0,0,0,0,1 get 0,1,0,0,0",
        "offer from 1 to 0 give 0,0,0,0,1 get 0,1,0,0,0",
        "offer from 1 to 0 give 0,0,0,0,1 get 0,1,0,0,0",
        "offer from 1 to 0 give 0,0,0,0,1 get 0,1,0,0,0",
        "newturn",
        "offer from 1 to 0 give 0,0,0,0,1 get 0,1,0,0,0",
        "offer from 2 to 0 give 0,0,0,0,1 get 0,0,1,0,0",
        "offer from 2 to 1,3 give 1,0,0,0,0 get 0,0,0,0,1",
        "quit",
    ]);
    assert_eq!(
        lines,
        vec![
            "offerverdict reject",
            "offerverdict reject",
            "offerverdict reject",
            "offerverdict accept",
            "offerverdict reject",
            "offerverdict accept",
            "offerverdict ignore",
        ]
    );
}

#[test]
fn offloaded_trade_uses_service_line() {
    let stub = StubService::spawn(|req| {
        if req.starts_with("trade|") {
            StubReply::Line("0".to_string())
        } else {
            StubReply::Hangup
        }
    })
    .unwrap();
    let endpoint = format!("setoption name Endpoint value {}", stub.endpoint());
    let lines = run_agent(&[
        &endpoint,
        "setoption name TradeStrategy value offload",
        POSITION,
        "setplayer 0",
        "offer from 3 to 0 give 1,0,0,0,0 get 0,1,0,0,0",
        "quit",
    ]);
    assert_eq!(lines, vec!["offerverdict reject".to_string()]);
    assert_eq!(
        stub.requests(),
        vec!["trade|3|5|0,2,1,1,0|0,0,0,0,0|0,1,0,0,0|1,0,0,0,0".to_string()]
    );
}
