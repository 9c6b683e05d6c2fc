use crate::fake_server::FakeServer;

use std::net::TcpListener;
use std::process::{Command, Output};

use cycles_patrol::prelude::*;
use tracing::{Level, Metadata};
use tracing_subscriber::{
    fmt,
    layer::{Context, Filter, SubscriberExt},
    Layer, Registry,
};


struct CustomLevelFilter;
impl<S> Filter<S> for CustomLevelFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        meta.level() <= &Level::INFO
    }
}

fn init_test_logger() {
    let format = fmt::format()
        .without_time()
        .with_ansi(false)
        .with_level(true)
        .with_target(false);

    let reg = Registry::default().with(
        fmt::layer()
            .with_test_writer()
            .event_format(format)
            .with_filter(CustomLevelFilter),
    );

    let _ = tracing::subscriber::set_global_default(reg);
}

fn laura_at(x: i32, y: i32) -> Player {
    Player::new(1, "laura", Position::new(x, y))
}

fn run_binary(port: u16, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cycles-patrol"))
        .args(args)
        .env("CYCLES_HOST", "127.0.0.1")
        .env("CYCLES_PORT", port.to_string())
        .env("CYCLES_LOG", "false")
        .output()
        .expect("could not launch the agent")
}

fn boxed_in_board() -> GameState {
    let me = laura_at(10, 10);
    Direction::ALL
        .into_iter()
        .fold(GameState::empty(20, 20).with_player(me.clone()), |s, d| {
            s.with_cell(me.position.step(d), 2)
        })
}

#[test]
fn survives_a_match_on_an_open_board() {
    init_test_logger();

    let board = GameState::empty(40, 30)
        .with_player(laura_at(20, 15))
        .with_player(Player::new(2, "bob", Position::new(5, 5)));
    let server = FakeServer::simulate(board, "laura", 120);

    let connection = Connection::connect(&server.config(), "laura").unwrap();
    let mut bot = BotClient::new(connection, "laura");
    bot.run().unwrap();

    let log = server.join();
    assert_eq!(log.hello, "name laura\n");
    assert_eq!(log.crashed_at, None);
    assert_eq!(log.moves.len(), 120);
    // west would close the first square on the spawn cell, so the fallback takes east
    use Direction::*;
    assert_eq!(log.moves[..4], [North, East, South, East]);
}

#[test]
fn stays_deterministic_across_matches() {
    init_test_logger();

    let play = || {
        let board = GameState::empty(30, 30)
            .with_player(laura_at(12, 14))
            .with_cell(Position::new(15, 12), 2)
            .with_cell(Position::new(9, 17), 2);
        let server = FakeServer::simulate(board, "laura", 80);
        let connection = Connection::connect(&server.config(), "laura").unwrap();
        let result = BotClient::new(connection, "laura").run();
        (result.is_ok(), server.join().moves)
    };

    let first = play();
    assert!(first.1.len() > 10);
    assert_eq!(play(), first);
}

#[test]
fn binary_exits_cleanly_when_server_closes() {
    let me = laura_at(10, 10);
    let snapshots = vec![
        GameState::empty(20, 20).with_player(me.clone()),
        GameState::empty(20, 20).with_player(laura_at(10, 9)).with_frame(1),
    ];
    let server = FakeServer::replay(snapshots);

    let output = run_binary(server.port, &["laura"]);

    let log = server.join();
    assert!(output.status.success(), "{output:?}");
    assert_eq!(log.moves, vec![Direction::North, Direction::East]);
}

#[test]
fn binary_fails_when_boxed_in() {
    let server = FakeServer::replay(vec![boxed_in_board()]);

    let output = run_binary(server.port, &["laura"]);

    let log = server.join();
    assert!(!output.status.success());
    assert!(log.moves.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("no valid moves").count(), 1, "{stderr}");
    assert!(stderr.contains("laura: no valid moves available from (10, 10)"), "{stderr}");
}

#[test]
fn binary_fails_without_name() {
    let output = run_binary(1, &[]);
    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
}

#[test]
fn binary_fails_when_server_is_unreachable() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let output = run_binary(port, &["laura"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("connection failed"), "{stderr}");
}
