use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use cycles_patrol::{init_logger, prelude::*};

/// Square-patrol agent for the Cycles game.
///
/// The server address is read from `CYCLES_HOST` and `CYCLES_PORT`.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Name to register with the game server
    #[arg(value_parser = parse_bot_name)]
    name: String,
}

fn parse_bot_name(name: &str) -> Result<String, String> {
    if name.trim().is_empty() {
        return Err("bot name must not be blank".to_owned());
    }
    if name.contains(['\n', '\r']) {
        return Err("bot name must fit on one line".to_owned());
    }
    Ok(name.to_owned())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Configuration::from_env();

    if let Err(e) = init_logger(&config, &cli.name) {
        eprintln!("{}: {e:#}", cli.name);
        return ExitCode::FAILURE;
    }

    let connection = match Connection::connect(&config, &cli.name) {
        Ok(connection) => connection,
        Err(e) => {
            error!("{}: connection failed: {e:#}", cli.name);
            return ExitCode::FAILURE;
        }
    };

    // the connection is dropped with the bot, before the exit code is returned
    let result = BotClient::new(connection, cli.name.as_str()).run();
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}: {e:#}", cli.name);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn bot_name_rules() {
        assert_eq!(parse_bot_name("laura"), Ok("laura".to_owned()));
        assert!(parse_bot_name("the other one").is_ok());
        assert!(parse_bot_name("   ").is_err());
        assert!(parse_bot_name("two\nlines").is_err());
    }
}
