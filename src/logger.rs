use std::fs::File;

use anyhow::Context;
use time::{
    format_description::{self, parse},
    OffsetDateTime,
};
use tracing::{subscriber::set_global_default, Level};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, FmtSubscriber};

use crate::configuration::Configuration;

/// Installs the global tracing subscriber for the agent named `name`.
///
/// Logs go to stderr, or to `<timestamp>_<name>_log.txt` in the working directory when file
/// logging is enabled.
pub fn init_logger(config: &Configuration, name: &str) -> anyhow::Result<()> {
    let (writer, ansi) = if config.log {
        let file_name = get_log_file_name(name)?;
        let file = File::create(&file_name)
            .with_context(|| format!("could not create log file '{file_name}'"))?;
        (BoxMakeWriter::new(file), false)
    } else {
        (BoxMakeWriter::new(std::io::stderr), true)
    };

    let local_offset =
        time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = tracing_subscriber::fmt::time::OffsetTime::new(
        local_offset,
        format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
            .context("invalid timestamp format")?,
    );

    let level = if config.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(ansi)
        .with_target(false)
        .with_timer(timer)
        .with_writer(writer)
        .finish();

    set_global_default(subscriber).context("a global tracing subscriber is already set")
}

fn get_log_file_name(name: &str) -> anyhow::Result<String> {
    let format = parse("[year]-[month]-[day]_[hour]-[minute]-[second]")
        .context("invalid log file name format")?;
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let stamp = now.format(&format).context("could not format log file name")?;
    let name = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    Ok(format!("{stamp}_{name}_log.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_name_is_sanitized() {
        let file_name = get_log_file_name("my bot/1").unwrap();
        assert!(file_name.ends_with("_my_bot_1_log.txt"), "{file_name}");
        assert!(!file_name.contains(' '));
    }
}
