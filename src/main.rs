//! rpager - a pager for huge and growing files.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use rpager::content::{open_content, open_stdin};
use rpager::logger::{FacadeLog, SharedLog};
use rpager::Config;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("rpager")
        .version(rpager::VERSION)
        .about("A terminal pager for huge and growing files")
        .long_about(
            "rpager shows any part of a file far larger than memory, follows it while it \
             grows, and searches it in the background without blocking the display. \
             Reads standard input when FILE is '-' or omitted with piped input.",
        )
        .arg(
            Arg::new("file")
                .help("File to view, or '-' for standard input")
                .index(1)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("wrap")
                .long("wrap")
                .short('w')
                .help("Start with long lines wrapped")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-follow")
                .long("no-follow")
                .help("Do not poll the file for new data")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tab-width")
                .long("tab-width")
                .value_name("COLUMNS")
                .help("Columns per tab stop")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("settle-ms")
                .long("settle-ms")
                .value_name("MILLIS")
                .help("Pause after each terminal write")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("chunk-size")
                .long("chunk-size")
                .value_name("BYTES")
                .help("Backward reader chunk size")
                .value_parser(value_parser!(usize)),
        )
}

fn apply_overrides(mut config: Config, matches: &clap::ArgMatches) -> Config {
    if matches.get_flag("wrap") {
        config.wrap = true;
    }
    if matches.get_flag("no-follow") {
        config.follow = false;
    }
    if let Some(&width) = matches.get_one::<usize>("tab-width") {
        config.tab_width = width;
    }
    if let Some(&millis) = matches.get_one::<u64>("settle-ms") {
        config.settle_delay_ms = millis;
    }
    if let Some(&bytes) = matches.get_one::<usize>("chunk-size") {
        config.backward_chunk_size = bytes;
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let matches = cli().get_matches();
    let config = apply_overrides(Config::load()?, &matches).validated()?;

    let path = matches.get_one::<PathBuf>("file");
    let content = match path {
        Some(path) if path.as_os_str() != "-" => open_content(path)
            .await
            .with_context(|| format!("cannot open {}", path.display()))?,
        Some(_) => open_stdin(),
        None if !std::io::stdin().is_terminal() => open_stdin(),
        None => anyhow::bail!("missing FILE (or pipe data to standard input)"),
    };

    let log: SharedLog = Arc::new(FacadeLog);
    rpager::app::run(content, config, log).await?;
    Ok(())
}
