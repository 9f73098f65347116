//! drone-observe CLI: the `drone-observe` command.

mod cli;
mod commands;
mod config;
mod logging;
mod render;

use clap::Parser;
use cli::Cli;
use commands::{CommandContext, EXIT_USAGE};
use config::Config;
use render::Palette;
use std::io::IsTerminal;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();
    logging::init_tracing();

    let config = Config::from_env();
    let colour = !(cli.no_color || config.no_color || cli.json) && std::io::stdout().is_terminal();
    let repo_root = PathBuf::from(&cli.repo_root);
    let context = match CommandContext::new(config, repo_root, cli.json, Palette::new(colour)) {
        Ok(context) => context,
        Err(error) => {
            eprintln!("error: failed to create tokio runtime: {error}");
            std::process::exit(EXIT_USAGE);
        }
    };

    tracing::debug!(command = cli.command.name(), repo_root = %cli.repo_root, "dispatch");
    let code = (cli.command.handler())(&context);
    std::process::exit(code);
}
