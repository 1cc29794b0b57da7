mod cli;
mod commands;
mod config;
mod logging;
mod settings;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::CalendarConfig;
use crate::settings::Settings;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = CalendarConfig::load(cli.config.as_deref())?;
    let settings = Settings::resolve(cli, config)?;
    match &cli.command {
        None => commands::calendar(&settings, None),
        Some(Command::Today) => commands::today(&settings),
        Some(Command::Calendar(args)) => commands::calendar(&settings, args.blocks),
        Some(Command::Seasons(args)) => commands::seasons(&settings, args.year),
    }
}
