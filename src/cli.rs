use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Cubic seasonal calendar.
#[derive(Parser)]
#[command(
    name = "cubic-calendar",
    version,
    about = "Solar-seasonal calendar aligned with equinoxes, solstices and local sunrise"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Latitude used to derive sunrise and sunset (default: Sydney).
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Longitude used to derive sunrise and sunset (default: Sydney).
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// IANA time zone used when displaying times (default: system local).
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// Show the date at this time (RFC 3339, or ISO 8601 without offset in
    /// the display time zone) instead of now.
    #[arg(short, long, global = true)]
    pub time: Option<String>,

    /// First day of year 1, a Sunday (YYYY-MM-DD).
    #[arg(long, global = true)]
    pub epoch: Option<String>,

    /// Subcommand to run; without one, the date and a year of calendar.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Show the date and when the day begins and ends.
    Today,
    /// Show the date and a calendar, with '*' marking a solstice or equinox.
    Calendar(CalendarArgs),
    /// Show the season layouts of a year.
    Seasons(SeasonsArgs),
}

/// Arguments for the `calendar` subcommand.
#[derive(clap::Args)]
pub struct CalendarArgs {
    /// Number of blocks (months or holidays) to display.
    #[arg(short, long)]
    pub blocks: Option<usize>,
}

/// Arguments for the `seasons` subcommand.
#[derive(clap::Args)]
pub struct SeasonsArgs {
    /// Calendar year (default: the current one).
    #[arg(short, long)]
    pub year: Option<u32>,
}
