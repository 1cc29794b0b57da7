//! What each subcommand prints.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use tracing::info;

use cubic_calendar::Day;
use cubic_calendar::cubic::fmt;

use crate::settings::Settings;

/// The date at the requested time and the bounds of its day.
pub fn today(settings: &Settings) -> Result<()> {
    let (text, _) = header(settings)?;
    print!("{text}");
    Ok(())
}

/// The date, then `blocks` months and holidays from the current one.
pub fn calendar(settings: &Settings, blocks: Option<usize>) -> Result<()> {
    print!("{}", calendar_text(settings, blocks.unwrap_or(settings.blocks))?);
    Ok(())
}

/// The season layouts of calendar year `year`, by default the current one.
pub fn seasons(settings: &Settings, year: Option<u32>) -> Result<()> {
    print!("{}", seasons_text(settings, year)?);
    Ok(())
}

fn header(settings: &Settings) -> Result<(String, Day)> {
    let calendar = &settings.calendar;
    let zone = &settings.zone;
    let day = calendar
        .find_day(settings.time)
        .with_context(|| format!("failed to convert {} to a date", zone.format(&settings.time)))?;
    let (start, end) = calendar
        .day_bounds(day.gregorian)
        .with_context(|| format!("failed to find when {} begins", day.gregorian))?;
    info!(date = %fmt::short(&day.date), gregorian = %day.gregorian, "found day");

    let mut out = String::new();
    if settings.explicit_time {
        writeln!(out, "{} is {}.", zone.format(&settings.time), day.date)?;
    } else {
        writeln!(out, "It is now {}.", day.date)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "The day begins at {} and ends at {}.",
        zone.format(&start),
        zone.format(&end)
    )?;
    if let Some(event) = day.solar_event {
        writeln!(
            out,
            "The {} falls on this day, at {}.",
            event.kind,
            zone.format(&event.time)
        )?;
    }
    if day.is_leap_week() {
        writeln!(out, "This is a leap week.")?;
    }
    Ok((out, day))
}

fn calendar_text(settings: &Settings, blocks: usize) -> Result<String> {
    let (mut out, day) = header(settings)?;
    out.push('\n');
    let grid = fmt::blocks(
        &settings.calendar,
        day.date.year,
        day.date.block(),
        blocks,
        Some(&day),
    )
    .context("failed to lay out the calendar")?;
    out.push_str(&grid);
    Ok(out)
}

fn seasons_text(settings: &Settings, year: Option<u32>) -> Result<String> {
    let calendar = &settings.calendar;
    let year = match year {
        Some(year) => year,
        None => {
            calendar
                .find_day(settings.time)
                .context("failed to find the current year")?
                .date
                .year
        }
    };
    let grid = calendar
        .year(year)
        .with_context(|| format!("failed to lay out year {year}"))?;

    let mut out = String::new();
    writeln!(out, "Year {year}, from {}", calendar.location())?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<7} {:<11} {:<11} {:<18} {:<17} {:<17} Leap week",
        "Season", "Starts", "Holiday", "Closing event", "At", "Threshold"
    )?;
    for layout in grid.seasons() {
        writeln!(
            out,
            "{:<7} {:<11} {:<11} {:<18} {:<17} {:<17} {}",
            layout.season.name(),
            layout.start.iso_gregorian(),
            layout.holiday_start().iso_gregorian(),
            layout.closing_event.kind.name(),
            settings.zone.format(&layout.closing_event.time),
            settings.zone.format(&layout.threshold),
            if layout.has_leap_week() { "yes" } else { "no" }
        )?;
    }
    Ok(out)
}
