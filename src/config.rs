use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use cubic_calendar::Location;

/// Optional TOML configuration; command-line flags take precedence.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// IANA name; the system local zone if unset.
    #[serde(default)]
    pub timezone: Option<String>,
    /// `YYYY-MM-DD`; the default epoch of the hemisphere if unset.
    #[serde(default)]
    pub epoch: Option<String>,
    /// Blocks shown by the calendar.
    #[serde(default = "default_blocks")]
    pub blocks: usize,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone: None,
            epoch: None,
            blocks: default_blocks(),
        }
    }
}

fn default_latitude() -> f64 {
    Location::SYDNEY.latitude
}
fn default_longitude() -> f64 {
    Location::SYDNEY.longitude
}
/// A year: three months and a holiday for each season.
fn default_blocks() -> usize {
    16
}

impl CalendarConfig {
    /// Reads `path`, or returns the defaults without one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }
}
