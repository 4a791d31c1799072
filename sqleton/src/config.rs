//! Configuration handling for sqleton
//!
//! Options come from three layers: built-in defaults, an optional TOML file
//! and the command line. [`RenderConfig`] holds the raw, unvalidated values of
//! a layer; [`RenderOptions`] is the validated result the renderer consumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Font used when none is configured
pub const DEFAULT_FONT: &str = "Helvetica";

/// Load configuration from a TOML file
pub fn load_from_file(path: &str) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("Failed to read config file: {}", e)))?;

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;

    Ok(config)
}

/// Represents the complete sqleton configuration
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub render: RenderConfig,
    pub logging: Option<LoggingConfig>,
}

/// Database connection configuration
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub pool_size: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

/// Rendering options as written in a config file or on the command line
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub layout: Option<String>,
    pub direction: Option<String>,
    pub font: Option<String>,
    pub title: Option<String>,
    pub edge_labels: Option<bool>,
    pub skip_index: Option<bool>,
}

impl RenderConfig {
    /// Layer `overrides` on top of `self`; values set in `overrides` win
    pub fn merge(self, overrides: RenderConfig) -> RenderConfig {
        RenderConfig {
            layout: overrides.layout.or(self.layout),
            direction: overrides.direction.or(self.direction),
            font: overrides.font.or(self.font),
            title: overrides.title.or(self.title),
            edge_labels: overrides.edge_labels.or(self.edge_labels),
            skip_index: overrides.skip_index.or(self.skip_index),
        }
    }
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Graphviz layout engines the rendered document can be piped through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    Neato,
    Dot,
    Circo,
    #[default]
    Fdp,
    Osage,
    Sfdp,
    Twopi,
}

impl Layout {
    pub const ALL: [Layout; 7] = [
        Layout::Neato,
        Layout::Dot,
        Layout::Circo,
        Layout::Fdp,
        Layout::Osage,
        Layout::Sfdp,
        Layout::Twopi,
    ];

    /// Name of the Graphviz executable for this layout
    pub fn command(&self) -> &'static str {
        match self {
            Layout::Neato => "neato",
            Layout::Dot => "dot",
            Layout::Circo => "circo",
            Layout::Fdp => "fdp",
            Layout::Osage => "osage",
            Layout::Sfdp => "sfdp",
            Layout::Twopi => "twopi",
        }
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Layout::ALL
            .into_iter()
            .find(|layout| layout.command() == s)
            .ok_or_else(|| Error::UnsupportedOptionError(format!("unknown layout: '{}'", s)))
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Rank direction of the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    TopBottom,
    #[default]
    LeftRight,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::TopBottom => "TB",
            Direction::LeftRight => "LR",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "TB" => Ok(Direction::TopBottom),
            "LR" => Ok(Direction::LeftRight),
            _ => Err(Error::UnsupportedOptionError(format!(
                "unknown direction: '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated options for a single render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub layout: Layout,
    pub direction: Direction,
    pub font: Option<String>,
    pub title: Option<String>,
    pub edge_labels: bool,
    pub skip_index: bool,
}

impl RenderOptions {
    /// Font name, falling back to [`DEFAULT_FONT`] when unset or empty
    pub fn font(&self) -> &str {
        non_empty(self.font.as_deref()).unwrap_or(DEFAULT_FONT)
    }

    /// Title, falling back to `fallback` when unset or empty
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_empty(self.title.as_deref()).unwrap_or(fallback)
    }
}

impl TryFrom<RenderConfig> for RenderOptions {
    type Error = Error;

    fn try_from(config: RenderConfig) -> Result<Self> {
        let layout = match non_empty(config.layout.as_deref()) {
            Some(layout) => layout.parse()?,
            None => Layout::default(),
        };
        let direction = match non_empty(config.direction.as_deref()) {
            Some(direction) => direction.parse()?,
            None => Direction::default(),
        };

        Ok(RenderOptions {
            layout,
            direction,
            font: config.font,
            title: config.title,
            edge_labels: config.edge_labels.unwrap_or(false),
            skip_index: config.skip_index.unwrap_or(false),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
