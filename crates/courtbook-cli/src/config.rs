//! Command-line arguments, the optional TOML config file, and how the two
//! are merged.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::client::ApiConfig;

/// Sample bookings shipped with the binary, used by `--demo`.
pub const BUNDLED_BOOKINGS: &str = include_str!("../data/bookings.json");

const DEFAULT_URL: &str = "http://localhost:8080/api";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug, Default)]
#[command(name = "courtbook", about = "Terminal console for team bookings and members")]
pub struct Args {
  /// Path to a TOML config file (url, token, data, log_file).
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Base URL of the admin API (default: http://localhost:8080/api).
  #[arg(long, env = "COURTBOOK_URL")]
  pub url: Option<String>,

  /// Bearer token sent with every API request.
  #[arg(long, env = "COURTBOOK_TOKEN", hide_env_values = true)]
  pub token: Option<String>,

  /// Read bookings from a local JSON file instead of the API.
  #[arg(long, value_name = "FILE", conflicts_with = "demo")]
  pub data: Option<PathBuf>,

  /// Use the bundled sample bookings.
  #[arg(long)]
  pub demo: bool,

  /// Write logs to this file (the terminal is taken by the UI).
  #[arg(long, value_name = "FILE")]
  pub log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
pub struct ConfigFile {
  #[serde(default)]
  pub url:      String,
  #[serde(default)]
  pub token:    String,
  #[serde(default)]
  pub data:     Option<PathBuf>,
  #[serde(default)]
  pub log_file: Option<PathBuf>,
}

impl ConfigFile {
  pub fn load(path: &std::path::Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

// ─── Resolved settings ────────────────────────────────────────────────────────

/// Where the booking list comes from.
#[derive(Debug, Clone)]
pub enum SourceSetting {
  /// The admin API; members and team settings are available too.
  Remote(ApiConfig),
  /// A local JSON file of bookings.
  File(PathBuf),
  /// [`BUNDLED_BOOKINGS`].
  Bundled,
}

#[derive(Debug, Clone)]
pub struct Settings {
  pub source:   SourceSetting,
  pub log_file: Option<PathBuf>,
}

/// CLI flags override the config file, which overrides defaults.
pub fn resolve(args: Args, file: ConfigFile) -> Settings {
  let non_empty = |s: String| (!s.is_empty()).then_some(s);

  let source = if args.demo {
    SourceSetting::Bundled
  } else if let Some(path) = args.data.or(file.data) {
    SourceSetting::File(path)
  } else {
    SourceSetting::Remote(ApiConfig {
      base_url: args
        .url
        .or_else(|| non_empty(file.url))
        .unwrap_or_else(|| DEFAULT_URL.to_string()),
      token:    args.token.or_else(|| non_empty(file.token)),
    })
  };

  Settings {
    source,
    log_file: args.log_file.or(file.log_file),
  }
}
