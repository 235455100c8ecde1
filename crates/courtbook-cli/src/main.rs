//! `courtbook`: terminal console for a team's bookings, members and settings.
//!
//! # Usage
//!
//! ```
//! courtbook --url https://admin.example/api --token $TOKEN
//! courtbook --config ~/.config/courtbook/config.toml
//! courtbook --demo --log-file /tmp/courtbook.log
//! ```

mod app;
mod client;
mod config;
mod ui;

use std::{fs::File, io, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::{App, DataSource};
use clap::Parser;
use client::ApiClient;
use config::{Args, BUNDLED_BOOKINGS, ConfigFile, Settings, SourceSetting};
use courtbook_core::source::StaticSource;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg = match &args.config {
    Some(path) => ConfigFile::load(path)?,
    None => ConfigFile::default(),
  };
  let settings = config::resolve(args, file_cfg);

  init_tracing(&settings)?;

  let source = open_source(&settings)?;
  let mut app = App::new(source);
  app.reload_bookings();

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

/// Send logs to `--log-file` if given; the terminal belongs to the UI.
fn init_tracing(settings: &Settings) -> Result<()> {
  let writer = match &settings.log_file {
    Some(path) => {
      let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
      BoxMakeWriter::new(Mutex::new(file))
    }
    None => BoxMakeWriter::new(io::sink),
  };

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(writer)
    .init();
  Ok(())
}

fn open_source(settings: &Settings) -> Result<DataSource> {
  let source = match &settings.source {
    SourceSetting::Remote(api) => {
      tracing::info!(url = %api.base_url, authenticated = api.token.is_some(), "using admin API");
      DataSource::Remote(ApiClient::new(api.clone())?)
    }
    SourceSetting::File(path) => {
      tracing::info!(path = %path.display(), "using local booking file");
      let source = StaticSource::from_path(path)
        .with_context(|| format!("reading bookings from {}", path.display()))?;
      DataSource::Static(source)
    }
    SourceSetting::Bundled => {
      tracing::info!("using bundled sample bookings");
      DataSource::Static(
        StaticSource::from_json(BUNDLED_BOOKINGS).context("parsing bundled bookings")?,
      )
    }
  };
  Ok(source)
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.drain_fetched();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key) {
          break;
        }
      }
      // Resize and everything else: the next iteration redraws.
      _ => {}
    }
  }

  Ok(())
}
