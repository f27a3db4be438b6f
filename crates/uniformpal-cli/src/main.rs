//! `uniformpal`: terminal client for the UniformPal school-uniform catalog.
//!
//! # Usage
//!
//! ```
//! uniformpal
//! uniformpal --profile production
//! uniformpal --url http://localhost:5000 --log-file uniformpal.log
//! uniformpal --config ~/.config/uniformpal/config.toml
//! ```

mod app;
mod client;
mod command;
mod config;
mod events;
mod notice;
mod surface;
mod ui;

#[cfg(test)]
mod tests;

use std::{
  fs::OpenOptions,
  io,
  path::PathBuf,
  sync::{Arc, Mutex},
  time::{Duration, Instant},
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use command::{Dispatcher, Outcome};
use config::{ConfigFile, Profile};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "uniformpal", about = "Terminal client for the UniformPal uniform catalog")]
struct Args {
  /// Path to a TOML config file (url, log_file).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the backend; overrides the config file and profile.
  #[arg(long, env = "UNIFORMPAL_URL")]
  url: Option<String>,

  /// Deployment profile used when no URL is given.
  #[arg(long, value_enum, env = "UNIFORMPAL_PROFILE", default_value_t = Profile::Development)]
  profile: Profile,

  /// Write logs to this file. The terminal is owned by the UI, so logs are
  /// discarded when unset.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg = match &args.config {
    Some(path) => ConfigFile::load(path)?,
    None => ConfigFile::default(),
  };

  init_tracing(args.log_file.as_ref().or(file_cfg.log_file.as_ref()))?;

  let base_url = config::resolve_base_url(args.url, &file_cfg, args.profile);
  tracing::info!(%base_url, profile = ?args.profile, "starting uniformpal");

  let client = ApiClient::new(ApiConfig {
    base_url: base_url.clone(),
  })?;
  let (dispatcher, outcomes) = Dispatcher::new(Arc::new(client));
  let mut app = App::new(base_url);
  app.start();

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app, &dispatcher, outcomes).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
  let writer = match log_file {
    Some(path) => {
      let file = OpenOptions::new()
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

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  dispatcher: &Dispatcher<ApiClient>,
  mut outcomes: UnboundedReceiver<Outcome>,
) -> Result<()> {
  loop {
    dispatcher.dispatch_all(app.take_commands());

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    let now = Instant::now();
    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key, now) {
          break;
        }
      }
      // Resize and everything else redraw on the next iteration.
      _ => {}
    }

    // Fold in whatever finished while we were waiting.
    while let Ok(outcome) = outcomes.try_recv() {
      app.apply(outcome, now);
    }
    app.tick(now);
  }

  Ok(())
}
