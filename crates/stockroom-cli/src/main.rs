//! `stockroom`: terminal dashboard for a hosted inventory backend.
//!
//! # Usage
//!
//! ```
//! stockroom --url https://project.example.co --anon-key eyJ...
//! stockroom --config ~/.config/stockroom/stockroom.toml
//! ```
//!
//! Settings are resolved from flags (or `STOCKROOM_URL` / `STOCKROOM_ANON_KEY`),
//! then `STOCKROOM_*` environment variables, then the TOML file.

mod app;
mod ui;

use std::{
  fs::OpenOptions,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use stockroom_core::store::{AuthProvider, InventoryStore};
use stockroom_remote::{RemoteConfig, RemoteStore};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "stockroom", about = "Terminal dashboard for a hosted inventory backend")]
struct Args {
  /// Path to a TOML config file (url, anon_key, log_file).
  #[arg(short, long, value_name = "FILE", default_value = "stockroom.toml")]
  config: PathBuf,

  /// Base URL of the backend project.
  #[arg(long, env = "STOCKROOM_URL")]
  url: Option<String>,

  /// Public API key sent with every request.
  #[arg(long, env = "STOCKROOM_ANON_KEY")]
  anon_key: Option<String>,

  /// Where to write logs. The terminal is owned by the UI.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Merged settings from the config file, environment and flags.
#[derive(Deserialize, Default)]
struct Settings {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  anon_key: String,
  #[serde(default)]
  log_file: Option<PathBuf>,
}

fn load_settings(args: &Args) -> Result<Settings> {
  let log_file = args.log_file.as_ref().map(|p| p.display().to_string());
  config::Config::builder()
    .add_source(config::File::from(args.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("STOCKROOM"))
    .set_override_option("url", args.url.clone())?
    .set_override_option("anon_key", args.anon_key.clone())?
    .set_override_option("log_file", log_file)?
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise settings")
}

fn init_tracing(path: &Path) -> Result<()> {
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let settings = load_settings(&args)?;

  let log_path = settings
    .log_file
    .clone()
    .unwrap_or_else(|| std::env::temp_dir().join("stockroom.log"));
  init_tracing(&log_path)?;

  // A missing or malformed backend config is fatal before the UI starts.
  let store = RemoteStore::new(RemoteConfig {
    url:      settings.url,
    anon_key: settings.anon_key,
  })
  .context("invalid backend configuration")?;
  tracing::info!(url = %store.config().url, "starting stockroom");

  let mut app = App::new(store);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop<S>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<S>,
) -> Result<()>
where
  S: InventoryStore + AuthProvider,
{
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // The frame just drawn shows the loading indicator for this action.
    if let Some(pending) = app.take_pending() {
      app.run(pending).await;
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if !app.handle_key(key) {
        break;
      }
    }
  }

  if let Some(session) = app.session.take() {
    if let Err(e) = app.store.sign_out(&session).await {
      tracing::warn!("error signing out on exit: {e}");
    }
  }
  Ok(())
}
