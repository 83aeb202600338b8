//! `rollcall`: terminal client for the Rollcall attendance service.
//!
//! # Usage
//!
//! ```
//! rollcall --url http://localhost:8080 --user <uuid> lectures --day mon
//! rollcall --config ~/.config/rollcall/config.toml take <lecture-id> TY-A
//! ```

mod app;
mod client;
mod session;
mod ui;

use std::{fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use chrono::Weekday;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rollcall", about = "Terminal client for Rollcall attendance")]
struct Args {
  /// Path to a TOML config file (url, user_id).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the rollcall server (default: http://localhost:8080).
  #[arg(long, env = "ROLLCALL_URL")]
  url: Option<String>,

  /// Your user id, recorded on every mark.
  #[arg(long, env = "ROLLCALL_USER")]
  user: Option<Uuid>,

  /// Write logs to this file (the terminal is owned by the UI).
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List lectures with their status for this week.
  Lectures {
    /// Only lectures taught (or substituted) by this teacher.
    #[arg(long)]
    teacher: Option<Uuid>,
    /// e.g. `mon`.
    #[arg(long)]
    day:     Option<Weekday>,
  },
  /// Take attendance interactively.
  Take {
    lecture_id:  Uuid,
    /// `TY` or `TY-A`.
    class_label: String,
  },
  /// Delete every mark of a lecture.
  Reset { lecture_id: Uuid },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:     String,
  #[serde(default)]
  user_id: Option<Uuid>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  init_tracing(args.log_file.as_deref())?;

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    user_id:  args.user.or(file_cfg.user_id).unwrap_or_default(),
  };
  if api_config.user_id.is_nil() {
    tracing::warn!("no user id configured; marks will be recorded as the nil user");
  }

  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Lectures { teacher, day } => print_lectures(&client, teacher, day).await,
    Command::Reset { lecture_id } => {
      let removed = client.reset(lecture_id).await?;
      println!("removed {removed} marks");
      Ok(())
    }
    Command::Take { lecture_id, class_label } => take(client, lecture_id, class_label).await,
  }
}

fn init_tracing(log_file: Option<&std::path::Path>) -> Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();
  match log_file {
    Some(path) => {
      let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    }
    None => tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(io::sink)
      .init(),
  }
  Ok(())
}

async fn print_lectures(
  client: &ApiClient,
  teacher: Option<Uuid>,
  day: Option<Weekday>,
) -> Result<()> {
  let lectures = client.list_lectures(teacher, day).await?;
  if lectures.is_empty() {
    println!("no lectures");
    return Ok(());
  }
  for view in lectures {
    let l = &view.lecture;
    println!(
      "{}  {} {}-{}  {}  {}-{}  {}",
      l.lecture_id,
      l.schedule.weekday(),
      l.start_time.format("%H:%M"),
      l.end_time.format("%H:%M"),
      l.class_label(),
      l.subject,
      l.syllabus_topic.as_deref().unwrap_or("-"),
      view.status,
    );
  }
  Ok(())
}

// ─── Interactive mode ─────────────────────────────────────────────────────────

async fn take(client: ApiClient, lecture_id: Uuid, class_label: String) -> Result<()> {
  let (tx, mut rx) = mpsc::unbounded_channel();
  let mut app = App::new(client, lecture_id, class_label, tx);
  app.request_roster();

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app, &mut rx).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  outcomes: &mut mpsc::UnboundedReceiver<app::Outcome>,
) -> Result<()> {
  loop {
    while let Ok(outcome) = outcomes.try_recv() {
      app.handle_outcome(outcome);
    }

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key)
    {
      break;
    }
  }

  Ok(())
}
