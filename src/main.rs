mod app;
mod browser;
mod config;
mod constants;
mod downloader;
mod input;
mod logging;
mod theme;
mod ui;
mod window;

use anyhow::{Context, Result, bail};
use clap::Parser;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use app::App;
use config::Config;
use constants::constants;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Downloader binary to invoke (default: yt-dlp)
  #[arg(long)]
  downloader: Option<String>,

  /// Initial destination directory (default: last used, then the working directory)
  #[arg(short, long)]
  dir: Option<PathBuf>,

  /// Skip the terminal window centering step at startup
  #[arg(long)]
  no_center: bool,
}

fn resolve_download_dir(args: &Args, config: &Config) -> Result<PathBuf> {
  if let Some(dir) = &args.dir {
    if !dir.is_dir() {
      bail!("--dir {} is not a directory", dir.display());
    }
    return Ok(dir.clone());
  }
  if let Some(dir) = &config.download_dir {
    let path = PathBuf::from(dir);
    if path.is_dir() {
      return Ok(path);
    }
  }
  std::env::current_dir().context("Failed to resolve the working directory")
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _log_guard = logging::init();

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::try_init().context("Failed to initialize terminal")?;
  let result = run(&mut terminal, args).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, args: Args) -> Result<()> {
  let config = Config::load();
  let theme_index = config.theme_name.as_deref().and_then(theme::theme_index_by_name).unwrap_or(0);
  let downloader_bin = args.downloader.clone().unwrap_or_else(|| constants().downloader_bin.clone());
  let download_dir = resolve_download_dir(&args, &config)?;
  info!(bin = %downloader_bin, dir = %download_dir.display(), "starting");

  let mut app = App::new(downloader_bin, download_dir, theme_index);

  if !args.no_center
    && let Err(e) = window::center_on_screen().await
  {
    warn!(err = %e, "window: centering skipped");
  }

  let poll_budget = Duration::from_millis(constants().event_poll_ms);
  loop {
    app.check_pending();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(poll_budget)? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  Config {
    theme_name: Some(app.theme().name.to_string()),
    download_dir: Some(app.download_dir.display().to_string()),
  }
  .save();

  Ok(())
}
