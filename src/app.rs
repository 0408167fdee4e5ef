use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::browser::FileBrowser;
use crate::downloader::{self, DownloadOutcome, DownloadRequest};
use crate::theme::{THEMES, Theme};

// --- App State ---

/// One finished download, kept for the history panel.
#[derive(Debug)]
pub struct CompletedDownload {
  pub url: String,
  pub success: bool,
}

/// How many finished downloads the history panel remembers.
const HISTORY_LIMIT: usize = 5;

pub struct App {
  /// Raw URL text, bounded to `constants().max_url_bytes`.
  pub url: String,
  pub cursor_position: usize,
  pub input_scroll: usize,
  /// Where the downloader writes its output.
  pub download_dir: PathBuf,
  /// Set on each download request and cleared unconditionally once the
  /// spawn has been dispatched.
  pub download_requested: bool,
  pub show_browser: bool,
  pub browser: FileBrowser,
  pub theme_index: usize,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  pub info_message: Option<String>,
  pub should_quit: bool,
  pub completed: Vec<CompletedDownload>,
  downloader_bin: String,
  downloads: Vec<oneshot::Receiver<Result<DownloadOutcome>>>,
}

impl App {
  pub fn new(downloader_bin: String, download_dir: PathBuf, theme_index: usize) -> Self {
    Self {
      url: String::new(),
      cursor_position: 0,
      input_scroll: 0,
      browser: FileBrowser::new(download_dir.clone()),
      download_dir,
      download_requested: false,
      show_browser: false,
      theme_index,
      last_error: None,
      status_message: None,
      info_message: None,
      should_quit: false,
      completed: Vec::new(),
      downloader_bin,
      downloads: Vec::new(),
    }
  }

  pub fn theme(&self) -> &'static Theme {
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
  }

  /// Number of downloads still running.
  pub fn active_downloads(&self) -> usize {
    self.downloads.len()
  }

  /// Dispatch one downloader process for the current URL and destination.
  /// Every call spawns exactly one process — consecutive requests are never
  /// collapsed, even within a single frame. The URL text is handed to the
  /// downloader verbatim, with no validation or trimming; a bad URL comes
  /// back as a failed exit status through the completion channel.
  pub fn request_download(&mut self) {
    let url = self.url.clone();

    self.download_requested = true;
    self.last_error = None;

    let request = DownloadRequest { url: url.clone(), dest_dir: self.download_dir.clone() };
    let rx = downloader::spawn_download(self.downloader_bin.clone(), request);
    self.downloads.push(rx);
    self.status_message = Some(format!("Downloading '{}'…", url));

    // Cleared regardless of how the spawn turns out; the outcome arrives
    // through the channel.
    self.download_requested = false;
  }

  /// Drain completion channels. Called once per frame before drawing.
  pub fn check_pending(&mut self) {
    let mut still_running = Vec::new();

    for mut rx in std::mem::take(&mut self.downloads) {
      match rx.try_recv() {
        Ok(Ok(outcome)) => {
          let success = outcome.status.success();
          if success {
            self.status_message = None;
            self.info_message = Some(format!("Downloaded: {}", outcome.url));
            info!(url = %outcome.url, "download succeeded");
          } else {
            self.status_message = None;
            self.last_error = Some(format!("Downloader exited with {}: {}", outcome.status, outcome.url));
            error!(url = %outcome.url, status = %outcome.status, "download failed");
          }
          self.push_completed(CompletedDownload { url: outcome.url, success });
        }
        Ok(Err(e)) => {
          self.status_message = None;
          self.last_error = Some(format!("Download failed: {:#}", e));
          error!(err = %e, "download spawn failed");
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          still_running.push(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.last_error = Some("Download task failed.".to_string());
          error!("download task dropped its completion channel");
          self.push_completed(CompletedDownload { url: "(unknown)".to_string(), success: false });
        }
      }
    }

    self.downloads = still_running;
  }

  fn push_completed(&mut self, entry: CompletedDownload) {
    self.completed.insert(0, entry);
    self.completed.truncate(HISTORY_LIMIT);
  }

  /// Open the file browser overlay. Cursor state is retained from the last
  /// session, so browsing resumes in the previously visited directory.
  pub fn open_browser(&mut self) {
    self.show_browser = true;
  }

  /// Confirm the browser selection: pending file if any, else the current
  /// directory, written into the destination path.
  pub fn browser_select(&mut self) {
    let path = self.browser.confirm();
    self.download_dir = path.clone();
    self.show_browser = false;
    self.info_message = Some(format!("Destination: {}", path.display()));
  }

  /// Dismiss the browser without touching the destination path.
  pub fn browser_cancel(&mut self) {
    self.show_browser = false;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn test_app() -> App {
    // `true` stands in for the downloader: accepts any args, exits 0.
    App::new("true".to_string(), std::env::temp_dir(), 0)
  }

  #[tokio::test]
  async fn request_spawns_once_and_clears_flag() {
    let mut app = test_app();
    app.url = "https://example.com/v".to_string();
    app.request_download();
    assert_eq!(app.active_downloads(), 1);
    assert!(!app.download_requested);
  }

  #[tokio::test]
  async fn consecutive_requests_are_not_collapsed() {
    let mut app = test_app();
    app.url = "https://example.com/v".to_string();
    app.request_download();
    app.request_download();
    assert_eq!(app.active_downloads(), 2);
  }

  #[tokio::test]
  async fn url_text_is_dispatched_unvalidated() {
    let mut app = test_app();
    app.url = String::new();
    app.request_download();
    app.url = "  https://example.com/v  ".to_string();
    app.request_download();
    // Empty and padded URLs are dispatched as-is, one process each.
    assert_eq!(app.active_downloads(), 2);
    assert!(app.last_error.is_none());
  }

  #[tokio::test]
  async fn closed_channel_surfaces_as_failure() {
    let mut app = test_app();
    let (tx, rx) = oneshot::channel::<Result<DownloadOutcome>>();
    drop(tx);
    app.downloads.push(rx);
    app.check_pending();
    assert_eq!(app.active_downloads(), 0);
    assert!(app.last_error.is_some());
    assert_eq!(app.completed.len(), 1);
    assert!(!app.completed[0].success);
  }

  #[tokio::test]
  async fn completion_is_delivered_to_history() {
    let mut app = test_app();
    app.url = "https://example.com/v".to_string();
    app.request_download();
    // Wait for the child to exit, then drain the channel like a frame would.
    for _ in 0..100 {
      app.check_pending();
      if app.active_downloads() == 0 {
        break;
      }
      tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(app.active_downloads(), 0);
    assert_eq!(app.completed.len(), 1);
    assert!(app.completed[0].success);
  }

  #[tokio::test]
  async fn browser_select_writes_destination() {
    let mut app = test_app();
    app.open_browser();
    let picked = std::env::temp_dir().join("somewhere");
    app.browser.pending_selection = Some(picked.clone());
    app.browser_select();
    assert_eq!(app.download_dir, picked);
    assert!(!app.show_browser);
  }

  #[tokio::test]
  async fn browser_cancel_leaves_destination_unmodified() {
    let mut app = test_app();
    let before = app.download_dir.clone();
    app.open_browser();
    app.browser.pending_selection = Some(PathBuf::from("/elsewhere"));
    app.browser_cancel();
    assert_eq!(app.download_dir, before);
    assert!(!app.show_browser);
  }

  #[tokio::test]
  async fn browser_state_survives_reopen() {
    let mut app = test_app();
    app.open_browser();
    app.browser.current_dir = PathBuf::from("/deep/down");
    app.browser.pending_selection = Some(PathBuf::from("/deep/down/file"));
    app.browser_cancel();
    app.open_browser();
    assert_eq!(app.browser.current_dir, PathBuf::from("/deep/down"));
    assert_eq!(app.browser.pending_selection, Some(PathBuf::from("/deep/down/file")));
  }
}
