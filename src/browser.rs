//! Modal file browser for picking the destination directory.
//!
//! States are {closed, browsing}; visibility is owned by the `App` flag,
//! this struct holds the cursor state. The current directory and the
//! pending file selection survive close/reopen cycles, so the browser
//! resumes where the user left off.

use anyhow::{Context, Result};
use ratatui::widgets::ListState;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One visible entry in the listing.
#[derive(Debug, Clone)]
pub struct BrowserEntry {
  pub name: String,
  pub path: PathBuf,
  pub is_dir: bool,
}

pub struct FileBrowser {
  pub current_dir: PathBuf,
  pub entries: Vec<BrowserEntry>,
  pub list_state: ListState,
  /// A file the user highlighted and activated but has not yet confirmed.
  pub pending_selection: Option<PathBuf>,
  /// Why the last listing came up empty, if it failed.
  pub list_error: Option<String>,
}

impl FileBrowser {
  pub fn new(start_dir: PathBuf) -> Self {
    let mut browser = Self {
      current_dir: start_dir,
      entries: Vec::new(),
      list_state: ListState::default(),
      pending_selection: None,
      list_error: None,
    };
    browser.refresh();
    browser
  }

  /// Re-read the current directory. A failed read (permissions, directory
  /// removed mid-browse) degrades to an empty listing with an inline error;
  /// navigation stays available.
  pub fn refresh(&mut self) {
    match read_entries(&self.current_dir) {
      Ok(entries) => {
        self.entries = entries;
        self.list_error = None;
      }
      Err(e) => {
        warn!(dir = %self.current_dir.display(), err = %e, "browser: listing failed");
        self.entries.clear();
        self.list_error = Some(format!("{:#}", e));
      }
    }
    self.list_state.select(if self.entries.is_empty() { None } else { Some(0) });
  }

  pub fn move_down(&mut self) {
    let count = self.entries.len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| (i + 1) % count);
      self.list_state.select(Some(i));
    }
  }

  pub fn move_up(&mut self) {
    let count = self.entries.len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
      self.list_state.select(Some(i));
    }
  }

  /// Activate the highlighted entry: descend into a directory (the browser
  /// stays open), or mark a file as the pending selection.
  pub fn activate(&mut self) {
    let Some(i) = self.list_state.selected() else { return };
    let Some(entry) = self.entries.get(i) else { return };
    if entry.is_dir {
      self.current_dir = entry.path.clone();
      self.refresh();
    } else {
      self.pending_selection = Some(entry.path.clone());
    }
  }

  /// Move to the parent directory. No-op at the filesystem root, so
  /// repeated calls are idempotent there.
  pub fn go_up(&mut self) {
    if let Some(parent) = self.current_dir.parent() {
      self.current_dir = parent.to_path_buf();
      self.refresh();
    }
  }

  /// Resolve what "Select" should write: the pending file if one exists,
  /// otherwise the directory currently being browsed.
  pub fn confirm(&self) -> PathBuf {
    self.pending_selection.clone().unwrap_or_else(|| self.current_dir.clone())
  }
}

/// List the immediate children of `dir`, directories first, each group
/// sorted by name.
fn read_entries(dir: &Path) -> Result<Vec<BrowserEntry>> {
  let read = std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

  let mut entries: Vec<BrowserEntry> = read
    .filter_map(|entry| {
      let entry = entry.ok()?;
      let path = entry.path();
      // Follows symlinks, so a link to a directory browses like one.
      let is_dir = path.is_dir();
      let name = entry.file_name().to_string_lossy().into_owned();
      Some(BrowserEntry { name, path, is_dir })
    })
    .collect();

  entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
  Ok(entries)
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Build a small tree under the OS temp dir:
  /// `<root>/alpha/`, `<root>/beta/`, `<root>/video.txt`.
  fn temp_tree(tag: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("yd-browser-test-{}-{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(root.join("alpha")).unwrap();
    std::fs::create_dir_all(root.join("beta")).unwrap();
    std::fs::write(root.join("video.txt"), b"x").unwrap();
    root
  }

  #[test]
  fn listing_sorts_directories_first() {
    let root = temp_tree("sort");
    let browser = FileBrowser::new(root.clone());
    let names: Vec<&str> = browser.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "video.txt"]);
    assert!(browser.entries[0].is_dir);
    assert!(!browser.entries[2].is_dir);
    let _ = std::fs::remove_dir_all(&root);
  }

  #[test]
  fn activate_directory_descends_and_stays_open() {
    let root = temp_tree("descend");
    let mut browser = FileBrowser::new(root.clone());
    browser.list_state.select(Some(0)); // alpha
    browser.activate();
    assert_eq!(browser.current_dir, root.join("alpha"));
    assert!(browser.pending_selection.is_none());
    let _ = std::fs::remove_dir_all(&root);
  }

  #[test]
  fn activate_file_marks_pending_selection() {
    let root = temp_tree("pending");
    let mut browser = FileBrowser::new(root.clone());
    browser.list_state.select(Some(2)); // video.txt
    browser.activate();
    assert_eq!(browser.pending_selection, Some(root.join("video.txt")));
    assert_eq!(browser.current_dir, root);
    let _ = std::fs::remove_dir_all(&root);
  }

  #[test]
  fn confirm_prefers_pending_selection() {
    let root = temp_tree("confirm");
    let mut browser = FileBrowser::new(root.clone());
    assert_eq!(browser.confirm(), root);
    browser.pending_selection = Some(root.join("video.txt"));
    assert_eq!(browser.confirm(), root.join("video.txt"));
    let _ = std::fs::remove_dir_all(&root);
  }

  #[test]
  fn go_up_reaches_parent() {
    let root = temp_tree("up");
    let mut browser = FileBrowser::new(root.join("alpha"));
    browser.go_up();
    assert_eq!(browser.current_dir, root);
    let _ = std::fs::remove_dir_all(&root);
  }

  #[test]
  fn go_up_is_idempotent_at_root() {
    let mut browser = FileBrowser::new(PathBuf::from("/"));
    browser.go_up();
    assert_eq!(browser.current_dir, PathBuf::from("/"));
    browser.go_up();
    assert_eq!(browser.current_dir, PathBuf::from("/"));
  }

  #[test]
  fn missing_directory_degrades_to_empty_listing() {
    let root = temp_tree("gone");
    let mut browser = FileBrowser::new(root.clone());
    std::fs::remove_dir_all(&root).unwrap();
    browser.refresh();
    assert!(browser.entries.is_empty());
    assert!(browser.list_error.is_some());
    assert!(browser.list_state.selected().is_none());
    // Navigation back up still works.
    browser.go_up();
    assert_eq!(browser.current_dir, root.parent().unwrap());
  }

  #[cfg(unix)]
  #[test]
  fn symlink_to_directory_browses_as_directory() {
    let root = temp_tree("symlink");
    std::os::unix::fs::symlink(root.join("alpha"), root.join("gamma-link")).unwrap();
    let mut browser = FileBrowser::new(root.clone());
    let link = browser.entries.iter().position(|e| e.name == "gamma-link").unwrap();
    assert!(browser.entries[link].is_dir);
    browser.list_state.select(Some(link));
    browser.activate();
    assert_eq!(browser.current_dir, root.join("gamma-link"));
    assert!(browser.pending_selection.is_none());
    let _ = std::fs::remove_dir_all(&root);
  }

  #[test]
  fn cursor_wraps_both_ways() {
    let root = temp_tree("wrap");
    let mut browser = FileBrowser::new(root.clone());
    browser.list_state.select(Some(2));
    browser.move_down();
    assert_eq!(browser.list_state.selected(), Some(0));
    browser.move_up();
    assert_eq!(browser.list_state.selected(), Some(2));
    let _ = std::fs::remove_dir_all(&root);
  }
}
