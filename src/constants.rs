//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available —
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Downloader invocation
  pub downloader_bin: String,
  pub format_spec: String,
  pub merge_output_format: String,
  pub output_template: String,

  // URL input field
  pub max_url_bytes: usize,

  // Frame loop
  pub event_poll_ms: u64,

  // Terminal window centering (pixels)
  pub window_width: u32,
  pub window_height: u32,

  // Ghostty terminal
  pub ghostty_term_program: String,
  pub ghostty_process_name: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert_eq!(c.downloader_bin, "yt-dlp");
    assert!(c.max_url_bytes > 0);
    assert!(c.output_template.contains("%(title)s"));
  }
}
