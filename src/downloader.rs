//! Download invoker.
//!
//! Each request spawns exactly one downloader process on the tokio runtime
//! and reports its exit status back to the frame loop over a oneshot
//! channel, so the UI keeps drawing while downloads run. The URL is passed
//! as a standalone argument after `--` — it is never interpolated into a
//! shell string.

use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::info;

use crate::constants::constants;

/// A single download request: the raw URL text and the destination directory.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
  pub url: String,
  pub dest_dir: PathBuf,
}

/// What came back from a finished downloader process.
#[derive(Debug)]
pub struct DownloadOutcome {
  pub url: String,
  pub status: std::process::ExitStatus,
}

/// Build the downloader argument vector for a request.
///
/// Shape: `-f <format> --merge-output-format <container> -o <dest>/%(title)s.%(ext)s -- <url>`.
/// The URL goes verbatim after the `--` terminator so option-looking input
/// can't be misread as a flag.
pub fn build_args(dest_dir: &Path, url: &str) -> Vec<String> {
  let c = constants();
  let template = dest_dir.join(&c.output_template);
  vec![
    "-f".to_string(),
    c.format_spec.clone(),
    "--merge-output-format".to_string(),
    c.merge_output_format.clone(),
    "-o".to_string(),
    template.to_string_lossy().into_owned(),
    "--".to_string(),
    url.to_string(),
  ]
}

/// Spawn one downloader process for `req` and return the channel that will
/// carry its exit status (or the spawn error). All stdio is nulled — the
/// terminal is owned by the UI.
pub fn spawn_download(bin: String, req: DownloadRequest) -> oneshot::Receiver<Result<DownloadOutcome>> {
  let (tx, rx) = oneshot::channel();

  tokio::spawn(async move {
    let args = build_args(&req.dest_dir, &req.url);
    info!(url = %req.url, dest = %req.dest_dir.display(), bin = %bin, "download: spawning");

    let result = Command::new(&bin)
      .args(&args)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status()
      .await
      .map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
          anyhow!("{} not found. Install it with: brew install yt-dlp (macOS) or pip install yt-dlp", bin)
        } else {
          anyhow!(e).context("Failed to spawn downloader")
        }
      })
      .map(|status| {
        info!(url = %req.url, status = %status, "download: finished");
        DownloadOutcome { url: req.url, status }
      });

    // Receiver may be gone if the app quit mid-download.
    let _ = tx.send(result);
  });

  rx
}
