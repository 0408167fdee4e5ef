//! macOS terminal window centering.
//!
//! On startup the hosting terminal-emulator window is moved and sized so it
//! sits centered on the main screen at a fixed size.
//! Uses terminal-specific AppleScript (Terminal.app,
//! iTerm2) or generic System Events AppleScript (Ghostty) via `osascript`.
//! Other terminals are unsupported and centering becomes a logged no-op.
//!
//! For Ghostty, System Events works through the macOS Accessibility API;
//! the first run may prompt the user to grant Accessibility permissions.

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::constants::constants;

/// Window geometry in pixels: position (x, y) and size (width, height).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
  pub x: i32,
  pub y: i32,
  pub width: u32,
  pub height: u32,
}

/// Screen dimensions in pixels.
#[derive(Debug, Clone, Copy)]
pub struct ScreenSize {
  pub width: u32,
  pub height: u32,
}

/// Detected terminal application.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TerminalApp {
  AppleTerminal,
  ITerm2,
  /// Ghostty terminal (TERM_PROGRAM=ghostty).
  Ghostty,
  /// Any other terminal — centering not supported.
  Other,
}

fn detect_terminal() -> TerminalApp {
  let c = constants();
  match std::env::var("TERM_PROGRAM").as_deref() {
    Ok("Apple_Terminal") => TerminalApp::AppleTerminal,
    Ok("iTerm.app") => TerminalApp::ITerm2,
    Ok(s) if s == c.ghostty_term_program => TerminalApp::Ghostty,
    _ => TerminalApp::Other,
  }
}

// ---------------------------------------------------------------------------
// osascript helpers
// ---------------------------------------------------------------------------

/// Run an osascript command and return trimmed stdout.
async fn run_osascript(script: &str) -> Result<String> {
  let output = tokio::process::Command::new("osascript")
    .args(["-e", script])
    .stdin(std::process::Stdio::null())
    .stdout(std::process::Stdio::piped())
    .stderr(std::process::Stdio::piped())
    .output()
    .await
    .context("Failed to run osascript")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    return Err(anyhow!("osascript failed: {}", stderr.trim()));
  }

  Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a JXA (JavaScript for Automation) script via osascript.
async fn run_osascript_jxa(script: &str) -> Result<String> {
  let output = tokio::process::Command::new("osascript")
    .args(["-l", "JavaScript", "-e", script])
    .stdin(std::process::Stdio::null())
    .stdout(std::process::Stdio::piped())
    .stderr(std::process::Stdio::piped())
    .output()
    .await
    .context("Failed to run osascript (JXA)")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    return Err(anyhow!("osascript JXA failed: {}", stderr.trim()));
  }

  Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Parse "w, h" from the screen size query output.
fn parse_screen_size(s: &str) -> Result<ScreenSize> {
  let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
  if parts.len() != 2 {
    return Err(anyhow!("Expected 2 comma-separated values for screen size, got {}: {}", parts.len(), s));
  }
  let width: u32 = parts[0].parse().context("Failed to parse screen width")?;
  let height: u32 = parts[1].parse().context("Failed to parse screen height")?;
  Ok(ScreenSize { width, height })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute a `width`×`height` geometry centered on `screen`. Windows larger
/// than the screen are pinned to the top-left corner.
pub fn centered_geometry(screen: &ScreenSize, width: u32, height: u32) -> WindowGeometry {
  WindowGeometry {
    x: (screen.width.saturating_sub(width) / 2) as i32,
    y: (screen.height.saturating_sub(height) / 2) as i32,
    width,
    height,
  }
}

/// Get the main screen dimensions in pixels using AppKit via JXA.
pub async fn get_screen_size() -> Result<ScreenSize> {
  let output = run_osascript_jxa(
    "ObjC.import('AppKit'); var f = $.NSScreen.mainScreen.frame; Math.floor(f.size.width) + ',' + Math.floor(f.size.height)",
  )
  .await?;
  parse_screen_size(&output)
}

/// Set the window geometry of the frontmost terminal window.
pub async fn set_window_geometry(geom: &WindowGeometry) -> Result<()> {
  let terminal = detect_terminal();
  info!(terminal = ?terminal, geom = ?geom, "window: setting geometry");

  match terminal {
    TerminalApp::AppleTerminal => {
      let script = format!(
        r#"tell application "Terminal"
          set bounds of front window to {{{}, {}, {}, {}}}
        end tell"#,
        geom.x,
        geom.y,
        geom.x + geom.width as i32,
        geom.y + geom.height as i32
      );
      run_osascript(&script).await?;
    }
    TerminalApp::ITerm2 => {
      let script = format!(
        r#"tell application "iTerm2"
          tell current window
            set bounds to {{{}, {}, {}, {}}}
          end tell
        end tell"#,
        geom.x,
        geom.y,
        geom.x + geom.width as i32,
        geom.y + geom.height as i32
      );
      run_osascript(&script).await?;
    }
    // Ghostty: use System Events to set position and size.
    TerminalApp::Ghostty => {
      let script = format!(
        r#"tell application "System Events"
          tell process "{name}"
            set position of front window to {{{x}, {y}}}
            set size of front window to {{{w}, {h}}}
          end tell
        end tell"#,
        name = constants().ghostty_process_name,
        x = geom.x,
        y = geom.y,
        w = geom.width,
        h = geom.height
      );
      run_osascript(&script).await.context("Failed to set Ghostty window geometry via System Events")?;
    }
    TerminalApp::Other => {
      return Err(anyhow!(
        "Window centering is not supported in this terminal (TERM_PROGRAM={:?})",
        std::env::var("TERM_PROGRAM").ok()
      ));
    }
  }

  Ok(())
}

/// Center the hosting terminal window on the main screen using the
/// configured fixed size. Best-effort: callers log and continue on error.
pub async fn center_on_screen() -> Result<()> {
  if detect_terminal() == TerminalApp::Other {
    return Err(anyhow!(
      "Window centering is not supported in this terminal (TERM_PROGRAM={:?})",
      std::env::var("TERM_PROGRAM").ok()
    ));
  }

  let c = constants();
  let screen = get_screen_size().await?;
  let geom = centered_geometry(&screen, c.window_width, c.window_height);
  set_window_geometry(&geom).await
}
