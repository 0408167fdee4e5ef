use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::App;
use crate::constants::constants;

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return;
  }

  if app.show_browser {
    handle_browser_key(app, key);
  } else {
    handle_url_key(app, key);
  }
}

fn handle_url_key(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('b') {
    app.open_browser();
    return;
  }

  app.last_error = None;
  match key.code {
    KeyCode::Enter => {
      app.request_download();
    }
    KeyCode::Char(c) => {
      // Input beyond the byte cap is ignored at the boundary.
      if app.url.len() + c.len_utf8() <= constants().max_url_bytes {
        let byte_idx = char_to_byte_index(&app.url, app.cursor_position);
        app.url.insert(byte_idx, c);
        app.cursor_position += 1;
      }
    }
    KeyCode::Backspace => {
      if app.cursor_position > 0 {
        app.cursor_position -= 1;
        let byte_idx = char_to_byte_index(&app.url, app.cursor_position);
        app.url.remove(byte_idx);
      }
    }
    KeyCode::Delete => {
      if app.cursor_position < app.url.chars().count() {
        let byte_idx = char_to_byte_index(&app.url, app.cursor_position);
        app.url.remove(byte_idx);
      }
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < app.url.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = app.url.chars().count();
    }
    KeyCode::Esc => {
      if !app.url.is_empty() {
        app.url.clear();
        app.cursor_position = 0;
        app.input_scroll = 0;
      } else {
        app.should_quit = true;
      }
    }
    _ => {}
  }
}

fn handle_browser_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.browser.activate();
    }
    KeyCode::Char('s') => {
      app.browser_select();
    }
    KeyCode::Esc => {
      app.browser_cancel();
    }
    KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
      app.browser.go_up();
    }
    KeyCode::Down | KeyCode::Char('j') => {
      app.browser.move_down();
    }
    KeyCode::Up | KeyCode::Char('k') => {
      app.browser.move_up();
    }
    KeyCode::Char('r') => {
      app.browser.refresh();
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use ratatui::crossterm::event::KeyEvent;

  fn test_app() -> App {
    App::new("true".to_string(), std::env::temp_dir(), 0)
  }

  fn press(app: &mut App, code: KeyCode) {
    handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
  }

  #[test]
  fn char_to_byte_index_multibyte() {
    let s = "aé日b";
    assert_eq!(char_to_byte_index(s, 0), 0);
    assert_eq!(char_to_byte_index(s, 1), 1);
    assert_eq!(char_to_byte_index(s, 2), 3);
    assert_eq!(char_to_byte_index(s, 3), 6);
    assert_eq!(char_to_byte_index(s, 4), 7);
  }

  #[test]
  fn url_accepts_input_up_to_byte_cap() {
    let mut app = test_app();
    let cap = constants().max_url_bytes;
    for _ in 0..cap {
      press(&mut app, KeyCode::Char('a'));
    }
    assert_eq!(app.url.len(), cap);
  }

  #[test]
  fn url_input_beyond_cap_is_ignored() {
    let mut app = test_app();
    let cap = constants().max_url_bytes;
    for _ in 0..(cap + 10) {
      press(&mut app, KeyCode::Char('a'));
    }
    assert_eq!(app.url.len(), cap);
    assert_eq!(app.cursor_position, cap);
  }

  #[test]
  fn multibyte_char_that_would_cross_cap_is_ignored() {
    let mut app = test_app();
    let cap = constants().max_url_bytes;
    for _ in 0..(cap - 1) {
      press(&mut app, KeyCode::Char('a'));
    }
    press(&mut app, KeyCode::Char('日')); // 3 bytes, would exceed the cap
    assert_eq!(app.url.len(), cap - 1);
    press(&mut app, KeyCode::Char('b'));
    assert_eq!(app.url.len(), cap);
  }

  #[test]
  fn ctrl_b_opens_browser() {
    let mut app = test_app();
    handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
    assert!(app.show_browser);
    // Plain 'b' goes into the URL, not the browser toggle.
    app.show_browser = false;
    press(&mut app, KeyCode::Char('b'));
    assert!(!app.show_browser);
    assert_eq!(app.url, "b");
  }

  #[test]
  fn esc_clears_url_then_quits() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char('x'));
    press(&mut app, KeyCode::Esc);
    assert!(app.url.is_empty());
    assert!(!app.should_quit);
    press(&mut app, KeyCode::Esc);
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn enter_requests_download() {
    let mut app = test_app();
    app.url = "https://example.com/v".to_string();
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.active_downloads(), 1);
  }

  #[test]
  fn browser_escape_cancels() {
    let mut app = test_app();
    app.open_browser();
    press(&mut app, KeyCode::Esc);
    assert!(!app.show_browser);
  }
}
