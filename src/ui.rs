use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Flex, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, Clear, List, ListItem, Padding, Paragraph},
};

use crate::app::App;
use crate::theme::Theme;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

/// A centered rect covering the given percentage of `area` in each dimension.
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
  let [area] = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center).areas(area);
  let [area] = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center).areas(area);
  area
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  render_main(frame, app, main_area);
  render_status(frame, app, status_area);
  render_input(frame, app, input_area);
  render_footer(frame, app, footer_area);

  if app.show_browser {
    render_browser(frame, app, main_area);
  }
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" ⇣ yd ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_main(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let inner_w = area.width.saturating_sub(4) as usize;

  let dest_label = "Destination  ";
  let dest = truncate_str(&app.download_dir.display().to_string(), inner_w.saturating_sub(dest_label.len()));

  let mut lines = vec![
    Line::from(""),
    Line::from(vec![
      Span::styled(dest_label, Style::default().fg(theme.muted)),
      Span::styled(dest, Style::default().fg(theme.fg)),
    ]),
    Line::from(""),
  ];

  if app.completed.is_empty() {
    lines.push(Line::from(Span::styled("Paste a video URL below and press Enter.", Style::default().fg(theme.fg))));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Ctrl-B picks a destination directory.", Style::default().fg(theme.muted))));
  } else {
    lines.push(Line::from(Span::styled("Recent", Style::default().fg(theme.muted))));
    for entry in &app.completed {
      let (mark, color) = if entry.success { ("✓ ", theme.status) } else { ("✗ ", theme.error) };
      lines.push(Line::from(vec![
        Span::styled(mark, Style::default().fg(color)),
        Span::styled(truncate_str(&entry.url, inner_w.saturating_sub(2)), Style::default().fg(theme.fg)),
      ]));
    }
  }

  let paragraph = Paragraph::new(lines).alignment(Alignment::Left).block(
    Block::bordered()
      .title(" Downloads ")
      .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
      .border_type(ratatui::widgets::BorderType::Rounded)
      .border_style(Style::default().fg(theme.border))
      .padding(Padding::horizontal(1)),
  );
  frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let active = app.active_downloads();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(msg) = &app.info_message {
    (format!(" ✓ {}", msg), Style::default().fg(theme.status))
  } else if active > 0 {
    (format!(" ⇣ {} download(s) in progress", active), Style::default().fg(theme.status))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let border_color = if app.show_browser { theme.border } else { theme.accent };
  let input_block = Block::bordered()
    .title(" Video URL ")
    .title_style(Style::default().fg(border_color))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.url, app.cursor_position);

  if cursor_col < app.input_scroll {
    app.input_scroll = cursor_col;
  } else if cursor_col >= app.input_scroll + inner_w {
    app.input_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .url
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.input_scroll)
    .take_while(|(start, _, _)| *start < app.input_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  if !app.show_browser {
    let cursor_x = area.x + 2 + (cursor_col - app.input_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_browser(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let popup = popup_area(area, 80, 90);
  frame.render_widget(Clear, popup);

  let [list_area, info_area] = Layout::vertical([Constraint::Min(3), Constraint::Length(2)]).areas(popup);

  let inner_w = list_area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = app
    .browser
    .entries
    .iter()
    .enumerate()
    .map(|(i, entry)| {
      let is_selected = Some(i) == app.browser.list_state.selected();
      let fg = if is_selected {
        theme.highlight_fg
      } else if entry.is_dir {
        theme.accent
      } else {
        theme.fg
      };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };
      let marker = if entry.is_dir { "▸ " } else { "  " };
      let line = Line::from(vec![
        Span::styled(marker, Style::default().fg(fg)),
        Span::styled(truncate_str(&entry.name, inner_w.saturating_sub(2)), Style::default().fg(fg)),
      ]);
      ListItem::new(line).bg(bg)
    })
    .collect();

  let title = format!(" Browse — {} ", truncate_str(&app.browser.current_dir.display().to_string(), inner_w));
  let list = List::new(items)
    .block(
      Block::bordered()
        .title(title)
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.bg)),
    )
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, list_area, &mut app.browser.list_state);

  let info_w = info_area.width.saturating_sub(2) as usize;
  let info_line = if let Some(err) = &app.browser.list_error {
    Line::from(Span::styled(format!(" ⚠  {}", truncate_str(err, info_w)), Style::default().fg(theme.error)))
  } else if let Some(pending) = &app.browser.pending_selection {
    Line::from(vec![
      Span::styled(" Selected  ", Style::default().fg(theme.muted)),
      Span::styled(
        truncate_str(&pending.display().to_string(), info_w.saturating_sub(11)),
        Style::default().fg(theme.fg),
      ),
    ])
  } else {
    Line::from(Span::styled(" s selects the current directory", Style::default().fg(theme.muted)))
  };
  frame.render_widget(Paragraph::new(info_line).style(Style::default().bg(theme.bg)), info_area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys: Vec<(&str, &str)> = if app.show_browser {
    vec![("Enter", "Open"), ("s", "Select"), ("⌫", "Up"), ("r", "Refresh"), ("Esc", "Cancel")]
  } else {
    let mut k = vec![("Enter", "Download"), ("^b", "Browse"), ("^t", "Theme")];
    if app.url.is_empty() {
      k.push(("Esc", "Quit"));
    } else {
      k.push(("Esc", "Clear"));
    }
    k
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}
