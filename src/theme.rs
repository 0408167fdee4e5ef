use ratatui::style::Color;

/// A named color theme. All UI colors are drawn from here so themes can be
/// cycled at runtime with Ctrl-T.
pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub muted: Color,
  pub accent: Color,
  pub border: Color,
  pub status: Color,
  pub error: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub static THEMES: [Theme; 3] = [
  Theme {
    name: "dusk",
    bg: Color::Rgb(24, 24, 32),
    fg: Color::Rgb(220, 218, 230),
    muted: Color::Rgb(130, 128, 150),
    accent: Color::Rgb(250, 179, 135),
    border: Color::Rgb(70, 68, 90),
    status: Color::Rgb(166, 218, 149),
    error: Color::Rgb(237, 135, 150),
    highlight_fg: Color::Rgb(24, 24, 32),
    highlight_bg: Color::Rgb(250, 179, 135),
    stripe_bg: Color::Rgb(30, 30, 40),
    key_fg: Color::Rgb(24, 24, 32),
    key_bg: Color::Rgb(130, 128, 150),
  },
  Theme {
    name: "paper",
    bg: Color::Rgb(246, 242, 233),
    fg: Color::Rgb(60, 56, 54),
    muted: Color::Rgb(146, 131, 116),
    accent: Color::Rgb(175, 58, 3),
    border: Color::Rgb(189, 174, 147),
    status: Color::Rgb(121, 116, 14),
    error: Color::Rgb(157, 0, 6),
    highlight_fg: Color::Rgb(246, 242, 233),
    highlight_bg: Color::Rgb(175, 58, 3),
    stripe_bg: Color::Rgb(235, 229, 216),
    key_fg: Color::Rgb(246, 242, 233),
    key_bg: Color::Rgb(146, 131, 116),
  },
  Theme {
    name: "ocean",
    bg: Color::Rgb(15, 23, 42),
    fg: Color::Rgb(203, 213, 225),
    muted: Color::Rgb(100, 116, 139),
    accent: Color::Rgb(94, 234, 212),
    border: Color::Rgb(51, 65, 85),
    status: Color::Rgb(134, 239, 172),
    error: Color::Rgb(252, 165, 165),
    highlight_fg: Color::Rgb(15, 23, 42),
    highlight_bg: Color::Rgb(94, 234, 212),
    stripe_bg: Color::Rgb(20, 30, 52),
    key_fg: Color::Rgb(15, 23, 42),
    key_bg: Color::Rgb(100, 116, 139),
  },
];

/// Look up a theme index by name, for restoring the persisted choice.
pub fn theme_index_by_name(name: &str) -> Option<usize> {
  THEMES.iter().position(|t| t.name == name)
}
