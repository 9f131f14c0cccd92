// color themes for the chat window

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
    Nord,
    Gruvbox,
}

impl ThemeKind {
    pub const ALL: &'static [ThemeKind] = &[Self::Dark, Self::Light, Self::Nord, Self::Gruvbox];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Nord => "nord",
            Self::Gruvbox => "gruvbox",
        }
    }
}

/// Picks light or dark from the terminal background, dark when unknown.
pub fn detect_theme() -> ThemeKind {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => ThemeKind::Light,
        _ => ThemeKind::Dark,
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub border: Color,
    pub user: Color,
    pub error: Color,
    pub muted: Color,
}

impl Theme {
    pub fn from_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self {
                bg: Color::Rgb(18, 20, 28),
                fg: Color::Rgb(222, 224, 232),
                accent: Color::Rgb(90, 160, 250),
                border: Color::Rgb(58, 62, 82),
                user: Color::Rgb(120, 220, 170),
                error: Color::Rgb(250, 105, 105),
                muted: Color::Rgb(118, 122, 144),
            },
            ThemeKind::Light => Self {
                bg: Color::Rgb(248, 249, 252),
                fg: Color::Rgb(32, 34, 44),
                accent: Color::Rgb(40, 96, 200),
                border: Color::Rgb(198, 202, 214),
                user: Color::Rgb(30, 130, 80),
                error: Color::Rgb(196, 48, 48),
                muted: Color::Rgb(136, 138, 152),
            },
            ThemeKind::Nord => Self {
                bg: Color::Rgb(46, 52, 64),
                fg: Color::Rgb(236, 239, 244),
                accent: Color::Rgb(136, 192, 208),
                border: Color::Rgb(67, 76, 94),
                user: Color::Rgb(163, 190, 140),
                error: Color::Rgb(191, 97, 106),
                muted: Color::Rgb(129, 161, 193),
            },
            ThemeKind::Gruvbox => Self {
                bg: Color::Rgb(40, 40, 40),
                fg: Color::Rgb(235, 219, 178),
                accent: Color::Rgb(250, 189, 47),
                border: Color::Rgb(80, 73, 69),
                user: Color::Rgb(184, 187, 38),
                error: Color::Rgb(251, 73, 52),
                muted: Color::Rgb(146, 131, 116),
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn user(&self) -> Style {
        Style::default().fg(self.user).add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}
