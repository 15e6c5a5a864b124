use ratatui::style::Color;

use crate::storage::KeyValueStore;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Stored value first, then the ambient preference, then Light.
    pub fn restore(stored: Option<&str>, prefers_dark: Option<bool>) -> Self {
        if let Some(raw) = stored {
            match Self::parse(raw) {
                Some(mode) => return mode,
                None => tracing::warn!(value = raw, "ignoring malformed stored theme"),
            }
        }
        match prefers_dark {
            Some(true) => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Light => Palette {
                background: Color::Rgb(250, 248, 245),
                foreground: Color::Rgb(40, 40, 48),
                muted: Color::Rgb(130, 130, 140),
                border: Color::Rgb(200, 90, 80),
                accent: Color::Rgb(220, 70, 60),
                work: Color::Rgb(210, 60, 50),
                rest: Color::Rgb(40, 150, 110),
                warning: Color::Rgb(230, 20, 20),
                row: Color::Rgb(238, 234, 228),
            },
            Self::Dark => Palette {
                background: Color::Rgb(24, 24, 32),
                foreground: Color::Rgb(230, 230, 235),
                muted: Color::Rgb(120, 120, 135),
                border: Color::Rgb(255, 120, 100),
                accent: Color::Rgb(255, 110, 90),
                work: Color::Rgb(255, 100, 80),
                rest: Color::Rgb(80, 220, 160),
                warning: Color::Rgb(255, 60, 60),
                row: Color::Rgb(38, 38, 50),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub work: Color,
    pub rest: Color,
    pub warning: Color,
    pub row: Color,
}

/// Reads the terminal's `COLORFGBG` hint ("fg;bg"). Dark backgrounds are the
/// low ANSI colors 0-6 and 8.
pub fn prefers_dark_from_env() -> Option<bool> {
    std::env::var("COLORFGBG").ok().as_deref().and_then(parse_colorfgbg)
}

fn parse_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}

pub struct ThemeManager {
    mode: ThemeMode,
    store: Box<dyn KeyValueStore>,
}

impl ThemeManager {
    pub fn new(store: Box<dyn KeyValueStore>, prefers_dark: Option<bool>) -> Self {
        let stored = store.get(THEME_KEY);
        let mode = ThemeMode::restore(stored.as_deref(), prefers_dark);
        tracing::info!(mode = mode.as_str(), from_storage = stored.is_some(), "theme restored");
        Self { mode, store }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn palette(&self) -> Palette {
        self.mode.palette()
    }

    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();
        tracing::info!(mode = self.mode.as_str(), "theme toggled");
        if let Err(err) = self.store.set(THEME_KEY, self.mode.as_str()) {
            tracing::warn!(%err, "failed to persist theme");
        }
        self.mode
    }
}
