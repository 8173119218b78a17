use crossterm::style::{Color, Stylize};

use crate::{cli::ColorArg, domain::weather::Condition};


/// Foreground tones from the basic 16-color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    BrightBlue,
    BrightYellow,
}

impl Tone {
    #[must_use]
    pub fn color(self) -> Color {
        match self {
            Self::Red => Color::DarkRed,
            Self::Green => Color::DarkGreen,
            Self::Yellow => Color::DarkYellow,
            Self::Blue => Color::DarkBlue,
            Self::Magenta => Color::DarkMagenta,
            Self::Cyan => Color::DarkCyan,
            Self::White => Color::Grey,
            Self::Gray => Color::DarkGrey,
            Self::BrightBlue => Color::Blue,
            Self::BrightYellow => Color::Yellow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherTheme {
    pub name: &'static str,
    pub accent: Tone,
    pub glyph: &'static str,
}

const DEFAULT_THEME: WeatherTheme = WeatherTheme {
    name: "default",
    accent: Tone::BrightBlue,
    glyph: "·",
};

#[must_use]
pub fn theme_for(condition: &Condition) -> WeatherTheme {
    let (name, accent, glyph) = match condition {
        Condition::Clear => ("clear", Tone::BrightYellow, "☀"),
        Condition::Clouds => ("clouds", Tone::Gray, "☁"),
        Condition::Rain => ("rain", Tone::Blue, "☂"),
        Condition::Drizzle => ("drizzle", Tone::Cyan, "☂"),
        Condition::Thunderstorm => ("thunderstorm", Tone::Magenta, "⚡"),
        Condition::Snow => ("snow", Tone::White, "❄"),
        Condition::Mist => ("mist", Tone::Gray, "≋"),
        Condition::Smoke => ("smoke", Tone::Gray, "≋"),
        Condition::Haze => ("haze", Tone::Yellow, "≋"),
        Condition::Dust => ("dust", Tone::Yellow, "≋"),
        Condition::Fog => ("fog", Tone::Gray, "≋"),
        Condition::Sand => ("sand", Tone::Yellow, "≋"),
        Condition::Ash => ("ash", Tone::Gray, "≋"),
        Condition::Squall => ("squall", Tone::Cyan, "≈"),
        Condition::Tornado => ("tornado", Tone::Red, "≈"),
        Condition::Other(_) => return DEFAULT_THEME,
    };
    WeatherTheme {
        name,
        accent,
        glyph,
    }
}

/// Styles text through crossterm when enabled, otherwise passes it through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    pub enabled: bool,
}

impl Painter {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    #[must_use]
    pub fn paint(&self, text: &str, tone: Tone) -> String {
        if self.enabled {
            text.with(tone.color()).to_string()
        } else {
            text.to_string()
        }
    }

    #[must_use]
    pub fn bold(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    #[must_use]
    pub fn danger(&self, text: &str) -> String {
        self.paint(text, Tone::Red)
    }

    #[must_use]
    pub fn muted(&self, text: &str) -> String {
        self.paint(text, Tone::Gray)
    }
}

/// Resolves the color policy against the terminal environment.
pub fn color_enabled(mode: ColorArg) -> bool {
    let term = std::env::var("TERM").ok();
    let no_color = std::env::var("NO_COLOR").ok();
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stdout());
    color_enabled_from(mode, term.as_deref(), no_color.as_deref(), is_tty)
}

pub(crate) fn color_enabled_from(
    mode: ColorArg,
    term: Option<&str>,
    no_color: Option<&str>,
    is_tty: bool,
) -> bool {
    match mode {
        ColorArg::Always => true,
        ColorArg::Never => false,
        ColorArg::Auto => {
            is_tty
                && !no_color.is_some_and(|value| !value.is_empty())
                && !term.is_some_and(|value| value.eq_ignore_ascii_case("dumb"))
        }
    }
}
