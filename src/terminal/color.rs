use colored::Color;
use std::fmt;

/// A color value as it appears in a theme.
///
/// Besides concrete colors a theme can refer to the active segment's own
/// colors (`background`/`foreground`), to the previously emitted segment's
/// colors (`parentBackground`/`parentForeground`), to a palette entry
/// (`p:name`), to the theme's accent color (`accent`) or to the terminal's own
/// background (`transparent`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColorSpec {
    #[default]
    Default,
    Named(Color),
    Indexed(u8),
    Palette(String),
    Transparent,
    Background,
    Foreground,
    ParentBackground,
    ParentForeground,
    Accent,
}

impl ColorSpec {
    /// Parse a color value. Returns `None` when the value is not a color.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Some(ColorSpec::Default);
        }

        if let Some(name) = value.strip_prefix("p:") {
            return Some(ColorSpec::Palette(name.to_string()));
        }

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).map(ColorSpec::Named);
        }

        if let Ok(index) = value.parse::<u8>() {
            return Some(ColorSpec::Indexed(index));
        }

        let keyword = value.to_ascii_lowercase();
        match keyword.as_str() {
            "default" | "reset" => Some(ColorSpec::Default),
            "transparent" => Some(ColorSpec::Transparent),
            "background" => Some(ColorSpec::Background),
            "foreground" => Some(ColorSpec::Foreground),
            "parentbackground" => Some(ColorSpec::ParentBackground),
            "parentforeground" => Some(ColorSpec::ParentForeground),
            "accent" => Some(ColorSpec::Accent),
            name => named_color(name).map(ColorSpec::Named),
        }
    }

    /// Parse a color value, logging and falling back to the terminal default
    /// when it is not recognised.
    pub fn parse_or_default(value: &str) -> Self {
        Self::parse(value).unwrap_or_else(|| {
            log::warn!("unknown color {value:?}, using the terminal default");
            ColorSpec::Default
        })
    }

    /// Whether the value refers to the active segment's own colors.
    pub fn is_self_reference(&self) -> bool {
        matches!(self, ColorSpec::Background | ColorSpec::Foreground)
    }

    /// Rewrite a self reference into the matching parent reference.
    ///
    /// Any other value, including an existing parent reference, is kept as is:
    /// only one level of ancestry is tracked.
    pub fn to_parent(&self) -> Self {
        match self {
            ColorSpec::Background => ColorSpec::ParentBackground,
            ColorSpec::Foreground => ColorSpec::ParentForeground,
            other => other.clone(),
        }
    }

    pub(crate) fn fg_code(&self) -> Option<String> {
        match self {
            ColorSpec::Named(color) => Some(color.to_fg_str().to_string()),
            ColorSpec::Indexed(index) => Some(format!("38;5;{index}")),
            _ => None,
        }
    }

    pub(crate) fn bg_code(&self) -> Option<String> {
        match self {
            ColorSpec::Named(color) => Some(color.to_bg_str().to_string()),
            ColorSpec::Indexed(index) => Some(format!("48;5;{index}")),
            _ => None,
        }
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSpec::Default => Ok(()),
            ColorSpec::Named(Color::TrueColor { r, g, b }) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            ColorSpec::Named(color) => write!(f, "{}", color_name(*color)),
            ColorSpec::Indexed(index) => write!(f, "{index}"),
            ColorSpec::Palette(name) => write!(f, "p:{name}"),
            ColorSpec::Transparent => f.write_str("transparent"),
            ColorSpec::Background => f.write_str("background"),
            ColorSpec::Foreground => f.write_str("foreground"),
            ColorSpec::ParentBackground => f.write_str("parentBackground"),
            ColorSpec::ParentForeground => f.write_str("parentForeground"),
            ColorSpec::Accent => f.write_str("accent"),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&expanded[range], 16).ok();
    Some(Color::TrueColor {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "purple" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "darkgray" | "lightblack" => Color::BrightBlack,
        "lightred" => Color::BrightRed,
        "lightgreen" => Color::BrightGreen,
        "lightyellow" => Color::BrightYellow,
        "lightblue" => Color::BrightBlue,
        "lightmagenta" | "lightpurple" => Color::BrightMagenta,
        "lightcyan" => Color::BrightCyan,
        "lightwhite" => Color::BrightWhite,
        _ => return None,
    };
    Some(color)
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::Black => "black",
        Color::Red => "red",
        Color::Green => "green",
        Color::Yellow => "yellow",
        Color::Blue => "blue",
        Color::Magenta => "magenta",
        Color::Cyan => "cyan",
        Color::White => "white",
        Color::BrightBlack => "darkGray",
        Color::BrightRed => "lightRed",
        Color::BrightGreen => "lightGreen",
        Color::BrightYellow => "lightYellow",
        Color::BrightBlue => "lightBlue",
        Color::BrightMagenta => "lightMagenta",
        Color::BrightCyan => "lightCyan",
        Color::BrightWhite => "lightWhite",
        Color::TrueColor { .. } => "truecolor",
    }
}
