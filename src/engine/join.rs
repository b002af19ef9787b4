//! Transition ornaments between consecutive segments: powerline arrows,
//! diamond caps and the color bleed between them.
//!
//! Ornament colors use `background`/`foreground` for the segment being
//! written and `parentBackground`/`parentForeground` for the one written
//! before it; the writer resolves them when the ornament is drawn.

use crate::engine::style::SegmentStyle;
use crate::terminal::{ColorSpec, Colors, Markup, Writer};

/// What the join engine needs to know about an emitted segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSegment {
    pub name: String,
    pub style: SegmentStyle,
    pub enabled: bool,
    pub text: String,
    pub leading_diamond: String,
    pub trailing_diamond: String,
    pub powerline_symbol: String,
    pub leading_powerline_symbol: String,
    pub invert_powerline: bool,
    /// Concrete colors the segment was drawn with.
    pub colors: Colors,
}

impl ActiveSegment {
    fn is_diamond(&self) -> bool {
        self.style == SegmentStyle::Diamond
    }

    fn has_empty_diamond_at_end(&self) -> bool {
        self.is_diamond() && self.trailing_diamond.is_empty()
    }
}

/// A glyph and the colors to draw it with.
#[derive(Debug, Clone, PartialEq)]
pub struct Ornament {
    pub background: ColorSpec,
    pub foreground: ColorSpec,
    pub glyph: Markup,
}

impl Ornament {
    fn new(background: ColorSpec, foreground: ColorSpec, glyph: Markup) -> Self {
        Self {
            background,
            foreground,
            glyph,
        }
    }

    fn text(background: ColorSpec, foreground: ColorSpec, glyph: &str) -> Self {
        Self::new(background, foreground, Markup::parse(glyph))
    }
}

/// Ornaments to draw before `current`, or after it when `last` closes the
/// run (callers then pass `current` as `previous` too).
pub fn plan(previous: Option<&ActiveSegment>, current: &ActiveSegment, last: bool) -> Vec<Ornament> {
    if last && current.is_diamond() {
        return vec![Ornament::text(
            ColorSpec::Transparent,
            ColorSpec::Background,
            &current.trailing_diamond,
        )];
    }

    let mut ornaments = Vec::new();

    // The previous trailing diamond is drawn while `current` is active, so its
    // own color keywords now name the parent.
    let trailing = previous
        .filter(|previous| previous.is_diamond())
        .map(|previous| Markup::parse(&previous.trailing_diamond).parent_relative());

    if let Some(trailing) = &trailing {
        if current.is_diamond() && current.leading_diamond.is_empty() {
            return vec![Ornament::new(
                ColorSpec::Background,
                ColorSpec::ParentBackground,
                trailing.clone(),
            )];
        }
        if !trailing.is_empty() {
            ornaments.push(Ornament::new(
                ColorSpec::Transparent,
                ColorSpec::ParentBackground,
                trailing.clone(),
            ));
        }
    }

    let is_powerline = current.style.is_powerline();
    let previous_powerline = previous.map_or(false, |previous| previous.style.is_powerline());

    if is_powerline && !current.leading_powerline_symbol.is_empty() && !previous_powerline {
        ornaments.push(Ornament::text(
            ColorSpec::Transparent,
            ColorSpec::Background,
            &current.leading_powerline_symbol,
        ));
        return ornaments;
    }

    let symbol = match previous {
        _ if is_powerline => current.powerline_symbol.as_str(),
        Some(previous) if previous_powerline => previous.powerline_symbol.as_str(),
        _ => "",
    };
    if symbol.is_empty() {
        return ornaments;
    }

    let mut background = if last || !is_powerline {
        ColorSpec::Transparent
    } else {
        ColorSpec::Background
    };
    if current.is_diamond() && current.leading_diamond.is_empty() {
        background = ColorSpec::Background;
    }

    let ground = powerline_color(previous, current);
    ornaments.push(if current.invert_powerline {
        Ornament::text(ground, background, symbol)
    } else {
        Ornament::text(background, ground, symbol)
    });
    ornaments
}

/// The color a powerline glyph bleeds from.
fn powerline_color(previous: Option<&ActiveSegment>, current: &ActiveSegment) -> ColorSpec {
    let Some(previous) = previous else {
        return ColorSpec::Transparent;
    };

    if previous.has_empty_diamond_at_end() {
        return previous.colors.background.clone();
    }
    if current.is_diamond() && current.leading_diamond.is_empty() {
        return previous.colors.background.clone();
    }
    if !previous.style.is_powerline() {
        return ColorSpec::Transparent;
    }
    previous.colors.background.clone()
}

/// The leading diamond of `current`, bleeding from a previous diamond that
/// has no cap of its own.
pub fn leading_diamond(previous: Option<&ActiveSegment>, current: &ActiveSegment) -> Ornament {
    let background = match previous {
        Some(previous) if previous.has_empty_diamond_at_end() => previous.colors.background.clone(),
        _ => ColorSpec::Transparent,
    };
    Ornament::text(background, ColorSpec::Background, &current.leading_diamond)
}

pub fn write_ornaments(writer: &mut Writer, ornaments: &[Ornament]) {
    for ornament in ornaments {
        writer.write_markup(&ornament.background, &ornament.foreground, &ornament.glyph);
    }
}
