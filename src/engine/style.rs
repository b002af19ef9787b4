use crate::template::{self, Context};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentStyle {
    #[default]
    Plain,
    Powerline,
    /// Powerline that still draws its separator when the segment is disabled.
    Accordion,
    Diamond,
}

impl SegmentStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" => Some(SegmentStyle::Plain),
            "powerline" => Some(SegmentStyle::Powerline),
            "accordion" => Some(SegmentStyle::Accordion),
            "diamond" => Some(SegmentStyle::Diamond),
            _ => None,
        }
    }

    /// Render a style template. Render errors, empty output and unknown
    /// names all mean `Plain`.
    pub fn resolve(template: &str, context: &Context<'_>) -> Self {
        if template.is_empty() {
            return SegmentStyle::Plain;
        }
        let value = match template::render(template, context) {
            Ok(value) => value,
            Err(err) => {
                log::debug!("style template {template:?} failed: {err}");
                return SegmentStyle::Plain;
            }
        };
        if value.trim().is_empty() {
            return SegmentStyle::Plain;
        }
        Self::parse(&value).unwrap_or_else(|| {
            log::warn!("unknown segment style {value:?}, using plain");
            SegmentStyle::Plain
        })
    }

    pub fn is_powerline(self) -> bool {
        matches!(self, SegmentStyle::Powerline | SegmentStyle::Accordion)
    }
}

impl fmt::Display for SegmentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SegmentStyle::Plain => "plain",
            SegmentStyle::Powerline => "powerline",
            SegmentStyle::Accordion => "accordion",
            SegmentStyle::Diamond => "diamond",
        })
    }
}
