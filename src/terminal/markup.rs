//! Inline color markup: `<fg,bg>text</>`.
//!
//! Rendered text and glyphs may carry color overrides. They are parsed into a
//! list of spans so that color keywords can be rewritten structurally (for
//! example when a trailing diamond is drawn on behalf of a segment that is no
//! longer the active one) instead of by string substitution.

use super::color::ColorSpec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Foreground override; `None` inherits the color passed to the writer.
    pub fg: Option<ColorSpec>,
    /// Background override; `None` inherits the color passed to the writer.
    pub bg: Option<ColorSpec>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup {
    spans: Vec<Span>,
}

impl Markup {
    pub fn parse(text: &str) -> Self {
        let mut spans = Vec::new();
        let mut fg = None;
        let mut bg = None;
        let mut literal = String::new();
        let mut rest = text;

        while let Some(start) = rest.find('<') {
            literal.push_str(&rest[..start]);
            let tail = &rest[start..];

            if let Some(after) = tail.strip_prefix("</>") {
                flush(&mut spans, &mut literal, &fg, &bg);
                fg = None;
                bg = None;
                rest = after;
                continue;
            }

            match tail[1..].find(|c| c == '<' || c == '>') {
                Some(end) if tail.as_bytes()[end + 1] == b'>' => {
                    if let Some((anchor_fg, anchor_bg)) = parse_anchor(&tail[1..end + 1]) {
                        flush(&mut spans, &mut literal, &fg, &bg);
                        fg = anchor_fg;
                        bg = anchor_bg;
                    } else {
                        literal.push_str(&tail[..end + 2]);
                    }
                    rest = &tail[end + 2..];
                }
                _ => {
                    literal.push('<');
                    rest = &tail[1..];
                }
            }
        }

        literal.push_str(rest);
        flush(&mut spans, &mut literal, &fg, &bg);
        Self { spans }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }

    /// Text without any color anchors.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Rewrite `background`/`foreground` overrides to `parentBackground`/
    /// `parentForeground`. Existing parent references are left untouched.
    pub fn parent_relative(&self) -> Self {
        let spans = self
            .spans
            .iter()
            .map(|span| Span {
                fg: span.fg.as_ref().map(ColorSpec::to_parent),
                bg: span.bg.as_ref().map(ColorSpec::to_parent),
                text: span.text.clone(),
            })
            .collect();
        Self { spans }
    }
}

fn flush(spans: &mut Vec<Span>, literal: &mut String, fg: &Option<ColorSpec>, bg: &Option<ColorSpec>) {
    if literal.is_empty() {
        return;
    }
    spans.push(Span {
        fg: fg.clone(),
        bg: bg.clone(),
        text: std::mem::take(literal),
    });
}

type Anchor = (Option<ColorSpec>, Option<ColorSpec>);

fn parse_anchor(inner: &str) -> Option<Anchor> {
    let (fg, bg) = match inner.split_once(',') {
        Some((fg, bg)) => (fg.trim(), bg.trim()),
        None => (inner.trim(), ""),
    };

    if fg.is_empty() && bg.is_empty() {
        return None;
    }

    let part = |value: &str| -> Option<Option<ColorSpec>> {
        if value.is_empty() {
            return Some(None);
        }
        ColorSpec::parse(value).map(Some)
    };

    Some((part(fg)?, part(bg)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_single_span() {
        let markup = Markup::parse(" ~/src ");
        assert_eq!(markup.spans().len(), 1);
        assert_eq!(markup.spans()[0].fg, None);
        assert_eq!(markup.plain_text(), " ~/src ");
    }

    #[test]
    fn test_anchor_with_both_colors() {
        let markup = Markup::parse("a<red,#000000>b</>c");
        let spans = markup.spans();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].text, "b");
        assert_eq!(spans[1].fg, ColorSpec::parse("red"));
        assert_eq!(spans[1].bg, ColorSpec::parse("#000000"));
        assert_eq!(spans[2].fg, None);
    }

    #[test]
    fn test_background_only_anchor() {
        let markup = Markup::parse("<,background>\u{e0b4}</>");
        assert_eq!(markup.spans()[0].fg, None);
        assert_eq!(markup.spans()[0].bg, Some(ColorSpec::Background));
    }

    #[test]
    fn test_non_color_angle_brackets_stay_literal() {
        let markup = Markup::parse("<=> a < b <tag>");
        assert_eq!(markup.plain_text(), "<=> a < b <tag>");
        assert!(markup.spans().iter().all(|span| span.fg.is_none()));
    }

    #[test]
    fn test_parent_relative_rewrites_self_references_only() {
        let markup = Markup::parse("<background,parentForeground>\u{e0b0}</>").parent_relative();
        assert_eq!(markup.spans()[0].fg, Some(ColorSpec::ParentBackground));
        assert_eq!(markup.spans()[0].bg, Some(ColorSpec::ParentForeground));
    }

    #[test]
    fn test_empty_markup() {
        assert!(Markup::parse("").is_empty());
        assert!(Markup::parse("<red></>").is_empty());
    }
}
