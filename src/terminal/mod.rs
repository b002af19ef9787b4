//! ANSI emission for prompt text.

pub mod color;
pub mod markup;
pub mod shell;

pub use color::*;
pub use markup::*;
pub use shell::*;

use crate::themes::Palette;
use unicode_width::UnicodeWidthStr;

/// Palette references may point at other palette entries.
const MAX_PALETTE_DEPTH: usize = 8;

/// Concrete colors of a segment, with every reference already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Colors {
    pub background: ColorSpec,
    pub foreground: ColorSpec,
}

/// Buffers prompt text together with the escape sequences that color it, and
/// keeps track of how many columns the text occupies on screen.
pub struct Writer {
    shell: Shell,
    plain: bool,
    palette: Palette,
    terminal_background: ColorSpec,
    accent: ColorSpec,
    current: Colors,
    parent: Colors,
    buffer: String,
    length: usize,
}

impl Writer {
    pub fn new(shell: Shell, plain: bool) -> Self {
        Self {
            shell,
            plain,
            palette: Palette::new(),
            terminal_background: ColorSpec::Default,
            accent: ColorSpec::Default,
            current: Colors::default(),
            parent: Colors::default(),
            buffer: String::new(),
            length: 0,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_terminal_background(mut self, color: ColorSpec) -> Self {
        self.terminal_background = color;
        self
    }

    /// The color the `accent` keyword stands for.
    pub fn with_accent_color(mut self, color: ColorSpec) -> Self {
        self.accent = color;
        self
    }

    pub fn shell(&self) -> Shell {
        self.shell
    }

    pub fn is_plain(&self) -> bool {
        self.plain
    }

    /// Make a segment's colors the target of `background`/`foreground`.
    pub fn set_colors(&mut self, background: &ColorSpec, foreground: &ColorSpec) {
        self.current.background = if background.is_self_reference() {
            ColorSpec::Default
        } else {
            self.resolve(background)
        };
        self.current.foreground = if *foreground == ColorSpec::Foreground {
            ColorSpec::Default
        } else {
            self.resolve(foreground)
        };
    }

    /// Make a segment's colors the target of `parentBackground`/`parentForeground`.
    pub fn set_parent_colors(&mut self, background: &ColorSpec, foreground: &ColorSpec) {
        self.parent = Colors {
            background: self.resolve(background),
            foreground: self.resolve(foreground),
        };
    }

    pub fn current_colors(&self) -> &Colors {
        &self.current
    }

    pub fn parent_colors(&self) -> &Colors {
        &self.parent
    }

    /// Write text, honouring inline color markup.
    pub fn write(&mut self, background: &ColorSpec, foreground: &ColorSpec, text: &str) {
        if text.is_empty() {
            return;
        }
        self.write_markup(background, foreground, &Markup::parse(text));
    }

    pub fn write_markup(&mut self, background: &ColorSpec, foreground: &ColorSpec, markup: &Markup) {
        for span in markup.spans() {
            let bg = self.resolve(span.bg.as_ref().unwrap_or(background));
            let fg = self.resolve(span.fg.as_ref().unwrap_or(foreground));
            self.emit(&bg, &fg, &span.text);
        }
    }

    /// Append a zero-width escape sequence.
    pub fn write_escape(&mut self, sequence: &str) {
        if self.plain {
            return;
        }
        let wrapped = self.shell.wrap_escape(sequence);
        self.buffer.push_str(&wrapped);
    }

    /// Printed length of the buffered text, in terminal columns.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Hand out the buffered text and its printed length, leaving the buffer
    /// empty. Colors are kept.
    pub fn take(&mut self) -> (String, usize) {
        let length = std::mem::take(&mut self.length);
        (std::mem::take(&mut self.buffer), length)
    }

    /// Resolve a color down to a concrete value, `transparent` or the default.
    pub fn resolve(&self, spec: &ColorSpec) -> ColorSpec {
        self.resolve_at(spec, 0)
    }

    fn resolve_at(&self, spec: &ColorSpec, depth: usize) -> ColorSpec {
        match spec {
            ColorSpec::Background => self.current.background.clone(),
            ColorSpec::Foreground => self.current.foreground.clone(),
            ColorSpec::ParentBackground => self.parent.background.clone(),
            ColorSpec::ParentForeground => self.parent.foreground.clone(),
            ColorSpec::Accent => match &self.accent {
                ColorSpec::Accent => ColorSpec::Default,
                color => self.resolve_at(color, depth + 1),
            },
            ColorSpec::Transparent => match &self.terminal_background {
                ColorSpec::Default | ColorSpec::Transparent => ColorSpec::Transparent,
                color => self.resolve_at(color, depth + 1),
            },
            ColorSpec::Palette(name) => {
                if depth >= MAX_PALETTE_DEPTH {
                    log::warn!("palette reference p:{name} is nested too deep");
                    return ColorSpec::Default;
                }
                match self.palette.get(name).and_then(|value| ColorSpec::parse(value)) {
                    Some(color) => self.resolve_at(&color, depth + 1),
                    None => {
                        log::debug!("palette has no color for p:{name}");
                        ColorSpec::Default
                    }
                }
            }
            concrete => concrete.clone(),
        }
    }

    fn emit(&mut self, background: &ColorSpec, foreground: &ColorSpec, text: &str) {
        if text.is_empty() {
            return;
        }

        self.length += text.width();

        if self.plain {
            self.buffer.push_str(text);
            return;
        }

        let mut codes = Vec::new();
        if *foreground == ColorSpec::Transparent {
            // Text in the terminal's own background color: reverse video over
            // the requested background.
            if let Some(code) = background.fg_code() {
                codes.push(code);
                codes.push("7".to_string());
            }
        } else {
            codes.extend(foreground.fg_code());
            codes.extend(background.bg_code());
        }

        if codes.is_empty() {
            self.buffer.push_str(text);
            return;
        }

        self.write_escape(&format!("\x1b[{}m", codes.join(";")));
        self.buffer.push_str(text);
        self.write_escape("\x1b[0m");
    }
}
