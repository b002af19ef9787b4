//! Prompt layout: evaluates the configured blocks, joins their segments and
//! fits them on the terminal line.

pub mod join;
pub mod prompts;
pub mod segment;
pub mod session;
pub mod style;

pub use join::*;
pub use prompts::*;
pub use segment::*;
pub use session::*;
pub use style::*;

use crate::config::{Alignment, Block, BlockType, Config, Overflow};
use crate::runtime::{Environment, Terminal};
use crate::segments::Registry;
use crate::template::{self, Context, Globals};
use crate::terminal::{ColorSpec, Shell, Writer};
use crate::utils::debug_with_context;
use serde_json::json;

/// Free columns a right aligned block needs next to the left content.
const RIGHT_BLOCK_BREATHING_ROOM: isize = 5;
/// Free columns the right prompt needs on the last prompt line.
const RPROMPT_BREATHING_ROOM: isize = 30;

pub struct Engine<'a> {
    config: &'a Config,
    env: &'a dyn Environment,
    registry: Registry,
    globals: Globals,
    session: RenderSession,
    writer: Writer,
}

impl<'a> Engine<'a> {
    pub fn new(config: &'a Config, env: &'a dyn Environment) -> Self {
        Self::with_registry(config, env, Registry::new())
    }

    pub fn with_registry(config: &'a Config, env: &'a dyn Environment, registry: Registry) -> Self {
        let globals = Globals::new(env, &config.var);
        let session = RenderSession::new();

        let (palette, terminal_background, accent) = {
            let context = Context::new(env, &globals, &session.segments);
            let color = |name: &str, template: &str| match template::render(template, &context) {
                Ok(value) => ColorSpec::parse_or_default(&value),
                Err(err) => {
                    log::warn!("unable to resolve {name}: {err}");
                    ColorSpec::Default
                }
            };
            (
                config.resolve_palette(&context),
                color("terminal_background", &config.terminal_background),
                color("accent_color", &config.accent_color),
            )
        };

        let writer = Writer::new(env.shell(), env.flags().plain)
            .with_palette(palette)
            .with_terminal_background(terminal_background)
            .with_accent_color(accent);

        Self {
            config,
            env,
            registry,
            globals,
            session,
            writer,
        }
    }

    pub fn session(&self) -> &RenderSession {
        &self.session
    }

    pub fn current_line_length(&self) -> usize {
        self.session.current_line_length
    }

    /// The full left prompt. For shells that cannot place a right prompt
    /// themselves the right prompt is drawn on the last line.
    pub fn primary(&mut self) -> String {
        let config = self.config;
        let env = self.env;
        let flags = env.flags();
        let native_rprompt = env.shell().supports_rprompt();

        let mut did_render = false;
        for (index, block) in config.blocks.iter().enumerate() {
            // no leading newline on a fresh screen or before anything was printed
            let cancel_newline = if index == 0 {
                flags.cleared || flags.prompt_count == 1
            } else {
                !did_render
            };

            if block.kind == BlockType::RPrompt && native_rprompt {
                continue;
            }

            if self.render_block(block, cancel_newline) {
                did_render = true;
            }
        }

        if config.final_space {
            self.session.write(" ");
            self.session.current_line_length += 1;
        }

        let pwd = self.pwd();
        self.session.write(&pwd);

        if !native_rprompt {
            self.place_rprompt();
        }

        let title = self.console_title();
        format!("{title}{}", self.session.take_prompt())
    }

    /// The right prompt alone, for shells that position it themselves.
    pub fn right(&mut self) -> String {
        let config = self.config;
        let Some(block) = config.blocks.iter().find(|block| block.kind == BlockType::RPrompt) else {
            return String::new();
        };

        let (text, length) = self.write_block_segments(block);
        self.session.rprompt = text.clone();
        self.session.rprompt_length = length;
        text
    }

    fn place_rprompt(&mut self) {
        let (space, fits) = self.can_write_right_block(self.session.rprompt_length, true);
        if !fits {
            return;
        }

        let shell = self.env.shell();
        let plain = self.writer.is_plain();
        let rprompt = std::mem::take(&mut self.session.rprompt);

        if !plain {
            self.session.write(&shell.save_cursor());
        }
        self.session.write(&" ".repeat(space.max(0) as usize));
        self.session.write(&rprompt);
        if !plain {
            self.session.write(&shell.restore_cursor());
        }
        self.session.rprompt = rprompt;
    }

    /// The escape reporting the working directory, when `pwd` names one.
    fn pwd(&self) -> String {
        if self.config.pwd.is_empty() || self.writer.is_plain() {
            return String::new();
        }
        let context = Context::new(self.env, &self.globals, &self.session.segments);
        let kind = match template::render(&self.config.pwd, &context) {
            Ok(kind) => kind,
            Err(err) => {
                log::debug!("pwd template failed: {err}");
                return String::new();
            }
        };
        let env = self.env;
        env.shell()
            .pwd(kind.trim(), &env.user(), &env.host(), &env.pwd())
            .unwrap_or_default()
    }

    fn console_title(&self) -> String {
        if self.config.console_title_template.is_empty() || self.writer.is_plain() {
            return String::new();
        }
        let context = Context::new(self.env, &self.globals, &self.session.segments);
        match template::render(&self.config.console_title_template, &context) {
            Ok(title) => self.env.shell().title(&title),
            Err(err) => {
                log::debug!("console title template failed: {err}");
                String::new()
            }
        }
    }

    /// Whether `length` columns of right aligned content fit on the current
    /// line, and how many columns are left to pad. When it does not fit the
    /// padding is the width minus the content, so a filler can still be drawn.
    pub fn can_write_right_block(&self, length: usize, rprompt: bool) -> (isize, bool) {
        if rprompt && self.session.rprompt.is_empty() {
            return (0, false);
        }

        let width = match self.env.terminal_width() {
            Ok(width) if width > 0 => width as isize,
            Ok(_) => return (0, false),
            Err(err) => {
                log::debug!("right block placement skipped: {err}");
                return (0, false);
            }
        };

        let line = self.session.current_line_length as isize;
        let mut available = width - line;

        // the left content already wraps over several terminal lines
        if available < 0 {
            available = width - line % width;
        }

        available -= length as isize;

        let breathing_room = if rprompt {
            RPROMPT_BREATHING_ROOM
        } else {
            RIGHT_BLOCK_BREATHING_ROOM
        };
        let fits = available >= breathing_room;

        if !fits {
            available = width - length as isize;
        }

        (available, fits)
    }

    /// Tile the rendered filler over `pad_length` columns, topping up with
    /// spaces. `None` when there is no filler or it renders to nothing.
    pub fn should_fill(&mut self, filler: &str, pad_length: isize) -> Option<String> {
        if filler.is_empty() || pad_length <= 0 {
            return None;
        }

        let rendered = {
            let overflow = json!({ "Overflow": self.session.overflow });
            let context = Context::new(self.env, &self.globals, &self.session.segments).with_data(&overflow);
            match template::render(filler, &context) {
                Ok(rendered) => rendered,
                Err(err) => {
                    log::debug!("filler {filler:?} failed: {err}");
                    return None;
                }
            }
        };

        self.writer.set_colors(&ColorSpec::Default, &ColorSpec::Default);
        self.writer.write(&ColorSpec::Default, &ColorSpec::Default, &rendered);
        let (filler, filler_length) = self.writer.take();
        if filler_length == 0 {
            return None;
        }

        let pad_length = pad_length as usize;
        let mut text = filler.repeat(pad_length / filler_length);
        text.push_str(&" ".repeat(pad_length % filler_length));
        Some(text)
    }

    /// Render one block into the prompt. Returns whether anything was written.
    pub fn render_block(&mut self, block: &'a Block, cancel_newline: bool) -> bool {
        let (text, length) = self.write_block_segments(block);

        if !block.force && length == 0 {
            return false;
        }

        if block.newline && !cancel_newline {
            self.session.write_newline();
        }

        match (block.kind, block.alignment) {
            (BlockType::Prompt, Alignment::Left) => {
                self.session.current_line_length += length;
                self.session.write(&text);
            }
            (BlockType::Prompt, Alignment::Right) => self.write_right_block(block, &text, length),
            (BlockType::RPrompt, _) => {
                self.session.rprompt = text;
                self.session.rprompt_length = length;
            }
        }

        self.apply_pwsh_bleed_patch();
        true
    }

    fn write_right_block(&mut self, block: &Block, text: &str, length: usize) {
        let (space, fits) = self.can_write_right_block(length, false);

        if !fits {
            self.session.overflow = block.overflow;
            match block.overflow {
                Some(Overflow::Break) => self.session.write_newline(),
                Some(Overflow::Hide) => {
                    // pad to the end of the current line only, a full width would wrap
                    let remaining = self.env.terminal_width().ok().filter(|width| *width > 0).map(|width| {
                        width as isize - (self.session.current_line_length % width) as isize
                    });
                    if let Some(pad) = remaining.and_then(|remaining| self.should_fill(&block.filler, remaining)) {
                        self.session.write(&pad);
                    }
                    self.session.current_line_length = 0;
                    return;
                }
                None => {}
            }
        }

        match self.should_fill(&block.filler, space) {
            Some(pad) => self.session.write(&pad),
            None if space > 0 => self.session.write(&" ".repeat(space as usize)),
            None => {}
        }
        self.session.write(text);

        // right aligned content ends the line
        self.session.current_line_length = 0;
        self.session.overflow = None;
    }

    /// Evaluate and draw the segments of a block, returning the text and its
    /// printed length.
    pub(crate) fn write_block_segments(&mut self, block: &'a Block) -> (String, usize) {
        let env = self.env;
        let mut segments: Vec<Segment<'a>> = block.segments.iter().map(Segment::new).collect();

        for segment in &mut segments {
            segment.set_enabled(env, &self.registry, &mut self.session.segments);
        }

        for segment in &mut segments {
            segment.set_text(env, &self.globals, &mut self.session.segments);
            self.session.timings.push(SegmentTiming {
                name: segment.name().to_string(),
                enabled: segment.enabled(),
                duration: segment.duration(),
                text: segment.text().to_string(),
            });
        }

        // the join continues from the last segment of the blocks before
        let mut previous = self.session.previous.take();
        if let Some(previous) = &previous {
            self.writer
                .set_parent_colors(&previous.colors.background, &previous.colors.foreground);
        }

        let mut drawn = 0;
        for segment in &mut segments {
            let context = Context::new(env, &self.globals, &self.session.segments);
            let style = segment.style(&context);
            if !segment.enabled() && style != SegmentStyle::Accordion {
                continue;
            }

            let (background, foreground) = self.cycle_colors(segment, &context, drawn);
            self.writer.set_colors(&background, &foreground);
            let current = segment.activate(style, self.writer.current_colors().clone());

            write_ornaments(&mut self.writer, &join::plan(previous.as_ref(), &current, false));
            write_body(&mut self.writer, previous.as_ref(), &current);

            self.writer
                .set_parent_colors(&current.colors.background, &current.colors.foreground);
            previous = Some(current);
            drawn += 1;
        }

        // only a block that drew something closes the run
        if let Some(last) = previous.as_ref().filter(|_| drawn > 0) {
            write_ornaments(&mut self.writer, &join::plan(Some(last), last, true));
        }
        self.session.previous = previous;

        let (text, length) = self.writer.take();
        debug_with_context("engine", &format!("block rendered, {length} columns"));
        (text, length)
    }

    /// Colors for the `index`-th segment drawn in a block. A configured cycle
    /// stands in for the segment's own colors; color templates still apply.
    fn cycle_colors(&self, segment: &mut Segment<'a>, context: &Context<'_>, index: usize) -> (ColorSpec, ColorSpec) {
        let config = self.config;
        let cycle = &config.cycle;
        if !cycle.is_empty() {
            segment.set_fallback_colors(&cycle[index % cycle.len()]);
        }
        (segment.background(context), segment.foreground(context))
    }

    /// Clear to the end of the line after each block so PowerShell does not
    /// bleed the last background color into the rest of the line.
    fn apply_pwsh_bleed_patch(&mut self) {
        if !self.config.patch_pwsh_bleed || self.env.shell() != Shell::Pwsh || self.writer.is_plain() {
            return;
        }
        self.session.write(&self.env.shell().clear_line());
    }
}

fn write_body(writer: &mut Writer, previous: Option<&ActiveSegment>, current: &ActiveSegment) {
    match current.style {
        SegmentStyle::Plain | SegmentStyle::Powerline => {
            writer.write(&ColorSpec::Background, &ColorSpec::Foreground, &current.text)
        }
        SegmentStyle::Diamond => {
            write_ornaments(writer, &[join::leading_diamond(previous, current)]);
            writer.write(&ColorSpec::Background, &ColorSpec::Foreground, &current.text);
        }
        SegmentStyle::Accordion => {
            if current.enabled {
                writer.write(&ColorSpec::Background, &ColorSpec::Foreground, &current.text);
            }
        }
    }
}

/// Keep the last column free in PowerShell when the bleed patch is on, so
/// escape sequences never push the prompt onto the next line.
pub fn patch_terminal_width(config: &Config, terminal: &mut Terminal) {
    if config.patch_pwsh_bleed && terminal.shell() == Shell::Pwsh {
        terminal.rectify_terminal_width(-1);
    }
}
