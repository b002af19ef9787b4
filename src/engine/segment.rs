use crate::config::{CycleColors, SegmentConfig};
use crate::engine::join::ActiveSegment;
use crate::engine::style::SegmentStyle;
use crate::runtime::{Environment, TOGGLE_CACHE};
use crate::segments::{Registry, SegmentWriter};
use crate::template::{self, Context, Globals, SegmentsCache};
use crate::terminal::{ColorSpec, Colors};
use crate::utils::{panic_message, title_case};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

const INCLUDE_FOLDERS: &str = "include_folders";
const EXCLUDE_FOLDERS: &str = "exclude_folders";
const IGNORE_FOLDERS: &str = "ignore_folders";

/// Outcome of deciding whether a segment takes part in the render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Enabled,
    Disabled,
    /// The writer failed or panicked; the segment is shown with this text.
    Failed(String),
}

/// One configured segment during a single render.
pub struct Segment<'a> {
    config: &'a SegmentConfig,
    name: String,
    writer: Option<Box<dyn SegmentWriter>>,
    data: Value,
    enabled: bool,
    failure: Option<String>,
    text: String,
    style: Option<SegmentStyle>,
    foreground: Option<ColorSpec>,
    background: Option<ColorSpec>,
    fallback: Option<&'a CycleColors>,
    duration: Duration,
}

impl<'a> Segment<'a> {
    pub fn new(config: &'a SegmentConfig) -> Self {
        let name = if config.alias.is_empty() {
            title_case(&config.kind)
        } else {
            config.alias.clone()
        };

        Self {
            config,
            name,
            writer: None,
            data: Value::Null,
            enabled: false,
            failure: None,
            text: String::new(),
            style: None,
            foreground: None,
            background: None,
            fallback: None,
            duration: Duration::ZERO,
        }
    }

    /// Display name: the alias, or the title cased type.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.config.kind
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Decide whether the segment takes part in this render. A failing or
    /// panicking writer never takes the prompt down with it: the segment is
    /// forced on and shows the failure instead.
    pub fn set_enabled(
        &mut self,
        env: &dyn Environment,
        registry: &Registry,
        segments: &mut SegmentsCache,
    ) -> Evaluation {
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(env, registry)));
        self.duration = start.elapsed();

        let evaluation = match outcome {
            Ok(Ok(true)) => Evaluation::Enabled,
            Ok(Ok(false)) => Evaluation::Disabled,
            Ok(Err(err)) => Evaluation::Failed(format!("{err:#}")),
            Err(payload) => Evaluation::Failed(panic_message(payload.as_ref())),
        };

        match &evaluation {
            Evaluation::Enabled => {
                self.enabled = true;
                segments.put(self.name.clone(), self.data.clone());
            }
            Evaluation::Failed(detail) => {
                log::error!("{} segment failed: {detail}", self.config.kind);
                self.enabled = true;
                self.failure = Some(format!("error rendering {} segment: {detail}", self.config.kind));
            }
            Evaluation::Disabled => {}
        }

        log::debug!(
            "segment {} evaluated in {:?}: {:?}",
            self.name,
            self.duration,
            evaluation
        );
        evaluation
    }

    fn evaluate(&mut self, env: &dyn Environment, registry: &Registry) -> anyhow::Result<bool> {
        let Some(mut writer) = registry.create(&self.config.kind) else {
            log::warn!("no writer for segment type {:?}", self.config.kind);
            return Ok(false);
        };
        writer.init(&self.config.properties, env);
        self.data = writer.data();
        self.writer = Some(writer);

        if !self.folder_included(env) {
            return Ok(false);
        }

        let toggled = env
            .cache()
            .list(TOGGLE_CACHE)
            .iter()
            .any(|toggle| *toggle == self.config.kind || (!self.config.alias.is_empty() && *toggle == self.config.alias));
        if toggled {
            return Ok(false);
        }

        if self.hidden_for_width(env) {
            return Ok(false);
        }

        let Some(writer) = self.writer.as_mut() else {
            return Ok(false);
        };
        let enabled = writer.enabled()?;
        if enabled {
            self.data = writer.data();
        }
        Ok(enabled)
    }

    fn folder_included(&self, env: &dyn Environment) -> bool {
        let properties = &self.config.properties;
        let pwd = env.pwd();

        let include = properties.get_string_list(INCLUDE_FOLDERS);
        let included = include.is_empty() || env.dir_matches_one_of(&pwd, &include);

        let exclude = if properties.contains(EXCLUDE_FOLDERS) {
            properties.get_string_list(EXCLUDE_FOLDERS)
        } else {
            properties.get_string_list(IGNORE_FOLDERS)
        };
        let excluded = !exclude.is_empty() && env.dir_matches_one_of(&pwd, &exclude);

        included && !excluded
    }

    fn hidden_for_width(&self, env: &dyn Environment) -> bool {
        let (min, max) = (self.config.min_width, self.config.max_width);
        if min == 0 && max == 0 {
            return false;
        }
        let width = match env.terminal_width() {
            Ok(width) => width,
            Err(err) => {
                log::debug!("width gating skipped for {}: {err}", self.name);
                return false;
            }
        };
        (min > 0 && width < min) || (max > 0 && width > max)
    }

    /// Render the segment text. Blank output disables the segment after the
    /// fact and withdraws its data from the registry.
    pub fn set_text(&mut self, env: &dyn Environment, globals: &Globals, segments: &mut SegmentsCache) {
        if !self.enabled {
            return;
        }

        let text = match &self.failure {
            Some(failure) => failure.clone(),
            None => self.render_text(&Context::new(env, globals, segments)),
        };

        if text.chars().all(char::is_whitespace) {
            self.enabled = false;
            segments.remove(&self.name);
        }

        self.text = if self.config.interactive {
            text
        } else {
            env.shell().escape_text(&text)
        };
    }

    fn render_text(&self, context: &Context<'_>) -> String {
        let context = context.with_data(&self.data);

        let mut templates = String::new();
        if !self.config.templates.is_empty() {
            templates = self
                .config
                .templates
                .resolve(&context, "", self.config.templates_logic);
            if self.config.template.is_empty() {
                return templates;
            }
        }

        let source = match (&self.config.template, &self.writer) {
            (template, _) if !template.is_empty() => template.as_str(),
            (_, Some(writer)) => writer.template(),
            (_, None) => "",
        };

        match template::render(source, &context.with_templates(&templates)) {
            Ok(text) => text,
            Err(err) => err.to_string(),
        }
    }

    /// The segment's style, resolved once per render.
    pub fn style(&mut self, context: &Context<'_>) -> SegmentStyle {
        if let Some(style) = self.style {
            return style;
        }
        let style = SegmentStyle::resolve(&self.config.style, &context.with_data(&self.data));
        self.style = Some(style);
        style
    }

    /// Replace the configured colors used when no color template matches.
    /// Has no effect once a color was resolved.
    pub fn set_fallback_colors(&mut self, colors: &'a CycleColors) {
        self.fallback = Some(colors);
    }

    /// Foreground color, resolved once per render.
    pub fn foreground(&mut self, context: &Context<'_>) -> ColorSpec {
        if let Some(color) = &self.foreground {
            return color.clone();
        }
        let fallback = self.fallback.map_or(&self.config.foreground, |colors| &colors.foreground);
        let value = self
            .config
            .foreground_templates
            .first_match(&context.with_data(&self.data), fallback);
        let color = ColorSpec::parse_or_default(&value);
        self.foreground = Some(color.clone());
        color
    }

    /// Background color, resolved once per render.
    pub fn background(&mut self, context: &Context<'_>) -> ColorSpec {
        if let Some(color) = &self.background {
            return color.clone();
        }
        let fallback = self.fallback.map_or(&self.config.background, |colors| &colors.background);
        let value = self
            .config
            .background_templates
            .first_match(&context.with_data(&self.data), fallback);
        let color = ColorSpec::parse_or_default(&value);
        self.background = Some(color.clone());
        color
    }

    /// Freeze what the join engine needs to know about this segment.
    pub fn activate(&self, style: SegmentStyle, colors: Colors) -> ActiveSegment {
        ActiveSegment {
            name: self.name.clone(),
            style,
            enabled: self.enabled,
            text: self.text.clone(),
            leading_diamond: self.config.leading_diamond.clone(),
            trailing_diamond: self.config.trailing_diamond.clone(),
            powerline_symbol: self.config.powerline_symbol.clone(),
            leading_powerline_symbol: self.config.leading_powerline_symbol.clone(),
            invert_powerline: self.config.invert_powerline,
            colors,
        }
    }
}
