use crate::config::ExtraPrompt;
use crate::engine::{Engine, Segment};
use crate::template::Context;
use crate::terminal::ColorSpec;
use colored::Colorize;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Single-segment prompts printed outside of the block layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraPromptKind {
    Transient,
    Secondary,
    Debug,
    Valid,
    Error,
}

impl ExtraPromptKind {
    fn default_template(self) -> &'static str {
        match self {
            ExtraPromptKind::Transient => "{{ .Shell }}> ",
            ExtraPromptKind::Secondary => "> ",
            ExtraPromptKind::Debug => "[DBG]: ",
            ExtraPromptKind::Valid | ExtraPromptKind::Error => "",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ExtraPromptKind::Transient => "transient",
            ExtraPromptKind::Secondary => "secondary",
            ExtraPromptKind::Debug => "debug",
            ExtraPromptKind::Valid => "valid",
            ExtraPromptKind::Error => "error",
        }
    }
}

impl FromStr for ExtraPromptKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "transient" => Ok(ExtraPromptKind::Transient),
            "secondary" => Ok(ExtraPromptKind::Secondary),
            "debug" => Ok(ExtraPromptKind::Debug),
            "valid" => Ok(ExtraPromptKind::Valid),
            "error" => Ok(ExtraPromptKind::Error),
            other => Err(format!("unknown prompt {other:?}")),
        }
    }
}

impl fmt::Display for ExtraPromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> Engine<'a> {
    /// Render one of the extra prompts through the regular segment pipeline.
    pub fn extra_prompt(&mut self, kind: ExtraPromptKind) -> String {
        let prompt = match kind {
            ExtraPromptKind::Transient => &self.config.transient_prompt,
            ExtraPromptKind::Secondary => &self.config.secondary_prompt,
            ExtraPromptKind::Debug => &self.config.debug_prompt,
            ExtraPromptKind::Valid => &self.config.valid_line,
            ExtraPromptKind::Error => &self.config.error_line,
        };

        let mut config = prompt.clone().unwrap_or_else(ExtraPrompt::default).to_segment(kind.default_template());
        config.alias = crate::utils::title_case(kind.as_str());

        let env = self.env;
        let mut segment = Segment::new(&config);
        segment.set_enabled(env, &self.registry, &mut self.session.segments);
        segment.set_text(env, &self.globals, &mut self.session.segments);
        if !segment.enabled() {
            return String::new();
        }

        let context = Context::new(env, &self.globals, &self.session.segments);
        let background = segment.background(&context);
        let foreground = segment.foreground(&context);
        self.writer.set_colors(&background, &foreground);
        self.writer
            .write(&ColorSpec::Background, &ColorSpec::Foreground, segment.text());
        self.writer.take().0
    }

    /// Evaluate every block and list each segment with its outcome, timing and
    /// text.
    pub fn debug_report(&mut self) -> String {
        let start = Instant::now();
        let config = self.config;
        for block in &config.blocks {
            self.write_block_segments(block);
        }
        let elapsed = start.elapsed();

        let plain = self.writer.is_plain();
        let heading = |text: &str| {
            if plain {
                text.to_string()
            } else {
                text.bold().to_string()
            }
        };

        let timings = self.session.timings();
        let width = timings.iter().map(|timing| timing.name.len()).max().unwrap_or(0);

        let mut report = format!("\n{}\n\n", heading("Segments:"));
        for timing in timings {
            report.push_str(&format!(
                "{:<width$} ({}) - {:>8.2} ms - {}\n",
                timing.name,
                timing.enabled,
                timing.duration.as_secs_f64() * 1000.0,
                timing.text,
            ));
        }
        report.push_str(&format!(
            "\n{} {:.2} ms\n",
            heading("Run duration:"),
            elapsed.as_secs_f64() * 1000.0
        ));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ExtraPrompt};
    use crate::runtime::MockEnvironment;

    #[test]
    fn test_default_templates() {
        let env = MockEnvironment::new().with_shell("fish");
        let config = Config::default();
        let mut engine = Engine::new(&config, &env);
        assert_eq!(engine.extra_prompt(ExtraPromptKind::Transient), "fish> ");
        assert_eq!(engine.extra_prompt(ExtraPromptKind::Secondary), "> ");
        assert_eq!(engine.extra_prompt(ExtraPromptKind::Debug), "[DBG]: ");
        assert_eq!(engine.extra_prompt(ExtraPromptKind::Valid), "");
    }

    #[test]
    fn test_configured_template_and_colors() {
        let env = MockEnvironment::new().with_plain(false).with_error_code(1);
        let config = Config {
            error_line: Some(ExtraPrompt {
                template: "x".to_string(),
                foreground: "green".to_string(),
                foreground_templates: vec!["{{ if gt .Code 0 }}red{{ end }}"].into(),
                ..ExtraPrompt::default()
            }),
            ..Config::default()
        };
        let mut engine = Engine::new(&config, &env);
        assert_eq!(engine.extra_prompt(ExtraPromptKind::Error), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("valid".parse::<ExtraPromptKind>(), Ok(ExtraPromptKind::Valid));
        assert!("primary".parse::<ExtraPromptKind>().is_err());
        assert_eq!(ExtraPromptKind::Secondary.to_string(), "secondary");
    }
}
