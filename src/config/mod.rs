pub mod defaults;
pub mod loader;

pub use defaults::*;
pub use loader::*;

use crate::segments::Properties;
use crate::template::{self, Context, List, Logic};
use crate::themes::{self, Palette};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub final_space: bool,
    pub console_title_template: String,
    pub terminal_background: String,
    /// Color the `accent` keyword resolves to.
    pub accent_color: String,
    pub palette: Palette,
    pub palettes: Option<Palettes>,
    /// User variables, exposed to templates as `.Var`.
    pub var: Map<String, Value>,
    pub blocks: Vec<Block>,
    pub transient_prompt: Option<ExtraPrompt>,
    pub secondary_prompt: Option<ExtraPrompt>,
    pub debug_prompt: Option<ExtraPrompt>,
    pub valid_line: Option<ExtraPrompt>,
    pub error_line: Option<ExtraPrompt>,
    /// Background/foreground pairs handed out in turn to the drawn segments
    /// of each block, in place of their own colors.
    pub cycle: Vec<CycleColors>,
    /// Template resolving to `osc99`, `osc7` or `osc51`: the escape that
    /// reports the working directory to the terminal.
    pub pwd: String,
    pub patch_pwsh_bleed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleColors {
    pub background: String,
    pub foreground: String,
}

/// Palettes selected at render time by a template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Palettes {
    pub template: String,
    pub list: HashMap<String, Palette>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    Prompt,
    #[serde(rename = "rprompt")]
    RPrompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// What a right aligned block does when it does not fit on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// Move the block to a new line.
    Break,
    /// Drop the block, filling the rest of the line instead.
    Hide,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockType,
    pub alignment: Alignment,
    pub overflow: Option<Overflow>,
    pub force: bool,
    pub filler: String,
    pub newline: bool,
    pub segments: Vec<SegmentConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub alias: String,
    /// Template resolving to `plain`, `powerline`, `accordion` or `diamond`.
    pub style: String,
    pub powerline_symbol: String,
    pub leading_powerline_symbol: String,
    pub invert_powerline: bool,
    pub foreground: String,
    pub foreground_templates: List,
    pub background: String,
    pub background_templates: List,
    pub leading_diamond: String,
    pub trailing_diamond: String,
    pub template: String,
    pub templates: List,
    pub templates_logic: Logic,
    pub properties: Properties,
    /// Text is passed to the shell unescaped.
    pub interactive: bool,
    pub min_width: usize,
    pub max_width: usize,
}

/// A single-segment prompt: transient, secondary, debug, valid and error lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraPrompt {
    pub template: String,
    pub foreground: String,
    pub foreground_templates: List,
    pub background: String,
    pub background_templates: List,
}

impl ExtraPrompt {
    /// Express the prompt as a `text` segment so it goes through the same
    /// evaluation as block segments.
    pub fn to_segment(&self, default_template: &str) -> SegmentConfig {
        let template = if self.template.is_empty() {
            default_template.to_string()
        } else {
            self.template.clone()
        };
        SegmentConfig {
            kind: "text".to_string(),
            template,
            foreground: self.foreground.clone(),
            foreground_templates: self.foreground_templates.clone(),
            background: self.background.clone(),
            background_templates: self.background_templates.clone(),
            ..SegmentConfig::default()
        }
    }
}

impl Config {
    /// The palette in effect: the configured palette, overlaid with the one
    /// `palettes.template` selects, if any.
    pub fn resolve_palette(&self, context: &Context<'_>) -> Palette {
        let mut palette = self.palette.clone();
        let Some(palettes) = &self.palettes else {
            return palette;
        };

        let name = match template::render(&palettes.template, context) {
            Ok(name) => name.trim().to_string(),
            Err(err) => {
                log::warn!("unable to select a palette: {err}");
                return palette;
            }
        };
        if name.is_empty() {
            return palette;
        }

        match palettes.list.get(&name).cloned().or_else(|| themes::get_palette(&name)) {
            Some(selected) => palette.extend(selected),
            None => log::warn!("palette {name:?} not found"),
        }
        palette
    }

    pub fn has_extra_prompts(&self) -> bool {
        self.transient_prompt.is_some()
            || self.secondary_prompt.is_some()
            || self.debug_prompt.is_some()
            || self.valid_line.is_some()
            || self.error_line.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockEnvironment;
    use crate::template::{Globals, SegmentsCache};
    use serde_json::json;

    #[test]
    fn test_block_and_segment_deserialization() {
        let block: Block = serde_json::from_value(json!({
            "type": "rprompt",
            "alignment": "right",
            "overflow": "hide",
            "segments": [{
                "type": "git",
                "style": "diamond",
                "leading_diamond": "\u{e0b6}",
                "background_templates": ["{{ if .Detached }}red{{ end }}"],
                "templates_logic": "join",
                "properties": {"sha_length": 8},
                "min_width": 40
            }]
        }))
        .unwrap();

        assert_eq!(block.kind, BlockType::RPrompt);
        assert_eq!(block.alignment, Alignment::Right);
        assert_eq!(block.overflow, Some(Overflow::Hide));
        assert!(!block.force);
        let segment = &block.segments[0];
        assert_eq!(segment.kind, "git");
        assert_eq!(segment.templates_logic, Logic::Join);
        assert_eq!(segment.background_templates.0.len(), 1);
        assert_eq!(segment.properties.get_int("sha_length", 7), 8);
        assert_eq!(segment.min_width, 40);
        assert_eq!(segment.max_width, 0);
    }

    #[test]
    fn test_palette_selection() {
        let env = MockEnvironment::new().with_env("THEME", "nord");
        let globals = Globals::new(&env, &Map::new());
        let segments = SegmentsCache::new();
        let context = Context::new(&env, &globals, &segments);

        let mut config = Config::default();
        config.palette.insert("accent".to_string(), "#ff0000".to_string());
        config.palettes = Some(Palettes {
            template: "{{ .Env.THEME }}".to_string(),
            list: HashMap::new(),
        });

        let palette = config.resolve_palette(&context);
        assert_eq!(palette.get("accent").map(String::as_str), Some("#ff0000"));
        assert_eq!(palette.get("path"), themes::get_palette("nord").unwrap().get("path"));
    }

    #[test]
    fn test_extra_prompt_as_segment() {
        let prompt = ExtraPrompt {
            foreground: "red".to_string(),
            ..ExtraPrompt::default()
        };
        let segment = prompt.to_segment("> ");
        assert_eq!(segment.kind, "text");
        assert_eq!(segment.template, "> ");
        assert_eq!(segment.foreground, "red");
    }
}
