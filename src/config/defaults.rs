use crate::config::*;
use crate::template::List;
use serde_json::json;

impl Default for Config {
    fn default() -> Self {
        Self {
            final_space: true,
            console_title_template: String::new(),
            terminal_background: String::new(),
            accent_color: String::new(),
            palette: Palette::new(),
            palettes: None,
            var: Map::new(),
            blocks: Vec::new(),
            transient_prompt: None,
            secondary_prompt: None,
            debug_prompt: None,
            valid_line: None,
            error_line: None,
            cycle: Vec::new(),
            pwd: String::new(),
            patch_pwsh_bleed: false,
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Self {
            kind: BlockType::Prompt,
            alignment: Alignment::Left,
            overflow: None,
            force: false,
            filler: String::new(),
            newline: false,
            segments: Vec::new(),
        }
    }
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            kind: String::new(),
            alias: String::new(),
            style: String::new(),
            powerline_symbol: String::new(),
            leading_powerline_symbol: String::new(),
            invert_powerline: false,
            foreground: String::new(),
            foreground_templates: List::default(),
            background: String::new(),
            background_templates: List::default(),
            leading_diamond: String::new(),
            trailing_diamond: String::new(),
            template: String::new(),
            templates: List::default(),
            templates_logic: Logic::FirstMatch,
            properties: Properties::default(),
            interactive: false,
            min_width: 0,
            max_width: 0,
        }
    }
}

impl Default for ExtraPrompt {
    fn default() -> Self {
        Self {
            template: String::new(),
            foreground: String::new(),
            foreground_templates: List::default(),
            background: String::new(),
            background_templates: List::default(),
        }
    }
}

const POWERLINE_SYMBOL: &str = "\u{e0b0}";
const LEFT_CAP: &str = "\u{e0b6}";

impl Config {
    /// The theme used when no configuration file is found: a powerline
    /// line with user, path, git and status, execution time and clock on
    /// the right, and a prompt character on the next line.
    pub fn builtin() -> Self {
        let powerline = |kind: &str, role: &str| SegmentConfig {
            kind: kind.to_string(),
            style: "powerline".to_string(),
            powerline_symbol: POWERLINE_SYMBOL.to_string(),
            background: format!("p:{role}"),
            foreground: format!("p:{role}-text"),
            ..SegmentConfig::default()
        };

        let left = Block {
            segments: vec![
                SegmentConfig {
                    style: "diamond".to_string(),
                    leading_diamond: LEFT_CAP.to_string(),
                    ..powerline("session", "session")
                },
                SegmentConfig {
                    properties: Properties::from(json!({"style": "short", "max_depth": 3})),
                    ..powerline("path", "path")
                },
                powerline("git", "git"),
                SegmentConfig {
                    background_templates: List::from(vec!["{{ if .Error }}p:error{{ end }}"]),
                    ..powerline("status", "status")
                },
            ],
            ..Block::default()
        };

        let right = Block {
            alignment: Alignment::Right,
            overflow: Some(Overflow::Hide),
            segments: vec![
                SegmentConfig {
                    style: "plain".to_string(),
                    foreground: "p:execution".to_string(),
                    ..powerline("executiontime", "execution")
                },
                // plain, so the prompt line below does not inherit a cap
                SegmentConfig {
                    style: "plain".to_string(),
                    foreground: "p:time".to_string(),
                    background: String::new(),
                    ..powerline("time", "time")
                },
            ],
            ..Block::default()
        };

        let prompt_char = Block {
            newline: true,
            segments: vec![SegmentConfig {
                kind: "text".to_string(),
                style: "plain".to_string(),
                template: "\u{276f}".to_string(),
                foreground: "p:git".to_string(),
                foreground_templates: List::from(vec!["{{ if gt .Code 0 }}p:error{{ end }}"]),
                ..SegmentConfig::default()
            }],
            ..Block::default()
        };

        Self {
            palette: themes::get_palette("dark").unwrap_or_default(),
            palettes: Some(Palettes {
                template: "{{ .Env.POWERPROMPT_PALETTE }}".to_string(),
                list: HashMap::new(),
            }),
            blocks: vec![left, right, prompt_char],
            transient_prompt: Some(ExtraPrompt {
                foreground: "p:git".to_string(),
                foreground_templates: List::from(vec!["{{ if gt .Code 0 }}p:error{{ end }}"]),
                ..ExtraPrompt::default()
            }),
            secondary_prompt: Some(ExtraPrompt {
                foreground: "p:path-text".to_string(),
                ..ExtraPrompt::default()
            }),
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_theme_shape() {
        let config = Config::builtin();
        assert_eq!(config.blocks.len(), 3);
        assert_eq!(config.blocks[1].alignment, Alignment::Right);
        assert!(config.blocks[2].newline);
        assert!(config.has_extra_prompts());
        assert!(config.final_space);
        assert!(config.palette.contains_key("path"));
    }

    #[test]
    fn test_builtin_theme_survives_a_json_round_trip() {
        let config = Config::builtin();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.blocks.len(), config.blocks.len());
        assert_eq!(parsed.blocks[0].segments[0].leading_diamond, LEFT_CAP);
    }
}
