use powerprompt::config::{self, CONFIG_ENV};
use powerprompt::runtime::MockEnvironment;
use powerprompt::{Alignment, BlockType, Engine, Overflow};
use tempfile::TempDir;
use tokio::fs;

const THEME: &str = r##"{
    "final_space": false,
    "console_title_template": "{{ .Shell }}",
    "palette": { "accent": "#61afef" },
    "var": { "Greeting": "hi" },
    "blocks": [
        {
            "type": "prompt",
            "alignment": "left",
            "segments": [
                {
                    "type": "text",
                    "style": "powerline",
                    "powerline_symbol": ">",
                    "background": "p:accent",
                    "template": "{{ .Var.Greeting }}"
                },
                {
                    "type": "path",
                    "style": "powerline",
                    "powerline_symbol": ">",
                    "properties": { "style": "folder" }
                }
            ]
        },
        {
            "type": "prompt",
            "alignment": "right",
            "overflow": "break",
            "filler": ".",
            "segments": [{ "type": "text", "template": "R" }]
        }
    ],
    "secondary_prompt": { "template": "... " }
}"##;

#[tokio::test]
async fn test_load_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("theme.json");
    fs::write(&path, THEME).await.unwrap();

    let config = config::load_config_file(&path).await.unwrap();
    assert!(!config.final_space);
    assert_eq!(config.blocks.len(), 2);
    assert_eq!(config.blocks[0].kind, BlockType::Prompt);
    assert_eq!(config.blocks[1].alignment, Alignment::Right);
    assert_eq!(config.blocks[1].overflow, Some(Overflow::Break));
    assert_eq!(config.blocks[0].segments[1].properties.get_string("style", "full"), "folder");
    assert!(config.has_extra_prompts());
}

#[tokio::test]
async fn test_loaded_theme_renders() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("theme.json");
    fs::write(&path, THEME).await.unwrap();
    let config = config::load_config(Some(path)).await.unwrap();

    let env = MockEnvironment::new().with_pwd("/srv/www").with_width(30);
    let mut engine = Engine::new(&config, &env);
    // the path keeps its default padding, and the right block opens with the
    // arrow carried over from it: 30 - 10 - 2 columns are left
    assert_eq!(engine.primary(), format!(">hi> www >{}>R", ".".repeat(18)));
    assert_eq!(
        engine.extra_prompt(powerprompt::ExtraPromptKind::Secondary),
        "... "
    );
}

#[tokio::test]
async fn test_explicit_path_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.json");
    let err = config::load_config(Some(missing)).await.unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[tokio::test]
async fn test_invalid_json_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{ \"blocks\": [ }").await.unwrap();
    let err = config::load_config_file(&path).await.unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[tokio::test]
async fn test_unknown_keys_are_ignored_and_defaults_apply() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("minimal.json");
    fs::write(&path, r#"{ "version": 3, "blocks": [ { "segments": [ { "type": "text" } ] } ] }"#)
        .await
        .unwrap();

    let config = config::load_config_file(&path).await.unwrap();
    assert!(config.final_space);
    assert_eq!(config.blocks[0].alignment, Alignment::Left);
    assert_eq!(config.blocks[0].segments[0].style, "");
}

#[tokio::test]
async fn test_environment_variable_points_at_the_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("from-env.json");
    fs::write(&path, r#"{ "final_space": false }"#).await.unwrap();

    std::env::set_var(CONFIG_ENV, &path);
    let config = config::load_config(None).await.unwrap();
    std::env::remove_var(CONFIG_ENV);

    assert!(!config.final_space);
    assert!(config.blocks.is_empty());
}

#[test]
fn test_search_paths_start_with_the_working_directory() {
    let paths = config::get_config_search_paths();
    assert_eq!(paths[0], std::path::PathBuf::from(".powerprompt.json"));
}
