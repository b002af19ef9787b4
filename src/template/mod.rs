//! A small `{{ .Field }}` style text template renderer.
//!
//! Supported: `{{ .Field.Sub }}`, string/number/bool literals, `if` /
//! `else if` / `else` / `end`, pipes, parentheses, `{{-`/`-}}` trimming and the
//! functions `not`, `and`, `or`, `eq`, `ne`, `lt`, `le`, `gt`, `ge`, `trim`,
//! `upper`, `lower` and `contains`.

pub mod context;
mod eval;
mod parser;

pub use context::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("unclosed action starting at byte {0}")]
    Unterminated(usize),
    #[error("unexpected {0:?}")]
    Unexpected(String),
    #[error("missing {{{{ end }}}}")]
    MissingEnd,
    #[error("can't evaluate field {0}")]
    MissingField(String),
    #[error("function {0:?} not defined")]
    UnknownFunction(String),
    #[error("wrong arguments for {0}")]
    BadArguments(String),
    #[error("invalid syntax: {0}")]
    Syntax(String),
}

/// Render `template` against `context`.
pub fn render(template: &str, context: &Context<'_>) -> Result<String, TemplateError> {
    let nodes = parser::parse(template)?;
    let mut output = String::new();
    eval::render_nodes(&nodes, context, &mut output)?;
    Ok(output)
}

/// How a [`List`] combines the results of its templates. `first_match`
/// stops at the first match, `join` keeps every match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Logic {
    /// The first template producing non-blank text wins.
    #[default]
    FirstMatch,
    /// Every template's output, concatenated.
    Join,
}

/// An ordered list of templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct List(pub Vec<String>);

impl List {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Output of the first template that renders to non-blank text, or
    /// `default` when none does. Failing templates are skipped.
    pub fn first_match(&self, context: &Context<'_>, default: &str) -> String {
        for template in &self.0 {
            match render(template, context) {
                Ok(text) if !text.trim().is_empty() => return text,
                Ok(_) => {}
                Err(err) => log::debug!("skipping template {template:?}: {err}"),
            }
        }
        default.to_string()
    }

    /// Outputs of all templates that render successfully, concatenated.
    pub fn join(&self, context: &Context<'_>) -> String {
        self.0
            .iter()
            .filter_map(|template| match render(template, context) {
                Ok(text) => Some(text),
                Err(err) => {
                    log::debug!("skipping template {template:?}: {err}");
                    None
                }
            })
            .collect()
    }

    pub fn resolve(&self, context: &Context<'_>, default: &str, logic: Logic) -> String {
        match logic {
            Logic::FirstMatch => self.first_match(context, default),
            Logic::Join => {
                let text = self.join(context);
                if text.is_empty() {
                    default.to_string()
                } else {
                    text
                }
            }
        }
    }
}

impl From<Vec<&str>> for List {
    fn from(templates: Vec<&str>) -> Self {
        Self(templates.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockEnvironment;
    use serde_json::json;

    fn render_with(template: &str, data: serde_json::Value) -> Result<String, TemplateError> {
        let env = MockEnvironment::new()
            .with_shell("zsh")
            .with_error_code(2)
            .with_env("EDITOR", "vim");
        let vars = json!({"Name": "posh"});
        let globals = Globals::new(&env, vars.as_object().unwrap());
        let mut segments = SegmentsCache::new();
        segments.put("Git", json!({"Branch": "main"}));
        let context = Context::new(&env, &globals, &segments).with_data(&data);
        render(template, &context)
    }

    #[test]
    fn test_fields_and_globals() {
        let text = render_with(" {{ .Path }} on {{ .Shell }} ({{ .Code }})", json!({"Path": "~/src"}));
        assert_eq!(text.unwrap(), " ~/src on zsh (2)");
    }

    #[test]
    fn test_env_var_and_segments_lookups() {
        let text = render_with("{{ .Env.EDITOR }}|{{ .Var.Name }}|{{ .Segments.Git.Branch }}|{{ .Segments.Path.Path }}", json!({}));
        assert_eq!(text.unwrap(), "vim|posh|main|");
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let err = render_with("{{ .Nope }}", json!({})).unwrap_err();
        assert_eq!(err, TemplateError::MissingField("Nope".to_string()));
        assert_eq!(err.to_string(), "can't evaluate field Nope");
    }

    #[test]
    fn test_conditionals() {
        let template = "{{ if gt .Code 1 }}high{{ else if eq .Code 1 }}one{{ else }}zero{{ end }}";
        assert_eq!(render_with(template, json!({})).unwrap(), "high");
        let template = "{{ if not .Error }}ok{{ end }}";
        assert_eq!(render_with(template, json!({"Error": false})).unwrap(), "ok");
    }

    #[test]
    fn test_and_or_and_parentheses() {
        let template = "{{ if and .A (or .B .C) }}yes{{ else }}no{{ end }}";
        assert_eq!(render_with(template, json!({"A": 1, "B": "", "C": true})).unwrap(), "yes");
        assert_eq!(render_with(template, json!({"A": 1, "B": "", "C": false})).unwrap(), "no");
    }

    #[test]
    fn test_pipes_and_string_functions() {
        let text = render_with("{{ .Name | upper }}-{{ trim \"  x  \" }}-{{ lower `AB` }}", json!({"Name": "git"}));
        assert_eq!(text.unwrap(), "GIT-x-ab");
        let text = render_with("{{ if contains \"feat\" .Branch }}F{{ end }}", json!({"Branch": "feat/x"}));
        assert_eq!(text.unwrap(), "F");
    }

    #[test]
    fn test_whitespace_trimming() {
        let text = render_with("a  {{- .X -}}  b", json!({"X": "|"}));
        assert_eq!(text.unwrap(), "a|b");
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(render_with("{{ .X", json!({})).unwrap_err(), TemplateError::Unterminated(0));
        assert_eq!(render_with("{{ if .X }}a", json!({"X": 1})).unwrap_err(), TemplateError::MissingEnd);
        assert_eq!(render_with("{{ end }}", json!({})).unwrap_err(), TemplateError::Unexpected("end".to_string()));
        assert_eq!(
            render_with("{{ shout .X }}", json!({"X": 1})).unwrap_err(),
            TemplateError::UnknownFunction("shout".to_string())
        );
    }

    #[test]
    fn test_list_first_match_and_join() {
        let env = MockEnvironment::new().with_error_code(1);
        let globals = Globals::new(&env, &serde_json::Map::new());
        let segments = SegmentsCache::new();
        let context = Context::new(&env, &globals, &segments);

        let list = List::from(vec!["{{ .Broken", "{{ if eq .Code 0 }}green{{ end }}", "{{ if gt .Code 0 }}red{{ end }}"]);
        assert_eq!(list.first_match(&context, "white"), "red");
        assert_eq!(List::from(vec!["{{ if eq .Code 0 }}x{{ end }}"]).first_match(&context, "white"), "white");

        let list = List::from(vec!["a", "{{ .Broken", "b"]);
        assert_eq!(list.resolve(&context, "", Logic::Join), "ab");
    }

    #[test]
    fn test_list_logic_names() {
        let env = MockEnvironment::new().with_error_code(3);
        let globals = Globals::new(&env, &serde_json::Map::new());
        let segments = SegmentsCache::new();
        let context = Context::new(&env, &globals, &segments);

        let first: Logic = serde_json::from_str("\"first_match\"").unwrap();
        let join: Logic = serde_json::from_str("\"join\"").unwrap();
        assert_eq!(first, Logic::default());
        assert!(serde_json::from_str::<Logic>("\"any_match\"").is_err());

        let list = List::from(vec![
            "{{ if gt .Code 0 }}failed{{ end }}",
            "{{ if eq .Code 0 }}ok{{ end }}",
            "{{ if gt .Code 2 }} badly{{ end }}",
        ]);
        assert_eq!(list.resolve(&context, "-", first), "failed");
        assert_eq!(list.resolve(&context, "-", join), "failed badly");
    }
}
