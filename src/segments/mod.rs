//! Segment writers: the capabilities that decide whether a segment has
//! something to show and expose the data its templates render.

pub mod execution;
pub mod git;
pub mod path;
pub mod session;
pub mod shell;
pub mod status;
pub mod text;
pub mod time;

pub use execution::*;
pub use git::*;
pub use path::*;
pub use session::*;
pub use shell::*;
pub use status::*;
pub use text::*;
pub use time::*;

use crate::runtime::Environment;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Trait for all prompt segment writers
pub trait SegmentWriter {
    /// Configure the writer. Called once, before `enabled`.
    fn init(&mut self, properties: &Properties, env: &dyn Environment);

    /// Whether the segment has something to show.
    fn enabled(&mut self) -> Result<bool>;

    /// Template used when the segment does not configure one.
    fn template(&self) -> &'static str;

    /// Fields exposed to templates.
    fn data(&self) -> Value;
}

pub type WriterFactory = fn() -> Box<dyn SegmentWriter>;

/// Maps segment type tags to writer constructors.
pub struct Registry {
    factories: HashMap<String, WriterFactory>,
}

impl Registry {
    /// A registry with every built-in writer.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("text", || Box::new(TextSegment::default()));
        registry.register("path", || Box::new(PathSegment::default()));
        registry.register("status", || Box::new(StatusSegment::default()));
        registry.register("exit", || Box::new(StatusSegment::default()));
        registry.register("session", || Box::new(SessionSegment::default()));
        registry.register("shell", || Box::new(ShellSegment::default()));
        registry.register("time", || Box::new(TimeSegment::default()));
        registry.register("executiontime", || Box::new(ExecutionTimeSegment::default()));
        registry.register("git", || Box::new(GitSegment::default()));
        registry
    }

    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn register(&mut self, kind: &str, factory: WriterFactory) {
        self.factories.insert(kind.to_string(), factory);
    }

    pub fn create(&self, kind: &str) -> Option<Box<dyn SegmentWriter>> {
        self.factories.get(kind).map(|factory| factory())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Free-form per-segment options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(pub Map<String, Value>);

impl Properties {
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(value)) => value.clone(),
            Some(Value::Number(value)) => value.to_string(),
            _ => default.to_string(),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.0.get(key) {
            Some(Value::Number(value)) => value
                .as_i64()
                .or_else(|| value.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            Some(Value::String(value)) => value.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// A list of strings; a single string counts as a one item list.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(value)) if !value.is_empty() => vec![value.clone()],
            _ => Vec::new(),
        }
    }

    pub fn get_string_map(&self, key: &str) -> HashMap<String, String> {
        match self.0.get(key) {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                .collect(),
            _ => HashMap::new(),
        }
    }
}

impl From<Value> for Properties {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

/// Serialize writer data for templates, logging instead of failing.
pub(crate) fn to_data<T: Serialize>(kind: &str, data: &T) -> Value {
    serde_json::to_value(data).unwrap_or_else(|err| {
        log::warn!("unable to expose {kind} data to templates: {err}");
        Value::Null
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_knows_builtin_writers() {
        let registry = Registry::new();
        for kind in ["text", "path", "status", "exit", "session", "shell", "time", "executiontime", "git"] {
            assert!(registry.create(kind).is_some(), "{kind} should be registered");
        }
        assert!(registry.create("battery").is_none());
        assert!(!Registry::empty().contains("text"));
    }

    #[test]
    fn test_property_accessors() {
        let props = Properties::from(json!({
            "name": "x",
            "count": 3,
            "float": 2.9,
            "numeric": "12",
            "flag": true,
            "list": ["a", 1, "b"],
            "single": "~/src",
            "map": {"bash": "BASH", "bad": 1}
        }));
        assert_eq!(props.get_string("name", "d"), "x");
        assert_eq!(props.get_string("missing", "d"), "d");
        assert_eq!(props.get_int("count", 0), 3);
        assert_eq!(props.get_int("float", 0), 2);
        assert_eq!(props.get_int("numeric", 0), 12);
        assert!(props.get_bool("flag", false));
        assert_eq!(props.get_string_list("list"), vec!["a", "b"]);
        assert_eq!(props.get_string_list("single"), vec!["~/src"]);
        assert_eq!(props.get_string_map("map").len(), 1);
    }
}
