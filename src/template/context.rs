use super::TemplateError;
use crate::runtime::Environment;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Data published by enabled segments, keyed by their display name.
#[derive(Debug, Clone, Default)]
pub struct SegmentsCache {
    entries: HashMap<String, Value>,
}

impl SegmentsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, name: impl Into<String>, data: Value) {
        self.entries.insert(name.into(), data);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Values every template can see regardless of the segment rendering it.
#[derive(Debug, Clone)]
pub struct Globals(Value);

impl Globals {
    pub fn new(env: &dyn Environment, vars: &Map<String, Value>) -> Self {
        let flags = env.flags();
        Self(json!({
            "Shell": env.shell().as_str(),
            "PWD": env.pwd(),
            "UserName": env.user(),
            "HostName": env.host(),
            "Code": flags.error_code,
            "Root": env.user() == "root",
            "Var": Value::Object(vars.clone()),
        }))
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Everything a template is evaluated against.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    env: &'a dyn Environment,
    globals: &'a Globals,
    segments: &'a SegmentsCache,
    data: Option<&'a Value>,
    templates: Option<&'a str>,
}

impl<'a> Context<'a> {
    pub fn new(env: &'a dyn Environment, globals: &'a Globals, segments: &'a SegmentsCache) -> Self {
        Self {
            env,
            globals,
            segments,
            data: None,
            templates: None,
        }
    }

    /// Expose a segment's own data as the template root.
    pub fn with_data(mut self, data: &'a Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Expose the output of the segment's template list as `.Templates`.
    pub fn with_templates(mut self, templates: &'a str) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Resolve a dotted field path. The root field must exist; anything
    /// below it resolves to null when absent.
    pub(crate) fn lookup(&self, path: &[String]) -> Result<Value, TemplateError> {
        let Some((root, rest)) = path.split_first() else {
            return Ok(self.data.cloned().unwrap_or(Value::Null));
        };

        let value = match root.as_str() {
            "Segments" => match rest.split_first() {
                Some((name, rest)) => {
                    return Ok(descend(self.segments.get(name).unwrap_or(&Value::Null), rest))
                }
                None => return Ok(Value::Null),
            },
            "Env" => {
                return Ok(match rest.first() {
                    Some(key) => Value::String(self.env.getenv(key)),
                    None => Value::Null,
                })
            }
            "Templates" if self.templates.is_some() => {
                return Ok(Value::String(self.templates.unwrap_or_default().to_string()))
            }
            _ => self
                .data
                .and_then(|data| data.get(root.as_str()))
                .or_else(|| self.globals.get(root)),
        };

        match value {
            Some(value) => Ok(descend(value, rest)),
            None => Err(TemplateError::MissingField(path.join("."))),
        }
    }
}

fn descend(value: &Value, path: &[String]) -> Value {
    path.iter()
        .try_fold(value, |current, key| current.get(key.as_str()))
        .cloned()
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockEnvironment;

    #[test]
    fn test_segment_data_shadows_globals() {
        let env = MockEnvironment::new().with_shell("bash");
        let globals = Globals::new(&env, &Map::new());
        let segments = SegmentsCache::new();
        let data = json!({"Shell": "custom"});
        let context = Context::new(&env, &globals, &segments).with_data(&data);
        assert_eq!(context.lookup(&["Shell".to_string()]).unwrap(), json!("custom"));

        let context = Context::new(&env, &globals, &segments);
        assert_eq!(context.lookup(&["Shell".to_string()]).unwrap(), json!("bash"));
    }

    #[test]
    fn test_nested_misses_are_null() {
        let env = MockEnvironment::new();
        let globals = Globals::new(&env, &Map::new());
        let segments = SegmentsCache::new();
        let data = json!({"Git": {"Branch": "main"}});
        let context = Context::new(&env, &globals, &segments).with_data(&data);
        let path: Vec<String> = vec!["Git".into(), "Upstream".into(), "Name".into()];
        assert_eq!(context.lookup(&path).unwrap(), Value::Null);
    }

    #[test]
    fn test_segments_cache_operations() {
        let mut cache = SegmentsCache::new();
        cache.put("Path", json!({"Path": "~"}));
        assert!(cache.contains("Path"));
        assert_eq!(cache.len(), 1);
        assert!(cache.remove("Path").is_some());
        assert!(cache.is_empty());
    }
}
