use crate::runtime::Environment;
use crate::segments::{to_data, Properties, SegmentWriter};
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// Static text, usually shaped entirely by the segment's template.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextSegment {
    pub text: String,
}

impl SegmentWriter for TextSegment {
    fn init(&mut self, properties: &Properties, _env: &dyn Environment) {
        self.text = properties.get_string("text", "");
    }

    fn enabled(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn template(&self) -> &'static str {
        "{{ .Text }}"
    }

    fn data(&self) -> Value {
        to_data("text", self)
    }
}
