use crate::runtime::Environment;
use crate::segments::{to_data, Properties, SegmentWriter};
use crate::utils::format_duration;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

const DEFAULT_THRESHOLD_MS: i64 = 500;

/// Duration of the last command, shown once it exceeds `threshold` ms.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecutionTimeSegment {
    pub ms: i64,
    pub formatted_ms: String,
    #[serde(skip)]
    threshold: i64,
}

impl SegmentWriter for ExecutionTimeSegment {
    fn init(&mut self, properties: &Properties, env: &dyn Environment) {
        self.ms = env.flags().execution_time.max(0.0).round() as i64;
        self.threshold = properties.get_int("threshold", DEFAULT_THRESHOLD_MS);
        self.formatted_ms = format_duration(self.ms);
    }

    fn enabled(&mut self) -> Result<bool> {
        Ok(self.ms > 0 && self.ms >= self.threshold)
    }

    fn template(&self) -> &'static str {
        " {{ .FormattedMs }} "
    }

    fn data(&self) -> Value {
        to_data("executiontime", self)
    }
}
