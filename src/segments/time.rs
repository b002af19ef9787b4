use crate::runtime::Environment;
use crate::segments::{to_data, Properties, SegmentWriter};
use anyhow::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;

/// Wall clock time, formatted with a strftime pattern (`time_format`).
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeSegment {
    pub current_date: String,
    #[serde(skip)]
    now: Option<DateTime<Local>>,
}

impl TimeSegment {
    /// Render a fixed instant instead of the current time.
    pub fn at(now: DateTime<Local>) -> Self {
        Self {
            current_date: String::new(),
            now: Some(now),
        }
    }
}

impl SegmentWriter for TimeSegment {
    fn init(&mut self, properties: &Properties, _env: &dyn Environment) {
        let format = properties.get_string("time_format", "%H:%M:%S");
        let now = self.now.unwrap_or_else(Local::now);
        // chrono reports invalid patterns through the Display impl
        let mut formatted = String::new();
        if std::fmt::write(&mut formatted, format_args!("{}", now.format(&format))).is_err() {
            log::warn!("invalid time_format {format:?}");
            formatted = now.format("%H:%M:%S").to_string();
        }
        self.current_date = formatted;
    }

    fn enabled(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn template(&self) -> &'static str {
        " {{ .CurrentDate }} "
    }

    fn data(&self) -> Value {
        to_data("time", self)
    }
}
