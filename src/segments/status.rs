use crate::runtime::Environment;
use crate::segments::{to_data, Properties, SegmentWriter};
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// Exit status of the last command.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusSegment {
    pub code: i32,
    pub error: bool,
    pub meaning: String,
    #[serde(skip)]
    always_enabled: bool,
}

impl SegmentWriter for StatusSegment {
    fn init(&mut self, properties: &Properties, env: &dyn Environment) {
        self.code = env.flags().error_code;
        self.error = self.code != 0;
        self.meaning = meaning(self.code).to_string();
        self.always_enabled = properties.get_bool("always_enabled", false);
    }

    fn enabled(&mut self) -> Result<bool> {
        Ok(self.always_enabled || self.error)
    }

    fn template(&self) -> &'static str {
        " {{ if .Error }}\u{2718} {{ .Code }}{{ else }}\u{2714}{{ end }} "
    }

    fn data(&self) -> Value {
        to_data("status", self)
    }
}

/// Conventional reading of POSIX exit codes.
fn meaning(code: i32) -> &'static str {
    match code {
        0 => "",
        1 => "ERROR",
        2 => "USAGE",
        126 => "NOEXEC",
        127 => "NOTFOUND",
        129 => "SIGHUP",
        130 => "SIGINT",
        131 => "SIGQUIT",
        134 => "SIGABRT",
        137 => "SIGKILL",
        139 => "SIGSEGV",
        141 => "SIGPIPE",
        143 => "SIGTERM",
        _ => "",
    }
}
