use crate::runtime::Environment;
use crate::segments::{to_data, Properties, SegmentWriter};
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// User and host, flagging remote sessions.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionSegment {
    pub user_name: String,
    pub host_name: String,
    #[serde(rename = "SSHSession")]
    pub ssh_session: bool,
    pub root: bool,
}

impl SegmentWriter for SessionSegment {
    fn init(&mut self, _properties: &Properties, env: &dyn Environment) {
        self.user_name = env.user();
        self.host_name = env.host();
        self.root = self.user_name == "root";
        self.ssh_session = ["SSH_CONNECTION", "SSH_CLIENT", "SSH_TTY"]
            .iter()
            .any(|key| !env.getenv(key).is_empty());
    }

    fn enabled(&mut self) -> Result<bool> {
        Ok(!self.user_name.is_empty() || !self.host_name.is_empty())
    }

    fn template(&self) -> &'static str {
        " {{ if .SSHSession }}\u{eba9} {{ end }}{{ .UserName }}@{{ .HostName }} "
    }

    fn data(&self) -> Value {
        to_data("session", self)
    }
}
