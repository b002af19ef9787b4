use crate::runtime::Environment;
use crate::segments::{to_data, Properties, SegmentWriter};
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShellSegment {
    pub name: String,
}

impl SegmentWriter for ShellSegment {
    fn init(&mut self, properties: &Properties, env: &dyn Environment) {
        let shell = env.shell().as_str().to_string();
        // mapped_shell_names: {"pwsh": "PS"}
        self.name = properties
            .get_string_map("mapped_shell_names")
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(&shell))
            .map(|(_, value)| value)
            .unwrap_or(shell);
    }

    fn enabled(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn template(&self) -> &'static str {
        " {{ .Name }} "
    }

    fn data(&self) -> Value {
        to_data("shell", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockEnvironment;
    use serde_json::json;

    #[test]
    fn test_shell_name_mapping() {
        let env = MockEnvironment::new().with_shell("powershell");
        let mut writer = ShellSegment::default();
        writer.init(&Properties::from(json!({"mapped_shell_names": {"PWSH": "PS"}})), &env);
        assert_eq!(writer.name, "PS");

        writer.init(&Properties::default(), &MockEnvironment::new().with_shell("zsh"));
        assert_eq!(writer.data(), json!({"Name": "zsh"}));
    }
}
