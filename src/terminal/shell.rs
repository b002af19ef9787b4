use std::fmt;

/// The shell the prompt is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Pwsh,
    Nu,
    Cmd,
    #[default]
    Generic,
}

impl Shell {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "bash" => Shell::Bash,
            "zsh" => Shell::Zsh,
            "fish" => Shell::Fish,
            "pwsh" | "powershell" => Shell::Pwsh,
            "nu" => Shell::Nu,
            "cmd" => Shell::Cmd,
            _ => Shell::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::Pwsh => "pwsh",
            Shell::Nu => "nu",
            Shell::Cmd => "cmd",
            Shell::Generic => "shell",
        }
    }

    /// Shells that position a right prompt themselves.
    pub fn supports_rprompt(&self) -> bool {
        matches!(self, Shell::Zsh | Shell::Fish | Shell::Nu)
    }

    /// Wrap a zero-width escape sequence so the shell does not count it
    /// towards the prompt length.
    pub fn wrap_escape(&self, sequence: &str) -> String {
        match self {
            Shell::Bash => format!("\\[{sequence}\\]"),
            Shell::Zsh => format!("%{{{sequence}%}}"),
            _ => sequence.to_string(),
        }
    }

    /// Escape characters in segment text that the shell would otherwise
    /// interpret while expanding the prompt.
    pub fn escape_text(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match (self, c) {
                (Shell::Bash, '`') | (Shell::Zsh, '`') => escaped.push_str("\\`"),
                (Shell::Bash, '\\') => escaped.push_str("\\\\"),
                (Shell::Zsh, '%') => escaped.push_str("%%"),
                _ => escaped.push(c),
            }
        }
        escaped
    }

    pub fn title(&self, title: &str) -> String {
        self.wrap_escape(&format!("\x1b]0;{title}\x07"))
    }

    pub fn save_cursor(&self) -> String {
        self.wrap_escape("\x1b7")
    }

    pub fn restore_cursor(&self) -> String {
        self.wrap_escape("\x1b8")
    }

    pub fn clear_line(&self) -> String {
        self.wrap_escape("\x1b[K")
    }

    /// Report the working directory to the terminal. `kind` is `osc99`,
    /// `osc7` or `osc51`; anything else yields `None`.
    pub fn pwd(&self, kind: &str, user: &str, host: &str, pwd: &str) -> Option<String> {
        // bash expands backslashes in the prompt string
        let terminator = if *self == Shell::Bash { "\x1b\\\\" } else { "\x1b\\" };
        let sequence = match kind.to_ascii_lowercase().as_str() {
            "osc99" => format!("\x1b]9;9;{pwd}{terminator}"),
            "osc7" => format!("\x1b]7;file://{host}/{}{terminator}", pwd.trim_start_matches('/')),
            "osc51" => format!("\x1b]51;A{user}@{host}:{pwd}{terminator}"),
            _ => return None,
        };
        Some(self.wrap_escape(&sequence))
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_escapes_backticks_and_backslashes() {
        assert_eq!(Shell::Bash.escape_text(r"a`b\c"), r"a\`b\\c");
    }

    #[test]
    fn test_zsh_escapes_backticks_and_percent() {
        assert_eq!(Shell::Zsh.escape_text("50% `x`"), "50%% \\`x\\`");
    }

    #[test]
    fn test_other_shells_leave_text_alone() {
        assert_eq!(Shell::Fish.escape_text(r"50% `x` \"), r"50% `x` \");
    }

    #[test]
    fn test_escape_wrappers() {
        assert_eq!(Shell::Bash.wrap_escape("\x1b[0m"), "\\[\x1b[0m\\]");
        assert_eq!(Shell::Zsh.wrap_escape("\x1b[0m"), "%{\x1b[0m%}");
        assert_eq!(Shell::Generic.wrap_escape("\x1b[0m"), "\x1b[0m");
    }

    #[test]
    fn test_pwd_sequences() {
        assert_eq!(
            Shell::Fish.pwd("osc7", "me", "box", "/srv/www").as_deref(),
            Some("\x1b]7;file://box/srv/www\x1b\\")
        );
        assert_eq!(
            Shell::Zsh.pwd("OSC99", "me", "box", "/tmp").as_deref(),
            Some("%{\x1b]9;9;/tmp\x1b\\%}")
        );
        assert_eq!(
            Shell::Bash.pwd("osc51", "me", "box", "/tmp").as_deref(),
            Some("\\[\x1b]51;Ame@box:/tmp\x1b\\\\\\]")
        );
        assert_eq!(Shell::Fish.pwd("osc8", "me", "box", "/tmp"), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Shell::from_name("PowerShell"), Shell::Pwsh);
        assert_eq!(Shell::from_name("elvish"), Shell::Generic);
    }
}
