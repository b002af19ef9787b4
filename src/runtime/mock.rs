use super::{Environment, Flags, SessionCache, WidthError, TOGGLE_CACHE};
use std::collections::HashMap;

/// A fixed environment, for embedding the engine and for tests.
#[derive(Clone)]
pub struct MockEnvironment {
    flags: Flags,
    pwd: String,
    home: String,
    user: String,
    host: String,
    vars: HashMap<String, String>,
    cache: SessionCache,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            flags: Flags {
                shell: "shell".to_string(),
                plain: true,
                ..Flags::default()
            },
            pwd: "/home/user".to_string(),
            home: "/home/user".to_string(),
            user: "user".to_string(),
            host: "localhost".to_string(),
            vars: HashMap::new(),
            cache: SessionCache::new(),
        }
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_shell(mut self, shell: &str) -> Self {
        self.flags.shell = shell.to_string();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.flags.terminal_width = Some(width);
        self
    }

    pub fn with_plain(mut self, plain: bool) -> Self {
        self.flags.plain = plain;
        self
    }

    pub fn with_error_code(mut self, code: i32) -> Self {
        self.flags.error_code = code;
        self
    }

    pub fn with_pwd(mut self, pwd: &str) -> Self {
        self.pwd = pwd.to_string();
        self
    }

    pub fn with_home(mut self, home: &str) -> Self {
        self.home = home.to_string();
        self
    }

    pub fn with_user(mut self, user: &str, host: &str) -> Self {
        self.user = user.to_string();
        self.host = host.to_string();
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_toggles(self, toggles: &str) -> Self {
        self.cache.set(TOGGLE_CACHE, toggles);
        self
    }
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for MockEnvironment {
    fn flags(&self) -> &Flags {
        &self.flags
    }

    fn pwd(&self) -> String {
        self.pwd.clone()
    }

    fn home(&self) -> String {
        self.home.clone()
    }

    fn user(&self) -> String {
        self.user.clone()
    }

    fn host(&self) -> String {
        self.host.clone()
    }

    fn getenv(&self, key: &str) -> String {
        self.vars.get(key).cloned().unwrap_or_default()
    }

    fn terminal_width(&self) -> Result<usize, WidthError> {
        self.flags
            .terminal_width
            .filter(|width| *width > 0)
            .ok_or(WidthError::Unknown)
    }

    fn cache(&self) -> &SessionCache {
        &self.cache
    }
}
