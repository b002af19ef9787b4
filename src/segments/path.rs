use crate::runtime::Environment;
use crate::segments::{to_data, Properties, SegmentWriter};
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// The working directory.
///
/// Properties: `style` (`full`, `folder` or `short`), `max_depth` for the
/// short style, `home_icon` and `folder_separator_icon`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PathSegment {
    pub path: String,
    pub folder: String,
    pub location: String,
    pub home: bool,
}

impl SegmentWriter for PathSegment {
    fn init(&mut self, properties: &Properties, env: &dyn Environment) {
        let pwd = env.pwd();
        let home = env.home();
        let home_icon = properties.get_string("home_icon", "~");
        let separator = properties.get_string("folder_separator_icon", "/");

        self.location = pwd.clone();
        self.home = !home.is_empty() && pwd == home;

        let display = match pwd.strip_prefix(home.as_str()) {
            Some(rest) if !home.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
                format!("{home_icon}{rest}")
            }
            _ => pwd.clone(),
        };

        self.folder = display
            .rsplit('/')
            .find(|part| !part.is_empty())
            .unwrap_or("/")
            .to_string();

        self.path = match properties.get_string("style", "full").as_str() {
            "folder" => self.folder.clone(),
            "short" => {
                let depth = properties.get_int("max_depth", 2).max(1) as usize;
                shorten(&display, depth, &separator)
            }
            _ => join(&display, &separator),
        };
    }

    fn enabled(&mut self) -> Result<bool> {
        Ok(!self.location.is_empty())
    }

    fn template(&self) -> &'static str {
        " {{ .Path }} "
    }

    fn data(&self) -> Value {
        to_data("path", self)
    }
}

fn join(path: &str, separator: &str) -> String {
    if separator == "/" {
        return path.to_string();
    }
    path.replace('/', separator)
}

/// Keep the root element and the last `depth` folders.
fn shorten(path: &str, depth: usize, separator: &str) -> String {
    let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
    if parts.len() <= depth + 1 {
        return join(path, separator);
    }

    let root = if path.starts_with('/') {
        String::new()
    } else {
        parts[0].to_string()
    };
    let tail = parts[parts.len() - depth..].join(separator);
    format!("{root}{separator}\u{2026}{separator}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockEnvironment;
    use serde_json::json;

    fn path_for(pwd: &str, props: Value) -> PathSegment {
        let env = MockEnvironment::new().with_home("/home/user").with_pwd(pwd);
        let mut writer = PathSegment::default();
        writer.init(&Properties::from(props), &env);
        writer
    }

    #[test]
    fn test_home_is_abbreviated() {
        let writer = path_for("/home/user/src/app", json!({}));
        assert_eq!(writer.path, "~/src/app");
        assert_eq!(writer.folder, "app");
        assert!(!writer.home);

        let writer = path_for("/home/user", json!({}));
        assert_eq!(writer.path, "~");
        assert!(writer.home);
    }

    #[test]
    fn test_sibling_of_home_is_not_abbreviated() {
        assert_eq!(path_for("/home/username", json!({})).path, "/home/username");
    }

    #[test]
    fn test_folder_and_short_styles() {
        assert_eq!(path_for("/var/log/nginx", json!({"style": "folder"})).path, "nginx");
        assert_eq!(path_for("/", json!({"style": "folder"})).path, "/");
        assert_eq!(
            path_for("/home/user/a/b/c/d", json!({"style": "short", "max_depth": 2})).path,
            "~/\u{2026}/c/d"
        );
        assert_eq!(path_for("/usr/local/share/doc", json!({"style": "short", "max_depth": 2})).path, "/\u{2026}/share/doc");
        assert_eq!(path_for("/home/user/a", json!({"style": "short"})).path, "~/a");
    }

    #[test]
    fn test_custom_separator() {
        let writer = path_for("/home/user/src", json!({"folder_separator_icon": " > "}));
        assert_eq!(writer.path, "~ > src");
    }
}
