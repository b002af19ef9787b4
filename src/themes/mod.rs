use std::collections::HashMap;

/// Named colors a theme can refer to as `p:<name>`.
pub type Palette = HashMap<String, String>;

pub const BUILTIN_PALETTES: &[&str] = &["dark", "light", "nord", "tokyo-night", "rose-pine"];

/// Look up one of the bundled palettes by name.
///
/// Every palette defines a background color per segment role (`path`, `git`,
/// `status`, `time`, `session`, `error`, `execution`, `shell`) and the text
/// color to draw on it (`<role>-text`).
pub fn get_palette(name: &str) -> Option<Palette> {
    let palette = match name {
        "dark" => dark_palette(),
        "light" => light_palette(),
        "nord" => nord_palette(),
        "tokyo-night" => tokyo_night_palette(),
        "rose-pine" => rose_pine_palette(),
        _ => return None,
    };
    Some(palette)
}

fn palette(roles: &[(&str, &str, &str)]) -> Palette {
    let mut colors = HashMap::new();
    for (role, bg, fg) in roles {
        colors.insert(role.to_string(), bg.to_string());
        colors.insert(format!("{role}-text"), fg.to_string());
    }
    colors
}

fn dark_palette() -> Palette {
    palette(&[
        ("path", "#2d3748", "#e2e8f0"),
        ("git", "#38a169", "#f7fafc"),
        ("status", "#3182ce", "#f7fafc"),
        ("time", "#d69e2e", "#1a202c"),
        ("session", "#805ad5", "#f7fafc"),
        ("error", "#e53e3e", "#f7fafc"),
        ("execution", "#38b2ac", "#f7fafc"),
        ("shell", "#ed8936", "#f7fafc"),
    ])
}

fn light_palette() -> Palette {
    palette(&[
        ("path", "#f7fafc", "#2d3748"),
        ("git", "#c6f6d5", "#1a202c"),
        ("status", "#bee3f8", "#1a202c"),
        ("time", "#faf089", "#1a202c"),
        ("session", "#d6bcfa", "#1a202c"),
        ("error", "#feb2b2", "#1a202c"),
        ("execution", "#b2f5ea", "#1a202c"),
        ("shell", "#fed7aa", "#1a202c"),
    ])
}

fn nord_palette() -> Palette {
    palette(&[
        ("path", "#2e3440", "#d8dee9"),
        ("git", "#5e81ac", "#eceff4"),
        ("status", "#81a1c1", "#eceff4"),
        ("time", "#ebcb8b", "#2e3440"),
        ("session", "#b48ead", "#eceff4"),
        ("error", "#bf616a", "#eceff4"),
        ("execution", "#88c0d0", "#eceff4"),
        ("shell", "#d08770", "#eceff4"),
    ])
}

fn tokyo_night_palette() -> Palette {
    palette(&[
        ("path", "#1a1b26", "#c0caf5"),
        ("git", "#9ece6a", "#1a1b26"),
        ("status", "#7aa2f7", "#1a1b26"),
        ("time", "#e0af68", "#1a1b26"),
        ("session", "#bb9af7", "#1a1b26"),
        ("error", "#f7768e", "#1a1b26"),
        ("execution", "#2ac3de", "#1a1b26"),
        ("shell", "#ff9e64", "#1a1b26"),
    ])
}

fn rose_pine_palette() -> Palette {
    palette(&[
        ("path", "#191724", "#e0def4"),
        ("git", "#31748f", "#e0def4"),
        ("status", "#c4a7e7", "#191724"),
        ("time", "#f6c177", "#191724"),
        ("session", "#eb6f92", "#e0def4"),
        ("error", "#ebbcba", "#191724"),
        ("execution", "#9ccfd8", "#191724"),
        ("shell", "#ebbcba", "#191724"),
    ])
}
