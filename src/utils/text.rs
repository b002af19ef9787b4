/// Capitalise the first letter of every word and lowercase the rest.
/// Words are separated by whitespace, `-` and `_`, which are kept.
pub fn title_case(value: &str) -> String {
    let mut titled = String::with_capacity(value.len());
    let mut start_of_word = true;
    for c in value.chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            start_of_word = true;
            titled.push(c);
        } else if start_of_word {
            start_of_word = false;
            titled.extend(c.to_uppercase());
        } else {
            titled.extend(c.to_lowercase());
        }
    }
    titled
}

/// Human readable duration: `523ms`, `2.5s`, `1m 5s`, `2h 0m 3s`.
pub fn format_duration(ms: i64) -> String {
    if ms < 1_000 {
        return format!("{}ms", ms.max(0));
    }
    if ms < 60_000 {
        let seconds = ms as f64 / 1_000.0;
        let formatted = format!("{seconds:.1}");
        return format!("{}s", formatted.trim_end_matches(".0"));
    }

    let total_seconds = ms / 1_000;
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else {
        format!("{minutes}m {seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("git"), "Git");
        assert_eq!(title_case("executiontime"), "Executiontime");
        assert_eq!(title_case("my-custom_seg"), "My-Custom_Seg");
        assert_eq!(title_case("PATH"), "Path");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(523), "523ms");
        assert_eq!(format_duration(2_500), "2.5s");
        assert_eq!(format_duration(3_000), "3s");
        assert_eq!(format_duration(65_000), "1m 5s");
        assert_eq!(format_duration(7_203_000), "2h 0m 3s");
    }
}
