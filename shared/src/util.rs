/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// URL slug for a catalogue name: lowercase ASCII alphanumerics joined by `-`.
///
/// "Pro V1x Golf Balls (12pk)" -> "pro-v1x-golf-balls-12pk"
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Trimmed, non-empty string or `None`
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Pro V1x Golf Balls (12pk)"), "pro-v1x-golf-balls-12pk");
        assert_eq!(slugify("  Drivers  "), "drivers");
        assert_eq!(slugify("Rain-Gear & Umbrellas"), "rain-gear-umbrellas");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  Ping ")), Some("Ping"));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }
}
