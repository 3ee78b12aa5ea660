//! Database access layer

pub mod brands;
pub mod categories;
pub mod inventory;
pub mod offers;
pub mod products;
pub mod search;

/// Escape `%`, `_` and `\` so user text matches literally inside LIKE
pub(crate) fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("pro v1"), "%pro v1%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
