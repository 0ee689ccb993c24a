//! Query preparation for the directory search.
//!
//! The search itself runs in SQL, see `backend::directory::db::search_directory`.

/// Upper bound on directory results
pub const DIRECTORY_RESULT_LIMIT: i64 = 50;

/// Trimmed, lowercased query, or `None` when there is nothing to search for
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// `ILIKE` substring pattern with `\` as the escape character
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
