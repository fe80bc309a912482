//! LIKE pattern escaping.
//!
//! User text is bound as a parameter, never spliced into SQL, but `%`, `_` and
//! `\` still carry meaning inside an `ILIKE` pattern. They are escaped so the
//! text matches literally (PostgreSQL's default escape character is `\`).

/// Escape LIKE metacharacters in `input`.
pub(crate) fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `%input%` with `input` escaped: a case-insensitive substring pattern.
pub(crate) fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}
