//! Identifier normalization.
//!
//! Display names and room names arrive with arbitrary casing, rank glyphs
//! (`+`, `%`, `@`, ...) and punctuation. The service keys everything on a
//! folded form containing only ASCII lowercase alphanumerics; this module
//! implements that folding.

/// Fold a single character into its normalized form.
///
/// ASCII uppercase maps to lowercase; lowercase letters and digits pass
/// through; everything else (punctuation, rank glyphs, whitespace, the `>`
/// frame sigil, non-ASCII) is dropped.
#[inline]
pub const fn fold_char(c: char) -> Option<char> {
    match c {
        'a'..='z' | '0'..='9' => Some(c),
        'A'..='Z' => Some((c as u8 + 32) as char),
        _ => None,
    }
}

/// Normalize a display name or room name into its id form.
///
/// The result contains only `[a-z0-9]` and is the key used by rosters and
/// room maps.
pub fn to_id(s: &str) -> String {
    s.chars().filter_map(fold_char).collect()
}

/// Compare two strings under normalization without allocating.
pub fn id_eq(a: &str, b: &str) -> bool {
    a.chars()
        .filter_map(fold_char)
        .eq(b.chars().filter_map(fold_char))
}
