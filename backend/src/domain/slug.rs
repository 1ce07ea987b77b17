//! Slug helpers shared by the form model.
//!
//! Field names and derived option values are human-debuggable slugs. They are
//! never used as storage keys; identifiers are.

/// Derive a field's debug name from its type tag and identifier.
///
/// Non `[A-Za-z0-9_-]` characters are stripped and the result is lowercased.
///
/// # Examples
/// ```
/// use safety_backend::domain::slug::field_name;
///
/// assert_eq!(field_name("image_upload", "Ab3 x"), "image_upload_ab3x");
/// ```
pub fn field_name(type_tag: &str, id: &str) -> String {
    format!("{type_tag}_{id}")
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Lowercase a label and collapse each whitespace run into one underscore.
///
/// # Examples
/// ```
/// use safety_backend::domain::slug::underscore_slug;
///
/// assert_eq!(underscore_slug("Near  Miss"), "near_miss");
/// ```
pub fn underscore_slug(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut in_whitespace = false;
    for ch in label.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('_');
            }
            in_whitespace = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_whitespace = false;
        }
    }
    slug
}

/// Return `true` when `value` only uses identifier-safe characters.
pub(crate) fn has_identifier_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}
