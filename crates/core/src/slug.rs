/// Turns heading text into an anchor id.
///
/// 1. Lowercase
/// 2. Replace each run of whitespace with a single `-`
/// 3. Drop every character that is not an ASCII word character (`[A-Za-z0-9_]`) or `-`
///
/// The TOC extractor and the HTML heading-id stage both call this function,
/// so a TOC link always resolves to a heading. Collisions are not
/// deduplicated: two headings with the same text share one id.
///
/// # Examples
///
/// ```
/// use leaf_core::slug::slugify;
///
/// assert_eq!(slugify("Getting Started"), "getting-started");
/// assert_eq!(slugify("What's new?"), "whats-new");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            slug.push(ch);
        }
    }

    slug
}
