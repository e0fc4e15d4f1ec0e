/// Joins a CMS-relative path onto a base URL with exactly one `/` between them.
///
/// Absolute `http(s)://` URLs are returned unchanged, since Strapi hands out both shapes for
/// uploads depending on the storage provider.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    if is_absolute(path) {
        return path.to_owned();
    }

    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() { base.to_owned() } else { format!("{base}/{path}") }
}

/// Returns `true` for `http://` and `https://` URLs (case-insensitive scheme).
#[must_use]
pub fn is_absolute(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
