//! URL predicates for the link form.

use url::Url;

/// Prepend `https://` unless the input already names a scheme.
///
/// Returns an empty string for blank input.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if has_scheme(trimmed) {
        trimmed.to_string()
    } else if let Some(rest) = trimmed.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        format!("https://{trimmed}")
    }
}

/// Whether `input`, once normalized, is something we are willing to link to.
///
/// Accepts http(s) URLs with a dotted host (or `localhost`), and non-empty
/// `mailto:`/`tel:` targets. Anything with whitespace is rejected.
pub fn is_valid_url(input: &str) -> bool {
    let normalized = normalize_url(input);
    if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
        return false;
    }
    let Ok(url) = Url::parse(&normalized) else {
        return false;
    };
    match url.scheme() {
        "http" | "https" => url
            .host_str()
            .is_some_and(|host| host.contains('.') || host == "localhost"),
        "mailto" | "tel" => !url.path().is_empty(),
        _ => false,
    }
}

fn has_scheme(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("mailto:") || lower.starts_with("tel:")
}
