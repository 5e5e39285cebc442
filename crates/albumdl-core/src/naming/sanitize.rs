//! Path-component sanitization for service-supplied titles.

/// Linux NAME_MAX in bytes.
pub const NAME_MAX: usize = 255;

/// Sanitizes one path component for safe use on disk.
///
/// - Replaces NUL, `/`, `\`, control characters and whitespace with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing spaces, dots and underscores (so `.` and `..` become empty)
/// - Limits length to `max_bytes`, cutting on a char boundary
///
/// The result may be empty; callers substitute a fallback.
pub fn sanitize_component(name: &str, max_bytes: usize) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let replacement = if c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace()
        {
            '_'
        } else {
            c
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = truncate_on_boundary(trim_edges(&out), max_bytes);
    // Truncation can expose a trailing dot or underscore again.
    trim_edges(trimmed).to_string()
}

fn trim_edges(s: &str) -> &str {
    s.trim_matches(|c| c == ' ' || c == '.' || c == '_')
}

fn truncate_on_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut take = max_bytes;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
