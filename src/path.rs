//! Path normalization and URL resolution.
//!
//! Every request path is normalized to carry exactly one leading `/`
//! before the base URL is prepended. URL parameters are additional path
//! segments appended in caller order; they are never encoded as
//! query-string pairs.

/// Ensures the path starts with exactly one `/`.
///
/// Paths that already start with `/` are returned unchanged; nothing is
/// stripped or collapsed beyond prepending the missing separator.
pub(crate) fn normalize(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Resolves the final request URL.
///
/// The normalized path gets each segment appended in order, then the base
/// URL is prefixed unless the caller asked for an absolute path.
pub(crate) fn resolve(base_url: &str, path: &str, absolute: bool, segments: &[String]) -> String {
    let mut resolved = normalize(path);
    for segment in segments {
        resolved.push('/');
        resolved.push_str(segment);
    }

    if absolute {
        resolved
    } else {
        format!("{base_url}{resolved}")
    }
}
