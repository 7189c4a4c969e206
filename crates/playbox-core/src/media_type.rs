//! Content-type resolution
//!
//! Fixed extension tables with a single deterministic fallback chain:
//! table lookup, else a non-generic upstream-provided type, else the generic
//! binary type.

/// Generic binary type returned when nothing better is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type forced for bundle root documents.
pub const HTML: &str = "text/html; charset=utf-8";

/// Extensions accepted by the misc-file upload endpoint (lower case, with dot).
pub const ALLOWED_UPLOAD_EXTENSIONS: [&str; 7] =
    [".png", ".jpg", ".jpeg", ".mp4", ".gif", ".mov", ".mp3"];

/// Look up the MIME type for a served asset extension. The extension may be
/// empty or mixed case; it is normalized before lookup.
pub fn from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        ".js" => Some("application/javascript"),
        ".css" => Some("text/css"),
        ".png" => Some("image/png"),
        ".jpg" | ".jpeg" => Some("image/jpeg"),
        ".gif" => Some("image/gif"),
        ".svg" => Some("image/svg+xml"),
        ".wasm" => Some("application/wasm"),
        ".json" => Some("application/json"),
        ".html" => Some(HTML),
        _ => None,
    }
}

/// Resolve the content type for a served object: extension table first, then
/// an upstream-reported type when it is present and not generic, then the
/// generic binary type.
pub fn resolve(ext: &str, upstream: Option<&str>) -> String {
    if let Some(known) = from_extension(ext) {
        return known.to_string();
    }
    if let Some(upstream) = upstream {
        let upstream = upstream.trim();
        if !upstream.is_empty() && !upstream.eq_ignore_ascii_case(OCTET_STREAM) {
            return upstream.to_string();
        }
    }
    OCTET_STREAM.to_string()
}

/// Check an upload filename extension against the allow-list.
pub fn is_allowed_upload_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    ALLOWED_UPLOAD_EXTENSIONS.contains(&ext.as_str())
}

/// Content type stored alongside an uploaded file, keyed by its extension.
pub fn upload_content_type(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".mp4" => "video/mp4",
        ".gif" => "image/gif",
        ".mov" => "video/quicktime",
        ".mp3" => "audio/mpeg",
        _ => OCTET_STREAM,
    }
}

/// Trailing extension of the last path segment, including the dot; empty when
/// the segment has none.
pub fn extension_of(path: &str) -> &str {
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rfind('.') {
        Some(idx) => &segment[idx..],
        None => "",
    }
}

/// Split a path segment into (stem, extension-with-dot). The extension is
/// empty when the segment has none.
pub fn split_extension(segment: &str) -> (&str, &str) {
    match segment.rfind('.') {
        Some(idx) => (&segment[..idx], &segment[idx..]),
        None => (segment, ""),
    }
}
