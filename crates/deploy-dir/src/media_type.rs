//! Media type lookup by file extension
//!
//! A fixed table, not a MIME sniffer. Only the last dot-segment of the file
//! name is consulted, so `archive.tar.gz` resolves through `gz`.

/// Media type used when the extension is not in the table
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Resolve the media type for a file name or path.
///
/// Matching is case-sensitive. Unknown or missing extensions resolve to
/// [`FALLBACK_MEDIA_TYPE`].
pub fn get_media_type(file_name: &str) -> &'static str {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((_, ext)) => media_type_for_extension(ext).unwrap_or(FALLBACK_MEDIA_TYPE),
        None => FALLBACK_MEDIA_TYPE,
    }
}

/// Look up an extension (without the leading dot) in the table.
pub fn media_type_for_extension(ext: &str) -> Option<&'static str> {
    let media_type = match ext {
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "jpg" | "jpeg" => "image/jpeg",
        "avif" => "image/avif",
        "webp" => "image/webp",
        "png" => "image/png",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "ts" => "text/typescript",
        "tsx" => "text/tsx",
        "js" | "mjs" => "application/javascript",
        "jsx" => "text/jsx",
        "gz" => "application/gzip",
        "css" => "text/css",
        "wasm" => "application/wasm",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(media_type)
}
