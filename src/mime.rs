// MIME inference from the file extension. Pure: the file is never opened.

use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guess the content type of `path`.
///
/// The general `mime_guess` table is consulted first; when it has nothing
/// for the extension we fall back to the common image types, and finally to
/// `application/octet-stream`.
pub fn guess_mime(path: &Path) -> String {
    if let Some(mime) = mime_guess::from_path(path).first() {
        return mime.essence_str().to_string();
    }
    image_fallback(path).unwrap_or(OCTET_STREAM).to_string()
}

fn image_fallback(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
