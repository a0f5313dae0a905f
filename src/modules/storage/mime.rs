//! File name helpers: extension extraction, MIME lookup, client name cleanup.

use crate::shared::constants::DEFAULT_MIME_TYPE;

/// Name used when a client sends an empty or path-only file name
const UNNAMED_FILE: &str = "unnamed";

fn final_component(name: &str) -> &str {
    name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name)
}

/// Lower-cased extension of the last path component, including the dot.
///
/// Returns an empty string when the name has no dot.
pub fn extension_of(filename: &str) -> String {
    let base = final_component(filename);
    match base.rfind('.') {
        Some(idx) => base[idx..].to_lowercase(),
        None => String::new(),
    }
}

/// Resolve a MIME type from the file name's extension, without parameters
pub fn resolve_mime_type(filename: &str) -> String {
    mime_guess::from_path(final_component(filename))
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string())
}

/// Drop any directory components from a client supplied file name
pub fn sanitize_file_name(name: &str) -> String {
    let base = final_component(name).trim();
    match base {
        "" | "." | ".." => UNNAMED_FILE.to_string(),
        _ => base.to_string(),
    }
}
