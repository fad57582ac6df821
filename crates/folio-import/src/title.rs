//! Names derived from source file paths.

use std::path::Path;

/// Chapter identifier: the file name without its extension.
///
/// Returns `None` for paths without a UTF-8 file stem.
#[must_use]
pub fn chapter_id(path: &Path) -> Option<&str> {
    path.file_stem()?.to_str().filter(|stem| !stem.is_empty())
}

/// Display title from a source file name.
///
/// Strips the extension, splits on `_`, drops empty words, and upper-cases
/// the first character of each word.
///
/// ```
/// use folio_import::derive_title;
///
/// assert_eq!(derive_title("heat_transfer_basics.tex"), "Heat Transfer Basics");
/// ```
#[must_use]
pub fn derive_title(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let mut title = String::with_capacity(stem.len());
    for word in stem.split('_').filter(|w| !w.is_empty()) {
        if !title.is_empty() {
            title.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            title.extend(first.to_uppercase());
            title.push_str(chars.as_str());
        }
    }
    title
}
