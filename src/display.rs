// Bounded display forms for diagnostics.
//
// Error messages embed the value or buffer that failed. These helpers cap the
// rendered size so a multi-megabyte payload never turns into a
// multi-megabyte error string.

use std::fmt::Write;

/// Maximum number of characters of text shown before truncation.
pub const MAX_TEXT_CHARS: usize = 64;

/// Maximum number of bytes shown before truncation.
pub const MAX_BYTES: usize = 32;

/// Render `text` with at most [`MAX_TEXT_CHARS`] characters.
///
/// Truncation happens on a char boundary and appends the number of
/// characters left out.
pub fn display_text(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        None => text.to_owned(),
        Some((cut, _)) => {
            let omitted = text[cut..].chars().count();
            format!("{}... (+{omitted} chars)", &text[..cut])
        }
    }
}

/// Render `bytes` as space-separated hex, at most [`MAX_BYTES`] of them.
///
/// ```
/// use jsonflate::display::display_bytes;
/// assert_eq!(display_bytes(&[1, 2, 255]), "[01 02 ff] (3 bytes)");
/// ```
pub fn display_bytes(bytes: &[u8]) -> String {
    let shown = &bytes[..bytes.len().min(MAX_BYTES)];
    let mut out = String::with_capacity(shown.len() * 3 + 24);
    out.push('[');
    for (i, b) in shown.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{b:02x}");
    }
    if bytes.len() > shown.len() {
        let _ = write!(out, " ...] ({} bytes)", bytes.len());
    } else {
        let _ = write!(out, "] ({} bytes)", bytes.len());
    }
    out
}
