//! Text helpers: paste normalization, the ordinary-text test used by the
//! native insertion fast path, and UTF-16 offset conversion for DOM offsets.

use std::sync::LazyLock;

use regex::Regex;

/// Letters, numbers, punctuation and plain spaces, nothing else.
///
/// Combining marks, symbols (emoji included) and control characters fall
/// outside the class and always take the reconciling path.
static ORDINARY_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{N}\p{P} ]+$").expect("ordinary text pattern is valid")
});

/// Whether `text` is non-empty ordinary text.
pub fn is_ordinary_text(text: &str) -> bool {
    ORDINARY_TEXT.is_match(text)
}

/// Normalize text from a paste or drop.
///
/// Line endings become `\n`; byte-order marks, zero-width spaces and control
/// characters other than `\n` and `\t` are dropped.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\n' | '\t' => out.push(c),
            '\u{FEFF}' | '\u{200B}' => {}
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Length of `text` in UTF-16 code units, the unit of DOM text offsets.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Convert a UTF-16 offset inside `text` to a `char` offset.
///
/// An offset in the middle of a surrogate pair rounds down. Offsets past the
/// end return `None`.
pub fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> Option<usize> {
    let mut units = 0;
    for (index, c) in text.chars().enumerate() {
        if units >= utf16_offset {
            return Some(index);
        }
        let next = units + c.len_utf16();
        if next > utf16_offset {
            return Some(index);
        }
        units = next;
    }
    (units == utf16_offset).then(|| text.chars().count())
}
