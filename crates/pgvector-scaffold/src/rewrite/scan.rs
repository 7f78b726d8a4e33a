//! Balanced-delimiter scanning over generated C# source.
//!
//! Delimiters inside string and character literals and comments are not
//! counted, so a connection string such as `"Host=(local)"` cannot unbalance
//! the scan.

/// Find the byte offset of the delimiter that closes the one at `open_idx`.
///
/// `text.as_bytes()[open_idx]` must be `open`. Returns `None` if the input
/// ends before depth returns to zero or a literal is left unterminated.
pub fn find_matching_close(text: &str, open_idx: usize, open: u8, close: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open_idx) != Some(&open) {
        return None;
    }

    let mut depth = 0usize;
    let mut i = open_idx;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'"' {
            i = skip_string(bytes, i)?;
        } else if b == b'\'' {
            i = skip_char_literal(bytes, i)?;
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            i = skip_line_comment(bytes, i);
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i = skip_block_comment(bytes, i)?;
        } else if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Whether `text` holds nothing but whitespace and comments.
pub fn is_blank(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            i = skip_line_comment(bytes, i);
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            match skip_block_comment(bytes, i) {
                Some(end) => i = end,
                None => return false,
            }
        } else if !b.is_ascii_whitespace() {
            return false;
        }
        i += 1;
    }
    true
}

/// Whether the string literal opening at `quote_idx` is verbatim (`@"`, `$@"`, `@$"`).
fn is_verbatim(bytes: &[u8], quote_idx: usize) -> bool {
    let prefix_start = quote_idx.saturating_sub(2);
    bytes[prefix_start..quote_idx]
        .iter()
        .rev()
        .take_while(|&&b| b == b'@' || b == b'$')
        .any(|&b| b == b'@')
}

/// Returns the index of the closing quote.
fn skip_string(bytes: &[u8], quote_idx: usize) -> Option<usize> {
    let verbatim = is_verbatim(bytes, quote_idx);
    let mut i = quote_idx + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if !verbatim => i += 2,
            b'"' if verbatim && bytes.get(i + 1) == Some(&b'"') => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Returns the index of the closing single quote.
fn skip_char_literal(bytes: &[u8], quote_idx: usize) -> Option<usize> {
    let mut i = quote_idx + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\'' => return Some(i),
            b'\n' => return None,
            _ => i += 1,
        }
    }
    None
}

/// Returns the index of the terminating newline (or the last byte).
fn skip_line_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|off| start + off)
        .unwrap_or(bytes.len() - 1)
}

/// Returns the index of the closing `/`.
fn skip_block_comment(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return Some(i + 1);
        }
        i += 1;
    }
    None
}
