//! Argument token readers for command lines.
//!
//! Each reader consumes one token from the front of `args` and leaves the
//! remaining text trimmed in place, so handlers can keep parsing what is left.

/// Read a whitespace-delimited token.
pub fn read_word(args: &mut &str) -> Option<String> {
    let s = args.trim_start();
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    let (word, rest) = s.split_at(end);
    if word.is_empty() {
        return None;
    }
    *args = rest.trim();
    Some(word.to_string())
}

/// Read a token that may be wrapped in double quotes to admit spaces.
///
/// Quotes are stripped. An unterminated quote or an empty token is rejected
/// and leaves `args` untouched.
pub fn read_probably_quoted(args: &mut &str) -> Option<String> {
    let s = args.trim_start();
    if let Some(quoted) = s.strip_prefix('"') {
        let close = quoted.find('"')?;
        let (inner, rest) = quoted.split_at(close);
        let inner = inner.trim();
        if inner.is_empty() {
            return None;
        }
        *args = rest[1..].trim();
        Some(inner.to_string())
    } else {
        read_word(args)
    }
}

/// Parse a leading unsigned integer the way `%lu` would: optional leading
/// whitespace, then as many digits as present. Trailing text is ignored.
/// Sizes are 32-bit on the device, so anything above `u32::MAX` is rejected.
pub fn read_size(args: &str) -> Option<usize> {
    let s = args.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let size: u32 = s[..digits].parse().ok()?;
    usize::try_from(size).ok()
}
