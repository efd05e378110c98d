use memchr::{memchr, memchr_iter};

pub(crate) const BUFSIZE: usize = 64 * 1024;

/// Tab, as written by BLAST `-outfmt 6` and pandas `to_csv(sep='\t')`
pub const DEFAULT_DELIMITER: u8 = b'\t';

/// Remove a final '\r' from a byte slice
#[inline]
pub(crate) fn trim_cr(line: &[u8]) -> &[u8] {
    if let Some((&b'\r', remaining)) = line.split_last() {
        remaining
    } else {
        line
    }
}

/// Remove a final '\n' (and a '\r' before it) from a byte slice
#[inline]
pub(crate) fn trim_line_end(line: &[u8]) -> &[u8] {
    if let Some((&b'\n', remaining)) = line.split_last() {
        trim_cr(remaining)
    } else {
        trim_cr(line)
    }
}

#[inline]
pub(crate) fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|b| b.is_ascii_whitespace())
}

/// Split a line on `delimiter`, keeping empty fields
pub(crate) fn split_fields(line: &[u8], delimiter: u8) -> Vec<&[u8]> {
    let mut fields = Vec::with_capacity(bytecount::count(line, delimiter) + 1);
    let mut start = 0;
    for idx in memchr_iter(delimiter, line) {
        fields.push(&line[start..idx]);
        start = idx + 1;
    }
    fields.push(&line[start..]);
    fields
}

/// Holds line number and byte offset of our current state in a parser
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub(crate) line: u64,
    pub(crate) byte: u64,
}

impl Position {
    pub fn new(line: u64, byte: u64) -> Self {
        Self { line, byte }
    }

    /// Line number (starting with 1)
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Byte offset within the file
    pub fn byte(&self) -> u64 {
        self.byte
    }
}

/// Whether it uses \r\n or only \n
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum LineEnding {
    Windows,
    Unix,
}

impl LineEnding {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Windows => vec![b'\r', b'\n'],
            Self::Unix => vec![b'\n'],
        }
    }
}

pub fn find_line_ending(bytes: &[u8]) -> Option<LineEnding> {
    if !bytes.is_empty() {
        if let Some(idx) = memchr(b'\n', bytes) {
            if idx > 0 && bytes[idx - 1] == b'\r' {
                return Some(LineEnding::Windows);
            }

            return Some(LineEnding::Unix);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_line_end() {
        assert_eq!(trim_line_end(b"a\tb\r\n"), b"a\tb");
        assert_eq!(trim_line_end(b"a\tb\n"), b"a\tb");
        assert_eq!(trim_line_end(b"a\tb"), b"a\tb");
        assert_eq!(trim_line_end(b""), b"");
    }

    #[test]
    fn test_split_fields_keeps_empty() {
        let fields = split_fields(b"Q1\t\tS1\t", b'\t');
        assert_eq!(fields, vec![&b"Q1"[..], b"", b"S1", b""]);
        assert_eq!(split_fields(b"", b'\t'), vec![&b""[..]]);
    }

    #[test]
    fn test_find_line_ending() {
        assert_eq!(find_line_ending(b"qseqid\r\nQ1"), Some(LineEnding::Windows));
        assert_eq!(find_line_ending(b"qseqid\nQ1"), Some(LineEnding::Unix));
        assert_eq!(find_line_ending(b"qseqid"), None);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(b"  \t\r\n"));
        assert!(!is_blank(b" x "));
    }
}
