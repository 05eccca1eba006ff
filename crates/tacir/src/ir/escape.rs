//! Escaping of string immediates for textual output
//!
//! Printable ASCII passes through except `"` and `\`. Backspace, tab,
//! newline, form feed, carriage return, quote and backslash get their named
//! escapes. Every other byte is written as a three digit octal escape, which
//! a C reader decodes back to the same byte.

use std::fmt::{self, Write};

fn write_escaped<W: Write>(out: &mut W, byte: u8) -> fmt::Result {
    match byte {
        b'"' => out.write_str("\\\""),
        b'\\' => out.write_str("\\\\"),
        0x20..=0x7e => out.write_char(char::from(byte)),
        0x08 => out.write_str("\\b"),
        b'\t' => out.write_str("\\t"),
        b'\n' => out.write_str("\\n"),
        0x0c => out.write_str("\\f"),
        b'\r' => out.write_str("\\r"),
        _ => write!(out, "\\{:03o}", byte),
    }
}

/// Escape the contents of a string literal, without surrounding quotes
pub fn escape_c_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        // Writing to a String cannot fail.
        let _ = write_escaped(&mut out, byte);
    }
    out
}

/// Display adapter printing bytes as a quoted, escaped C string literal
#[derive(Debug, Clone, Copy)]
pub struct Quoted<'a>(pub &'a [u8]);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        for &byte in self.0 {
            write_escaped(f, byte)?;
        }
        f.write_char('"')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_passes_through() {
        assert_eq!(escape_c_string(b"hello, world!"), "hello, world!");
        assert_eq!(escape_c_string(b""), "");
    }

    #[test]
    fn test_quote_and_newline() {
        let text = b"say \"hi\"\n";
        assert_eq!(Quoted(text).to_string(), r#""say \"hi\"\n""#);
    }

    #[test]
    fn test_named_escapes() {
        assert_eq!(escape_c_string(b"\x08\t\n\x0c\r\\"), r"\b\t\n\f\r\\");
    }

    #[test]
    fn test_octal_escapes() {
        assert_eq!(escape_c_string(b"\0"), r"\000");
        assert_eq!(escape_c_string(b"\x07"), r"\007");
        assert_eq!(escape_c_string(b"\x7f"), r"\177");
        assert_eq!(escape_c_string(&[0xff]), r"\377");
        assert_eq!(escape_c_string(b"a\x1bb"), r"a\033b");
    }
}
