//! Output formatting shared by both backends
//!
//! Floats, string escaping and indentation are defined once here so that the
//! text backend and the accelerated backend emit the same bytes for the same
//! tree.

/// Encoding options honoured by every backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Escape every non-ASCII character as `\uXXXX`
    pub ensure_ascii: bool,
    /// Pretty-print with this many spaces per level; `None` is compact
    pub indent: Option<usize>,
}

impl EncodeOptions {
    /// Compact output, UTF-8 strings.
    pub fn compact() -> Self {
        Self::default()
    }

    /// Indented output.
    pub fn pretty(indent: usize) -> Self {
        Self {
            indent: Some(indent),
            ..Self::default()
        }
    }

    /// Set ASCII-only output.
    pub fn with_ensure_ascii(mut self, ensure_ascii: bool) -> Self {
        self.ensure_ascii = ensure_ascii;
        self
    }

    /// Separator between an object key and its value.
    pub(crate) fn key_separator(&self) -> &'static str {
        if self.indent.is_some() {
            ": "
        } else {
            ":"
        }
    }
}

/// Shortest round-tripping representation of a finite float, always with a
/// fraction or exponent (`5400.0`, `0.1`, `1e16`). `None` for NaN and ±inf,
/// which encode as `null`.
pub fn float_repr(f: f64) -> Option<String> {
    f.is_finite().then(|| format!("{:?}", f))
}

/// Append `s` as a quoted JSON string.
pub(crate) fn push_quoted(out: &mut String, s: &str, ensure_ascii: bool) {
    out.push('"');
    let mut start = 0;
    for (i, c) in s.char_indices() {
        let escape = escape_for(c);
        if escape.is_none() && (c.is_ascii() || !ensure_ascii) {
            continue;
        }
        out.push_str(&s[start..i]);
        match escape {
            Some(Escape::Short(code)) => {
                out.push('\\');
                out.push(code);
            }
            Some(Escape::Control) => push_unicode_escape(out, c as u32 as u16),
            None => push_ascii_char(out, c),
        }
        start = i + c.len_utf8();
    }
    out.push_str(&s[start..]);
    out.push('"');
}

/// Append `fragment`, which holds no characters needing a JSON escape, with
/// every non-ASCII character as `\uXXXX` (surrogate pairs beyond the BMP).
#[cfg(feature = "accelerated")]
pub(crate) fn push_ascii_fragment(out: &mut String, fragment: &str) {
    for c in fragment.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            push_ascii_char(out, c);
        }
    }
}

enum Escape {
    Short(char),
    Control,
}

// Same escape set as serde_json: quote, backslash, and C0 controls
fn escape_for(c: char) -> Option<Escape> {
    match c {
        '"' => Some(Escape::Short('"')),
        '\\' => Some(Escape::Short('\\')),
        '\n' => Some(Escape::Short('n')),
        '\r' => Some(Escape::Short('r')),
        '\t' => Some(Escape::Short('t')),
        '\u{08}' => Some(Escape::Short('b')),
        '\u{0c}' => Some(Escape::Short('f')),
        c if (c as u32) < 0x20 => Some(Escape::Control),
        _ => None,
    }
}

fn push_ascii_char(out: &mut String, c: char) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units) {
        push_unicode_escape(out, *unit);
    }
}

fn push_unicode_escape(out: &mut String, unit: u16) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    out.push_str("\\u");
    for shift in [12, 8, 4, 0] {
        out.push(HEX[((unit >> shift) & 0xf) as usize] as char);
    }
}

/// Append a newline and the indentation for `level`, when indenting.
pub(crate) fn push_newline(out: &mut String, indent: Option<usize>, level: usize) {
    if let Some(width) = indent {
        out.push('\n');
        out.extend(std::iter::repeat(' ').take(width * level));
    }
}
