//! Source decoding with PEP 263 coding cookies

use crate::error::ExtractError;
use encoding_rs::{Encoding, REPLACEMENT, UTF_8};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static CODING_COOKIE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[ \t\f]*#.*?coding[:=][ \t]*([-\w.]+)").ok());

/// Python codec names the WHATWG label table does not know, after
/// lowercasing and turning `_` into `-`.
const PYTHON_ALIASES: [(&str, &str); 7] = [
    ("utf-8-sig", "utf-8"),
    ("utf8-sig", "utf-8"),
    ("u8", "utf-8"),
    ("latin-1", "latin1"),
    ("646", "ascii"),
    ("utf-16-le", "utf-16le"),
    ("utf-16-be", "utf-16be"),
];

/// Labels decoded strictly as 7-bit ASCII rather than as windows-1252.
const ASCII_LABELS: [&str; 3] = ["ascii", "us-ascii", "646"];

/// Codec a source file is decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceEncoding {
    codec: &'static Encoding,
    ascii_only: bool,
}

impl SourceEncoding {
    pub fn utf8() -> Self {
        Self {
            codec: UTF_8,
            ascii_only: false,
        }
    }

    /// Parse a Python codec label such as `utf-8`, `cp1252`, `latin_1` or
    /// `shift_jis`.
    pub fn from_label(label: &str) -> Result<Self, ExtractError> {
        let raw = label.trim();
        let normalized = raw.to_ascii_lowercase().replace('_', "-");
        let compact = normalized.replace('-', "");
        let alias = PYTHON_ALIASES
            .iter()
            .find(|(python, _)| *python == normalized)
            .map_or("", |(_, whatwg)| *whatwg);

        let codec = [raw, alias, normalized.as_str(), compact.as_str()]
            .into_iter()
            .find_map(|candidate| Encoding::for_label(candidate.as_bytes()))
            .filter(|codec| *codec != REPLACEMENT)
            .ok_or_else(|| ExtractError::UnsupportedEncoding(label.to_string()))?;

        Ok(Self {
            codec,
            ascii_only: ASCII_LABELS.contains(&normalized.as_str()),
        })
    }

    pub fn name(self) -> &'static str {
        if self.ascii_only {
            "ascii"
        } else {
            self.codec.name()
        }
    }

    /// Strict decode: malformed input is an error, never replaced.
    pub fn decode(self, bytes: &[u8]) -> Result<String, ExtractError> {
        if self.ascii_only {
            if let Some(offset) = bytes.iter().position(|b| !b.is_ascii()) {
                return Err(self.decode_error(format!("non-ascii byte at offset {offset}")));
            }
        }

        self.codec
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(Cow::into_owned)
            .ok_or_else(|| self.decode_error("malformed byte sequence".to_string()))
    }

    fn decode_error(self, message: String) -> ExtractError {
        ExtractError::Decode {
            encoding: self.name().to_ascii_lowercase(),
            message,
        }
    }

    fn strip_bom(self, bytes: &[u8]) -> &[u8] {
        match Encoding::for_bom(bytes) {
            Some((codec, len)) if codec == self.codec => &bytes[len..],
            _ => bytes,
        }
    }
}

/// Coding cookie from the first two lines. The second line only counts when
/// the first is blank or a comment.
pub fn detect_cookie(bytes: &[u8]) -> Option<String> {
    let cookie = CODING_COOKIE.as_ref()?;
    let mut lines = bytes.split(|&b| b == b'\n').take(2);

    let first = String::from_utf8_lossy(lines.next()?);
    if let Some(caps) = cookie.captures(&first) {
        return Some(caps[1].to_string());
    }

    let first = first.trim();
    if !first.is_empty() && !first.starts_with('#') {
        return None;
    }

    let second = String::from_utf8_lossy(lines.next()?);
    cookie.captures(&second).map(|caps| caps[1].to_string())
}

/// Decode a source file. A forced encoding wins over a byte order mark, which
/// wins over the cookie; UTF-8 is the fallback. The mark itself is dropped.
pub fn decode_source(bytes: &[u8], forced: Option<&str>) -> Result<String, ExtractError> {
    if let Some(label) = forced {
        let encoding = SourceEncoding::from_label(label)?;
        return encoding.decode(encoding.strip_bom(bytes));
    }

    if let Some((codec, len)) = Encoding::for_bom(bytes) {
        let encoding = SourceEncoding {
            codec,
            ascii_only: false,
        };
        return encoding.decode(&bytes[len..]);
    }

    let encoding = match detect_cookie(bytes) {
        Some(label) => SourceEncoding::from_label(&label)?,
        None => SourceEncoding::utf8(),
    };
    encoding.decode(bytes)
}
