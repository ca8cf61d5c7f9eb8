use encoding_rs::WINDOWS_1251;
use std::fmt;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// Windows-1251 leaves 0x98 unassigned; encoding_rs maps it anyway.
const CP1251_UNASSIGNED: u8 = 0x98;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8Bom,
    Utf8,
    Windows1251,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError;

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cannot decode CSV")
    }
}

impl std::error::Error for DecodeError {}

/// Tries UTF-8 with BOM, plain UTF-8, then Windows-1251, in that order.
pub fn decode_upload(bytes: &[u8]) -> Result<(String, Encoding), DecodeError> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        if let Ok(s) = std::str::from_utf8(rest) {
            return Ok((s.to_string(), Encoding::Utf8Bom));
        }
    }
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Ok((s.to_string(), Encoding::Utf8));
    }
    if bytes.contains(&CP1251_UNASSIGNED) {
        return Err(DecodeError);
    }
    WINDOWS_1251
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|s| (s.into_owned(), Encoding::Windows1251))
        .ok_or(DecodeError)
}
