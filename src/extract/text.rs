use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, WINDOWS_1252};
use std::fs;
use std::path::Path;

use crate::error::ExtractError;

#[derive(Debug, Clone, Copy)]
enum TextEncoding {
    Utf8,
    Utf16,
    Latin1,
    Windows1252,
}

/// Tried in order; the first strict decode wins.
const ENCODINGS: &[TextEncoding] = &[
    TextEncoding::Utf8,
    TextEncoding::Utf16,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
];

pub(super) fn read_text_file(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;
    decode(&bytes).ok_or(ExtractError::Undecodable)
}

/// Decodes with the first encoding that accepts the bytes. Line endings come
/// back as `\n` whatever the file used.
pub(super) fn decode(bytes: &[u8]) -> Option<String> {
    ENCODINGS
        .iter()
        .find_map(|encoding| encoding.decode(bytes))
        .map(|text| normalize_newlines(&text))
}

fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_owned()
    }
}

impl TextEncoding {
    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(body).ok().map(str::to_owned)
            }
            // Without a byte-order mark any even-length byte soup "decodes"
            // as UTF-16, so only marked files are accepted.
            TextEncoding::Utf16 => {
                let (encoding, bom_len) = Encoding::for_bom(bytes)?;
                if encoding != UTF_16LE && encoding != UTF_16BE {
                    return None;
                }
                encoding
                    .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
                    .map(|text| text.into_owned())
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            TextEncoding::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        }
    }
}
