//! Byte decoding with a single Latin-1 fallback

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

/// Label reported when the fallback decoder is used
pub const FALLBACK_ENCODING: &str = "ISO-8859-1";

/// Text decoded from an upload
#[derive(Debug)]
pub enum Decoded<'a> {
    /// Valid UTF-8, BOM removed
    Utf8(Cow<'a, str>),
    /// Not UTF-8; every byte mapped through Latin-1.
    /// `valid_up_to` is the offset of the first byte that broke UTF-8.
    Latin1 { text: Cow<'a, str>, valid_up_to: usize },
}

impl<'a> Decoded<'a> {
    pub fn text(&self) -> &str {
        match self {
            Decoded::Utf8(text) => text,
            Decoded::Latin1 { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Decoded::Latin1 { .. })
    }
}

/// Decode bytes as UTF-8, falling back to Latin-1.
///
/// Latin-1 maps every byte to a character, so this never fails; bytes from
/// other encodings come out as mojibake.
pub fn decode(bytes: &[u8]) -> Decoded<'_> {
    let body = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding == UTF_8 => &bytes[bom_len..],
        _ => bytes,
    };

    match UTF_8.decode_without_bom_handling_and_without_replacement(body) {
        Some(text) => Decoded::Utf8(text),
        None => Decoded::Latin1 {
            text: encoding_rs::mem::decode_latin1(body),
            valid_up_to: Encoding::utf8_valid_up_to(body),
        },
    }
}
