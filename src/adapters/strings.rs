use super::{EncodedKey, KeyEncoder};
use crate::error::Result;

/// UTF-8 bytes with every bit significant. A stored string partially
/// matches any query it is a prefix of.
#[derive(Clone, Copy, Debug)]
pub struct StringKey;

/// Like [`StringKey`] but reversed by character first, so a stored string
/// partially matches queries it is a suffix of (`google.com` covers
/// `mail.google.com`).
#[derive(Clone, Copy, Debug)]
pub struct ReversedStringKey;

impl KeyEncoder for StringKey {
    fn encode(input: &str) -> Result<EncodedKey> {
        Ok(full_mask(input.as_bytes()))
    }
}

impl KeyEncoder for ReversedStringKey {
    fn encode(input: &str) -> Result<EncodedKey> {
        // By char, not byte, so multi-byte characters stay intact.
        let reversed: String = input.chars().rev().collect();
        Ok(full_mask(reversed.as_bytes()))
    }
}

fn full_mask(bytes: &[u8]) -> EncodedKey {
    EncodedKey {
        key: bytes.into(),
        mask: std::iter::repeat(0xFF).take(bytes.len()).collect(),
    }
}
