// =============================================================================
// Bit utilities
// =============================================================================

/// Walks the key bits selected by a left-aligned mask, MSB first.
///
/// Stops at the first clear mask bit or when the key runs out. Any set bits
/// after a clear one are never looked at, which is why a non-contiguous mask
/// gives unspecified results.
#[derive(Clone, Debug)]
pub(crate) struct MaskedBits<'a> {
    key: &'a [u8],
    mask: &'a [u8],
    pos: usize,
}

impl<'a> MaskedBits<'a> {
    pub(crate) fn new(key: &'a [u8], mask: &'a [u8]) -> Self {
        debug_assert_eq!(key.len(), mask.len());
        Self { key, mask, pos: 0 }
    }
}

impl Iterator for MaskedBits<'_> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<bool> {
        let byte = self.pos / 8;
        if byte >= self.key.len() {
            return None;
        }
        let bit = 0x80u8 >> (self.pos % 8);
        if self.mask[byte] & bit == 0 {
            return None;
        }
        self.pos += 1;
        Some(self.key[byte] & bit != 0)
    }
}

#[inline]
pub(crate) fn leading_bit_set(mask: &[u8]) -> bool {
    mask.first().is_some_and(|b| b & 0x80 != 0)
}

/// Builds a `width`-byte mask with the leading `bits` bits set.
pub fn cidr_mask(bits: usize, width: usize) -> Vec<u8> {
    (0..width)
        .map(|i| {
            let covered = bits.saturating_sub(i * 8).min(8);
            match covered {
                0 => 0,
                n => 0xFFu8 << (8 - n),
            }
        })
        .collect()
}
