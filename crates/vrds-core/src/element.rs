//! Field-sized words.
//!
//! Every value that flows through the sponge is an [`Element`]: hashes, ids,
//! update contents, depths and counts. Elements serialize as 64-char hex.

use crate::error::{CoreError, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Width of an element in bytes.
pub const ELEMENT_BYTES: usize = 32;

/// Longest text that fits in a single element.
pub const MAX_TEXT_BYTES: usize = ELEMENT_BYTES - 1;

/// A 32-byte word used as sponge input and output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element([u8; ELEMENT_BYTES]);

impl Element {
    pub const ZERO: Element = Element([0u8; ELEMENT_BYTES]);
    pub const ONE: Element = Element::from_u64(1);

    /// Wrap raw bytes.
    pub fn from_bytes(bytes: [u8; ELEMENT_BYTES]) -> Self {
        Element(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; ELEMENT_BYTES] {
        &self.0
    }

    /// Little-endian in the low eight bytes.
    pub const fn from_u64(value: u64) -> Self {
        let le = value.to_le_bytes();
        let mut bytes = [0u8; ELEMENT_BYTES];
        let mut i = 0;
        while i < le.len() {
            bytes[i] = le[i];
            i += 1;
        }
        Element(bytes)
    }

    /// Inverse of [`Element::from_u64`], if the upper bytes are clear.
    pub fn to_u64(&self) -> Option<u64> {
        if self.0[8..].iter().any(|b| *b != 0) {
            return None;
        }
        let mut le = [0u8; 8];
        le.copy_from_slice(&self.0[..8]);
        Some(u64::from_le_bytes(le))
    }

    /// Pack a short UTF-8 string into one element, zero padded.
    pub fn from_text(text: &str) -> Result<Self> {
        let raw = text.as_bytes();
        if raw.len() > MAX_TEXT_BYTES {
            return Err(CoreError::ContentTooLong {
                len: raw.len(),
                max: MAX_TEXT_BYTES,
            });
        }
        let mut bytes = [0u8; ELEMENT_BYTES];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Element(bytes))
    }

    /// Read back text written with [`Element::from_text`].
    pub fn to_text(&self) -> Result<String> {
        let end = self
            .0
            .iter()
            .rposition(|b| *b != 0)
            .map_or(0, |last| last + 1);
        String::from_utf8(self.0[..end].to_vec()).map_err(|_| CoreError::InvalidText)
    }

    /// Combine two elements lane-wise; this is how the sponge absorbs input.
    pub fn xor(&self, other: &Element) -> Element {
        let mut bytes = self.0;
        for (b, o) in bytes.iter_mut().zip(other.0.iter()) {
            *b ^= o;
        }
        Element(bytes)
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ELEMENT_BYTES]
    }

    /// Lowercase hex, 64 chars.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse exactly 64 hex chars.
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = [0u8; ELEMENT_BYTES];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| CoreError::InvalidHex(s.to_string()))?;
        Ok(Element(bytes))
    }

    /// First ten hex chars, for log lines.
    pub fn short(&self) -> String {
        self.to_hex()[..10].to_string()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element({}...)", self.short())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for Element {
    fn default() -> Self {
        Element::ZERO
    }
}

impl From<u64> for Element {
    fn from(value: u64) -> Self {
        Element::from_u64(value)
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Element::from_hex(&s).map_err(de::Error::custom)
    }
}
