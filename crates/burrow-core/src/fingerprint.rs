use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";
const HEX_LENGTH: usize = 64;

/// Content fingerprint of a target URL.
///
/// A BLAKE3 hash over the URL's UTF-8 bytes, used as the dedup lookup key.
/// The fingerprint is a pure function of the URL and stable across process
/// restarts and platforms. Two live records with the same fingerprint must
/// represent the same target URL; anything else is a data integrity
/// violation, not a normal case.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid fingerprint hex: {0}")]
pub struct ParseFingerprintError(String);

impl Fingerprint {
    /// Computes the fingerprint of a target URL.
    pub fn of(target_url: &str) -> Self {
        Self(*blake3::hash(target_url.as_bytes()).as_bytes())
    }

    /// Returns the raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex form used by storage backends as the indexed column.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(HEX_LENGTH);
        for byte in self.0 {
            out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
            out.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
        }
        out
    }

    /// Parses the hex form produced by [`Fingerprint::to_hex`].
    pub fn from_hex(hex: &str) -> Result<Self, ParseFingerprintError> {
        if hex.len() != HEX_LENGTH {
            return Err(ParseFingerprintError(format!(
                "expected {} hex chars, got {}",
                HEX_LENGTH,
                hex.len()
            )));
        }

        let mut bytes = [0u8; 32];
        for (i, pair) in hex.as_bytes().chunks_exact(2).enumerate() {
            let hi = (pair[0] as char).to_digit(16);
            let lo = (pair[1] as char).to_digit(16);
            match (hi, lo) {
                (Some(hi), Some(lo)) => bytes[i] = ((hi << 4) | lo) as u8,
                _ => {
                    return Err(ParseFingerprintError(format!(
                        "non-hex character in '{hex}'"
                    )))
                }
            }
        }

        Ok(Self(bytes))
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Fingerprint").field(&self.to_hex()).finish()
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_hex().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}
