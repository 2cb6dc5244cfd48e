//! # Shareable Ranking Codec
//!
//! Encodes a ranking into a compact, URL-safe opaque string and decodes
//! it back losslessly, for transferring a personal ordering between
//! devices.
//!
//! Layout under the base64 armor: Header (5 bytes) + postcard payload.
//! - 4 bytes: Magic ("DRNK")
//! - 1 byte: Version
//!
//! Decoding validates sizes and the header BEFORE touching the payload,
//! so corrupted or hostile input fails cheaply. Every failure maps to
//! [`RankError::DecodeFailure`]; callers treat that as a no-op import
//! and leave local state untouched.

use crate::primitives::{FORMAT_VERSION, MAGIC_BYTES, MAX_SHARE_PAYLOAD_SIZE};
use crate::types::{RankError, RankingState};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Minimum valid decoded size (header only).
const MIN_DECODED_SIZE: usize = 5;

// =============================================================================
// HEADER
// =============================================================================

/// The share header precedes the ranking payload.
#[derive(Debug, Clone, Copy)]
pub struct ShareHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl ShareHeader {
    /// Create a header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *MAGIC_BYTES,
            version: FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), RankError> {
        if &self.magic != MAGIC_BYTES {
            return Err(RankError::DecodeFailure("invalid magic bytes".to_string()));
        }
        if self.version != FORMAT_VERSION {
            return Err(RankError::DecodeFailure(format!(
                "unsupported version: {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write the header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read a header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RankError> {
        if bytes.len() < MIN_DECODED_SIZE {
            return Err(RankError::DecodeFailure("header too short".to_string()));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for ShareHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

/// Encode a ranking into an opaque URL-safe string.
pub fn encode_ranking(ranking: &RankingState) -> Result<String, RankError> {
    let header = ShareHeader::new();
    let payload = postcard::to_stdvec(ranking)
        .map_err(|e| RankError::SerializationError(e.to_string()))?;

    let mut bytes = Vec::with_capacity(MIN_DECODED_SIZE + payload.len());
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(&payload);

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Decode an opaque share string back into a ranking.
///
/// Validates, in order: base64 armor, minimum size, maximum payload
/// size, header magic and version — all before deserializing.
pub fn decode_ranking(encoded: &str) -> Result<RankingState, RankError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim())
        .map_err(|e| RankError::DecodeFailure(format!("invalid base64: {}", e)))?;

    if bytes.len() < MIN_DECODED_SIZE {
        return Err(RankError::DecodeFailure(
            "data too short: minimum 5 bytes required".to_string(),
        ));
    }
    if bytes.len() > MAX_SHARE_PAYLOAD_SIZE {
        return Err(RankError::DecodeFailure(format!(
            "data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SHARE_PAYLOAD_SIZE
        )));
    }

    let header = ShareHeader::from_bytes(&bytes)?;
    header.validate()?;

    let payload = &bytes[MIN_DECODED_SIZE..];
    postcard::from_bytes(payload)
        .map_err(|e| RankError::DecodeFailure(format!("failed to decode ranking payload: {}", e)))
}

// =============================================================================
// TESTS
// =============================================================================
