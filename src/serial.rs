//! Binary cache for parsed rule repositories.
//!
//! Parsing every annotation on each start is cheap but not free for large
//! databases. A [`RuleRepository`](crate::RuleRepository) can be written out
//! once and loaded back as long as the annotation text has not changed. The
//! format is a 32-byte fixed header followed by a bincode-encoded payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"VAFT"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! The payload records a BLAKE3 digest of the annotation text the repository
//! was parsed from, when one was given. [`RuleRepository::from_cache`]
//! refuses a blob whose digest does not match the current text.
//!
//! ## Versioning
//!
//! The format version in the header must match exactly. If it does not,
//! deserialization fails immediately with [`DeserializeError::IncompatibleVersion`].
//! The engine version is informational only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Phase, Rule, RuleRepository};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"VAFT";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when serializing a [`RuleRepository`](crate::RuleRepository).
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode rule repository: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when loading a [`RuleRepository`](crate::RuleRepository) from bytes.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not an aftermath rule cache: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("cache was built from different annotation text")]
    StaleSource,

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SerializedRepository {
    metadata: RepositoryMetadata,
    rules: Vec<SerializedRule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RepositoryMetadata {
    experience_count: usize,
    loot_count: usize,
    level_up_count: usize,
    source_digest: Option<[u8; 32]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
enum SerializedPhase {
    Experience,
    Loot,
    LevelUp,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedRule {
    phase: SerializedPhase,
    condition: String,
    priority: String,
    effect: String,
    suppresses_message: bool,
    owner: Option<u32>,
}

// ---------------------------------------------------------------------------
// Phase conversion
// ---------------------------------------------------------------------------

fn serialize_phase(phase: Phase) -> SerializedPhase {
    match phase {
        Phase::Experience => SerializedPhase::Experience,
        Phase::Loot => SerializedPhase::Loot,
        Phase::LevelUp => SerializedPhase::LevelUp,
    }
}

fn deserialize_phase(phase: SerializedPhase) -> Phase {
    match phase {
        SerializedPhase::Experience => Phase::Experience,
        SerializedPhase::Loot => Phase::Loot,
        SerializedPhase::LevelUp => Phase::LevelUp,
    }
}

// ---------------------------------------------------------------------------
// Rule conversion
// ---------------------------------------------------------------------------

fn serialize_rule(rule: &Rule) -> SerializedRule {
    SerializedRule {
        phase: serialize_phase(rule.phase()),
        condition: rule.condition().to_owned(),
        priority: rule.priority_body().to_owned(),
        effect: rule.effect().to_owned(),
        suppresses_message: rule.suppresses_message(),
        owner: rule.owner(),
    }
}

fn deserialize_rule(rule: SerializedRule) -> Rule {
    let mut restored = Rule::new(deserialize_phase(rule.phase), rule.effect)
        .when(rule.condition)
        .priority(rule.priority);
    if rule.suppresses_message {
        restored = restored.no_message();
    }
    if let Some(owner) = rule.owner {
        restored = restored.owned_by(owner);
    }
    restored
}

fn source_digest(source_text: &str) -> [u8; 32] {
    *blake3::hash(source_text.as_bytes()).as_bytes()
}

// ---------------------------------------------------------------------------
// RuleRepository <-> SerializedRepository
// ---------------------------------------------------------------------------

fn repository_to_serialized(
    repository: &RuleRepository,
    source_text: Option<&str>,
) -> SerializedRepository {
    SerializedRepository {
        metadata: RepositoryMetadata {
            experience_count: repository.experience.len(),
            loot_count: repository.loot.len(),
            level_up_count: repository.level_up.len(),
            source_digest: source_text.map(source_digest),
        },
        rules: repository.iter().map(serialize_rule).collect(),
    }
}

fn serialized_to_repository(ser: SerializedRepository) -> Result<RuleRepository, DeserializeError> {
    validate(&ser)?;

    let mut repository = RuleRepository::new();
    for rule in ser.rules {
        repository.push(deserialize_rule(rule));
    }
    Ok(repository)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(ser: &SerializedRepository) -> Result<(), DeserializeError> {
    let count = |phase: SerializedPhase| ser.rules.iter().filter(|r| r.phase == phase).count();
    let expected = [
        (SerializedPhase::Experience, ser.metadata.experience_count),
        (SerializedPhase::Loot, ser.metadata.loot_count),
        (SerializedPhase::LevelUp, ser.metadata.level_up_count),
    ];
    for (phase, declared) in expected {
        let actual = count(phase);
        if declared != actual {
            return Err(DeserializeError::Validation(format!(
                "metadata says {declared} {phase:?} rules but payload has {actual}"
            )));
        }
    }

    // Rules are stored phase by phase.
    for window in ser.rules.windows(2) {
        if window[0].phase > window[1].phase {
            return Err(DeserializeError::Validation(
                "rules not grouped by phase".to_owned(),
            ));
        }
    }

    for (index, rule) in ser.rules.iter().enumerate() {
        validate_rule(index, rule)?;
    }

    Ok(())
}

fn validate_rule(index: usize, rule: &SerializedRule) -> Result<(), DeserializeError> {
    if rule.effect.trim().is_empty() {
        return Err(DeserializeError::Validation(format!(
            "rule {index} has an empty effect body"
        )));
    }
    // `Rule::owned_by` never stores 0.
    if rule.owner == Some(0) {
        return Err(DeserializeError::Validation(format!(
            "rule {index} is owned by entity 0"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);
    let hash_bytes = hash.as_bytes();

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    #[allow(clippy::cast_possible_truncation)] // payload will never exceed 4 GiB
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash_bytes[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    // bytes[6..8] is engine_version, bytes[8..12] is flags
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

// ---------------------------------------------------------------------------
// Encode/decode
// ---------------------------------------------------------------------------

pub(crate) fn encode(
    repository: &RuleRepository,
    source_text: Option<&str>,
) -> Result<Vec<u8>, SerializeError> {
    let serialized = repository_to_serialized(repository, source_text);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

fn decode_payload(bytes: &[u8]) -> Result<SerializedRepository, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_end = HEADER_SIZE + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[HEADER_SIZE..payload_end];

    let computed_hash = blake3::hash(payload);
    if computed_hash.as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedRepository, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    Ok(serialized)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<RuleRepository, DeserializeError> {
    serialized_to_repository(decode_payload(bytes)?)
}

pub(crate) fn decode_fresh(
    bytes: &[u8],
    source_text: &str,
) -> Result<RuleRepository, DeserializeError> {
    let serialized = decode_payload(bytes)?;
    if serialized.metadata.source_digest != Some(source_digest(source_text)) {
        return Err(DeserializeError::StaleSource);
    }
    serialized_to_repository(serialized)
}

impl RuleRepository {
    /// Serialize this repository to a byte vector.
    ///
    /// The optional `source_text` is hashed (BLAKE3) and embedded in the
    /// payload so [`from_cache`](Self::from_cache) can tell when the
    /// annotations have changed.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`] if encoding fails.
    pub fn to_bytes(&self, source_text: Option<&str>) -> Result<Vec<u8>, SerializeError> {
        encode(self, source_text)
    }

    /// Load a repository from bytes produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`] on format, integrity, or validation
    /// failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeserializeError> {
        decode(bytes)
    }

    /// Like [`from_bytes`](Self::from_bytes), but only if the blob was built
    /// from exactly `source_text`.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError::StaleSource`] when the embedded digest is
    /// missing or differs, and the [`from_bytes`](Self::from_bytes) errors
    /// otherwise.
    pub fn from_cache(bytes: &[u8], source_text: &str) -> Result<Self, DeserializeError> {
        decode_fresh(bytes, source_text)
    }

    /// Serialize this repository and write it to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`] on encoding or I/O failure.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<std::path::Path>,
        source_text: Option<&str>,
    ) -> Result<(), SerializeError> {
        let bytes = self.to_bytes(source_text)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a file and load the repository it contains.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`] on I/O, format, integrity, or validation
    /// failure.
    pub fn from_binary_file(path: impl AsRef<std::path::Path>) -> Result<Self, DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
