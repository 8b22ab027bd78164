//! Key digests
//!
//! Any `Serialize` value can be a cache key. The key is encoded with
//! bincode's fixed-width little-endian format, prefixed with a signature of
//! the key's serde shape, and the result is hashed with a SHA-2 function.
//! The shape keeps keys of different types apart even when their bincode
//! bytes match. The hex form of the hash is the storage key; its leading
//! bytes select the shard.
//!
//! Equal keys give equal digests as long as their `Serialize` output is
//! deterministic. Types whose serialization order depends on runtime state
//! (for example `std::collections::HashMap`) should not be used as keys;
//! prefer `BTreeMap`.

use crate::errors::{CacheError, Result};
use crate::shape;
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;

/// Digest algorithm used to hash encoded keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashType {
    /// Length of the digest in bytes
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    fn hash(self, parts: &[&[u8]]) -> Vec<u8> {
        fn run<H: sha2::Digest>(parts: &[&[u8]]) -> Vec<u8> {
            let mut hasher = H::new();
            for part in parts {
                hasher.update(part);
            }
            hasher.finalize().to_vec()
        }

        match self {
            Self::Sha256 => run::<Sha256>(parts),
            Self::Sha384 => run::<Sha384>(parts),
            Self::Sha512 => run::<Sha512>(parts),
        }
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        };
        f.write_str(name)
    }
}

impl FromStr for HashType {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(CacheError::configuration(format!(
                "unknown hash type: {s}"
            ))),
        }
    }
}

/// Fixed-length digest of a key, kept alongside its hex encoding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    bytes: Vec<u8>,
    hex: String,
}

impl Digest {
    /// Wrap raw digest bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let hex = hex::encode(&bytes);
        Self { bytes, hex }
    }

    /// Parse a hex-encoded digest
    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = hex::decode(hex)
            .map_err(|e| CacheError::digest_encoding(hex, format!("not valid hex: {e}")))?;
        if bytes.is_empty() {
            return Err(CacheError::digest_encoding(hex, "digest is empty"));
        }
        Ok(Self {
            bytes,
            hex: hex.to_lowercase(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex encoding, used as the storage key
    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    pub fn into_hex(self) -> String {
        self.hex
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// Reduces arbitrary keys to digests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyDigester {
    hash_type: HashType,
}

impl KeyDigester {
    pub fn new(hash_type: HashType) -> Self {
        Self { hash_type }
    }

    pub fn hash_type(&self) -> HashType {
        self.hash_type
    }

    /// Digest a key without taking ownership of it
    ///
    /// Fails with [`CacheError::KeyEncoding`] when the key cannot be
    /// serialized, or when it serializes to nothing at all (unit structs and
    /// other field-less values), since such keys would all collide.
    pub fn digest<K>(&self, key: &K) -> Result<Digest>
    where
        K: Serialize + ?Sized,
    {
        let encoded = bincode::serialize(key)
            .map_err(|e| CacheError::key_encoding(format!("failed to serialize key: {e}")))?;

        if encoded.is_empty() {
            return Err(CacheError::key_encoding(
                "key serializes to an empty byte sequence",
            ));
        }

        let shape = shape::signature(key)
            .map_err(|e| CacheError::key_encoding(format!("failed to serialize key: {e}")))?;
        let shape_len = (shape.len() as u64).to_le_bytes();

        let digest = Digest::from_bytes(self.hash_type.hash(&[
            shape_len.as_slice(),
            shape.as_slice(),
            encoded.as_slice(),
        ]));
        tracing::trace!(
            encoded_len = encoded.len(),
            shape_len = shape.len(),
            digest = %digest,
            "computed key digest"
        );
        Ok(digest)
    }
}
