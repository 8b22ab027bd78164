//! Digest to shard routing
//!
//! Routing reads the leading eight bytes of a digest from its hex form as a
//! big-endian `u64` and reduces it modulo the shard count. A 64-bit prefix
//! keeps the split even when the shard count is not a power of two. The mapping is pure and fixed for the life of a
//! cache, so a given digest always lands on the same shard.

use crate::config::MAX_SHARD_COUNT;
use crate::digest::Digest;
use crate::errors::{CacheError, Result};

/// Digest bytes read when routing
const PREFIX_LEN: usize = 8;

/// Maps digests onto shard indexes in `[0, shard_count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    shard_count: usize,
}

impl Router {
    pub fn new(shard_count: usize) -> Result<Self> {
        if shard_count == 0 || shard_count > MAX_SHARD_COUNT {
            return Err(CacheError::configuration(format!(
                "shard_count must be between 1 and {MAX_SHARD_COUNT}, got {shard_count}"
            )));
        }
        Ok(Self { shard_count })
    }

    pub fn shard_count(&self) -> usize {
        self.shard_count
    }

    /// Shard owning the digest
    pub fn route(&self, digest: &Digest) -> Result<usize> {
        self.route_hex(digest.as_hex())
    }

    /// Shard owning a hex-encoded digest
    ///
    /// Malformed input is reported as [`CacheError::DigestEncoding`].
    pub fn route_hex(&self, hex: &str) -> Result<usize> {
        let prefix = hex.as_bytes().get(..PREFIX_LEN * 2).ok_or_else(|| {
            CacheError::digest_encoding(hex, format!("shorter than {PREFIX_LEN} bytes"))
        })?;

        let mut value = 0u64;
        for &c in prefix {
            let digit = nibble(c)
                .ok_or_else(|| CacheError::digest_encoding(hex, "invalid hex character"))?;
            value = (value << 4) | u64::from(digit);
        }

        Ok((value % self.shard_count as u64) as usize)
    }
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::KeyDigester;
    use proptest::prelude::*;

    #[test]
    fn test_shard_count_bounds() {
        assert!(Router::new(0).is_err());
        assert!(Router::new(MAX_SHARD_COUNT + 1).is_err());
        assert_eq!(Router::new(16).unwrap().shard_count(), 16);
    }

    #[test]
    fn test_route_uses_leading_bytes() {
        let router = Router::new(16).unwrap();
        assert_eq!(router.route_hex("0000000000000000ff").unwrap(), 0);
        assert_eq!(router.route_hex("000000000000000f").unwrap(), 15);
        assert_eq!(router.route_hex("ff0000000000001f").unwrap(), 15);
        assert_eq!(router.route_hex("00000000000000A3").unwrap(), 3);

        let everything = Router::new(256).unwrap();
        assert_eq!(everything.route_hex("00000000000000ff").unwrap(), 255);
        assert_eq!(everything.route_hex("0000000000000100").unwrap(), 0);

        // 256 % 100
        let hundred = Router::new(100).unwrap();
        assert_eq!(hundred.route_hex("0000000000000100").unwrap(), 56);
    }

    #[test]
    fn test_malformed_digest_is_rejected() {
        let router = Router::new(16).unwrap();
        for bad in [
            "",
            "a",
            "00",
            "0123456789abcde",
            "g000000000000000",
            "000000000000000g",
            "é000000000000000",
        ] {
            assert!(
                matches!(router.route_hex(bad), Err(CacheError::DigestEncoding { .. })),
                "expected digest error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_distribution_is_not_skewed() {
        let router = Router::new(16).unwrap();
        let digester = KeyDigester::default();
        let mut counts = [0usize; 16];

        for i in 0..16_000u32 {
            let digest = digester.digest(&format!("key-{i}")).unwrap();
            counts[router.route(&digest).unwrap()] += 1;
        }

        // Expected 1000 per shard
        for (shard, count) in counts.iter().enumerate() {
            assert!(
                (700..=1300).contains(count),
                "shard {shard} holds {count} of 16000 keys"
            );
        }
    }

    #[test]
    fn test_distribution_with_uneven_shard_count() {
        let router = Router::new(100).unwrap();
        let digester = KeyDigester::default();
        let mut counts = [0usize; 100];

        for i in 0..50_000u32 {
            let digest = digester.digest(&i).unwrap();
            counts[router.route(&digest).unwrap()] += 1;
        }

        // Expected 500 per shard; a single-byte prefix would put about 586
        // on the low 56 shards and 390 on the rest
        for (shard, count) in counts.iter().enumerate() {
            assert!(
                (400..=600).contains(count),
                "shard {shard} holds {count} of 50000 keys"
            );
        }
    }

    proptest! {
        #[test]
        fn prop_route_in_range(shards in 1usize..=256, hex in "[0-9a-fA-F]{16,128}") {
            let router = Router::new(shards).unwrap();
            let shard = router.route_hex(&hex).unwrap();
            prop_assert!(shard < shards);
            prop_assert_eq!(shard, router.route_hex(&hex).unwrap());
        }
    }
}
