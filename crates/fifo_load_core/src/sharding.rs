use sha2::{Digest, Sha256};

use crate::contract::ValidationError;

pub const FINGERPRINT_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardAssignment {
    pub shard_index: usize,
    /// Leading hex characters of the key digest. Diagnostics only; routing
    /// uses `shard_index`.
    pub fingerprint: String,
}

/// Maps a shard key onto one of `num_shards` buckets.
///
/// The SHA-256 digest of the key is read as a big-endian `u32` from its first
/// four bytes and reduced modulo `num_shards`. No seed is involved, so the
/// same key lands on the same shard in every run and process.
pub fn compute_shard(key: &str, num_shards: usize) -> Result<ShardAssignment, ValidationError> {
    if num_shards == 0 {
        return Err(ValidationError::new(
            "num_shards must be a positive integer",
        ));
    }

    let digest = Sha256::digest(key.as_bytes());
    let hash_value = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    let shard_index = (u64::from(hash_value) % num_shards as u64) as usize;

    let mut fingerprint = format!("{digest:x}");
    fingerprint.truncate(FINGERPRINT_LEN);

    Ok(ShardAssignment {
        shard_index,
        fingerprint,
    })
}
