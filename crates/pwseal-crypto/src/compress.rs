//! Optional zstd compression applied before encryption and after decryption
//!
//! Empty input passes through unchanged in both directions, so an empty
//! plaintext stays an empty plaintext whether or not compression is on.

use pwseal_core::{SealError, SealResult};

/// Default zstd level
pub const DEFAULT_LEVEL: i32 = 3;

/// Compress `data` as a single zstd frame.
pub fn compress(data: &[u8], level: i32) -> SealResult<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let compressed = zstd::encode_all(data, level)
        .map_err(|e| SealError::Compression(format!("zstd compress: {e}")))?;
    tracing::debug!(
        original = data.len(),
        compressed = compressed.len(),
        "compressed plaintext"
    );
    Ok(compressed)
}

/// Decompress a zstd frame produced by [`compress`].
pub fn decompress(data: &[u8]) -> SealResult<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    zstd::decode_all(data).map_err(|e| SealError::Compression(format!("zstd decompress: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round_trip_small() {
        let data = b"hello compressed world";
        let packed = compress(data, DEFAULT_LEVEL).unwrap();
        assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn empty_passes_through() {
        assert!(compress(b"", DEFAULT_LEVEL).unwrap().is_empty());
        assert!(decompress(b"").unwrap().is_empty());
    }

    #[test]
    fn repetitive_input_shrinks() {
        let data: Vec<u8> = b"abcdefgh".iter().copied().cycle().take(64 * 1024).collect();
        let packed = compress(&data, DEFAULT_LEVEL).unwrap();
        assert!(packed.len() < data.len() / 10);
        assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn garbage_is_compression_error() {
        let result = decompress(b"definitely not a zstd frame");
        assert!(matches!(result, Err(SealError::Compression(_))));
    }

    proptest! {
        #[test]
        fn compress_decompress_roundtrip(
            data in proptest::collection::vec(any::<u8>(), 0..=16384),
            level in 1i32..=9,
        ) {
            let packed = compress(&data, level).unwrap();
            let out = decompress(&packed).unwrap();
            prop_assert_eq!(out, data, "round-trip must be identical");
        }
    }
}
