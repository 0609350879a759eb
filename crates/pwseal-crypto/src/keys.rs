//! Symmetric key material and random key generation

use zeroize::Zeroizing;

use pwseal_core::{SealError, SealResult};

use crate::random::fill_random;

/// An AES key (128, 192 or 256 bits). Zeroized on drop.
///
/// Keys are never serialized; they are derived or generated per operation.
#[derive(Clone)]
pub struct SymmetricKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl SymmetricKey {
    pub const ALGORITHM: &'static str = "AES";

    /// Wrap raw key bytes. Length must be 16, 24 or 32.
    pub fn from_bytes(bytes: &[u8]) -> SealResult<Self> {
        check_aes_key_len(bytes.len())?;
        Ok(Self {
            bytes: Zeroizing::new(bytes.to_vec()),
        })
    }

    pub(crate) fn from_zeroizing(bytes: Zeroizing<Vec<u8>>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len_bits(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn algorithm(&self) -> &'static str {
        Self::ALGORITHM
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("algorithm", &Self::ALGORITHM)
            .field("bits", &self.len_bits())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

pub(crate) fn check_aes_key_len(len: usize) -> SealResult<()> {
    match len {
        16 | 24 | 32 => Ok(()),
        other => Err(SealError::InvalidArgument(format!(
            "AES key must be 16, 24 or 32 bytes, got {other}"
        ))),
    }
}

/// Generate a random AES key of `bits` bits (128, 192 or 256).
pub fn generate_random_key(bits: usize) -> SealResult<SymmetricKey> {
    if !matches!(bits, 128 | 192 | 256) {
        return Err(SealError::InvalidArgument(format!(
            "key size must be 128, 192 or 256 bits, got {bits}"
        )));
    }

    let mut bytes = Zeroizing::new(vec![0u8; bits / 8]);
    fill_random(&mut bytes)?;
    Ok(SymmetricKey::from_zeroizing(bytes))
}
