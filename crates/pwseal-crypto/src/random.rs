//! OS-backed random bytes for salts, IVs, nonces and keys

use rand::rngs::OsRng;
use rand::RngCore;

use pwseal_core::{SealError, SealResult};

use crate::{BLOCK_SIZE, GCM_NONCE_SIZE};

/// Fill a fresh buffer of `size` bytes from the operating system CSPRNG.
///
/// An entropy-source failure is unexpected and surfaces as `SealError::Other`.
pub fn generate_random_bytes(size: usize) -> SealResult<Vec<u8>> {
    let mut bytes = vec![0u8; size];
    fill_random(&mut bytes)?;
    Ok(bytes)
}

pub(crate) fn fill_random(buf: &mut [u8]) -> SealResult<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| SealError::Other(anyhow::anyhow!("OS random source failed: {e}")))
}

/// Generate a salt of `len` bytes. Zero-length salts are rejected.
pub fn generate_salt(len: usize) -> SealResult<Vec<u8>> {
    if len == 0 {
        return Err(SealError::InvalidArgument("salt length must be non-zero".into()));
    }
    generate_random_bytes(len)
}

/// A fresh 16-byte CBC initialization vector
pub fn generate_iv() -> SealResult<[u8; BLOCK_SIZE]> {
    let mut iv = [0u8; BLOCK_SIZE];
    fill_random(&mut iv)?;
    Ok(iv)
}

/// A fresh 12-byte GCM nonce
pub fn generate_nonce() -> SealResult<[u8; GCM_NONCE_SIZE]> {
    let mut nonce = [0u8; GCM_NONCE_SIZE];
    fill_random(&mut nonce)?;
    Ok(nonce)
}
