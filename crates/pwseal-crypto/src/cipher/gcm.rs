//! AES-GCM authenticated encryption
//!
//! Output format: `[ciphertext][16-byte tag]`. The 12-byte nonce is not
//! prepended; callers store it (the envelope carries it as its own field).
//!
//! A nonce must never be reused under the same key.

use aes::{Aes128, Aes192, Aes256};
use aes_gcm::{
    aead::{consts::U12, Aead, KeyInit, Nonce},
    AesGcm,
};

use pwseal_core::{SealError, SealResult};

use crate::keys::SymmetricKey;
use crate::{GCM_NONCE_SIZE, TAG_SIZE};

type Aes128Gcm = AesGcm<Aes128, U12>;
type Aes192Gcm = AesGcm<Aes192, U12>;
type Aes256Gcm = AesGcm<Aes256, U12>;

/// Encrypt `plaintext` with AES-GCM under `key` and a 12-byte `nonce`.
///
/// Returns ciphertext with the 128-bit tag appended.
pub fn encrypt(plaintext: &[u8], key: &SymmetricKey, nonce: &[u8]) -> SealResult<Vec<u8>> {
    check_nonce(nonce)?;
    let ciphertext = match key.as_bytes().len() {
        16 => seal::<Aes128Gcm>(key.as_bytes(), nonce, plaintext),
        24 => seal::<Aes192Gcm>(key.as_bytes(), nonce, plaintext),
        _ => seal::<Aes256Gcm>(key.as_bytes(), nonce, plaintext),
    }?;
    tracing::debug!(len = plaintext.len(), "AES-GCM encrypt");
    Ok(ciphertext)
}

/// Decrypt and verify AES-GCM output.
///
/// A tag mismatch (tampering, wrong key, wrong nonce) yields
/// `SealError::Authentication` and no plaintext.
pub fn decrypt(ciphertext: &[u8], key: &SymmetricKey, nonce: &[u8]) -> SealResult<Vec<u8>> {
    check_nonce(nonce)?;
    if ciphertext.len() < TAG_SIZE {
        tracing::warn!(len = ciphertext.len(), "AES-GCM ciphertext shorter than its tag");
        return Err(SealError::Authentication);
    }

    let result = match key.as_bytes().len() {
        16 => open::<Aes128Gcm>(key.as_bytes(), nonce, ciphertext),
        24 => open::<Aes192Gcm>(key.as_bytes(), nonce, ciphertext),
        _ => open::<Aes256Gcm>(key.as_bytes(), nonce, ciphertext),
    };
    if matches!(result, Err(SealError::Authentication)) {
        tracing::warn!("AES-GCM tag verification failed");
    }
    result
}

fn check_nonce(nonce: &[u8]) -> SealResult<()> {
    if nonce.len() != GCM_NONCE_SIZE {
        return Err(SealError::InvalidArgument(format!(
            "GCM nonce must be {GCM_NONCE_SIZE} bytes, got {}",
            nonce.len()
        )));
    }
    Ok(())
}

fn seal<C: Aead + KeyInit>(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> SealResult<Vec<u8>> {
    let cipher = C::new_from_slice(key)
        .map_err(|e| SealError::InvalidArgument(format!("creating AES-GCM cipher: {e}")))?;
    cipher
        .encrypt(Nonce::<C>::from_slice(nonce), plaintext)
        .map_err(|e| SealError::Other(anyhow::anyhow!("AES-GCM encryption failed: {e}")))
}

fn open<C: Aead + KeyInit>(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> SealResult<Vec<u8>> {
    let cipher = C::new_from_slice(key)
        .map_err(|e| SealError::InvalidArgument(format!("creating AES-GCM cipher: {e}")))?;
    cipher
        .decrypt(Nonce::<C>::from_slice(nonce), ciphertext)
        .map_err(|_| SealError::Authentication)
}
