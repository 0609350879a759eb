//! Legacy fixed-key AES-ECB (PKCS#7), no IV, no salt.
//!
//! INSECURE. Identical plaintext blocks encrypt to identical ciphertext
//! blocks under the same key, so structure in the input shows through, and
//! the key is the raw password bytes with no derivation. Kept only to read
//! and write data produced by older releases; use the envelope helpers for
//! anything new.

use aes::{Aes128, Aes256};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ecb::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyInit};

use pwseal_core::{SealError, SealResult};

use crate::BLOCK_SIZE;

/// Encrypt with AES-ECB under `key`, which must be exactly 16 or 32 bytes.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> SealResult<Vec<u8>> {
    match key.len() {
        16 => encrypt_with::<ecb::Encryptor<Aes128>>(key, plaintext),
        32 => encrypt_with::<ecb::Encryptor<Aes256>>(key, plaintext),
        other => Err(key_len_error(other)),
    }
}

/// Decrypt AES-ECB output under `key` (16 or 32 bytes).
pub fn decrypt(ciphertext: &[u8], key: &[u8]) -> SealResult<Vec<u8>> {
    if !matches!(key.len(), 16 | 32) {
        return Err(key_len_error(key.len()));
    }
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(SealError::Decryption(format!(
            "ECB ciphertext length {} is not a positive multiple of {BLOCK_SIZE}",
            ciphertext.len()
        )));
    }

    if key.len() == 16 {
        decrypt_with::<ecb::Decryptor<Aes128>>(key, ciphertext)
    } else {
        decrypt_with::<ecb::Decryptor<Aes256>>(key, ciphertext)
    }
}

/// Encrypt UTF-8 `text` using the password bytes directly as the key.
/// Returns a base64 token.
pub fn encrypt_text(text: &str, password: &str) -> SealResult<String> {
    tracing::warn!("using insecure legacy ECB encryption");
    let ciphertext = encrypt(text.as_bytes(), password.as_bytes())?;
    Ok(STANDARD.encode(ciphertext))
}

/// Reverse of [`encrypt_text`].
pub fn decrypt_text(token: &str, password: &str) -> SealResult<String> {
    let ciphertext = STANDARD
        .decode(token)
        .map_err(|e| SealError::Decode(format!("base64 decode ciphertext: {e}")))?;
    let plaintext = decrypt(&ciphertext, password.as_bytes())?;
    String::from_utf8(plaintext)
        .map_err(|e| SealError::Decode(format!("decrypted text is not UTF-8: {e}")))
}

fn key_len_error(len: usize) -> SealError {
    SealError::InvalidArgument(format!("legacy ECB key must be 16 or 32 bytes, got {len}"))
}

fn encrypt_with<E: KeyInit + BlockEncryptMut>(key: &[u8], plaintext: &[u8]) -> SealResult<Vec<u8>> {
    let encryptor = E::new_from_slice(key).map_err(|_| key_len_error(key.len()))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn decrypt_with<D: KeyInit + BlockDecryptMut>(key: &[u8], ciphertext: &[u8]) -> SealResult<Vec<u8>> {
    let decryptor = D::new_from_slice(key).map_err(|_| key_len_error(key.len()))?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| SealError::Decryption("bad padding: wrong key or corrupted data".into()))
}
