//! AES-CBC with PKCS#7 padding
//!
//! Not authenticated: a corrupted ciphertext that still unpads cleanly
//! decrypts to garbage without any error. Prefer GCM for new data.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use pwseal_core::{SealError, SealResult};

use crate::keys::SymmetricKey;
use crate::BLOCK_SIZE;

/// Encrypt `plaintext` under `key` and a 16-byte `iv`.
///
/// Output length is the plaintext length rounded up to the next full block
/// (a whole padding block is added when it is already aligned).
pub fn encrypt(plaintext: &[u8], key: &SymmetricKey, iv: &[u8]) -> SealResult<Vec<u8>> {
    check_iv(iv)?;
    let ciphertext = match key.as_bytes().len() {
        16 => encrypt_with::<cbc::Encryptor<Aes128>>(key.as_bytes(), iv, plaintext),
        24 => encrypt_with::<cbc::Encryptor<Aes192>>(key.as_bytes(), iv, plaintext),
        _ => encrypt_with::<cbc::Encryptor<Aes256>>(key.as_bytes(), iv, plaintext),
    }?;
    tracing::debug!(len = plaintext.len(), "AES-CBC encrypt");
    Ok(ciphertext)
}

/// Decrypt AES-CBC output. Bad padding, a wrong key, or a length that is not
/// a whole number of blocks yields `SealError::Decryption`.
pub fn decrypt(ciphertext: &[u8], key: &SymmetricKey, iv: &[u8]) -> SealResult<Vec<u8>> {
    check_iv(iv)?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(SealError::Decryption(format!(
            "CBC ciphertext length {} is not a positive multiple of {BLOCK_SIZE}",
            ciphertext.len()
        )));
    }

    match key.as_bytes().len() {
        16 => decrypt_with::<cbc::Decryptor<Aes128>>(key.as_bytes(), iv, ciphertext),
        24 => decrypt_with::<cbc::Decryptor<Aes192>>(key.as_bytes(), iv, ciphertext),
        _ => decrypt_with::<cbc::Decryptor<Aes256>>(key.as_bytes(), iv, ciphertext),
    }
}

fn check_iv(iv: &[u8]) -> SealResult<()> {
    if iv.len() != BLOCK_SIZE {
        return Err(SealError::InvalidArgument(format!(
            "CBC IV must be {BLOCK_SIZE} bytes, got {}",
            iv.len()
        )));
    }
    Ok(())
}

fn encrypt_with<E: KeyIvInit + BlockEncryptMut>(
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
) -> SealResult<Vec<u8>> {
    let encryptor = E::new_from_slices(key, iv)
        .map_err(|e| SealError::InvalidArgument(format!("creating AES-CBC cipher: {e}")))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn decrypt_with<D: KeyIvInit + BlockDecryptMut>(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> SealResult<Vec<u8>> {
    let decryptor = D::new_from_slices(key, iv)
        .map_err(|e| SealError::InvalidArgument(format!("creating AES-CBC cipher: {e}")))?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| SealError::Decryption("bad padding: wrong key or corrupted data".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_random_key;
    use crate::random::generate_iv;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = generate_random_key(256).unwrap();
        let iv = generate_iv().unwrap();
        let plaintext = b"hello, chained world!";

        let ciphertext = encrypt(plaintext, &key, &iv).unwrap();
        let decrypted = decrypt(&ciphertext, &key, &iv).unwrap();

        assert_eq!(&decrypted, plaintext);
    }

    #[test]
    fn test_all_key_sizes() {
        for bits in [128, 192, 256] {
            let key = generate_random_key(bits).unwrap();
            let iv = generate_iv().unwrap();
            let ciphertext = encrypt(b"sized", &key, &iv).unwrap();
            assert_eq!(decrypt(&ciphertext, &key, &iv).unwrap(), b"sized");
        }
    }

    #[test]
    fn test_padding_sizes() {
        let key = generate_random_key(256).unwrap();
        let iv = generate_iv().unwrap();

        assert_eq!(encrypt(b"", &key, &iv).unwrap().len(), 16);
        assert_eq!(encrypt(&[1u8; 15], &key, &iv).unwrap().len(), 16);
        // Aligned input gets a full padding block
        assert_eq!(encrypt(&[1u8; 16], &key, &iv).unwrap().len(), 32);
    }

    #[test]
    fn test_identical_blocks_differ_in_ciphertext() {
        let key = generate_random_key(256).unwrap();
        let iv = generate_iv().unwrap();

        let ciphertext = encrypt(&[0x42u8; 32], &key, &iv).unwrap();
        assert_ne!(ciphertext[..16], ciphertext[16..32], "chaining must hide repeated blocks");
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let key1 = generate_random_key(256).unwrap();
        let key2 = generate_random_key(256).unwrap();
        let iv = generate_iv().unwrap();
        let plaintext = b"secret data that spans more than one block";

        let ciphertext = encrypt(plaintext, &key1, &iv).unwrap();
        match decrypt(&ciphertext, &key2, &iv) {
            Err(SealError::Decryption(_)) => {}
            // Padding can check out by chance; the plaintext still must not.
            Ok(garbage) => assert_ne!(garbage.as_slice(), plaintext.as_slice()),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_length_rejected() {
        let key = generate_random_key(256).unwrap();
        let iv = generate_iv().unwrap();

        assert!(matches!(decrypt(&[0u8; 15], &key, &iv), Err(SealError::Decryption(_))));
        assert!(matches!(decrypt(&[], &key, &iv), Err(SealError::Decryption(_))));
    }

    #[test]
    fn test_bad_iv_length() {
        let key = generate_random_key(256).unwrap();
        let result = encrypt(b"data", &key, &[0u8; 12]);
        assert!(matches!(result, Err(SealError::InvalidArgument(_))));
    }
}
