//! Block cipher modes, dispatched as a closed sum type.
//!
//! Each variant owns the per-call parameters it needs; encryption is
//! stateless, so a `Cipher` can be shared freely between threads.

pub mod cbc;
pub mod gcm;
pub mod legacy;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use pwseal_core::{CipherMode, SealError, SealResult};

use crate::keys::SymmetricKey;
use crate::random::{generate_iv, generate_nonce};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cipher {
    /// AES-CBC, PKCS#7, 16-byte IV
    Cbc { iv: [u8; 16] },
    /// AES-GCM, 12-byte nonce, 128-bit tag
    Gcm { nonce: [u8; 12] },
    /// AES-ECB, no IV. Insecure; see [`legacy`].
    LegacyEcb,
}

impl Cipher {
    /// A cipher for `mode` with a freshly generated IV or nonce.
    pub fn fresh(mode: CipherMode) -> SealResult<Self> {
        Ok(match mode {
            CipherMode::Cbc => Self::Cbc { iv: generate_iv()? },
            CipherMode::Gcm => Self::Gcm {
                nonce: generate_nonce()?,
            },
        })
    }

    /// Rebuild a cipher from a stored mode and IV/nonce.
    pub fn from_parts(mode: CipherMode, iv: &[u8]) -> SealResult<Self> {
        match mode {
            CipherMode::Cbc => Ok(Self::Cbc {
                iv: iv.try_into().map_err(|_| {
                    SealError::InvalidArgument(format!("CBC IV must be 16 bytes, got {}", iv.len()))
                })?,
            }),
            CipherMode::Gcm => Ok(Self::Gcm {
                nonce: iv.try_into().map_err(|_| {
                    SealError::InvalidArgument(format!(
                        "GCM nonce must be 12 bytes, got {}",
                        iv.len()
                    ))
                })?,
            }),
        }
    }

    /// Envelope mode for this cipher; `None` for the legacy path, which has
    /// no envelope representation.
    pub fn mode(&self) -> Option<CipherMode> {
        match self {
            Self::Cbc { .. } => Some(CipherMode::Cbc),
            Self::Gcm { .. } => Some(CipherMode::Gcm),
            Self::LegacyEcb => None,
        }
    }

    /// The IV or nonce bytes (empty for ECB).
    pub fn iv(&self) -> &[u8] {
        match self {
            Self::Cbc { iv } => iv,
            Self::Gcm { nonce } => nonce,
            Self::LegacyEcb => &[],
        }
    }

    pub fn encrypt(&self, plaintext: &[u8], key: &SymmetricKey) -> SealResult<Vec<u8>> {
        match self {
            Self::Cbc { iv } => cbc::encrypt(plaintext, key, iv),
            Self::Gcm { nonce } => gcm::encrypt(plaintext, key, nonce),
            Self::LegacyEcb => legacy::encrypt(plaintext, key.as_bytes()),
        }
    }

    pub fn decrypt(&self, ciphertext: &[u8], key: &SymmetricKey) -> SealResult<Vec<u8>> {
        match self {
            Self::Cbc { iv } => cbc::decrypt(ciphertext, key, iv),
            Self::Gcm { nonce } => gcm::decrypt(ciphertext, key, nonce),
            Self::LegacyEcb => legacy::decrypt(ciphertext, key.as_bytes()),
        }
    }

    /// Encrypt UTF-8 text and return a base64 ciphertext token. The caller
    /// keeps the key and this cipher's IV/nonce.
    pub fn encrypt_text(&self, text: &str, key: &SymmetricKey) -> SealResult<String> {
        let ciphertext = self.encrypt(text.as_bytes(), key)?;
        Ok(STANDARD.encode(ciphertext))
    }

    /// Decrypt a base64 ciphertext token back to UTF-8 text.
    pub fn decrypt_text(&self, token: &str, key: &SymmetricKey) -> SealResult<String> {
        let ciphertext = STANDARD
            .decode(token)
            .map_err(|e| SealError::Decode(format!("base64 decode ciphertext: {e}")))?;
        let plaintext = self.decrypt(&ciphertext, key)?;
        String::from_utf8(plaintext)
            .map_err(|e| SealError::Decode(format!("decrypted text is not UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_random_key;

    #[test]
    fn test_fresh_ciphers_get_fresh_ivs() {
        let a = Cipher::fresh(CipherMode::Gcm).unwrap();
        let b = Cipher::fresh(CipherMode::Gcm).unwrap();
        assert_eq!(a.iv().len(), 12);
        assert_ne!(a.iv(), b.iv());

        let c = Cipher::fresh(CipherMode::Cbc).unwrap();
        assert_eq!(c.iv().len(), 16);
        assert_eq!(c.mode(), Some(CipherMode::Cbc));
    }

    #[test]
    fn test_text_roundtrip_each_variant() {
        let key = generate_random_key(256).unwrap();
        for cipher in [
            Cipher::fresh(CipherMode::Cbc).unwrap(),
            Cipher::fresh(CipherMode::Gcm).unwrap(),
            Cipher::LegacyEcb,
        ] {
            let token = cipher.encrypt_text("héllo wörld", &key).unwrap();
            assert_eq!(cipher.decrypt_text(&token, &key).unwrap(), "héllo wörld");
        }
    }

    #[test]
    fn test_from_parts() {
        let cipher = Cipher::from_parts(CipherMode::Gcm, &[7u8; 12]).unwrap();
        assert_eq!(cipher, Cipher::Gcm { nonce: [7u8; 12] });

        assert!(matches!(
            Cipher::from_parts(CipherMode::Cbc, &[7u8; 12]),
            Err(SealError::InvalidArgument(_))
        ));
        assert!(matches!(
            Cipher::from_parts(CipherMode::Gcm, &[7u8; 16]),
            Err(SealError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_legacy_has_no_mode() {
        assert_eq!(Cipher::LegacyEcb.mode(), None);
        assert!(Cipher::LegacyEcb.iv().is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let key = generate_random_key(256).unwrap();
        let cipher = Cipher::fresh(CipherMode::Gcm).unwrap();
        let token = STANDARD.encode(cipher.encrypt(&[0xFF, 0xFE], &key).unwrap());

        assert!(matches!(cipher.decrypt_text(&token, &key), Err(SealError::Decode(_))));
    }
}
