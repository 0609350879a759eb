//! Self-describing encryption envelope
//!
//! An envelope carries everything needed to decrypt except the password:
//! mode, IV/nonce, PBKDF2 iteration count, salt, compression flag, and the
//! ciphertext. Its textual token is:
//!
//! ```text
//! base64( MODE ␟ base64(iv) ␟ iterations ␟ base64(salt) ␟ true|false ␟ base64(ciphertext) )
//! ```
//!
//! `␟` is U+001F, which never occurs in base64, decimal or boolean text.
//! The schema is identified by field count and order; the mode tag comes
//! first so new modes can be added without breaking the arity check.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use pwseal_core::{CipherMode, SealError, SealResult};

use crate::cipher::Cipher;
use crate::compress::decompress;
use crate::kdf::derive_key_from_password;
use crate::MAX_ITERATIONS;

/// Field separator inside the decoded token
pub const SEPARATOR: char = '\u{1F}';
const SEPARATOR_STR: &str = "\u{1F}";

/// Number of fields in the current token schema
pub const FIELD_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionEnvelope {
    pub mode: CipherMode,
    /// CBC IV (16 bytes) or GCM nonce (12 bytes)
    pub iv: Vec<u8>,
    /// Effective PBKDF2 iteration count used at encryption time
    pub iterations: u32,
    pub salt: Vec<u8>,
    /// Plaintext was zstd-compressed before encryption
    pub compressed: bool,
    /// Base64 ciphertext (GCM: with tag appended)
    pub ciphertext: String,
}

impl EncryptionEnvelope {
    /// Encode as a single base64 token.
    pub fn serialize(&self) -> String {
        let joined = [
            self.mode.tag().to_string(),
            STANDARD.encode(&self.iv),
            self.iterations.to_string(),
            STANDARD.encode(&self.salt),
            self.compressed.to_string(),
            self.ciphertext.clone(),
        ]
        .join(SEPARATOR_STR);
        STANDARD.encode(joined)
    }

    /// Parse a token produced by [`serialize`](Self::serialize).
    ///
    /// Any malformed token is a `SealError::Decode`, never a panic.
    pub fn restore(token: &str) -> SealResult<Self> {
        let raw = STANDARD
            .decode(token.trim())
            .map_err(|e| SealError::Decode(format!("envelope is not base64: {e}")))?;
        let text = String::from_utf8(raw)
            .map_err(|e| SealError::Decode(format!("envelope is not UTF-8: {e}")))?;

        let fields: Vec<&str> = text.split(SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(SealError::Decode(format!(
                "envelope has {} fields, expected {FIELD_COUNT}",
                fields.len()
            )));
        }

        let mode = CipherMode::from_tag(fields[0])?;
        let iv = decode_field("iv", fields[1])?;
        let iterations = fields[2].parse::<u32>().map_err(|e| {
            SealError::Decode(format!("iterations field {:?} is not a number: {e}", fields[2]))
        })?;
        let salt = decode_field("salt", fields[3])?;
        let compressed = match fields[4] {
            "true" => true,
            "false" => false,
            other => {
                return Err(SealError::Decode(format!(
                    "compressed field {other:?} is not a boolean"
                )))
            }
        };
        let ciphertext = fields[5].to_string();
        decode_field("ciphertext", &ciphertext)?;

        let envelope = Self {
            mode,
            iv,
            iterations,
            salt,
            compressed,
            ciphertext,
        };
        envelope.validate()?;
        Ok(envelope)
    }

    /// Check field invariants that the type alone does not enforce: IV length
    /// matches the mode, salt is non-empty, iteration count is within the
    /// ceiling. Violations are `SealError::Decode`.
    pub fn validate(&self) -> SealResult<()> {
        let expected_iv = match self.mode {
            CipherMode::Cbc => crate::BLOCK_SIZE,
            CipherMode::Gcm => crate::GCM_NONCE_SIZE,
        };
        if self.iv.len() != expected_iv {
            return Err(SealError::Decode(format!(
                "{} envelope carries a {}-byte IV, expected {expected_iv}",
                self.mode,
                self.iv.len()
            )));
        }
        if self.salt.is_empty() {
            return Err(SealError::Decode("envelope salt is empty".into()));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(SealError::Decode(format!(
                "envelope asks for {} PBKDF2 iterations, ceiling is {MAX_ITERATIONS}",
                self.iterations
            )));
        }
        Ok(())
    }

    /// Re-derive the key from `password` and decrypt.
    ///
    /// Wrong password: `Decryption` under CBC, `Authentication` under GCM.
    pub fn decrypt(&self, password: &SecretString) -> SealResult<Vec<u8>> {
        let cipher = Cipher::from_parts(self.mode, &self.iv)?;
        let ciphertext = decode_field("ciphertext", &self.ciphertext)?;
        let key = derive_key_from_password(password, &self.salt, self.iterations)?;

        tracing::debug!(
            mode = %self.mode,
            len = ciphertext.len(),
            compressed = self.compressed,
            "decrypting envelope"
        );

        if self.compressed {
            let packed = Zeroizing::new(cipher.decrypt(&ciphertext, &key)?);
            decompress(&packed)
        } else {
            cipher.decrypt(&ciphertext, &key)
        }
    }

    /// Decrypt and interpret the plaintext as UTF-8.
    pub fn decrypt_text(&self, password: &SecretString) -> SealResult<String> {
        let plaintext = self.decrypt(password)?;
        String::from_utf8(plaintext)
            .map_err(|e| SealError::Decode(format!("decrypted text is not UTF-8: {e}")))
    }

    /// Serialize to JSON, for embedding in a caller's own documents.
    pub fn to_json(&self) -> SealResult<String> {
        serde_json::to_string(self)
            .map_err(|e| SealError::Other(anyhow::anyhow!("envelope serialization: {e}")))
    }

    pub fn from_json(s: &str) -> SealResult<Self> {
        let envelope: Self = serde_json::from_str(s)
            .map_err(|e| SealError::Decode(format!("envelope deserialization: {e}")))?;
        envelope.validate()?;
        Ok(envelope)
    }
}

fn decode_field(name: &str, value: &str) -> SealResult<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| SealError::Decode(format!("base64 decode {name}: {e}")))
}
