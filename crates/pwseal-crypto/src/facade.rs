//! One-shot helpers composing KDF, cipher, compression and envelope.
//!
//! Every call generates its own salt (unless one is supplied) and its own
//! IV/nonce. Nothing is cached between calls; configuration travels in
//! [`SealOptions`] rather than in shared state.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::SecretString;
use zeroize::Zeroizing;

use pwseal_core::config::{IterationPolicy, SealConfig};
use pwseal_core::{CipherMode, SealError, SealResult};

use crate::cipher::Cipher;
use crate::compress::{compress, DEFAULT_LEVEL};
use crate::envelope::EncryptionEnvelope;
use crate::kdf::{derive_key, KdfParams};
use crate::keys::{generate_random_key, SymmetricKey};
use crate::random::generate_salt;
use crate::{DEFAULT_ITERATIONS, DEFAULT_SALT_SIZE};

/// Per-call options for [`encrypt_with_password`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealOptions {
    pub mode: CipherMode,
    pub iterations: u32,
    pub policy: IterationPolicy,
    /// Use this salt instead of a random one
    pub salt: Option<Vec<u8>>,
    /// Length of a generated salt
    pub salt_len: usize,
    pub compress: bool,
    pub compression_level: i32,
}

impl Default for SealOptions {
    fn default() -> Self {
        Self {
            mode: CipherMode::Gcm,
            iterations: DEFAULT_ITERATIONS,
            policy: IterationPolicy::Clamp,
            salt: None,
            salt_len: DEFAULT_SALT_SIZE,
            compress: false,
            compression_level: DEFAULT_LEVEL,
        }
    }
}

impl SealOptions {
    pub fn from_config(config: &SealConfig) -> Self {
        Self {
            mode: config.cipher.mode,
            iterations: config.kdf.iterations,
            policy: config.kdf.iteration_policy,
            salt: None,
            salt_len: config.kdf.salt_len,
            compress: config.cipher.compress,
            compression_level: config.cipher.compression_level,
        }
    }

    pub fn with_mode(mut self, mode: CipherMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_salt(mut self, salt: Vec<u8>) -> Self {
        self.salt = Some(salt);
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Encrypt `plaintext` under a key derived from `password`, returning an
/// envelope that holds every parameter except the password.
pub fn encrypt_with_password(
    plaintext: &[u8],
    password: &SecretString,
    options: &SealOptions,
) -> SealResult<EncryptionEnvelope> {
    let params = KdfParams {
        iterations: options.iterations,
        policy: options.policy,
    };
    let iterations = params.effective_iterations()?;
    let salt = match &options.salt {
        Some(salt) => salt.clone(),
        None => generate_salt(options.salt_len)?,
    };

    let key = derive_key(password, &salt, &KdfParams { iterations, ..params })?;
    let cipher = Cipher::fresh(options.mode)?;

    let ciphertext = if options.compress {
        let packed = Zeroizing::new(compress(plaintext, options.compression_level)?);
        cipher.encrypt(&packed, &key)?
    } else {
        cipher.encrypt(plaintext, &key)?
    };

    tracing::debug!(
        mode = %options.mode,
        iterations,
        compressed = options.compress,
        len = plaintext.len(),
        "sealed envelope"
    );

    Ok(EncryptionEnvelope {
        mode: options.mode,
        iv: cipher.iv().to_vec(),
        iterations,
        salt,
        compressed: options.compress,
        ciphertext: STANDARD.encode(ciphertext),
    })
}

/// [`encrypt_with_password`] for UTF-8 text.
pub fn encrypt_text_with_password(
    text: &str,
    password: &SecretString,
    options: &SealOptions,
) -> SealResult<EncryptionEnvelope> {
    encrypt_with_password(text.as_bytes(), password, options)
}

/// Restore a serialized envelope token and decrypt it.
pub fn decrypt_token(token: &str, password: &SecretString) -> SealResult<Vec<u8>> {
    EncryptionEnvelope::restore(token)?.decrypt(password)
}

/// Output of [`encrypt_with_random_key`]. The caller owns the key lifecycle.
#[derive(Debug, Clone)]
pub struct KeyedCiphertext {
    pub key: SymmetricKey,
    pub cipher: Cipher,
    /// Base64 ciphertext token
    pub token: String,
}

impl KeyedCiphertext {
    pub fn decrypt(&self) -> SealResult<Vec<u8>> {
        let ciphertext = STANDARD
            .decode(&self.token)
            .map_err(|e| SealError::Decode(format!("base64 decode ciphertext: {e}")))?;
        self.cipher.decrypt(&ciphertext, &self.key)
    }
}

/// Generate a random 256-bit key and a fresh IV/nonce, and encrypt.
pub fn encrypt_with_random_key(plaintext: &[u8], mode: CipherMode) -> SealResult<KeyedCiphertext> {
    let key = generate_random_key(256)?;
    let cipher = Cipher::fresh(mode)?;
    let token = STANDARD.encode(cipher.encrypt(plaintext, &key)?);
    Ok(KeyedCiphertext { key, cipher, token })
}
