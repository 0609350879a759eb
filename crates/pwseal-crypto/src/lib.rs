//! pwseal-crypto: password-based symmetric encryption
//!
//! Pipeline (encrypt):
//! plaintext → (optional) zstd compress → PBKDF2 key from password + salt →
//! AES-CBC or AES-GCM under a fresh IV/nonce → envelope → base64 token
//!
//! Envelope token (before the outer base64):
//! ```text
//! MODE ␟ base64(iv) ␟ iterations ␟ base64(salt) ␟ compressed ␟ base64(ciphertext)
//! ```
//! where `␟` is U+001F. The password is the only thing a token does not carry.
//!
//! The legacy fixed-key ECB helpers in [`cipher::legacy`] exist only to read
//! and write data produced by older releases. They leak plaintext structure.

pub mod cipher;
pub mod compress;
pub mod envelope;
pub mod facade;
pub mod kdf;
pub mod keys;
pub mod random;

pub use cipher::Cipher;
pub use envelope::EncryptionEnvelope;
pub use facade::{
    decrypt_token, encrypt_text_with_password, encrypt_with_password, encrypt_with_random_key,
    KeyedCiphertext, SealOptions,
};
pub use kdf::{derive_key, derive_key_from_password, effective_iterations, KdfParams};
pub use keys::{generate_random_key, SymmetricKey};
pub use pwseal_core::{CipherMode, SealError, SealResult};

/// Default key size in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// AES block size; also the CBC and legacy IV size
pub const BLOCK_SIZE: usize = 16;

/// Recommended AES-GCM nonce size (96-bit)
pub const GCM_NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size (128-bit)
pub const TAG_SIZE: usize = 16;

/// PBKDF2 iteration floor; lower requests are clamped or rejected
pub const MIN_ITERATIONS: u32 = 65_536;

/// PBKDF2 iteration ceiling; envelopes and requests asking for more are refused
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// PBKDF2 iterations used when the caller does not choose
pub const DEFAULT_ITERATIONS: u32 = 600_000;

/// Default salt length in bytes
pub const DEFAULT_SALT_SIZE: usize = 16;
