use thiserror::Error;

pub type SealResult<T> = Result<T, SealError>;

#[derive(Debug, Error)]
pub enum SealError {
    /// Malformed caller-supplied parameters (key length, IV length, empty salt, ...)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Envelope token or ciphertext token could not be parsed
    #[error("decode error: {0}")]
    Decode(String),

    /// CBC/ECB decryption failed: bad padding, wrong key, or corrupted input
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// GCM tag did not verify. Never carries any plaintext.
    #[error("authentication failed: ciphertext was tampered with or the key is wrong")]
    Authentication,

    #[error("compression error: {0}")]
    Compression(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SealError {
    /// True for failures a caller should report as "wrong password or key".
    pub fn is_wrong_credentials(&self) -> bool {
        matches!(self, Self::Decryption(_) | Self::Authentication)
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
