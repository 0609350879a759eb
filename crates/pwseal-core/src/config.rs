use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{SealError, SealResult};

/// Top-level configuration (loaded from pwseal.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealConfig {
    pub kdf: KdfConfig,
    pub cipher: CipherConfig,
    pub logging: LoggingConfig,
}

/// What to do when a caller asks for fewer PBKDF2 iterations than the floor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IterationPolicy {
    /// Raise the count to the floor and log a warning
    #[default]
    Clamp,
    /// Refuse with an invalid-argument error
    Reject,
}

/// Password key-derivation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfConfig {
    /// PBKDF2-HMAC-SHA256 iterations (default: 600000, floor: 65536)
    pub iterations: u32,
    /// Salt length in bytes (default: 16)
    pub salt_len: usize,
    /// Policy for sub-floor iteration counts (default: clamp)
    pub iteration_policy: IterationPolicy,
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            iterations: 600_000,
            salt_len: 16,
            iteration_policy: IterationPolicy::Clamp,
        }
    }
}

/// Block cipher mode carried by an envelope.
///
/// The envelope tag strings ("CBC", "GCM") are part of the token format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherMode {
    /// AES-CBC with PKCS#7 padding. Not authenticated.
    #[serde(rename = "CBC", alias = "cbc")]
    Cbc,
    /// AES-GCM with a 128-bit tag
    #[default]
    #[serde(rename = "GCM", alias = "gcm")]
    Gcm,
}

impl CipherMode {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Cbc => "CBC",
            Self::Gcm => "GCM",
        }
    }

    /// Strict inverse of [`tag`](Self::tag): only the canonical uppercase
    /// spelling is accepted.
    pub fn from_tag(tag: &str) -> SealResult<Self> {
        match tag {
            "CBC" => Ok(Self::Cbc),
            "GCM" => Ok(Self::Gcm),
            other => Err(SealError::Decode(format!("unknown cipher mode tag: {other:?}"))),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Gcm)
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CipherMode {
    type Err = SealError;

    fn from_str(s: &str) -> SealResult<Self> {
        match s {
            "CBC" | "cbc" => Ok(Self::Cbc),
            "GCM" | "gcm" => Ok(Self::Gcm),
            other => Err(SealError::Decode(format!("unknown cipher mode: {other:?}"))),
        }
    }
}

/// Cipher and compression defaults for the one-shot helpers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    /// Default mode for new envelopes (default: GCM)
    pub mode: CipherMode,
    /// Compress plaintext before encrypting (default: false)
    pub compress: bool,
    /// zstd level used when compressing (default: 3)
    pub compression_level: i32,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            mode: CipherMode::Gcm,
            compress: false,
            compression_level: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (default: info). RUST_LOG takes precedence.
    pub level: String,
    /// Log format: "json" or "text"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Text,
        }
    }
}

impl SealConfig {
    pub fn from_toml_str(s: &str) -> SealResult<Self> {
        toml::from_str(s).map_err(|e| SealError::Config(format!("parsing config: {e}")))
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> SealResult<Self> {
        if !path.exists() {
            tracing::warn!("config file not found: {}  (using defaults)", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SealError::Config(format!("reading config {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| SealError::Config(format!("parsing config {}: {e}", path.display())))
    }
}
