//! Key derivation: PBKDF2-HMAC-SHA256 password + salt → 256-bit key

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use zeroize::Zeroizing;

use pwseal_core::config::{IterationPolicy, KdfConfig};
use pwseal_core::{SealError, SealResult};

use crate::keys::SymmetricKey;
use crate::{DEFAULT_ITERATIONS, KEY_SIZE, MAX_ITERATIONS, MIN_ITERATIONS};

/// PBKDF2 parameters that travel with an envelope (except the salt, which
/// is passed separately)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Requested iteration count (default: 600000)
    pub iterations: u32,
    /// What to do if `iterations` is below the floor (default: clamp)
    pub policy: IterationPolicy,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            policy: IterationPolicy::Clamp,
        }
    }
}

impl KdfParams {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    pub fn from_config(config: &KdfConfig) -> Self {
        Self {
            iterations: config.iterations,
            policy: config.iteration_policy,
        }
    }

    /// The iteration count that derivation will actually use.
    ///
    /// Under `Reject`, a sub-floor request is an `InvalidArgument` error.
    /// Counts above [`MAX_ITERATIONS`] are refused under either policy.
    pub fn effective_iterations(&self) -> SealResult<u32> {
        if self.iterations > MAX_ITERATIONS {
            return Err(SealError::InvalidArgument(format!(
                "PBKDF2 iterations must be at most {MAX_ITERATIONS}, got {}",
                self.iterations
            )));
        }
        match self.policy {
            IterationPolicy::Clamp => Ok(effective_iterations(self.iterations)),
            IterationPolicy::Reject if self.iterations < MIN_ITERATIONS => {
                Err(SealError::InvalidArgument(format!(
                    "PBKDF2 iterations must be at least {MIN_ITERATIONS}, got {}",
                    self.iterations
                )))
            }
            IterationPolicy::Reject => Ok(self.iterations),
        }
    }
}

/// Raise `requested` to the iteration floor, logging when it does so.
pub fn effective_iterations(requested: u32) -> u32 {
    if requested < MIN_ITERATIONS {
        tracing::warn!(
            requested,
            floor = MIN_ITERATIONS,
            "PBKDF2 iteration count below floor, clamping"
        );
        MIN_ITERATIONS
    } else {
        requested
    }
}

/// Derive a 256-bit key from a password and salt with PBKDF2-HMAC-SHA256.
///
/// Iteration counts below 65536 are silently raised to 65536 (with a warning
/// log). Use [`derive_key`] with `IterationPolicy::Reject` to refuse them.
/// Counts above [`MAX_ITERATIONS`] are an `InvalidArgument` error.
pub fn derive_key_from_password(
    password: &SecretString,
    salt: &[u8],
    iterations: u32,
) -> SealResult<SymmetricKey> {
    derive_key(password, salt, &KdfParams::new(iterations))
}

/// Derive a 256-bit key honouring the iteration policy in `params`.
pub fn derive_key(
    password: &SecretString,
    salt: &[u8],
    params: &KdfParams,
) -> SealResult<SymmetricKey> {
    if salt.is_empty() {
        return Err(SealError::InvalidArgument("salt must not be empty".into()));
    }
    let iterations = params.effective_iterations()?;

    let mut key = Zeroizing::new(vec![0u8; KEY_SIZE]);
    pbkdf2_hmac::<Sha256>(
        password.expose_secret().as_bytes(),
        salt,
        iterations,
        &mut key,
    );
    tracing::debug!(iterations, salt_len = salt.len(), "derived PBKDF2 key");

    Ok(SymmetricKey::from_zeroizing(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kdf_deterministic() {
        let password = SecretString::from("test-passphrase-123");
        let salt = [1u8; 16];

        let key1 = derive_key_from_password(&password, &salt, MIN_ITERATIONS).unwrap();
        let key2 = derive_key_from_password(&password, &salt, MIN_ITERATIONS).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes(), "KDF must be deterministic");
        assert_eq!(key1.as_bytes().len(), KEY_SIZE);
    }

    #[test]
    fn test_kdf_different_passwords() {
        let salt = [1u8; 16];

        let key1 =
            derive_key_from_password(&SecretString::from("password-a"), &salt, MIN_ITERATIONS)
                .unwrap();
        let key2 =
            derive_key_from_password(&SecretString::from("password-b"), &salt, MIN_ITERATIONS)
                .unwrap();

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different passwords must produce different keys"
        );
    }

    #[test]
    fn test_kdf_different_salts() {
        let password = SecretString::from("same-password");

        let key1 = derive_key_from_password(&password, &[1u8; 16], MIN_ITERATIONS).unwrap();
        let key2 = derive_key_from_password(&password, &[2u8; 16], MIN_ITERATIONS).unwrap();

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different salts must produce different keys"
        );
    }

    #[test]
    fn test_iteration_floor_clamps() {
        assert_eq!(effective_iterations(100), MIN_ITERATIONS);
        assert_eq!(effective_iterations(0), MIN_ITERATIONS);
        assert_eq!(effective_iterations(MIN_ITERATIONS), MIN_ITERATIONS);
        assert_eq!(effective_iterations(DEFAULT_ITERATIONS), DEFAULT_ITERATIONS);
    }

    #[test]
    fn test_clamped_derivation_matches_floor() {
        let password = SecretString::from("clamp-me");
        let salt = [9u8; 16];

        let low = derive_key_from_password(&password, &salt, 100).unwrap();
        let floor = derive_key_from_password(&password, &salt, MIN_ITERATIONS).unwrap();

        assert_eq!(low.as_bytes(), floor.as_bytes(), "100 iterations must behave as 65536");
    }

    #[test]
    fn test_reject_policy() {
        let params = KdfParams {
            iterations: 100,
            policy: IterationPolicy::Reject,
        };
        let err = derive_key(&SecretString::from("pw"), &[1u8; 16], &params).unwrap_err();
        assert!(matches!(err, SealError::InvalidArgument(_)));

        let params = KdfParams {
            iterations: MIN_ITERATIONS,
            policy: IterationPolicy::Reject,
        };
        assert_eq!(params.effective_iterations().unwrap(), MIN_ITERATIONS);
    }

    #[test]
    fn test_iteration_ceiling() {
        let password = SecretString::from("pw");
        for policy in [IterationPolicy::Clamp, IterationPolicy::Reject] {
            let params = KdfParams {
                iterations: u32::MAX,
                policy,
            };
            let err = derive_key(&password, &[1u8; 16], &params).unwrap_err();
            assert!(matches!(err, SealError::InvalidArgument(_)));
        }

        let result = derive_key_from_password(&password, &[1u8; 16], MAX_ITERATIONS + 1);
        assert!(matches!(result, Err(SealError::InvalidArgument(_))));

        let at_ceiling = KdfParams::new(MAX_ITERATIONS);
        assert_eq!(at_ceiling.effective_iterations().unwrap(), MAX_ITERATIONS);
    }

    #[test]
    fn test_empty_salt_rejected() {
        let result = derive_key_from_password(&SecretString::from("pw"), &[], MIN_ITERATIONS);
        assert!(matches!(result, Err(SealError::InvalidArgument(_))));
    }

    #[test]
    fn test_params_from_config() {
        let config = KdfConfig::default();
        let params = KdfParams::from_config(&config);
        assert_eq!(params, KdfParams::default());
    }
}
