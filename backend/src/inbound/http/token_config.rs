//! Bearer-token signing configuration.
//!
//! Loads the HS256 secret from a file and builds the [`TokenSigner`] shared by
//! the session issuer and the bearer extractor. Debug builds fall back to a
//! random per-process secret; release builds insist on a real one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mockable::Clock;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::warn;
use zeroize::{Zeroize, Zeroizing};

use crate::domain::{TokenSigner, TokenSignerError};

/// Minimum secret length accepted in release builds.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;

/// Build mode for token configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing secret and warn.
    Debug,
    /// Release builds require an explicit secret of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use longbox::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while preparing the token signer.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// Release builds need a configured secret file.
    #[error("token secret file is not configured")]
    MissingSecretFile,
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file is shorter than release builds allow.
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// The signer rejected the secret or lifetime.
    #[error(transparent)]
    Signer(#[from] TokenSignerError),
}

fn ephemeral_secret() -> Zeroizing<Vec<u8>> {
    let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
    OsRng.fill_bytes(secret.as_mut_slice());
    secret
}

/// Read the signing secret, applying the build-mode rules.
pub fn load_token_secret(
    path: Option<&Path>,
    mode: BuildMode,
) -> Result<Zeroizing<Vec<u8>>, TokenConfigError> {
    let Some(path) = path else {
        if mode.is_debug() {
            warn!("token secret file not set; using temporary secret (dev only)");
            return Ok(ephemeral_secret());
        }
        return Err(TokenConfigError::MissingSecretFile);
    };

    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < TOKEN_SECRET_MIN_LEN {
                bytes.zeroize();
                return Err(TokenConfigError::SecretTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: TOKEN_SECRET_MIN_LEN,
                });
            }
            Ok(Zeroizing::new(bytes))
        }
        Err(error) => {
            if mode.is_debug() {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary token secret (dev only)"
                );
                Ok(ephemeral_secret())
            } else {
                Err(TokenConfigError::SecretRead {
                    path: path.to_path_buf(),
                    source: error,
                })
            }
        }
    }
}

/// Load the secret and build the process-wide signer.
pub fn token_signer_from_file(
    path: Option<&Path>,
    ttl_seconds: i64,
    mode: BuildMode,
    clock: Arc<dyn Clock>,
) -> Result<TokenSigner, TokenConfigError> {
    let secret = load_token_secret(path, mode)?;
    Ok(TokenSigner::new(&secret, ttl_seconds, clock)?)
}
