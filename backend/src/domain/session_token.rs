//! Stateless signed session tokens.
//!
//! Tokens are HS256 JWTs carrying `sub` (user id), `iat`, and `exp`. They are
//! verified by signature and expiry alone; nothing is persisted and there is
//! no revocation.

use std::fmt;
use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::UserId;

/// Claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the authenticated user's id.
    pub sub: String,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Errors raised while minting or checking tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign session token: {message}")]
    Signing { message: String },
    #[error("session token is malformed or has a bad signature")]
    Invalid,
    #[error("session token has expired")]
    Expired,
    #[error("session token subject is not a user id")]
    InvalidSubject,
}

/// Errors raised while building a [`TokenSigner`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenSignerError {
    #[error("token secret must not be empty")]
    EmptySecret,
    #[error("token ttl must be positive, got {seconds}s")]
    NonPositiveTtl { seconds: i64 },
}

/// Signs and verifies session tokens with a process-wide secret.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use longbox::domain::{TokenSigner, UserId};
/// use mockable::DefaultClock;
///
/// let signer = TokenSigner::new(b"0123456789abcdef0123456789abcdef", 3600, Arc::new(DefaultClock))
///     .unwrap();
/// let user_id = UserId::random();
/// let token = signer.sign(&user_id).unwrap();
/// assert_eq!(signer.verify(&token).unwrap(), user_id);
/// ```
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl TokenSigner {
    /// Build a signer from raw secret bytes and a lifetime in seconds.
    pub fn new(
        secret: &[u8],
        ttl_seconds: i64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenSignerError> {
        if secret.is_empty() {
            return Err(TokenSignerError::EmptySecret);
        }
        if ttl_seconds <= 0 {
            return Err(TokenSignerError::NonPositiveTtl {
                seconds: ttl_seconds,
            });
        }
        let secret = Zeroizing::new(secret.to_vec());
        Ok(Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
            ttl: TimeDelta::seconds(ttl_seconds),
            clock,
        })
    }

    /// Token lifetime.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Mint a token for `user_id` expiring `ttl` from now.
    pub fn sign(&self, user_id: &UserId) -> Result<String, TokenError> {
        let issued_at = self.clock.utc();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(
            |err| TokenError::Signing {
                message: err.to_string(),
            },
        )
    }

    /// Check signature and expiry and return the token's subject.
    ///
    /// Expiry is compared against the injected clock rather than the system
    /// time so tests stay deterministic.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;
        if data.claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::Expired);
        }
        UserId::new(&data.claims.sub).map_err(|_| TokenError::InvalidSubject)
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    struct SteppingClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl SteppingClock {
        fn advance(&self, seconds: i64) {
            let mut now = self.now.lock().expect("clock lock");
            *now += TimeDelta::seconds(seconds);
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.now.lock().expect("clock lock")
        }
    }

    #[fixture]
    fn clock() -> Arc<SteppingClock> {
        Arc::new(SteppingClock {
            now: Mutex::new(
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
                    .single()
                    .expect("valid timestamp"),
            ),
        })
    }

    fn signer(clock: &Arc<SteppingClock>) -> TokenSigner {
        TokenSigner::new(SECRET, 60, clock.clone()).expect("signer")
    }

    #[rstest]
    fn round_trips_subject(clock: Arc<SteppingClock>) {
        let signer = signer(&clock);
        let user_id = UserId::random();
        let token = signer.sign(&user_id).expect("sign");
        assert_eq!(signer.verify(&token).expect("verify"), user_id);
    }

    #[rstest]
    fn expiry_is_issue_time_plus_ttl(clock: Arc<SteppingClock>) {
        let signer = signer(&clock);
        let token = signer.sign(&UserId::random()).expect("sign");
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let claims = jsonwebtoken::decode::<TokenClaims>(
            &token,
            &DecodingKey::from_secret(SECRET),
            &validation,
        )
        .expect("decode")
        .claims;
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[rstest]
    fn rejects_expired_tokens(clock: Arc<SteppingClock>) {
        let signer = signer(&clock);
        let token = signer.sign(&UserId::random()).expect("sign");
        clock.advance(61);
        assert_eq!(signer.verify(&token), Err(TokenError::Expired));
    }

    #[rstest]
    fn rejects_tokens_signed_with_another_secret(clock: Arc<SteppingClock>) {
        let other = TokenSigner::new(b"another-secret-another-secret!!!", 60, clock.clone())
            .expect("signer");
        let token = other.sign(&UserId::random()).expect("sign");
        assert_eq!(signer(&clock).verify(&token), Err(TokenError::Invalid));
    }

    #[rstest]
    #[case("")]
    #[case("not.a.token")]
    fn rejects_garbage(clock: Arc<SteppingClock>, #[case] token: &str) {
        assert_eq!(signer(&clock).verify(token), Err(TokenError::Invalid));
    }

    #[rstest]
    #[case(b"".as_slice(), 60, TokenSignerError::EmptySecret)]
    #[case(SECRET, 0, TokenSignerError::NonPositiveTtl { seconds: 0 })]
    fn rejects_bad_configuration(
        clock: Arc<SteppingClock>,
        #[case] secret: &[u8],
        #[case] ttl: i64,
        #[case] expected: TokenSignerError,
    ) {
        let err = TokenSigner::new(secret, ttl, clock).expect_err("bad configuration");
        assert_eq!(err, expected);
    }
}
