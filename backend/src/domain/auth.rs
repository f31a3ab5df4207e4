//! Login credentials.
//!
//! Handlers build [`LoginCredentials`] from raw payload strings before they
//! reach the session issuer, so shape errors never touch the credential store.

use std::fmt;

use zeroize::Zeroizing;

/// Shape errors for a login payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was empty.
    EmptyPassword,
}

impl LoginValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty. It is not checked for address syntax
///   here; a malformed address simply matches no user.
/// - `password` is non-empty and keeps caller whitespace. It is zeroed on drop.
///
/// # Examples
/// ```
/// use longbox::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" daryl@example.com ", "password").unwrap();
/// assert_eq!(creds.email(), "daryl@example.com");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Collect every shape violation in the raw inputs.
    pub fn validate_parts(email: &str, password: &str) -> Vec<LoginValidationError> {
        let mut errors = Vec::new();
        if email.trim().is_empty() {
            errors.push(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            errors.push(LoginValidationError::EmptyPassword);
        }
        errors
    }

    /// Construct credentials, failing on the first shape violation.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        if let Some(error) = Self::validate_parts(email, password).into_iter().next() {
            return Err(error);
        }
        Ok(Self {
            email: email.trim().to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the user lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Plaintext password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
