//! Authentication primitives: login credentials and password hashes.
//!
//! Passwords are stored as Argon2id PHC strings. Inbound adapters validate
//! raw form input into [`LoginCredentials`] before talking to the login port.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::Error;

/// Validation errors for login form input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use blog_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" leo ", "war and peace").expect("valid");
/// assert_eq!(creds.username(), "leo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form values.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the account lookup.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Hash `password` into an Argon2id PHC string with a fresh salt.
///
/// # Examples
/// ```
/// use blog_backend::domain::{hash_password, verify_password};
///
/// let phc = hash_password("hunter2").expect("hash");
/// assert!(verify_password("hunter2", &phc).expect("verify"));
/// ```
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|err| Error::internal(format!("invalid password salt: {err}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
}

/// Check `password` against a stored PHC string.
///
/// Returns `Ok(false)` on a mismatch and an internal error when the stored
/// hash cannot be parsed.
pub fn verify_password(password: &str, phc: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(phc)
        .map_err(|err| Error::internal(format!("stored password hash is invalid: {err}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(Error::internal(format!(
            "password verification failed: {err}"
        ))),
    }
}
