//! Password login against stored Argon2 hashes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{LoginService, UserRepository};
use crate::domain::{Error, LoginCredentials, User, Username, verify_password};

/// Login service implementing the [`LoginService`] driving port.
#[derive(Clone)]
pub struct PasswordLoginService {
    users: Arc<dyn UserRepository>,
}

impl PasswordLoginService {
    /// Create a login service over the user repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

fn rejected() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl LoginService for PasswordLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Ok(username) = Username::new(credentials.username()) else {
            debug!("login rejected: malformed username");
            return Err(rejected());
        };
        let Some(stored) = self.users.find_credentials(&username).await? else {
            debug!(%username, "login rejected: unknown user");
            return Err(rejected());
        };
        if !verify_password(credentials.password(), &stored.password_hash)? {
            debug!(%username, "login rejected: password mismatch");
            return Err(rejected());
        }
        info!(user = %stored.user.id(), "user logged in");
        Ok(stored.user)
    }
}
