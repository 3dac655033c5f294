use std::sync::Arc;

use exam_core::model::Identity;
use storage::repository::UserRepository;

use crate::Clock;
use crate::error::LoginError;

/// Records self-declared participants.
#[derive(Clone)]
pub struct LoginService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
}

impl LoginService {
    #[must_use]
    pub fn new(clock: Clock, users: Arc<dyn UserRepository>) -> Self {
        Self { clock, users }
    }

    /// Validate `name`/`email` and record the login.
    ///
    /// A returning email keeps its row; its display name and `last_login` are
    /// refreshed.
    ///
    /// # Errors
    ///
    /// Returns `LoginError::MissingField` when either value is blank,
    /// `LoginError::InvalidEmail` for malformed addresses, and
    /// `LoginError::Storage` when the login cannot be recorded.
    pub async fn login(&self, name: &str, email: &str) -> Result<Identity, LoginError> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(LoginError::MissingField);
        }
        let identity = Identity::parse(name, email)?;
        self.users.record_login(&identity, self.clock.now()).await?;
        tracing::info!(email = %identity.email(), "participant logged in");
        Ok(identity)
    }
}
