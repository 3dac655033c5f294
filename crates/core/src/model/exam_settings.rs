use thiserror::Error;

/// Default test length: thirty minutes.
pub const DEFAULT_DURATION_SECS: u32 = 30 * 60;

/// Shared secret that unlocks the admin dashboard when none is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamSettingsError {
    #[error("test duration must be > 0 seconds")]
    InvalidDuration,

    #[error("admin password cannot be empty")]
    EmptyAdminPassword,
}

/// Settings for a single timed test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamSettings {
    duration_secs: u32,
}

impl ExamSettings {
    /// # Errors
    ///
    /// Returns `ExamSettingsError::InvalidDuration` when `duration_secs` is zero.
    pub fn new(duration_secs: u32) -> Result<Self, ExamSettingsError> {
        if duration_secs == 0 {
            return Err(ExamSettingsError::InvalidDuration);
        }
        Ok(Self { duration_secs })
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

/// Admin dashboard access settings.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSettings {
    password: String,
}

impl AdminSettings {
    /// # Errors
    ///
    /// Returns `ExamSettingsError::EmptyAdminPassword` for a blank password.
    pub fn new(password: impl Into<String>) -> Result<Self, ExamSettingsError> {
        let password = password.into();
        if password.trim().is_empty() {
            return Err(ExamSettingsError::EmptyAdminPassword);
        }
        Ok(Self { password })
    }

    /// Compare a candidate password against the configured one.
    #[must_use]
    pub fn accepts(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl std::fmt::Debug for AdminSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSettings")
            .field("password", &"<redacted>")
            .finish()
    }
}
