//! Persistence of the logged-in user between runs.
//!
//! One JSON file holds the user record returned at login. It is read once at
//! startup; a missing or unreadable file simply means nobody is logged in.

use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::models::User;
use crate::utils::error::AppError;

/// Roles allowed into the management dashboard. Anyone else lands on the
/// public event directory. This gate is a client-side convenience only.
pub const DASHBOARD_ROLES: &[&str] = &["admin", "society"];

pub fn can_access_dashboard(user: &User) -> bool {
    DASHBOARD_ROLES.contains(&user.role.as_str())
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the persisted user, or `None` when there is no usable
    /// session. Corrupt files are discarded with a warning, never an error.
    pub fn load(&self) -> Option<User> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(path = %self.path.display(), error = ?e, "Discarding unreadable session file");
                None
            }
        }
    }

    pub fn save(&self, user: &User) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), AppError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
