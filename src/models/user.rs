use serde::{Deserialize, Serialize};

use crate::models::Society;

/// The logged-in user record returned by `POST /api/login` and persisted
/// between runs by the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub society: Option<Society>,
}

fn default_role() -> String {
    "student".to_string()
}

impl User {
    pub fn society_id(&self) -> Option<i64> {
        self.society.as_ref().map(|s| s.id)
    }
}
