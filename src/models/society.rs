use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Society {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub member_count: i64,
    #[serde(default)]
    pub is_verified: bool,
}

impl Society {
    pub fn email_text(&self) -> &str {
        self.email.as_deref().unwrap_or("No email")
    }

    pub fn status_text(&self) -> &'static str {
        if self.is_verified {
            "Verified"
        } else {
            "Pending"
        }
    }
}
