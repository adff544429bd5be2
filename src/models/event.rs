use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single published campus event, as returned by `GET /api/events`.
///
/// Every display field is optional on the wire; missing values render as
/// empty strings rather than failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub event_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub google_form_link: Option<String>,
    #[serde(default)]
    pub organizer: Option<Organizer>,
}

impl Event {
    pub fn category_tag(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn venue_text(&self) -> &str {
        self.venue.as_deref().unwrap_or("")
    }

    pub fn organizer_name(&self) -> &str {
        self.organizer.as_ref().map(|o| o.name.as_str()).unwrap_or("")
    }

    pub fn date_text(&self) -> String {
        self.event_date
            .map(|d| d.format("%b %e, %Y").to_string())
            .unwrap_or_default()
    }
}

/// The society that published an event, embedded by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organizer {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// Input for `POST /api/events`. Field names follow the multipart form the
/// API expects; `event_date` is sent as typed, the server validates it.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub society_id: i64,
    pub title: String,
    pub category: String,
    pub event_date: String,
    pub venue: String,
    pub description: String,
    pub short_description: String,
    pub google_form_link: String,
}
