//! Decoding of API response bodies, kept separate from the transport so the
//! shapes can be tested against captured payloads.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::models::{Event, Society, User};
use crate::utils::error::AppError;

/// Failure payloads carry a single `error` field with a human-readable
/// message; it is shown to the user verbatim.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// The events listing is either a bare array or a paginated wrapper,
/// depending on the endpoint variant serving it.
#[derive(Deserialize)]
#[serde(untagged)]
enum EventsBody {
    Bare(Vec<Event>),
    Paged { events: Vec<Event> },
}

/// Authentication responses wrap the user record alongside a message and,
/// for logins, a token this client does not use.
#[derive(Deserialize)]
struct AuthBody {
    user: User,
}

pub fn parse_events(body: &str) -> Result<Vec<Event>, serde_json::Error> {
    serde_json::from_str::<EventsBody>(body).map(|parsed| match parsed {
        EventsBody::Bare(events) => events,
        EventsBody::Paged { events } => events,
    })
}

pub fn parse_societies(body: &str) -> Result<Vec<Society>, serde_json::Error> {
    serde_json::from_str(body)
}

pub fn parse_user(body: &str) -> Result<User, serde_json::Error> {
    serde_json::from_str::<AuthBody>(body).map(|parsed| parsed.user)
}

/// Builds the error for a non-success status. The structured message is
/// preferred; an unstructured body falls back to the status line.
pub fn extract_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("Request failed with status {status}"));
    AppError::Api {
        status: status.as_u16(),
        message,
    }
}
