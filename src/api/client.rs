use std::time::Duration;

use reqwest::multipart;
use serde_json::json;
use tracing::{debug, warn};

use crate::api::payload;
use crate::models::{Event, EventDraft, Society, User};
use crate::utils::error::AppError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper over the platform's HTTP JSON API.
///
/// Every method resolves to the decoded payload or an [`AppError`] carrying
/// the message the interface should show. Nothing here touches UI state.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// `GET /api/events` — the published events listing.
    pub async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let response = self.http.get(self.url("/api/events")).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(payload::extract_error(status, &body));
        }
        let events = payload::parse_events(&body)?;
        debug!(count = events.len(), "Fetched events");
        Ok(events)
    }

    /// `GET /api/societies` — all registered societies.
    pub async fn list_societies(&self) -> Result<Vec<Society>, AppError> {
        let response = self.http.get(self.url("/api/societies")).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(payload::extract_error(status, &body));
        }
        Ok(payload::parse_societies(&body)?)
    }

    /// `POST /api/societies/{id}/verify` — marks a society verified.
    pub async fn verify_society(&self, society_id: i64) -> Result<(), AppError> {
        let path = format!("/api/societies/{society_id}/verify");
        let response = self.http.post(self.url(&path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(payload::extract_error(status, &body));
        }
        Ok(())
    }

    /// `POST /api/events` — publishes an event from the dashboard form.
    pub async fn create_event(&self, draft: &EventDraft) -> Result<(), AppError> {
        let form = multipart::Form::new()
            .text("society_id", draft.society_id.to_string())
            .text("title", draft.title.clone())
            .text("category", draft.category.clone())
            .text("event_date", draft.event_date.clone())
            .text("venue", draft.venue.clone())
            .text("description", draft.description.clone())
            .text("short_description", draft.short_description.clone())
            .text("google_form_link", draft.google_form_link.clone());

        let response = self
            .http
            .post(self.url("/api/events"))
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(payload::extract_error(status, &body));
        }
        Ok(())
    }

    /// `POST /api/login` — exchanges credentials for the user record the
    /// session store persists.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AppError> {
        let body = json!({ "username": username, "password": password });
        self.auth_request("/api/login", body).await
    }

    /// `POST /api/register` — creates an account and returns its user record.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let body = json!({ "username": username, "email": email, "password": password });
        self.auth_request("/api/register", body).await
    }

    async fn auth_request(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<User, AppError> {
        let response = self.http.post(self.url(path)).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(payload::extract_error(status, &text));
        }
        Ok(payload::parse_user(&text)?)
    }

    /// Best-effort notification that the user toggled interest in an event.
    ///
    /// The toggle is client-side state; this side channel never blocks it
    /// and a failure is only logged.
    pub async fn report_interest(&self, event_id: i64, interested: bool) {
        let path = format!("/api/events/{event_id}/like");
        match self.http.post(self.url(&path)).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(event_id, interested, "Reported interest change");
            }
            Ok(response) => {
                warn!(event_id, status = %response.status(), "Interest report rejected");
            }
            Err(e) => {
                warn!(event_id, error = ?e, "Interest report failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_joins_without_double_slashes() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.url("/api/events"), "http://localhost:5000/api/events");
    }
}
