use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{CalendarProvider, CreatedEvent, EventRequest, REFERENCE_TIME_ZONE};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Google Calendar v3 `events.insert`. Token bootstrapping is plumbing that
/// happens outside the process; we only carry the resulting access token.
pub struct GoogleCalendarProvider {
    access_token: String,
    calendar_id: String,
    client: reqwest::Client,
}

impl GoogleCalendarProvider {
    pub fn new(access_token: String, calendar_id: String) -> Self {
        Self {
            access_token,
            calendar_id,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    async fn create_event(&self, request: &EventRequest) -> anyhow::Result<CreatedEvent> {
        let body = json!({
            "summary": request.summary,
            "description": request.description,
            "start": {
                "dateTime": request.start.to_rfc3339(),
                "timeZone": REFERENCE_TIME_ZONE,
            },
            "end": {
                "dateTime": request.end.to_rfc3339(),
                "timeZone": REFERENCE_TIME_ZONE,
            },
            "attendees": request
                .attendees
                .iter()
                .map(|email| json!({ "email": email }))
                .collect::<Vec<_>>(),
        });

        let url = format!(
            "https://www.googleapis.com/calendar/v3/calendars/{}/events",
            self.calendar_id
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .context("failed to call Google Calendar API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse Google Calendar response")?;

        if !status.is_success() {
            let detail = data["error"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| data.to_string());
            anyhow::bail!("Google Calendar API error ({status}): {detail}");
        }

        Ok(CreatedEvent {
            html_link: data["htmlLink"].as_str().map(str::to_string),
        })
    }
}
