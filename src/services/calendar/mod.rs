pub mod google;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Calendar events are anchored to a single reference zone; the original
/// deployment serves São Paulo and the extractor emits local times.
pub const REFERENCE_TIME_ZONE: &str = "America/Sao_Paulo";

pub fn reference_offset() -> FixedOffset {
    // UTC-3, no DST since 2019.
    FixedOffset::west_opt(3 * 3600).expect("static UTC-3 offset is in range")
}

/// A fully-specified calendar event, ready for the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRequest {
    pub summary: String,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub attendees: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CreatedEvent {
    pub html_link: Option<String>,
}

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn create_event(&self, request: &EventRequest) -> anyhow::Result<CreatedEvent>;
}
