use chrono::{Duration, NaiveDate, NaiveTime};

use crate::errors::TurnError;
use crate::models::ConversationDraft;
use crate::services::calendar::{reference_offset, CalendarProvider, EventRequest};

const DEFAULT_DURATION_MINUTES: i32 = 60;

/// Convert a complete draft into a calendar event and hand it to the
/// provider. Returns the confirmation reply on success; on failure the
/// caller keeps the draft and builds the failure reply around the error
/// detail. No automatic retries.
pub async fn dispatch(
    provider: &dyn CalendarProvider,
    draft: &ConversationDraft,
) -> Result<String, TurnError> {
    let request = build_event_request(draft)?;
    let title = request.summary.clone();

    match provider.create_event(&request).await {
        Ok(created) => {
            tracing::info!(title = %title, "calendar event created");
            let mut reply = format!("✅ Reunião \"{title}\" agendada com sucesso!");
            if let Some(link) = created.html_link {
                reply.push_str(&format!(" Detalhes: {link}"));
            }
            Ok(reply)
        }
        Err(e) => Err(TurnError::Dispatch(e.to_string())),
    }
}

/// Time arithmetic and payload shape. End = start + duration (default 60
/// minutes), both in the reference zone. A date or time the extractor got
/// wrong surfaces as a dispatch error, never a panic; the kept draft lets
/// the user overwrite the bad field on the next turn.
pub fn build_event_request(draft: &ConversationDraft) -> Result<EventRequest, TurnError> {
    let title = draft
        .title
        .as_deref()
        .ok_or_else(|| TurnError::Dispatch("draft has no title".to_string()))?;
    let date = draft
        .date
        .as_deref()
        .ok_or_else(|| TurnError::Dispatch("draft has no date".to_string()))?;
    let time = draft
        .time
        .as_deref()
        .ok_or_else(|| TurnError::Dispatch("draft has no time".to_string()))?;

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| TurnError::Dispatch(format!("invalid date: {date}")))?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| TurnError::Dispatch(format!("invalid time: {time}")))?;

    let start = date
        .and_time(time)
        .and_local_timezone(reference_offset())
        .single()
        .ok_or_else(|| TurnError::Dispatch("ambiguous local start time".to_string()))?;

    let duration = draft.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
    let end = start + Duration::minutes(duration as i64);

    let guests: Vec<String> = draft.resolved_guests.iter().cloned().collect();
    let description = format!(
        "Reunião agendada via WhatsApp. Convidado(s): {}",
        guests.join(", ")
    );

    Ok(EventRequest {
        summary: title.to_string(),
        description,
        start,
        end,
        attendees: guests,
    })
}
