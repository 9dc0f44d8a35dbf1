use chrono::NaiveDate;

use crate::errors::TurnError;
use crate::models::{ContactFields, ConversationDraft, ExtractedMessage, ScheduleFields};
use crate::services::ai::LlmProvider;

const SYSTEM_PROMPT: &str = r#"You are an intent extraction engine for a WhatsApp scheduling assistant. Classify the user's latest message and extract structured fields.

Return ONLY valid JSON (no markdown, no explanation) with this exact structure:
{
  "intent": "schedule|save_contact|greeting|unrelated",
  "fields": { ... }
}

For "schedule", fields is:
{
  "title": "meeting title or null",
  "date": "2025-07-01 or null",
  "time": "15:00 or null",
  "duration_minutes": 60,
  "guests": ["names or emails mentioned"]
}

For "save_contact", fields is:
{ "name": "contact name or null", "email": "contact email or null" }

For "greeting" and "unrelated", omit fields.

Intent rules:
- "schedule": the user wants to book a meeting, or is supplying details for one in progress
- "save_contact": the user wants to store a name and email in the contact directory
- "greeting": a salutation with no scheduling content
- "unrelated": anything else

Dates are ISO (YYYY-MM-DD), times are 24h (HH:MM). Resolve relative dates ("amanhã", "sexta") against the reference date given in the message. When a current draft is provided, the message continues it: extract only what the message states, and if the guest list changes, restate it in full."#;

/// Run the extractor over one inbound message. `draft` (when present) is
/// serialized into the prompt so elliptical continuations like "e convida o
/// Vini também" can be interpreted.
pub async fn extract_message(
    llm: &dyn LlmProvider,
    text: &str,
    draft: Option<&ConversationDraft>,
    today: NaiveDate,
) -> Result<ExtractedMessage, TurnError> {
    let mut prompt = format!(
        "Reference date: {} ({}).\n",
        today.format("%Y-%m-%d"),
        today.format("%A"),
    );
    if let Some(draft) = draft {
        let context = serde_json::to_string(draft).unwrap_or_default();
        prompt.push_str(&format!(
            "Current draft for this conversation: {context}. The new message continues it.\n"
        ));
    }
    prompt.push_str(&format!("User message: \"{text}\""));

    let response = llm
        .chat(SYSTEM_PROMPT, &prompt)
        .await
        .map_err(TurnError::ExtractionProvider)?;

    decode_response(&response)
}

/// Decode the extractor's answer. Providers wrap their JSON in prose or
/// code fences often enough that stripping decoration comes first; anything
/// that still fails to decode is an `ExtractionFormat` error.
fn decode_response(response: &str) -> Result<ExtractedMessage, TurnError> {
    let cleaned = strip_decoration(response);

    let value: serde_json::Value = serde_json::from_str(cleaned)
        .map_err(|e| TurnError::ExtractionFormat(e.to_string()))?;

    let intent = value["intent"]
        .as_str()
        .ok_or_else(|| TurnError::ExtractionFormat("missing intent".to_string()))?;

    let fields = value.get("fields").cloned().unwrap_or(serde_json::json!({}));

    match intent {
        "schedule" => {
            let fields: ScheduleFields = serde_json::from_value(fields)
                .map_err(|e| TurnError::ExtractionFormat(e.to_string()))?;
            Ok(ExtractedMessage::Schedule(fields))
        }
        "save_contact" => {
            let fields: ContactFields = serde_json::from_value(fields)
                .map_err(|e| TurnError::ExtractionFormat(e.to_string()))?;
            Ok(ExtractedMessage::SaveContact(fields))
        }
        "greeting" => Ok(ExtractedMessage::Greeting),
        "unrelated" => Ok(ExtractedMessage::Unrelated),
        other => {
            tracing::warn!(intent = other, "extractor returned unrecognized intent");
            Ok(ExtractedMessage::Unknown)
        }
    }
}

/// Strip markdown fences and surrounding prose, keeping the outermost JSON
/// object when one is present.
fn strip_decoration(response: &str) -> &str {
    let trimmed = response.trim();

    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let unfenced = unfenced.strip_suffix("```").unwrap_or(unfenced).trim();

    if let (Some(start), Some(end)) = (unfenced.find('{'), unfenced.rfind('}')) {
        if start < end {
            return &unfenced[start..=end];
        }
    }
    unfenced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_schedule_with_fields() {
        let json = r#"{"intent":"schedule","fields":{"title":"reunião","date":"2025-07-01","time":"15:00","duration_minutes":30,"guests":["vini","x@y.com"]}}"#;
        let result = decode_response(json).unwrap();
        let ExtractedMessage::Schedule(fields) = result else {
            panic!("expected schedule");
        };
        assert_eq!(fields.title.as_deref(), Some("reunião"));
        assert_eq!(fields.duration_minutes, Some(30));
        assert_eq!(
            fields.guests,
            Some(vec!["vini".to_string(), "x@y.com".to_string()])
        );
    }

    #[test]
    fn test_decode_schedule_without_fields_is_empty() {
        let result = decode_response(r#"{"intent":"schedule"}"#).unwrap();
        assert_eq!(
            result,
            ExtractedMessage::Schedule(ScheduleFields::default())
        );
    }

    #[test]
    fn test_decode_fenced_json() {
        let raw = "```json\n{\"intent\":\"greeting\"}\n```";
        assert_eq!(decode_response(raw).unwrap(), ExtractedMessage::Greeting);
    }

    #[test]
    fn test_decode_prose_wrapped_json() {
        let raw = "Sure! Here is the extraction: {\"intent\":\"unrelated\"} Hope that helps.";
        assert_eq!(decode_response(raw).unwrap(), ExtractedMessage::Unrelated);
    }

    #[test]
    fn test_decode_garbage_is_format_error() {
        let err = decode_response("I cannot do that").unwrap_err();
        assert!(matches!(err, TurnError::ExtractionFormat(_)));
    }

    #[test]
    fn test_decode_missing_intent_is_format_error() {
        let err = decode_response(r#"{"fields":{"title":"x"}}"#).unwrap_err();
        assert!(matches!(err, TurnError::ExtractionFormat(_)));
    }

    #[test]
    fn test_decode_malformed_fields_is_format_error() {
        let err = decode_response(r#"{"intent":"schedule","fields":"not an object"}"#).unwrap_err();
        assert!(matches!(err, TurnError::ExtractionFormat(_)));
    }

    #[test]
    fn test_decode_unrecognized_intent_is_unknown() {
        let result = decode_response(r#"{"intent":"tell_joke"}"#).unwrap();
        assert_eq!(result, ExtractedMessage::Unknown);
    }

    #[test]
    fn test_duration_alias() {
        let json = r#"{"intent":"schedule","fields":{"duration":90}}"#;
        let ExtractedMessage::Schedule(fields) = decode_response(json).unwrap() else {
            panic!("expected schedule");
        };
        assert_eq!(fields.duration_minutes, Some(90));
    }
}
