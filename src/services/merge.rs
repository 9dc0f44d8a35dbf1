use crate::models::{ConversationDraft, ScheduleFields};

/// Combine one turn's extracted fields into an existing draft.
///
/// Last write wins per field; fields the message said nothing about are
/// preserved. A stated guest list replaces `raw_guests` wholesale (guests
/// never accumulate across turns beyond what extraction restates) and the
/// caller re-runs resolution over the merged list afterwards. Pure function
/// of its two inputs, so merging the same fields twice is a no-op.
pub fn merge(existing: &ConversationDraft, incoming: &ScheduleFields) -> ConversationDraft {
    let mut draft = existing.clone();

    if incoming.title.is_some() {
        draft.title = incoming.title.clone();
    }
    if incoming.date.is_some() {
        draft.date = incoming.date.clone();
    }
    if incoming.time.is_some() {
        draft.time = incoming.time.clone();
    }
    if incoming.duration_minutes.is_some() {
        draft.duration_minutes = incoming.duration_minutes;
    }
    if let Some(guests) = &incoming.guests {
        draft.raw_guests = guests.clone();
    }

    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MissingField;

    fn fields(title: Option<&str>, date: Option<&str>, time: Option<&str>) -> ScheduleFields {
        ScheduleFields {
            title: title.map(str::to_string),
            date: date.map(str::to_string),
            time: time.map(str::to_string),
            duration_minutes: None,
            guests: None,
        }
    }

    /// Last-write-wins overlay of two field sets, for the associativity check.
    fn overwrite(first: &ScheduleFields, second: &ScheduleFields) -> ScheduleFields {
        ScheduleFields {
            title: second.title.clone().or_else(|| first.title.clone()),
            date: second.date.clone().or_else(|| first.date.clone()),
            time: second.time.clone().or_else(|| first.time.clone()),
            duration_minutes: second.duration_minutes.or(first.duration_minutes),
            guests: second.guests.clone().or_else(|| first.guests.clone()),
        }
    }

    #[test]
    fn test_incoming_fields_overwrite() {
        let existing = ConversationDraft {
            title: Some("velho".to_string()),
            date: Some("2025-06-01".to_string()),
            ..Default::default()
        };
        let merged = merge(&existing, &fields(Some("novo"), None, Some("15:00")));
        assert_eq!(merged.title.as_deref(), Some("novo"));
        assert_eq!(merged.date.as_deref(), Some("2025-06-01"));
        assert_eq!(merged.time.as_deref(), Some("15:00"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let existing = ConversationDraft::default();
        let incoming = fields(Some("reunião"), Some("2025-07-01"), None);
        let once = merge(&existing, &incoming);
        let twice = merge(&once, &incoming);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_associates_as_last_write_wins() {
        let base = ConversationDraft {
            title: Some("original".to_string()),
            ..Default::default()
        };
        let f1 = ScheduleFields {
            title: Some("primeiro".to_string()),
            date: Some("2025-07-01".to_string()),
            duration_minutes: Some(30),
            ..Default::default()
        };
        let f2 = ScheduleFields {
            date: Some("2025-07-02".to_string()),
            time: Some("09:00".to_string()),
            guests: Some(vec!["ana".to_string()]),
            ..Default::default()
        };

        let sequential = merge(&merge(&base, &f1), &f2);
        let collapsed = merge(&base, &overwrite(&f1, &f2));
        assert_eq!(sequential, collapsed);
    }

    #[test]
    fn test_stated_guests_replace_previous_list() {
        let existing = ConversationDraft {
            raw_guests: vec!["vini".to_string(), "ana".to_string()],
            ..Default::default()
        };
        let incoming = ScheduleFields {
            guests: Some(vec!["carla".to_string()]),
            ..Default::default()
        };
        let merged = merge(&existing, &incoming);
        assert_eq!(merged.raw_guests, vec!["carla".to_string()]);
    }

    #[test]
    fn test_absent_guests_keep_previous_list() {
        let existing = ConversationDraft {
            raw_guests: vec!["vini".to_string()],
            ..Default::default()
        };
        let merged = merge(&existing, &ScheduleFields::default());
        assert_eq!(merged.raw_guests, vec!["vini".to_string()]);
    }

    #[test]
    fn test_missing_follows_fixed_order_after_merge() {
        let merged = merge(
            &ConversationDraft::default(),
            &fields(None, Some("2025-07-01"), None),
        );
        assert_eq!(
            merged.missing_fields(),
            vec![MissingField::Title, MissingField::Time, MissingField::Guests]
        );
    }
}
