use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The accumulating, not-yet-complete booking request for one user. Volatile:
/// lives in the per-user store and dies on finalize, abandonment, or expiry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationDraft {
    pub title: Option<String>,
    /// `YYYY-MM-DD`; validated when the event is built, not here.
    pub date: Option<String>,
    /// `HH:MM`, local to the reference time zone.
    pub time: Option<String>,
    pub duration_minutes: Option<i32>,
    /// Guest tokens as the user stated them (names or emails, order kept).
    #[serde(default)]
    pub raw_guests: Vec<String>,
    #[serde(default)]
    pub resolved_guests: BTreeSet<String>,
}

impl ConversationDraft {
    /// Required fields still unset, in the fixed reporting order.
    pub fn missing_fields(&self) -> Vec<MissingField> {
        let mut missing = vec![];
        if self.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
            missing.push(MissingField::Title);
        }
        if self.date.is_none() {
            missing.push(MissingField::Date);
        }
        if self.time.is_none() {
            missing.push(MissingField::Time);
        }
        if self.resolved_guests.is_empty() {
            missing.push(MissingField::Guests);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Title,
    Date,
    Time,
    Guests,
}

impl MissingField {
    pub fn label(&self) -> &'static str {
        match self {
            MissingField::Title => "título",
            MissingField::Date => "data",
            MissingField::Time => "hora",
            MissingField::Guests => "convidados",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_draft_missing_everything_in_order() {
        let draft = ConversationDraft::default();
        assert_eq!(
            draft.missing_fields(),
            vec![
                MissingField::Title,
                MissingField::Date,
                MissingField::Time,
                MissingField::Guests
            ]
        );
    }

    #[test]
    fn test_blank_title_counts_as_missing() {
        let draft = ConversationDraft {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(draft.missing_fields().contains(&MissingField::Title));
    }

    #[test]
    fn test_complete_draft_has_no_missing_fields() {
        let draft = ConversationDraft {
            title: Some("reunião".to_string()),
            date: Some("2025-07-01".to_string()),
            time: Some("15:00".to_string()),
            duration_minutes: None,
            raw_guests: vec!["vini".to_string()],
            resolved_guests: ["v@z.com".to_string()].into_iter().collect(),
        };
        assert!(draft.is_complete());
    }

    #[test]
    fn test_raw_guests_without_resolution_still_missing() {
        let draft = ConversationDraft {
            title: Some("reunião".to_string()),
            date: Some("2025-07-01".to_string()),
            time: Some("15:00".to_string()),
            raw_guests: vec!["desconhecido".to_string()],
            ..Default::default()
        };
        assert_eq!(draft.missing_fields(), vec![MissingField::Guests]);
    }
}
