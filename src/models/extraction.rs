use serde::Deserialize;

/// What the extractor understood from one inbound message. Ephemeral; the
/// dialogue controller consumes it and never stores it.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedMessage {
    Schedule(ScheduleFields),
    SaveContact(ContactFields),
    Greeting,
    Unrelated,
    /// Well-formed payload, unrecognized intent. Treated as a no-op turn.
    Unknown,
}

impl ExtractedMessage {
    pub fn intent_name(&self) -> &'static str {
        match self {
            ExtractedMessage::Schedule(_) => "schedule",
            ExtractedMessage::SaveContact(_) => "save_contact",
            ExtractedMessage::Greeting => "greeting",
            ExtractedMessage::Unrelated => "unrelated",
            ExtractedMessage::Unknown => "unknown",
        }
    }
}

/// Partial booking fields stated this turn; absent means "the message said
/// nothing about it".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScheduleFields {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(alias = "duration")]
    pub duration_minutes: Option<i32>,
    /// When present, the full guest list as of this turn.
    pub guests: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContactFields {
    pub name: Option<String>,
    pub email: Option<String>,
}
