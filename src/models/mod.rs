pub mod contact;
pub mod draft;
pub mod extraction;

pub use contact::ContactEntry;
pub use draft::{ConversationDraft, MissingField};
pub use extraction::{ContactFields, ExtractedMessage, ScheduleFields};
