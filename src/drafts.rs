use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::models::ConversationDraft;

/// Drafts older than this are discarded on next access, so a user who walks
/// away mid-booking gets a fresh start instead of stale context.
pub const DRAFT_TTL: Duration = Duration::from_secs(30 * 60);

/// In-memory, per-user draft state.
///
/// Turns for the same user must be strictly serialized across the whole
/// extract-merge-resolve-dispatch cycle, while different users proceed
/// independently. The outer mutex is held only long enough to hand out the
/// per-user `Arc`; the inner async mutex is held for the whole turn (it
/// spans awaits, so it must be the tokio one).
#[derive(Default)]
pub struct DraftStore {
    sessions: Mutex<HashMap<String, Arc<tokio::sync::Mutex<UserSession>>>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session slots are never evicted; an idle slot is just an empty
    /// `UserSession`.
    pub fn session(&self, user_id: &str) -> Arc<tokio::sync::Mutex<UserSession>> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.entry(user_id.to_string()).or_default().clone()
    }
}

#[derive(Debug)]
pub struct UserSession {
    draft: Option<ConversationDraft>,
    touched_at: Instant,
}

impl Default for UserSession {
    fn default() -> Self {
        Self {
            draft: None,
            touched_at: Instant::now(),
        }
    }
}

impl UserSession {
    /// Called once at the start of every turn, before the draft is read.
    pub fn expire_stale(&mut self, ttl: Duration) {
        if self.draft.is_some() && self.touched_at.elapsed() >= ttl {
            tracing::debug!("discarding expired draft");
            self.draft = None;
        }
    }

    pub fn draft(&self) -> Option<&ConversationDraft> {
        self.draft.as_ref()
    }

    pub fn set_draft(&mut self, draft: ConversationDraft) {
        self.draft = Some(draft);
        self.touched_at = Instant::now();
    }

    pub fn clear(&mut self) {
        self.draft = None;
    }
}
