/// Everything that can go wrong inside one conversational turn. Each variant
/// maps to exactly one user-facing reply in the dialogue controller; none of
/// them escapes to the transport as an HTTP error.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// The extractor answered, but the answer could not be decoded as the
    /// expected `{intent, fields}` shape. The turn has no effect on state.
    #[error("extraction output could not be parsed: {0}")]
    ExtractionFormat(String),

    /// The extraction call itself failed (network, timeout, provider error).
    /// Handled the same way as a format error: retry prompt, state untouched.
    #[error("extraction provider failed: {0}")]
    ExtractionProvider(#[source] anyhow::Error),

    #[error("contact directory error: {0}")]
    Directory(#[from] rusqlite::Error),

    /// The calendar provider rejected the event. The draft is kept so the
    /// user can retry without re-entering fields.
    #[error("calendar dispatch failed: {0}")]
    Dispatch(String),
}
