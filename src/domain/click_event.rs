//! Click event passed from the redirect path to the accounting worker.

/// A single successful redirect, queued for asynchronous click accounting.
///
/// Decouples the HTTP response from the registry write: the redirect is
/// served immediately and the counter catches up in the background.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub code: String,
}

impl ClickEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
