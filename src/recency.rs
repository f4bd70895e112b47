//! Read-only access to the user's view history

/// Source of the recently-viewed log, most recent first.
/// The engine reads one snapshot per call and never writes back.
pub trait RecencyStore: Send + Sync {
    fn recently_viewed(&self) -> Vec<String>;
}

/// Fixed snapshot, e.g. loaded from a profile store by the caller
#[derive(Debug, Clone, Default)]
pub struct StaticRecency {
    ids: Vec<String>,
}

impl StaticRecency {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }
}

impl RecencyStore for StaticRecency {
    fn recently_viewed(&self) -> Vec<String> {
        self.ids.clone()
    }
}
