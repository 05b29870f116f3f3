use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a page load does with the remote counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Increment,
    ReadOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
    Prerender,
}

/// Result of one `initialize` call. Failures are folded in here instead of
/// being returned as errors; the counter must never break the hosting page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The controller had already run for this page load.
    AlreadyStarted,
    NoDisplayTarget,
    /// The page closed while still hidden.
    Abandoned,
    Incremented { count: u64 },
    Read { count: u64 },
    /// The count could not be fetched and the fallback indicator is shown.
    Unavailable,
    /// Local state could not be written; the error label is shown.
    Failed,
}

/// On-disk shape of the durable key-value store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoredEntries {
    pub entries: BTreeMap<String, String>,
}
