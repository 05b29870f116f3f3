use crate::errors::CounterError;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

const FLAG_SET: &str = "true";

/// The two visit flags, each living in its own store.
#[derive(Clone)]
pub struct VisitFlags {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    visited_key: String,
    session_key: String,
}

impl VisitFlags {
    pub fn new(
        durable: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        visited_key: impl Into<String>,
        session_key: impl Into<String>,
    ) -> Self {
        Self {
            durable,
            session,
            visited_key: visited_key.into(),
            session_key: session_key.into(),
        }
    }

    pub fn visited(&self) -> bool {
        self.durable.get(&self.visited_key).as_deref() == Some(FLAG_SET)
    }

    pub fn first_visit(&self) -> Option<DateTime<Utc>> {
        let raw = self.durable.get(&self.timestamp_key())?;
        DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|at| at.with_timezone(&Utc))
    }

    /// Records a successful increment. The timestamp is only written the
    /// first time so it keeps pointing at the original visit.
    pub fn mark_visited(&self, at: DateTime<Utc>) -> Result<(), CounterError> {
        self.durable.set(&self.visited_key, FLAG_SET)?;
        if self.durable.get(&self.timestamp_key()).is_none() {
            self.durable.set(&self.timestamp_key(), &at.to_rfc3339())?;
        }
        Ok(())
    }

    pub fn session_incremented(&self) -> bool {
        self.session
            .get(&self.session_key)
            .is_some_and(|value| !value.is_empty())
    }

    pub fn mark_session_incremented(&self) -> Result<(), CounterError> {
        self.session.set(&self.session_key, FLAG_SET)
    }

    fn timestamp_key(&self) -> String {
        format!("{}_at", self.visited_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn flags() -> (VisitFlags, Arc<MemoryStore>, Arc<MemoryStore>) {
        let durable = Arc::new(MemoryStore::new());
        let session = Arc::new(MemoryStore::new());
        let flags = VisitFlags::new(durable.clone(), session.clone(), "visited", "session");
        (flags, durable, session)
    }

    #[test]
    fn visited_requires_exact_true() {
        let (flags, durable, _) = flags();
        assert!(!flags.visited());
        durable.set("visited", "yes").unwrap();
        assert!(!flags.visited());
        durable.set("visited", "true").unwrap();
        assert!(flags.visited());
    }

    #[test]
    fn session_flag_accepts_any_non_empty_value() {
        let (flags, _, session) = flags();
        session.set("session", "").unwrap();
        assert!(!flags.session_incremented());
        session.set("session", "1").unwrap();
        assert!(flags.session_incremented());
    }

    #[test]
    fn mark_visited_keeps_first_timestamp() {
        let (flags, _, _) = flags();
        let first = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 2, 1, 8, 30, 0).unwrap();

        flags.mark_visited(first).unwrap();
        flags.mark_visited(later).unwrap();

        assert!(flags.visited());
        assert_eq!(flags.first_visit(), Some(first));
    }
}
