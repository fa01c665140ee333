use std::sync::{Arc, Mutex};

use tracing::debug;

use super::TemplateSource;
use crate::ledger::Statement;

struct Cached<T> {
    revision: u64,
    value: Arc<T>,
}

/// A statement query that is recomputed in full whenever its source changes.
///
/// Results are never patched incrementally: a new revision throws the cached
/// value away and reruns the query against the latest snapshot.
pub struct LiveQuery<T> {
    name: &'static str,
    query: Box<dyn Fn(&Statement<'_>) -> T + Send + Sync>,
    cached: Mutex<Option<Cached<T>>>,
}

impl<T> LiveQuery<T> {
    pub fn new<F>(name: &'static str, query: F) -> Self
    where
        F: Fn(&Statement<'_>) -> T + Send + Sync + 'static,
    {
        Self {
            name,
            query: Box::new(query),
            cached: Mutex::new(None),
        }
    }

    /// Latest result for `source`, recomputing only if it changed.
    pub fn get(&self, source: &dyn TemplateSource) -> Arc<T> {
        let mut cached = match self.cached.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let (revision, snapshot) = source.current();
        if let Some(hit) = cached.as_ref().filter(|hit| hit.revision == revision) {
            return Arc::clone(&hit.value);
        }

        let value = Arc::new((self.query)(&Statement::new(&snapshot)));
        debug!(query = self.name, revision, "recomputed live query");
        *cached = Some(Cached {
            revision,
            value: Arc::clone(&value),
        });
        value
    }

    /// Whether the next `get` would recompute.
    pub fn is_stale(&self, source: &dyn TemplateSource) -> bool {
        match self.cached.lock() {
            Ok(guard) => guard
                .as_ref()
                .map_or(true, |hit| hit.revision != source.revision()),
            Err(_) => true,
        }
    }
}
