pub mod live;

use std::sync::{Arc, RwLock, RwLockWriteGuard};

use tracing::{info, warn};

use crate::{
    errors::{StatementError, StatementResult},
    ledger::{TemplateId, TransactionTemplate},
};

pub use live::LiveQuery;

/// Supplies the current template set and tells observers when it changed.
///
/// `revision` must grow on every mutation; queries compare it with the one
/// they last computed against and recompute in full when it differs.
pub trait TemplateSource: Send + Sync {
    /// Revision and snapshot read together, so the pair always matches.
    fn current(&self) -> (u64, Arc<Vec<TransactionTemplate>>);

    fn revision(&self) -> u64 {
        self.current().0
    }

    fn snapshot(&self) -> Arc<Vec<TransactionTemplate>> {
        self.current().1
    }
}

#[derive(Default)]
struct StoreState {
    revision: u64,
    templates: Arc<Vec<TransactionTemplate>>,
}

/// In-memory template set with copy-on-write snapshots.
#[derive(Default)]
pub struct TemplateStore {
    state: RwLock<StoreState>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: Vec<TransactionTemplate>) -> Self {
        Self {
            state: RwLock::new(StoreState {
                revision: 0,
                templates: Arc::new(templates),
            }),
        }
    }

    pub fn insert(&self, template: TransactionTemplate) -> TemplateId {
        let id = template.id;
        self.apply("insert", |templates| templates.push(template));
        id
    }

    pub fn update(&self, template: TransactionTemplate) -> StatementResult<()> {
        let id = template.id;
        self.try_apply("update", |templates| {
            let slot = templates
                .iter_mut()
                .find(|existing| existing.id == id)
                .ok_or(StatementError::TemplateNotFound(id))?;
            *slot = template;
            Ok(())
        })
    }

    pub fn delete(&self, id: TemplateId) -> StatementResult<TransactionTemplate> {
        self.try_apply("delete", |templates| {
            let index = templates
                .iter()
                .position(|existing| existing.id == id)
                .ok_or(StatementError::TemplateNotFound(id))?;
            Ok(templates.remove(index))
        })
    }

    /// Swaps the whole set at once, counting as a single change.
    pub fn replace_all(&self, replacement: Vec<TransactionTemplate>) {
        self.apply("replace", |templates| *templates = replacement);
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn apply<F>(&self, action: &'static str, change: F)
    where
        F: FnOnce(&mut Vec<TransactionTemplate>),
    {
        let mut state = self.write(action);
        let mut templates = state.templates.as_ref().clone();
        change(&mut templates);
        commit(action, &mut state, templates);
    }

    fn try_apply<F, R>(&self, action: &'static str, change: F) -> StatementResult<R>
    where
        F: FnOnce(&mut Vec<TransactionTemplate>) -> StatementResult<R>,
    {
        let mut state = self.write(action);
        let mut templates = state.templates.as_ref().clone();
        match change(&mut templates) {
            Ok(outcome) => {
                commit(action, &mut state, templates);
                Ok(outcome)
            }
            Err(err) => {
                warn!(action, error = %err, "template store change rejected");
                Err(err)
            }
        }
    }

    fn write(&self, action: &'static str) -> RwLockWriteGuard<'_, StoreState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(action, "template store lock was poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }
}

fn commit(action: &'static str, state: &mut StoreState, templates: Vec<TransactionTemplate>) {
    state.templates = Arc::new(templates);
    state.revision += 1;
    info!(
        action,
        revision = state.revision,
        templates = state.templates.len(),
        "template store changed"
    );
}

impl TemplateSource for TemplateStore {
    fn current(&self) -> (u64, Arc<Vec<TransactionTemplate>>) {
        let state = match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        (state.revision, Arc::clone(&state.templates))
    }
}
