//! Read-mostly template cache keyed by template id.
//!
//! Each id owns a once-cell: the first caller runs the loader and validates the template,
//! everyone else blocks on the same cell and then shares the published `Arc<Template>`.
//! A failed load publishes nothing and drops the empty slot, so a later call can retry.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::errors::LayoutError;
use crate::layout::template::Template;

type Slot = Arc<OnceCell<Arc<Template>>>;

/// Outcome of [`TemplateCache::publish`].
#[derive(Debug, Clone)]
pub enum Published {
    Inserted(Arc<Template>),
    /// The id was already published; the existing template is returned untouched.
    AlreadyPresent(Arc<Template>),
}

#[derive(Debug, Default)]
pub struct TemplateCache {
    slots: RwLock<HashMap<String, Slot>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: &str) -> Slot {
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
        {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(id.to_string()).or_default())
    }

    /// Published template for `id`, if any.
    pub fn get(&self, id: &str) -> Option<Arc<Template>> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .and_then(|slot| slot.get().cloned())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of published templates.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the template for `id`, running `loader` at most once across all callers.
    ///
    /// The loaded template is validated before it becomes visible. The loader must produce a
    /// template whose id equals `id`.
    pub fn get_or_load<F>(&self, id: &str, loader: F) -> Result<Arc<Template>, LayoutError>
    where
        F: FnOnce() -> Result<Template, LayoutError>,
    {
        let slot = self.slot(id);
        let loaded = slot.get_or_try_init(|| {
            let template = loader()?;
            if template.id != id {
                return Err(LayoutError::TemplateIdMismatch {
                    expected: id.to_string(),
                    found: template.id,
                });
            }
            template.validate()?;
            info!(template_id = %id, version = %template.version, "Template published");
            Ok(Arc::new(template))
        })
        .map(Arc::clone);
        drop(slot);
        if loaded.is_err() {
            self.evict_empty(id);
        }
        loaded
    }

    /// Drops the slot for `id` when it is still empty and no other caller is waiting on it.
    fn evict_empty(&self, id: &str) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let idle = slots
            .get(id)
            .is_some_and(|slot| slot.get().is_none() && Arc::strong_count(slot) == 1);
        if idle {
            slots.remove(id);
        }
    }

    /// Publishes an already-parsed template unless its id is taken.
    pub fn publish(&self, template: Template) -> Result<Published, LayoutError> {
        let id = template.id.clone();
        let mut inserted = false;
        let stored = self.get_or_load(&id, || {
            inserted = true;
            Ok(template)
        })?;
        if inserted {
            Ok(Published::Inserted(stored))
        } else {
            debug!(template_id = %id, "Template already published");
            Ok(Published::AlreadyPresent(stored))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
