/*
 * cache.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Compiled-template cache keyed by exact source text.
//!
//! Compilation is a pure function of the source, so racing compilations
//! of the same text are harmless: both succeed, and whichever inserts
//! last wins. Lookups only take the read lock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;

use crate::error::TemplateResult;
use crate::template::Template;

/// Process-wide cache used by [`compile_template`](crate::compile_template).
static GLOBAL_CACHE: Lazy<TemplateCache> = Lazy::new(TemplateCache::new);

/// The process-wide template cache.
pub fn global_cache() -> &'static TemplateCache {
    &GLOBAL_CACHE
}

/// Thread-safe map from source text to compiled template.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: RwLock<HashMap<String, Arc<Template>>>,
}

impl TemplateCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previously compiled template.
    pub fn get(&self, source: &str) -> Option<Arc<Template>> {
        self.read().get(source).cloned()
    }

    /// Return the cached template for `source`, compiling it on a miss.
    ///
    /// Templates that fail to compile are not cached.
    pub fn get_or_compile(&self, source: &str) -> TemplateResult<Arc<Template>> {
        if let Some(template) = self.get(source) {
            tracing::debug!(source_len = source.len(), "Template cache hit");
            return Ok(template);
        }

        tracing::debug!(source_len = source.len(), "Template cache miss");
        let template = Arc::new(Template::compile(source)?);
        self.write()
            .insert(source.to_string(), Arc::clone(&template));
        Ok(template)
    }

    /// Number of cached templates.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every cached template.
    pub fn clear(&self) {
        self.write().clear();
    }

    // Cached templates are immutable, so a panic while a lock was held
    // cannot leave the map in a torn state.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Template>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Template>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
