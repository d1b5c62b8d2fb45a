//! Parsed-template cache
//!
//! Templates are parsed once and the syntax tree is shared afterwards. The
//! exact template string is the key, so two templates differing only in
//! whitespace are cached separately. Parse failures are never cached.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::debug;

use crate::ast::Node;
use crate::error::ParseError;
use crate::parser::parse;

/// Cache sizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached templates; `None` for unbounded
    pub capacity: Option<usize>,
}

impl CacheConfig {
    /// An unbounded cache.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A cache holding at most `capacity` templates.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
        }
    }
}

#[derive(Debug)]
struct Entry {
    ast: Arc<Node>,
    last_used: AtomicU64,
}

/// Concurrent map from template text to parsed syntax tree.
///
/// Concurrent misses on the same template may both parse it; the trees are
/// equal, so whichever insert lands last wins harmlessly.
///
/// # Example
///
/// ```
/// use thicket::cache::{CacheConfig, TemplateCache};
///
/// let cache = TemplateCache::with_config(CacheConfig::bounded(1));
/// let first = cache.get_or_parse("<Divider />").unwrap();
/// let again = cache.get_or_parse("<Divider />").unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &again));
///
/// cache.get_or_parse("<Spacer />").unwrap();
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: DashMap<String, Entry>,

    /// 0 means unbounded
    capacity: AtomicUsize,

    /// Logical clock for recency
    clock: AtomicU64,
}

impl TemplateCache {
    /// Create an unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache with the given sizing.
    pub fn with_config(config: CacheConfig) -> Self {
        let cache = Self::new();
        cache.set_capacity(config.capacity);
        cache
    }

    /// Return the cached tree for `template`, parsing it on a miss.
    pub fn get_or_parse(&self, template: &str) -> Result<Arc<Node>, ParseError> {
        let now = self.tick();

        if let Some(entry) = self.entries.get(template) {
            entry.last_used.store(now, Ordering::Relaxed);
            debug!(len = template.len(), "template cache hit");
            return Ok(Arc::clone(&entry.ast));
        }

        debug!(len = template.len(), "template cache miss");
        let ast = Arc::new(parse(template)?);
        self.entries.insert(
            template.to_string(),
            Entry {
                ast: Arc::clone(&ast),
                last_used: AtomicU64::new(now),
            },
        );
        self.evict_to_capacity();
        Ok(ast)
    }

    /// Drop every cached tree.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached templates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if `template` is cached, without touching its recency.
    pub fn contains(&self, template: &str) -> bool {
        self.entries.contains_key(template)
    }

    /// Bound the cache to `capacity` templates, evicting immediately if it
    /// is already larger. `None` removes the bound.
    pub fn set_capacity(&self, capacity: Option<usize>) {
        self.capacity
            .store(capacity.unwrap_or(0), Ordering::Relaxed);
        self.evict_to_capacity();
    }

    /// The current bound, if any.
    pub fn capacity(&self) -> Option<usize> {
        match self.capacity.load(Ordering::Relaxed) {
            0 => None,
            n => Some(n),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn evict_to_capacity(&self) {
        let Some(capacity) = self.capacity() else {
            return;
        };
        while self.entries.len() > capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.last_used.load(Ordering::Relaxed))
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    debug!(len = key.len(), "template cache eviction");
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

/// The process-wide cache used by [`crate::render`].
pub fn global() -> &'static TemplateCache {
    static GLOBAL: OnceLock<TemplateCache> = OnceLock::new();
    GLOBAL.get_or_init(TemplateCache::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_same_tree() {
        let cache = TemplateCache::new();
        let a = cache.get_or_parse("<Row/>").unwrap();
        let b = cache.get_or_parse("<Row/>").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_whitespace_variants_are_distinct_keys() {
        let cache = TemplateCache::new();
        cache.get_or_parse("<Row/>").unwrap();
        cache.get_or_parse(" <Row/>").unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failures_not_cached() {
        let cache = TemplateCache::new();
        assert!(cache.get_or_parse("<Row>").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lru_eviction() {
        let cache = TemplateCache::with_config(CacheConfig::bounded(2));
        cache.get_or_parse("1").unwrap();
        cache.get_or_parse("2").unwrap();
        // Touch "1" so "2" becomes least recently used
        cache.get_or_parse("1").unwrap();
        cache.get_or_parse("3").unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("1"));
        assert!(!cache.contains("2"));
        assert!(cache.contains("3"));
    }

    #[test]
    fn test_shrinking_capacity_evicts() {
        let cache = TemplateCache::new();
        for t in ["1", "2", "3", "4"] {
            cache.get_or_parse(t).unwrap();
        }
        cache.set_capacity(Some(1));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("4"));
        assert_eq!(cache.capacity(), Some(1));

        cache.set_capacity(None);
        assert_eq!(cache.capacity(), None);
    }

    #[test]
    fn test_clear() {
        let cache = TemplateCache::new();
        cache.get_or_parse("1").unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
