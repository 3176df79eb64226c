use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::kernel::constants::PRIORITY_NORMAL;
use crate::kernel::extension::{Extension, Priority};

/// Registry for extensions, bucketed by priority.
///
/// Buckets are kept in a `BTreeMap`, so iteration is always in ascending
/// priority, and each bucket only ever appends, so extensions sharing a
/// priority keep their registration order. Empty buckets are removed.
pub struct ExtensionRegistry {
    buckets: BTreeMap<Priority, Vec<Arc<Extension>>>,
    default_priority: Priority,
}

// Manual Debug implementation
impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buckets: Vec<(Priority, Vec<&str>)> = self
            .buckets
            .iter()
            .map(|(priority, bucket)| (*priority, bucket.iter().map(|e| e.name()).collect()))
            .collect();
        f.debug_struct("ExtensionRegistry")
            .field("buckets", &buckets)
            .field("default_priority", &self.default_priority)
            .finish()
    }
}

impl ExtensionRegistry {
    /// Create an empty registry that assigns `PRIORITY_NORMAL` by default
    pub fn new() -> Self {
        Self::with_default_priority(PRIORITY_NORMAL)
    }

    pub fn with_default_priority(default_priority: Priority) -> Self {
        Self {
            buckets: BTreeMap::new(),
            default_priority,
        }
    }

    /// Register an extension, giving it the default priority if it has none.
    pub fn add(&mut self, extension: Arc<Extension>) {
        let priority = extension.priority_or_insert(self.default_priority);
        log::debug!("Registering extension '{}' at priority {}", extension.name(), priority);
        self.buckets.entry(priority).or_default().push(extension);
    }

    /// Register each extension in order, exactly as `add` would.
    pub fn merge<'a>(&mut self, extensions: impl IntoIterator<Item = &'a Arc<Extension>>) {
        for extension in extensions {
            self.add(Arc::clone(extension));
        }
    }

    /// Remove the first registration of this exact extension.
    /// Returns `false` and leaves the registry untouched if it is not present.
    pub fn remove(&mut self, extension: &Arc<Extension>) -> bool {
        let found = self.buckets.iter().find_map(|(priority, bucket)| {
            bucket
                .iter()
                .position(|e| Arc::ptr_eq(e, extension))
                .map(|index| (*priority, index))
        });

        let Some((priority, index)) = found else {
            return false;
        };

        if let Some(bucket) = self.buckets.get_mut(&priority) {
            bucket.remove(index);
            if bucket.is_empty() {
                self.buckets.remove(&priority);
            }
        }
        true
    }

    /// Check whether this exact extension is registered
    pub fn has(&self, extension: &Arc<Extension>) -> bool {
        self.buckets
            .values()
            .any(|bucket| bucket.iter().any(|e| Arc::ptr_eq(e, extension)))
    }

    /// Snapshot of the execution order: ascending priority, then
    /// registration order within a priority.
    pub fn ordered_view(&self) -> Vec<(Priority, Vec<Arc<Extension>>)> {
        self.buckets
            .iter()
            .map(|(priority, bucket)| (*priority, bucket.clone()))
            .collect()
    }

    /// Priorities that currently have at least one extension, ascending
    pub fn priorities(&self) -> Vec<Priority> {
        self.buckets.keys().copied().collect()
    }

    /// Get the number of registrations
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Clear all extensions
    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
