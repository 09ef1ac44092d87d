//! Ownership sink for function instances created during compilation.

use std::fmt;
use std::sync::Arc;

use crate::function::Function;

struct PoolEntry {
    function: Arc<dyn Function>,
    label: String,
}

/// Owns every function instance the inserters create, each tagged with a
/// human-readable label for diagnostics. The pool lives alongside the
/// compiled network and releases all entries together.
#[derive(Default)]
pub struct ResourcePool {
    entries: Vec<PoolEntry>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function and hand back a shared handle to it.
    pub fn add(&mut self, function: Arc<dyn Function>, label: &str) -> Arc<dyn Function> {
        let shared = Arc::clone(&function);
        self.entries.push(PoolEntry {
            function,
            label: label.to_string(),
        });
        shared
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }
}

impl fmt::Debug for ResourcePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for entry in &self.entries {
            list.entry(&format_args!(
                "{} ({})",
                entry.label,
                entry.function.name()
            ));
        }
        list.finish()
    }
}
