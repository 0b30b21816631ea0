//! Key/value annotations carried by a pipe.
//!
//! Values are arbitrary (`Any + Send + Sync`) and are read back by type.
//! They are shared, not deep-copied, when a parent's metadata is merged
//! into the pipes produced by a split.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Value = Arc<dyn Any + Send + Sync>;

/// A mapping from unique string keys to arbitrary values.
///
/// # Example
///
/// ```
/// use bytepipe::Metadata;
///
/// let mut meta = Metadata::new();
/// meta.insert("name", String::from("report.csv"));
/// meta.insert("rows", 3usize);
///
/// assert_eq!(meta.get::<usize>("rows"), Some(&3));
/// assert_eq!(meta.get::<String>("name").map(String::as_str), Some("report.csv"));
/// assert_eq!(meta.get::<u32>("rows"), None);
/// ```
#[derive(Clone, Default)]
pub struct Metadata {
    entries: HashMap<String, Value>,
}

impl Metadata {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, returning true if the key was already present.
    pub fn insert<V>(&mut self, key: impl Into<String>, value: V) -> bool
    where
        V: Any + Send + Sync,
    {
        self.entries.insert(key.into(), Arc::new(value)).is_some()
    }

    /// Returns the value for `key` if it is present and of type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns true if `key` is present, whatever its type.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`, returning true if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Copies every entry of `parent` whose key is missing here.
    ///
    /// Existing entries always win.
    pub fn inherit(&mut self, parent: &Metadata) {
        for (key, value) in &parent.entries {
            self.entries
                .entry(key.clone())
                .or_insert_with(|| Arc::clone(value));
        }
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.keys().collect();
        keys.sort_unstable();
        f.debug_set().entries(keys).finish()
    }
}
