//! Hash-backed repository of items keyed by an extracted ID.
//!
//! The repository has no ordering; `list_all` returns items in whatever order
//! the underlying map yields them. Ordered views come from the name index or
//! from sorting a snapshot.
//!
//! # Invariants
//!
//! - Each ID maps to at most one item
//! - No item is stored under a blank ID

use std::collections::HashMap;
use std::fmt;

/// Extracts the ID an item is stored under.
pub type IdExtractor<T> = fn(&T) -> &str;

/// Unordered store of items keyed by their ID.
pub struct HashRepository<T> {
    items: HashMap<String, T>,
    id_of: IdExtractor<T>,
}

impl<T> HashRepository<T> {
    /// Create an empty repository that keys items with `id_of`.
    #[must_use]
    pub fn new(id_of: IdExtractor<T>) -> Self {
        Self {
            items: HashMap::new(),
            id_of,
        }
    }

    /// Store `item` under its ID, replacing any item already stored there.
    ///
    /// Returns the replaced item, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::EmptyId`] if the extracted ID is blank; the
    /// repository is left untouched.
    pub fn register(&mut self, item: T) -> Result<Option<T>, RepositoryError> {
        let id = (self.id_of)(&item);
        if id.trim().is_empty() {
            return Err(RepositoryError::EmptyId);
        }
        let id = id.to_string();
        Ok(self.items.insert(id, item))
    }

    /// Look up an item by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id)
    }

    /// Remove an item by ID, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        self.items.remove(id)
    }

    /// Number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrowing iterator over stored items, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }
}

impl<T: Clone> HashRepository<T> {
    /// Snapshot of every stored item, in no particular order.
    ///
    /// The returned vector is independent of the repository.
    #[must_use]
    pub fn list_all(&self) -> Vec<T> {
        self.items.values().cloned().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for HashRepository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRepository")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

/// Errors returned by repository operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryError {
    /// The item's extracted ID is blank.
    EmptyId,
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "invalid argument: extracted id must not be blank"),
        }
    }
}

impl std::error::Error for RepositoryError {}
