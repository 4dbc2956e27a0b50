//! Product catalog: a hash repository keyed by ID alongside a balanced index
//! keyed by name.
//!
//! The catalog is the only place the two core structures meet. The index and
//! the sorter never call each other; the catalog feeds both.
//!
//! # Invariants
//!
//! - Every registered product is in the repository under its ID and in the
//!   name index under its name
//! - The name index has no delete, so `remove` only affects the repository

use std::fmt;
use std::time::Duration;

use crate::index::BalancedIndex;
use crate::ordering::SortKey;
use crate::repository::{HashRepository, RepositoryError};
use crate::sort::{MergeSort, Sorter};
use crate::types::{NewProduct, Product, ProductError};

/// A sorted copy of the catalog's contents and the time the sort took.
#[derive(Debug, Clone)]
pub struct SortedSnapshot {
    /// Products in sorted order.
    pub products: Vec<Product>,
    /// Time spent sorting, excluding taking the snapshot.
    pub elapsed: Duration,
}

/// Products indexed by ID and by name.
pub struct Catalog<S = MergeSort> {
    repository: HashRepository<Product>,
    by_name: BalancedIndex<String, Product>,
    sorter: S,
}

fn product_id(product: &Product) -> &str {
    product.id().as_str()
}

impl Catalog {
    /// Create an empty catalog sorted by [`MergeSort`] on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sorter(MergeSort::new())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sorter<Product>> Catalog<S> {
    /// Create an empty catalog that sorts snapshots with `sorter`.
    #[must_use]
    pub fn with_sorter(sorter: S) -> Self {
        Self {
            repository: HashRepository::new(product_id),
            by_name: BalancedIndex::new(),
            sorter,
        }
    }

    /// Register a validated product in both the repository and the name index.
    ///
    /// A product with an ID or name that is already present replaces the
    /// earlier entry in the corresponding store. Re-registering an ID under a
    /// new name leaves the old name in the index, still pointing at the
    /// earlier product, because the name index cannot delete.
    pub fn register(&mut self, product: Product) -> Result<(), CatalogError> {
        let name = product.name().to_string();
        let replaced = self.repository.register(product.clone())?;
        self.by_name.insert(name, product);

        if let Some(previous) = replaced {
            tracing::info!(id = %previous.id(), "product replaced");
        } else {
            tracing::info!(
                count = self.repository.len(),
                "product registered"
            );
        }
        Ok(())
    }

    /// Validate `fields` and register the resulting product.
    pub fn register_new(&mut self, fields: NewProduct) -> Result<(), CatalogError> {
        let product = Product::new(fields)?;
        self.register(product)
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.repository.get(id)
    }

    /// Look up a product by exact name through the balanced index.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.by_name.search(name)
    }

    /// Remove a product from the repository.
    ///
    /// The product stays reachable through [`Catalog::find_by_name`] and
    /// [`Catalog::products_by_name`] because the name index cannot delete.
    pub fn remove(&mut self, id: &str) -> Option<Product> {
        let removed = self.repository.remove(id);
        if removed.is_some() {
            tracing::info!(id, "product removed from repository");
        }
        removed
    }

    /// Number of products in the repository.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repository.len()
    }

    /// Whether the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repository.is_empty()
    }

    /// Unordered snapshot of the repository.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.repository.list_all()
    }

    /// Every product ever indexed, ascending by name.
    #[must_use]
    pub fn products_by_name(&self) -> Vec<&Product> {
        self.by_name.in_order_values()
    }

    /// The name index, for inspection.
    #[must_use]
    pub const fn name_index(&self) -> &BalancedIndex<String, Product> {
        &self.by_name
    }

    /// Snapshot the repository and sort it by `key`.
    #[must_use]
    pub fn sorted_snapshot(&self, key: SortKey) -> SortedSnapshot {
        let mut products = self.repository.list_all();
        let elapsed = self.sorter.sort(&mut products, key.comparator());
        tracing::debug!(%key, count = products.len(), "sorted catalog snapshot");
        SortedSnapshot { products, elapsed }
    }
}

impl<S> fmt::Debug for Catalog<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("repository", &self.repository)
            .field("by_name", &self.by_name)
            .finish_non_exhaustive()
    }
}

/// Errors returned by catalog operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Product fields failed validation.
    Product(ProductError),
    /// The repository rejected the product.
    Repository(RepositoryError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product(e) => write!(f, "product error: {e}"),
            Self::Repository(e) => write!(f, "repository error: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Product(e) => Some(e),
            Self::Repository(e) => Some(e),
        }
    }
}

impl From<ProductError> for CatalogError {
    fn from(e: ProductError) -> Self {
        Self::Product(e)
    }
}

impl From<RepositoryError> for CatalogError {
    fn from(e: RepositoryError) -> Self {
        Self::Repository(e)
    }
}
