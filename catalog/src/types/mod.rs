//! Catalog domain types.
//!
//! These are the values stored in the catalog's repository and name index.
//! The index and sorter themselves are generic and never depend on them.

mod ids;
mod product;

pub use ids::ProductId;
pub use product::{NewProduct, Product, ProductError, ProductKind};
