// Life of a product:
// 1. Raw fields come in as a `NewProduct`
// 2. Validate into a `Product`
// 3. Register:
//     - Hash repository, keyed by ID
//     - Balanced index, keyed by name
// 4. Read back:
//     - By ID through the repository
//     - By name, or in name order, through the index
//     - As a sorted snapshot through the merge sort
//
// System components:
//  - AVL index (generic, no catalog knowledge)
//  - Merge sort with pluggable clock (generic, no catalog knowledge)
//  - Catalog tying both to the product domain

mod catalog;
pub mod config;
pub mod index;
pub mod ordering;
pub mod repository;
pub mod simulation;
pub mod sort;
pub mod types;

pub use catalog::{Catalog, CatalogError, SortedSnapshot};
