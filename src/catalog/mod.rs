//! # Product Catalog
//!
//! File-resident record store for products.
//!
//! # Design
//!
//! - The backing file is the single source of truth
//! - Each operation loads the whole table and, when it mutates, rewrites it
//! - Uniqueness of `id` and `name` is enforced on create
//! - Mutations on one file are serialized by a process-wide lock (optional)

pub mod errors;
pub mod lock;
pub mod product;
pub mod store;
pub mod table;

pub use errors::{CatalogError, CatalogResult};
pub use lock::TableLock;
pub use product::{Product, ProductUpdate};
pub use store::{ProductStore, StoreOptions};
