//! # Product Store
//!
//! Sole authority over the backing table. Every operation is a full
//! lifecycle: load the whole file, compute, and (for mutations) rewrite the
//! whole file. No records are cached between calls.

use std::path::{Path, PathBuf};

use super::errors::{CatalogError, CatalogResult};
use super::lock::TableLock;
use super::product::{Product, ProductUpdate};
use super::table;

/// Store behavior switches
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Serialize load→mutate→save sequences on a per-file lock.
    ///
    /// When false, concurrent mutations can race and the last save wins.
    pub serialize_writes: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            serialize_writes: true,
        }
    }
}

/// File-backed product catalog
#[derive(Debug, Clone)]
pub struct ProductStore {
    path: PathBuf,
    write_lock: Option<TableLock>,
}

impl ProductStore {
    /// Create a store over `path`. The file is created lazily on first access.
    pub fn open(path: impl Into<PathBuf>, options: StoreOptions) -> Self {
        let path = path.into();
        let write_lock = options
            .serialize_writes
            .then(|| TableLock::for_path(&path));

        Self { path, write_lock }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full table, creating a header-only file if it is missing.
    pub fn load(&self) -> CatalogResult<Vec<Product>> {
        table::ensure_exists(&self.path)?;
        table::read(&self.path)
    }

    /// Overwrite the backing file with `records` in the given order.
    pub fn save(&self, records: &[Product]) -> CatalogResult<()> {
        table::write(&self.path, records)
    }

    /// All products in file order
    pub fn list_all(&self) -> CatalogResult<Vec<Product>> {
        self.load()
    }

    /// Find one product by id
    pub fn get_by_id(&self, id: &str) -> CatalogResult<Product> {
        self.load()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(CatalogError::product_not_found)
    }

    /// Every product type, once each, in first-seen order
    pub fn distinct_types(&self) -> CatalogResult<Vec<String>> {
        let mut types: Vec<String> = Vec::new();
        for product in self.load()? {
            if !types.contains(&product.product_type) {
                types.push(product.product_type);
            }
        }
        Ok(types)
    }

    /// Append a new product.
    ///
    /// Only uniqueness is enforced here; field validation belongs to the caller.
    pub fn create(&self, product: Product) -> CatalogResult<()> {
        self.mutate(|records| {
            if records.iter().any(|p| p.id == product.id) {
                return Err(CatalogError::duplicate_id(&product.id));
            }
            if records.iter().any(|p| p.name == product.name) {
                return Err(CatalogError::duplicate_name(&product.name));
            }

            records.push(product);
            Ok(true)
        })
    }

    /// Merge `update` over the product with `id`.
    ///
    /// A missing id is not an error: nothing is written and `Ok(false)` is
    /// returned. Renaming onto another product's name is a conflict.
    pub fn update(&self, id: &str, update: &ProductUpdate) -> CatalogResult<bool> {
        let mut found = false;
        self.mutate(|records| {
            let Some(index) = records.iter().position(|p| p.id == id) else {
                return Ok(false);
            };

            if let Some(name) = &update.name {
                if records.iter().any(|p| p.id != id && &p.name == name) {
                    return Err(CatalogError::duplicate_name(name));
                }
            }

            update.apply_to(&mut records[index]);
            found = true;
            Ok(true)
        })?;
        Ok(found)
    }

    /// Remove the product with `id`.
    pub fn delete(&self, id: &str) -> CatalogResult<()> {
        self.mutate(|records| {
            if !records.iter().any(|p| p.id == id) {
                return Err(CatalogError::missing_id(id));
            }

            records.retain(|p| p.id != id);
            Ok(true)
        })
    }

    /// Run one load→mutate→save sequence.
    ///
    /// `apply` returns whether the table changed; unchanged tables are not
    /// rewritten.
    fn mutate<F>(&self, apply: F) -> CatalogResult<()>
    where
        F: FnOnce(&mut Vec<Product>) -> CatalogResult<bool>,
    {
        let _guard = self.write_lock.as_ref().map(TableLock::acquire);

        let mut records = self.load()?;
        if apply(&mut records)? {
            self.save(&records)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn temp_store(temp: &TempDir) -> ProductStore {
        ProductStore::open(temp.path().join("products.csv"), StoreOptions::default())
    }

    #[test]
    fn test_load_creates_header_only_file() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);

        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "id,type,name,price\n"
        );
    }

    #[test]
    fn test_create_appends_in_order() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);

        store.create(Product::new("b", "tool", "Saw", 20.0)).unwrap();
        store.create(Product::new("a", "tool", "Hammer", 12.5)).unwrap();

        let ids: Vec<_> = store.list_all().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_create_rejects_duplicate_id_before_name() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);
        store.create(Product::new("1", "t", "n", 10.0)).unwrap();

        let err = store.create(Product::new("1", "t", "n", 10.0)).unwrap_err();
        assert_eq!(err, CatalogError::duplicate_id("1"));

        let err = store.create(Product::new("2", "t", "n", 10.0)).unwrap_err();
        assert_eq!(err, CatalogError::duplicate_name("n"));
    }

    #[test]
    fn test_get_by_id() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);
        store.create(Product::new("1", "t", "n", 10.0)).unwrap();

        assert_eq!(store.get_by_id("1").unwrap().name, "n");
        assert!(matches!(
            store.get_by_id("2"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_in_place_keeps_position() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);
        store.create(Product::new("1", "t", "first", 1.0)).unwrap();
        store.create(Product::new("2", "t", "second", 2.0)).unwrap();
        store.create(Product::new("3", "t", "third", 3.0)).unwrap();

        let update = ProductUpdate {
            product_type: Some("u".to_string()),
            price: Some(5.0),
            ..Default::default()
        };
        assert!(store.update("2", &update).unwrap());

        let records = store.list_all().unwrap();
        assert_eq!(records[1], Product::new("2", "u", "second", 5.0));
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_update_missing_id_is_silent_noop() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);
        store.create(Product::new("1", "t", "n", 10.0)).unwrap();
        let before = fs::read(store.path()).unwrap();

        let update = ProductUpdate {
            name: Some("other".to_string()),
            ..Default::default()
        };
        assert!(!store.update("404", &update).unwrap());

        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_update_rejects_name_of_other_product() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);
        store.create(Product::new("1", "t", "a", 1.0)).unwrap();
        store.create(Product::new("2", "t", "b", 2.0)).unwrap();

        let rename = |name: &str| ProductUpdate {
            name: Some(name.to_string()),
            ..Default::default()
        };

        let err = store.update("2", &rename("a")).unwrap_err();
        assert_eq!(err, CatalogError::duplicate_name("a"));

        // Keeping its own name is not a conflict
        assert!(store.update("2", &rename("b")).unwrap());
    }

    #[test]
    fn test_delete_requires_existing_id() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);
        store.create(Product::new("1", "t", "a", 1.0)).unwrap();
        store.create(Product::new("2", "t", "b", 2.0)).unwrap();

        store.delete("1").unwrap();
        assert_eq!(store.list_all().unwrap(), vec![Product::new("2", "t", "b", 2.0)]);

        let err = store.delete("1").unwrap_err();
        assert_eq!(err, CatalogError::missing_id("1"));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_distinct_types() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);
        store.create(Product::new("1", "a", "x", 1.0)).unwrap();
        store.create(Product::new("2", "a", "y", 1.0)).unwrap();
        store.create(Product::new("3", "b", "z", 1.0)).unwrap();

        assert_eq!(store.distinct_types().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_corrupt_table_is_fatal() {
        let temp = TempDir::new().unwrap();
        let store = temp_store(&temp);
        fs::write(store.path(), "id,type,name,price\n1,t\n").unwrap();

        let err = store.list_all().unwrap_err();
        assert!(err.is_fatal());
        assert!(store.create(Product::new("2", "t", "n", 1.0)).is_err());
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "id,type,name,price\n1,t\n"
        );
    }

    #[test]
    fn test_unserialized_store_still_works() {
        let temp = TempDir::new().unwrap();
        let store = ProductStore::open(
            temp.path().join("products.csv"),
            StoreOptions {
                serialize_writes: false,
            },
        );

        store.create(Product::new("1", "t", "n", 1.0)).unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);
    }
}
