//! # Delimited Table Codec
//!
//! The backing file is a comma-separated table:
//!
//! ```text
//! id,type,name,price
//! 1,tool,Hammer,12.5
//! ```
//!
//! The header row is always present, including for an empty catalog.
//! Quoting of embedded delimiters is whatever the `csv` writer emits.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::errors::{CatalogError, CatalogResult};
use super::product::Product;

/// Column names in on-disk order
pub const HEADER: [&str; 4] = ["id", "type", "name", "price"];

/// Create the backing file (and its directory) with only a header row if it
/// does not exist.
///
/// The header is published with a hard link, which fails instead of
/// replacing a table another caller created in the meantime.
///
/// Returns true when the file was created by this call.
pub fn ensure_exists(path: &Path) -> CatalogResult<bool> {
    if path.exists() {
        return Ok(false);
    }

    let temp_path = write_temp(path, &encode(&[])?)?;
    let linked = fs::hard_link(&temp_path, path);
    let _ = fs::remove_file(&temp_path);

    match linked {
        Ok(()) => {
            sync_parent(path);
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(CatalogError::Io(format!(
            "failed to create {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Read every row of the backing file in file order.
pub fn read(path: &Path) -> CatalogResult<Vec<Product>> {
    let bytes = fs::read(path)
        .map_err(|e| CatalogError::Io(format!("failed to read {}: {}", path.display(), e)))?;
    decode(&bytes)
}

/// Replace the backing file with `records`.
pub fn write(path: &Path, records: &[Product]) -> CatalogResult<()> {
    write_atomic(path, &encode(records)?)
}

/// Parse a full table, header included.
pub fn decode(bytes: &[u8]) -> CatalogResult<Vec<Product>> {
    // A zero-length file carries no rows
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers = reader.headers()?;
    if !headers.iter().eq(HEADER.iter().copied()) {
        return Err(CatalogError::Corrupt(format!(
            "unexpected header row: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<Product>() {
        let product = row?;
        if !product.price.is_finite() {
            return Err(CatalogError::Corrupt(format!(
                "non-finite price for product {}",
                product.id
            )));
        }
        records.push(product);
    }

    Ok(records)
}

/// Serialize a full table, header included.
pub fn encode(records: &[Product]) -> CatalogResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for product in records {
        writer.serialize(product)?;
    }

    writer
        .into_inner()
        .map_err(|e| CatalogError::Io(e.error().to_string()))
}

/// Write `content` next to `path` then rename it into place.
///
/// A crash mid-write leaves either the previous table or the new one.
fn write_atomic(path: &Path, content: &[u8]) -> CatalogResult<()> {
    let temp_path = write_temp(path, content)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(CatalogError::Io(format!(
            "failed to replace {}: {}",
            path.display(),
            e
        )));
    }

    sync_parent(path);
    Ok(())
}

/// Write and fsync `content` to a fresh sibling of `path`.
fn write_temp(path: &Path, content: &[u8]) -> CatalogResult<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                CatalogError::Io(format!(
                    "failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let temp_path = temp_path_for(path);

    let result = (|| -> CatalogResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .map_err(|e| CatalogError::Io(format!("failed to create temp table file: {}", e)))?;

        file.write_all(content)
            .map_err(|e| CatalogError::Io(format!("failed to write table: {}", e)))?;

        file.sync_all()
            .map_err(|e| CatalogError::Io(format!("failed to fsync table: {}", e)))
    })();

    match result {
        Ok(()) => Ok(temp_path),
        Err(e) => {
            let _ = fs::remove_file(&temp_path);
            Err(e)
        }
    }
}

fn sync_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_table_keeps_header() {
        let bytes = encode(&[]).unwrap();
        assert_eq!(bytes, b"id,type,name,price\n");
    }

    #[test]
    fn test_ensure_exists_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data/nested/products.csv");

        assert!(ensure_exists(&path).unwrap());
        assert!(!ensure_exists(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "id,type,name,price\n");
    }

    #[test]
    fn test_ensure_exists_never_replaces_table() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("products.csv");
        write(&path, &[Product::new("1", "t", "n", 1.0)]).unwrap();

        assert!(!ensure_exists(&path).unwrap());
        assert_eq!(read(&path).unwrap().len(), 1);

        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_then_read_preserves_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("products.csv");
        let records = vec![
            Product::new("2", "tool", "Saw", 20.0),
            Product::new("1", "tool", "Hammer", 12.5),
            Product::new("3", "garden", "Rake, steel", 0.0),
        ];

        write(&path, &records).unwrap();

        assert_eq!(read(&path).unwrap(), records);
    }

    #[test]
    fn test_integer_prices_parse() {
        let rows = decode(b"id,type,name,price\n1,t,n,10\n").unwrap();
        assert_eq!(rows, vec![Product::new("1", "t", "n", 10.0)]);
    }

    #[test]
    fn test_wrong_column_count_is_corrupt() {
        let result = decode(b"id,type,name,price\n1,t,n\n");
        assert!(matches!(result, Err(CatalogError::Corrupt(_))));
    }

    #[test]
    fn test_unparseable_price_is_corrupt() {
        let result = decode(b"id,type,name,price\n1,t,n,cheap\n");
        assert!(matches!(result, Err(CatalogError::Corrupt(_))));
    }

    #[test]
    fn test_unexpected_header_is_corrupt() {
        let result = decode(b"name,price\nn,1\n");
        assert!(matches!(result, Err(CatalogError::Corrupt(_))));
    }

    #[test]
    fn test_zero_length_file_is_empty_table() {
        assert!(decode(b"").unwrap().is_empty());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("products.csv");

        write(&path, &[Product::new("1", "t", "n", 1.0)]).unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
