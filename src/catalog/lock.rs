//! # Table Write Lock
//!
//! One process-wide mutex per backing file. Every store handle pointing at
//! the same file shares the same mutex, so concurrent load→mutate→save
//! sequences cannot interleave and lose an update.
//!
//! Different processes writing the same file are not covered.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

static TABLE_LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

/// Handle to the shared write lock of one backing file
#[derive(Debug, Clone)]
pub struct TableLock {
    key: PathBuf,
    inner: Arc<Mutex<()>>,
}

impl TableLock {
    /// Look up (or register) the lock for `path`.
    pub fn for_path(path: &Path) -> Self {
        let key = lock_key(path);
        let registry = TABLE_LOCKS.get_or_init(|| Mutex::new(HashMap::new()));
        let mut locks = registry.lock().unwrap_or_else(PoisonError::into_inner);
        let inner = locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        Self { key, inner }
    }

    /// Block until this handle holds the lock.
    ///
    /// A panic inside a previous critical section does not wedge the table:
    /// the file on disk is always a complete table, so the poison is dropped.
    pub fn acquire(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Normalized path this lock is keyed by
    pub fn key(&self) -> &Path {
        &self.key
    }
}

fn lock_key(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    // Resolve symlinks and `..` through the deepest ancestor that exists
    // now. Components below it cannot be links yet, so the key does not
    // change once the table's directory is created.
    for ancestor in absolute.ancestors().skip(1) {
        if let Ok(resolved) = ancestor.canonicalize() {
            if let Ok(rest) = absolute.strip_prefix(ancestor) {
                return resolved.join(rest);
            }
        }
    }

    absolute
}
