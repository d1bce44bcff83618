use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use super::loader::load_file;
use super::model::DataTable;

/// Memoizes loaded tables per path so navigating between pages, or opening
/// the same file again, never re-reads it.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: HashMap<PathBuf, Arc<DataTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on first use.
    /// Failed loads are not cached.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<DataTable>> {
        let key = normalize(path);
        if let Some(table) = self.tables.get(&key) {
            log::debug!("Cache hit for {}", key.display());
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_file(path)?);
        self.tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Drop the cached entry so the next access re-reads the file.
    pub fn invalidate(&mut self, path: &Path) {
        self.tables.remove(&normalize(path));
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_load_is_memoized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.csv");
        std::fs::write(&path, "Company_Name,Price\nHonda,4.5\n").unwrap();

        let mut cache = TableCache::new();
        let first = cache.get_or_load(&path).unwrap();

        // The cached copy survives the file changing on disk.
        std::fs::write(&path, "Company_Name,Price\nHonda,4.5\nTata,2.0\n").unwrap();
        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);

        cache.invalidate(&path);
        let third = cache.get_or_load(&path).unwrap();
        assert_eq!(third.len(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let mut cache = TableCache::new();
        assert!(cache.get_or_load(&path).is_err());
        assert!(cache.is_empty());
    }
}
