//! # World State
//!
//! Committed key-value state behind every transaction context.
//!
//! - `memory.rs` - `MemoryWorldState` for tests and throwaway runs
//! - `file.rs` - `FileBackedWorldState`, persisted to a single file

mod file;
mod memory;

pub use file::FileBackedWorldState;
pub use memory::MemoryWorldState;

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Entries returned by a range read, in key order.
pub type ScanResult = Vec<(String, Vec<u8>)>;

/// Storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("entry of {len} bytes is too large for {}", .path.display())]
    EntryTooLarge { path: PathBuf, len: usize },

    #[error("corrupt world state file {} at byte {offset}", .path.display())]
    Corrupt { path: PathBuf, offset: usize },
}

/// Committed world state.
///
/// Keys are ordered lexicographically; range reads follow that order.
pub trait WorldState: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Entries with `start_key <= key < end_key`; empty bounds are open.
    fn range(&self, start_key: &str, end_key: &str) -> Result<ScanResult, StoreError>;

    /// Apply every write in `writes`, or none of them.
    fn atomic_batch_write(&mut self, writes: WriteSet) -> Result<(), StoreError>;

    /// Number of stored keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writes buffered by one transaction. The last write to a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    writes: BTreeMap<String, Vec<u8>>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.writes.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.writes.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.writes.keys().map(String::as_str)
    }
}

impl IntoIterator for WriteSet {
    type Item = (String, Vec<u8>);
    type IntoIter = btree_map::IntoIter<String, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}

pub(crate) fn scan_map(
    data: &BTreeMap<String, Vec<u8>>,
    start_key: &str,
    end_key: &str,
) -> ScanResult {
    data.iter()
        .filter(|(key, _)| medicine_contract::ports::outbound::key_in_range(key, start_key, end_key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_set_last_write_wins() {
        let mut writes = WriteSet::new();
        writes.put("a", b"1".to_vec());
        writes.put("a", b"2".to_vec());
        writes.put("b", b"3".to_vec());

        assert_eq!(writes.len(), 2);
        assert_eq!(writes.get("a"), Some(&b"2"[..]));
        assert_eq!(writes.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
