use super::{scan_map, ScanResult, StoreError, WorldState, WriteSet};
use std::collections::BTreeMap;

/// In-memory world state.
///
/// Nothing survives the process. Used by tests and `MEDLEDGER_IN_MEMORY`.
#[derive(Debug, Default)]
pub struct MemoryWorldState {
    data: BTreeMap<String, Vec<u8>>,
}

impl MemoryWorldState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorldState for MemoryWorldState {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn range(&self, start_key: &str, end_key: &str) -> Result<ScanResult, StoreError> {
        Ok(scan_map(&self.data, start_key, end_key))
    }

    fn atomic_batch_write(&mut self, writes: WriteSet) -> Result<(), StoreError> {
        self.data.extend(writes);
        Ok(())
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_world_state_batch_write() {
        let mut state = MemoryWorldState::new();

        let mut writes = WriteSet::new();
        writes.put("MEDICINE1", b"b".to_vec());
        writes.put("MEDICINE0", b"a".to_vec());
        state.atomic_batch_write(writes).unwrap();

        assert_eq!(state.get("MEDICINE0").unwrap(), Some(b"a".to_vec()));
        assert_eq!(state.len(), 2);
        assert_eq!(state.get("MEDICINE2").unwrap(), None);
    }

    #[test]
    fn test_range_bounds() {
        let mut state = MemoryWorldState::new();
        let mut writes = WriteSet::new();
        for key in ["a", "b", "c"] {
            writes.put(key, key.as_bytes().to_vec());
        }
        state.atomic_batch_write(writes).unwrap();

        let keys: Vec<String> = state.range("b", "").unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "c"]);

        let all = state.range("", "").unwrap();
        assert_eq!(all.len(), 3);
    }
}
