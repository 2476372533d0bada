use super::{scan_map, ScanResult, StoreError, WorldState, WriteSet};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed world state.
///
/// The whole map is held in memory and rewritten to disk on every batch.
/// Format: `[key_len:u32 LE][key utf-8][value_len:u32 LE][value]...`
pub struct FileBackedWorldState {
    data: BTreeMap<String, Vec<u8>>,
    path: PathBuf,
}

impl FileBackedWorldState {
    /// Open the store at `path`, loading existing contents if the file exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let data = Self::load_from_file(&path)?;
            info!(path = %path.display(), keys = data.len(), "Loaded world state");
            data
        } else {
            info!(path = %path.display(), "No existing world state, starting empty");
            BTreeMap::new()
        };

        Ok(Self { data, path })
    }

    fn load_from_file(path: &Path) -> Result<BTreeMap<String, Vec<u8>>, StoreError> {
        let io_error = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut bytes = Vec::new();
        std::fs::File::open(path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .map_err(io_error)?;

        let mut data = BTreeMap::new();
        let mut cursor = 0;

        while cursor < bytes.len() {
            let key = read_chunk(&bytes, &mut cursor).ok_or_else(|| corrupt(path, cursor))?;
            let key = String::from_utf8(key.to_vec()).map_err(|_| corrupt(path, cursor))?;
            let value = read_chunk(&bytes, &mut cursor).ok_or_else(|| corrupt(path, cursor))?;
            data.insert(key, value.to_vec());
        }

        Ok(data)
    }

    fn save_to_file(&self, data: &BTreeMap<String, Vec<u8>>) -> Result<(), StoreError> {
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_error)?;
            }
        }

        let mut bytes = Vec::new();
        for (key, value) in data {
            write_chunk(&mut bytes, key.as_bytes(), &self.path)?;
            write_chunk(&mut bytes, value, &self.path)?;
        }

        // Write via temp file so a crash never leaves a half-written store.
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_error)?;

        Ok(())
    }
}

fn write_chunk(bytes: &mut Vec<u8>, chunk: &[u8], path: &Path) -> Result<(), StoreError> {
    bytes.extend_from_slice(&length_prefix(chunk.len(), path)?);
    bytes.extend_from_slice(chunk);
    Ok(())
}

fn length_prefix(len: usize, path: &Path) -> Result<[u8; 4], StoreError> {
    u32::try_from(len)
        .map(u32::to_le_bytes)
        .map_err(|_| StoreError::EntryTooLarge {
            path: path.to_path_buf(),
            len,
        })
}

fn read_chunk<'b>(bytes: &'b [u8], cursor: &mut usize) -> Option<&'b [u8]> {
    let len_end = cursor.checked_add(4)?;
    let len = u32::from_le_bytes(bytes.get(*cursor..len_end)?.try_into().ok()?) as usize;
    let end = len_end.checked_add(len)?;
    let chunk = bytes.get(len_end..end)?;
    *cursor = end;
    Some(chunk)
}

fn corrupt(path: &Path, offset: usize) -> StoreError {
    StoreError::Corrupt {
        path: path.to_path_buf(),
        offset,
    }
}

impl WorldState for FileBackedWorldState {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn range(&self, start_key: &str, end_key: &str) -> Result<ScanResult, StoreError> {
        Ok(scan_map(&self.data, start_key, end_key))
    }

    fn atomic_batch_write(&mut self, writes: WriteSet) -> Result<(), StoreError> {
        let count = writes.len();
        let mut next = self.data.clone();
        next.extend(writes);

        // Memory is only updated once the file write has succeeded.
        self.save_to_file(&next)?;
        self.data = next;

        debug!(writes = count, keys = self.data.len(), "World state persisted");
        Ok(())
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
