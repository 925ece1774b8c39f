use super::RecordStorage;
use crate::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared in-memory store; clones see the same records.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    records: Arc<Mutex<HashMap<String, String>>>,
    write_count: Arc<Mutex<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, key: &str, value: &str) -> Self {
        self.records
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn get_write_count(&self) -> usize {
        *self.write_count.lock().unwrap()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.lock().unwrap().contains_key(key)
    }
}

impl RecordStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.lock().unwrap().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        *self.write_count.lock().unwrap() += 1;
        self.records
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.records.lock().unwrap().remove(key);
        Ok(())
    }
}
