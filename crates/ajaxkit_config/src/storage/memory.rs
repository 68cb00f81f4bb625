use crate::settings::Setting;
use crate::StorageAdapter;
use ajaxkit_shared::types::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Keeps settings for the lifetime of the process only. This is what the store starts out with.
#[derive(Default)]
pub struct MemoryStorageAdapter {
    settings: RwLock<HashMap<String, Setting>>,
}

impl MemoryStorageAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromIterator<(String, Setting)> for MemoryStorageAdapter {
    fn from_iter<I: IntoIterator<Item = (String, Setting)>>(iter: I) -> Self {
        Self {
            settings: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl StorageAdapter for MemoryStorageAdapter {
    fn get(&self, key: &str) -> Option<Setting> {
        self.settings.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Setting) {
        self.settings.write().insert(key.to_string(), value);
    }

    fn all(&self) -> Result<HashMap<String, Setting>> {
        Ok(self.settings.read().clone())
    }
}
