//! Configuration store
//!
//! Every tunable of the updater (default insertion, effect timings, HTTP timeouts) lives here as a
//! typed [`Setting`]. Defaults are compiled in from `settings.json`; a [`StorageAdapter`] can
//! override them (in memory, or persisted to a json file).
mod errors;
pub mod settings;
pub mod storage;

pub use crate::errors::Error;
use crate::settings::{Setting, SettingInfo};
use crate::storage::MemoryStorageAdapter;
use ajaxkit_shared::types::Result;
use lazy_static::lazy_static;
use log::warn;
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde_derive::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::mem;
use std::str::FromStr;
use wildmatch::WildMatch;

/// Default settings, embedded so the binary does not depend on files next to it.
const SETTINGS_JSON: &str = include_str!("./settings.json");

/// `StorageAdapter` is the interface for storing and retrieving settings. Adapters must be
/// `Send + Sync` as the store is global.
pub trait StorageAdapter: Send + Sync {
    /// Retrieves a setting from the storage
    fn get(&self, key: &str) -> Option<Setting>;

    /// Stores a given setting. Takes `&self`; adapters use interior mutability.
    fn set(&self, key: &str, value: Setting);

    /// Retrieves all the settings in the storage in one go. Used for preloading the store.
    fn all(&self) -> Result<HashMap<String, Setting>>;
}

lazy_static! {
    // Starts out with a memory adapter: settings live for the process only.
    static ref CONFIG_STORE: RwLock<ConfigStore> = RwLock::new(ConfigStore::default());
}

/// Returns a read guard on the global config store: `config_store().get("effects.blink.duration_ms")`
pub fn config_store() -> RwLockReadGuard<'static, ConfigStore> {
    CONFIG_STORE.read()
}

pub fn config_store_write() -> RwLockWriteGuard<'static, ConfigStore> {
    CONFIG_STORE.write()
}

/// Shorthands for reading and writing the global store:
///
/// ```ignore
/// let ms = config!(uint "effects.blink.duration_ms");
/// config_set!(uint "effects.blink.duration_ms", 300);
/// ```
///
/// Unknown keys read as the type's empty value.
#[macro_export]
macro_rules! config {
    (string $key:expr) => {
        $crate::config_store().get($key).map(|s| s.to_string()).unwrap_or_default()
    };
    (bool $key:expr) => {
        $crate::config_store().get($key).map(|s| s.to_bool()).unwrap_or(false)
    };
    (uint $key:expr) => {
        $crate::config_store().get($key).map(|s| s.to_uint()).unwrap_or(0)
    };
    (sint $key:expr) => {
        $crate::config_store().get($key).map(|s| s.to_sint()).unwrap_or(0)
    };
    (map $key:expr) => {
        $crate::config_store().get($key).map(|s| s.to_map()).unwrap_or_default()
    };
}

#[macro_export]
macro_rules! config_set {
    (string $key:expr, $val:expr) => {
        $crate::config_store().set($key, $crate::settings::Setting::String($val))
    };
    (bool $key:expr, $val:expr) => {
        $crate::config_store().set($key, $crate::settings::Setting::Bool($val))
    };
    (uint $key:expr, $val:expr) => {
        $crate::config_store().set($key, $crate::settings::Setting::UInt($val))
    };
    (sint $key:expr, $val:expr) => {
        $crate::config_store().set($key, $crate::settings::Setting::SInt($val))
    };
    (map $key:expr, $val:expr) => {
        $crate::config_store().set($key, $crate::settings::Setting::Map($val))
    };
}

/// `JsonEntry` is used for parsing the settings.json file
#[derive(Debug, Deserialize)]
struct JsonEntry {
    key: String,
    #[serde(rename = "type")]
    _entry_type: String,
    default: String,
    description: String,
}

/// Configuration storage: every known setting with its current value and description
pub struct ConfigStore {
    /// Current values. Behind a mutex so `get()` can cache values loaded from storage.
    settings: Mutex<HashMap<String, Setting>>,
    /// Descriptions, default values and type information
    settings_info: HashMap<String, SettingInfo>,
    /// Keys of all settings, in declaration order
    setting_keys: Vec<String>,
    /// The storage adapter used for persisting and loading keys
    storage: Box<dyn StorageAdapter>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        let mut store = Self {
            settings: Mutex::new(HashMap::new()),
            settings_info: HashMap::new(),
            setting_keys: Vec::new(),
            storage: Box::new(MemoryStorageAdapter::new()),
        };

        if let Err(err) = store.populate_default_settings() {
            warn!("config: cannot load default settings: {err}");
        }

        store
    }
}

impl ConfigStore {
    /// Sets a new storage engine. Settings found in the storage overwrite the current values.
    pub fn set_storage(&mut self, storage: Box<dyn StorageAdapter>) {
        self.storage = storage;

        match self.storage.all() {
            Ok(all_settings) => self.settings.lock().extend(all_settings),
            Err(err) => warn!("config: cannot read settings from storage: {err}"),
        }
    }

    /// Returns true when the store knows about the given key
    pub fn has(&self, key: &str) -> bool {
        self.settings.lock().contains_key(key)
    }

    /// Returns the keys matching the given search string (`?` and `*` are wildcards)
    pub fn find(&self, search: &str) -> Vec<String> {
        let search = WildMatch::new(search);

        self.setting_keys
            .iter()
            .filter(|key| search.matches(key))
            .cloned()
            .collect()
    }

    /// Retrieves information about the given key, or returns None when key is unknown
    pub fn get_info(&self, key: &str) -> Option<SettingInfo> {
        self.settings_info.get(key).cloned()
    }

    /// Returns the setting with the given key: the current value, else the value from storage,
    /// else the default. Unknown keys return `None`.
    pub fn get(&self, key: &str) -> Option<Setting> {
        if let Some(setting) = self.settings.lock().get(key) {
            return Some(setting.clone());
        }

        if let Some(setting) = self.storage.get(key) {
            self.settings.lock().insert(key.to_string(), setting.clone());
            return Some(setting);
        }

        if let Some(info) = self.settings_info.get(key) {
            return Some(info.default.clone());
        }

        warn!("config: Setting {key} is not known");
        None
    }

    /// Sets the given setting and persists it to the storage. Unknown keys and values of another
    /// type than the default are refused with a warning.
    pub fn set(&self, key: &str, value: Setting) {
        let Some(info) = self.settings_info.get(key) else {
            warn!("config: Setting {key} is not known");
            return;
        };

        if mem::discriminant(&info.default) != mem::discriminant(&value) {
            warn!("config: Setting {key} is of different type than setting expects");
            return;
        }

        self.settings.lock().insert(key.to_owned(), value.clone());
        self.storage.set(key, value);
    }

    /// Populates the store from the embedded settings.json file
    fn populate_default_settings(&mut self) -> Result<()> {
        let Value::Object(sections) = serde_json::from_str::<Value>(SETTINGS_JSON)? else {
            return Err(Error::Config("settings.json must be an object".into()).into());
        };

        for (section_prefix, section_entries) in sections {
            let entries: Vec<JsonEntry> = serde_json::from_value(section_entries)?;

            for entry in entries {
                let key = format!("{}.{}", section_prefix, entry.key);

                let info = SettingInfo {
                    key: key.clone(),
                    description: entry.description,
                    default: Setting::from_str(&entry.default)?,
                };

                self.setting_keys.push(key.clone());
                self.settings.lock().insert(key.clone(), info.default.clone());
                self.settings_info.insert(key, info);
            }
        }

        Ok(())
    }
}
