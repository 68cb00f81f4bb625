use crate::settings::Setting;
use crate::StorageAdapter;
use ajaxkit_shared::types::Result;
use log::warn;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Persists settings to a flat json object (`{"effects.blink.duration_ms": "u:600"}`). The file
/// is rewritten on every `set`.
pub struct JsonStorageAdapter {
    path: PathBuf,
    elements: Mutex<HashMap<String, Setting>>,
}

impl JsonStorageAdapter {
    /// Opens the json file at `path`, creating an empty one when it does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            fs::write(&path, "{}")?;
        } else if !path.is_file() {
            anyhow::bail!("{} is not a regular file", path.display());
        }

        let adapter = JsonStorageAdapter {
            elements: Mutex::new(Self::read_file(&path)?),
            path,
        };

        Ok(adapter)
    }

    /// Reads the whole json file. Entries that do not parse as a setting are skipped.
    fn read_file(path: &Path) -> Result<HashMap<String, Setting>> {
        let buf = fs::read_to_string(path)?;

        let mut elements = HashMap::new();
        if let Value::Object(settings) = serde_json::from_str(&buf)? {
            for (key, value) in settings {
                match serde_json::from_value(value) {
                    Ok(setting) => {
                        elements.insert(key, setting);
                    }
                    Err(err) => {
                        warn!("problem reading setting {key} from json: {err}");
                    }
                }
            }
        }

        Ok(elements)
    }

    /// Writes the settings back, sorted by key so the file diffs nicely
    fn write_file(&self, elements: &HashMap<String, Setting>) -> Result<()> {
        let sorted: BTreeMap<_, _> = elements.iter().collect();
        let json = serde_json::to_string_pretty(&sorted)?;

        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl TryFrom<&String> for JsonStorageAdapter {
    type Error = anyhow::Error;

    fn try_from(path: &String) -> Result<Self> {
        Self::open(path)
    }
}

impl StorageAdapter for JsonStorageAdapter {
    fn get(&self, key: &str) -> Option<Setting> {
        self.elements.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Setting) {
        let mut lock = self.elements.lock();
        lock.insert(key.to_owned(), value);

        if let Err(err) = self.write_file(&lock) {
            warn!("cannot persist settings to {}: {err}", self.path.display());
        }
    }

    fn all(&self) -> Result<HashMap<String, Setting>> {
        Ok(self.elements.lock().clone())
    }
}
