//! Durable per-key values, mirrored as JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Directory of `<key>.json` files
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Store { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }

    /// Raw stored JSON for `key`, if any
    pub fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.path(key), json)?;
        Ok(())
    }
}

type Subscriber<T> = Box<dyn FnMut(&T, Option<&T>)>;

/// A value that writes itself to the store whenever it changes
pub struct Persistable<T> {
    store: Store,
    key: String,
    value: T,
    subscribers: Vec<Subscriber<T>>,
}

impl<T: Serialize + DeserializeOwned + Clone> Persistable<T> {
    /// Load `key` from the store. Missing or unreadable values fall back to
    /// `default`.
    pub fn load(store: Store, key: &str, default: T) -> Self {
        let value = match store.read(key) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => value,
                Err(e) => {
                    error!("error parsing stored value for {key}: {e}");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                error!("error reading stored value for {key}: {e}");
                default
            }
        };

        Persistable {
            store,
            key: key.to_string(),
            value,
            subscribers: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store a new value and notify subscribers with `(current, previous)`
    pub fn set(&mut self, value: T) -> Result<()> {
        self.store.write(&self.key, &value)?;
        let previous = std::mem::replace(&mut self.value, value);
        for subscriber in &mut self.subscribers {
            subscriber(&self.value, Some(&previous));
        }
        Ok(())
    }

    pub fn update(&mut self, f: impl FnOnce(&mut T)) -> Result<()> {
        let mut value = self.value.clone();
        f(&mut value);
        self.set(value)
    }

    /// Register a callback. It runs right away with the current value.
    pub fn subscribe(&mut self, mut f: impl FnMut(&T, Option<&T>) + 'static) {
        f(&self.value, None);
        self.subscribers.push(Box::new(f));
    }
}
