//! Observable theme preference store.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::ThemePreference;
use crate::error::Result;

/// Key under which the preference is persisted.
pub const PREFERENCE_KEY: &str = "theme";

/// Shortest reload period; `tokio::time::interval` rejects zero.
pub const MIN_RELOAD_INTERVAL: Duration = Duration::from_millis(1);

/// A string key-value store holding the persisted preference.
pub trait PreferenceBackend: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process backend. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl PreferenceBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Backend persisting a JSON object of string values to a file.
///
/// A missing file reads as empty. Several processes may point at the same
/// file; each picks up the others' writes on [`ThemeStore::reload`].
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(&values)?)?;
        Ok(())
    }
}

/// Theme preference store with subscribe/notify semantics.
///
/// Subscribers are notified only when the preference actually changes.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    inner: Arc<ThemeStoreInner>,
}

#[derive(Debug)]
struct ThemeStoreInner {
    backend: Box<dyn PreferenceBackend>,
    tx: watch::Sender<ThemePreference>,
}

impl ThemeStore {
    /// Create a store, loading the initial preference from the backend.
    pub fn new(backend: impl PreferenceBackend + 'static) -> Result<Self> {
        let stored = backend.get(PREFERENCE_KEY)?;
        let initial = ThemePreference::from_stored(stored.as_deref());
        let (tx, _rx) = watch::channel(initial);
        Ok(Self {
            inner: Arc::new(ThemeStoreInner {
                backend: Box::new(backend),
                tx,
            }),
        })
    }

    /// Current preference.
    #[must_use]
    pub fn current(&self) -> ThemePreference {
        *self.inner.tx.borrow()
    }

    /// Persist a new preference and notify subscribers if it changed.
    pub fn set(&self, preference: ThemePreference) -> Result<()> {
        self.inner
            .backend
            .set(PREFERENCE_KEY, preference.as_str())?;
        if self.publish(preference) {
            info!(name: "theme.preference.changed", preference = %preference, "Theme preference changed");
        }
        Ok(())
    }

    /// Subscribe to preference changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ThemePreference> {
        self.inner.tx.subscribe()
    }

    /// Re-read the backend, notifying subscribers if another writer changed
    /// the stored value. Returns whether a change was observed.
    pub fn reload(&self) -> Result<bool> {
        let stored = self.inner.backend.get(PREFERENCE_KEY)?;
        let preference = ThemePreference::from_stored(stored.as_deref());
        let changed = self.publish(preference);
        if changed {
            debug!(name: "theme.preference.reloaded", preference = %preference, "Picked up external preference change");
        }
        Ok(changed)
    }

    /// Run [`reload`](Self::reload) every `interval` until `cancel` fires.
    ///
    /// Intervals below [`MIN_RELOAD_INTERVAL`] are raised to it.
    pub fn spawn_reload(&self, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let store = self.clone();
        let interval = interval.max(MIN_RELOAD_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = store.reload() {
                            warn!(name: "theme.preference.reload_failed", error = %e, "Failed to reload theme preference");
                        }
                    }
                }
            }
        })
    }

    fn publish(&self, preference: ThemePreference) -> bool {
        self.inner.tx.send_if_modified(|current| {
            if *current == preference {
                false
            } else {
                *current = preference;
                true
            }
        })
    }
}
