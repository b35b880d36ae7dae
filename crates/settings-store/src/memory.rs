//! In-memory store with optional JSON file persistence.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, trace, warn};

use crate::{Error, Handler, SettingStore, Snapshot, SubscriptionId, Value};

/// Default [`SettingStore`]: values in memory, optionally mirrored to a JSON file.
#[derive(Default)]
pub struct MemoryStore {
    /// Current values.
    values: RefCell<Snapshot>,
    /// Handlers per key, in installation order.
    subscribers: RefCell<BTreeMap<String, Vec<(SubscriptionId, Handler)>>>,
    /// Next subscription id.
    next_id: Cell<u64>,
    /// File rewritten after every `set`, when present.
    path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty, unpersisted store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unpersisted store seeded with `values`.
    pub fn with_values(values: Snapshot) -> Self {
        Self {
            values: RefCell::new(values),
            ..Self::default()
        }
    }

    /// Open a store persisted at `path`. A missing file yields an empty store.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let values = match fs::read_to_string(path) {
            Ok(text) => Self::parse(path, &text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Snapshot::new(),
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        debug!(path = %path.display(), keys = values.len(), "store_opened");
        Ok(Self::from_parts(values, Some(path.to_path_buf())))
    }

    /// Parse persisted JSON text for `path`.
    pub fn parse(path: &Path, text: &str) -> Result<Snapshot, Error> {
        if text.trim().is_empty() {
            return Ok(Snapshot::new());
        }
        serde_json::from_str(text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build a store from already-loaded values and an optional persistence path.
    pub fn from_parts(values: Snapshot, path: Option<PathBuf>) -> Self {
        Self {
            values: RefCell::new(values),
            path,
            ..Self::default()
        }
    }

    /// Persistence path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of live subscriptions across all keys.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().values().map(Vec::len).sum()
    }

    /// Whether `id` is still installed.
    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscribers
            .borrow()
            .values()
            .any(|subs| subs.iter().any(|(sid, _)| *sid == id))
    }

    /// Rewrite the backing file. Failures are logged, never returned.
    fn persist(&self) {
        let Some(path) = &self.path else { return };
        let text = match serde_json::to_string_pretty(&*self.values.borrow()) {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "store_serialize_failed");
                return;
            }
        };
        if let Err(e) = fs::write(path, text) {
            warn!(path = %path.display(), error = %e, "store_persist_failed");
        }
    }

    /// Deliver `value` to each handler in order, skipping any that are mid-call or were
    /// removed by an earlier handler.
    fn notify(&self, key: &str, value: &Value, handlers: Vec<(SubscriptionId, Handler)>) {
        for (id, h) in handlers {
            if !self.is_subscribed(id) {
                continue;
            }
            match h.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(value),
                Err(_) => trace!(key, id = id.0, "skip_reentrant_notify"),
            }
        }
    }
}

impl SettingStore for MemoryStore {
    fn get(&self, key: &str) -> Value {
        self.values.borrow().get(key).cloned().unwrap_or_default()
    }

    fn set(&self, key: &str, value: Value) {
        trace!(key, value = %value, "store_set");
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        self.persist();
        let handlers = self
            .subscribers
            .borrow()
            .get(key)
            .cloned()
            .unwrap_or_default();
        self.notify(key, &value, handlers);
    }

    fn subscribe(&self, key: &str, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers
            .borrow_mut()
            .entry(key.to_string())
            .or_default()
            .push((id, handler.clone()));
        let current = self.get(key);
        self.notify(key, &current, vec![(id, handler)]);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscribers.borrow_mut();
        for list in subs.values_mut() {
            list.retain(|(sid, _)| *sid != id);
        }
        subs.retain(|_, list| !list.is_empty());
    }

    fn snapshot(&self) -> Snapshot {
        self.values.borrow().clone()
    }
}
