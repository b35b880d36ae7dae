//! Test support utilities for settings-engine unit and integration tests.
//! These helpers are public to avoid dead_code warnings and are lightweight.

use std::{cell::Cell, rc::Rc};

use settings_store::{Handler, MemoryStore, SettingStore, Snapshot, SubscriptionId, Value};

use crate::{DefaultTable, Result, Screen};

/// A [`MemoryStore`] that counts reads and writes.
#[derive(Default)]
pub struct RecordingStore {
    /// Backing store.
    inner: MemoryStore,
    /// `get` and `snapshot` calls.
    reads: Cell<usize>,
    /// `set` calls.
    writes: Cell<usize>,
}

impl RecordingStore {
    /// Recording store seeded with `values`.
    pub fn with_values(values: Snapshot) -> Self {
        Self {
            inner: MemoryStore::with_values(values),
            ..Self::default()
        }
    }

    /// Reads so far.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Writes so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Reset both counters.
    pub fn reset_counts(&self) {
        self.reads.set(0);
        self.writes.set(0);
    }

    /// Handlers currently installed.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriber_count()
    }
}

impl SettingStore for RecordingStore {
    fn get(&self, key: &str) -> Value {
        self.reads.set(self.reads.get() + 1);
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: Value) {
        self.writes.set(self.writes.get() + 1);
        self.inner.set(key, value);
    }

    fn subscribe(&self, key: &str, handler: Handler) -> SubscriptionId {
        self.inner.subscribe(key, handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.unsubscribe(id);
    }

    fn snapshot(&self) -> Snapshot {
        self.reads.set(self.reads.get() + 1);
        self.inner.snapshot()
    }
}

/// Bind the built-in cost control screen over `store`, with the same defaults the binary
/// uses.
pub fn cost_control_screen(store: Rc<dyn SettingStore>) -> Result<Screen> {
    let decl = config::cost_control_screen()?;
    Screen::from_decl(store, DefaultTable::for_screen(&decl), &decl)
}
