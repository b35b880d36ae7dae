//! The store contract and its RAII subscription guard.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use crate::{Snapshot, Value};

/// Callback invoked with a key's value on subscription and on every later change.
pub type Handler = Rc<RefCell<dyn FnMut(&Value)>>;

/// Wrap a closure as a [`Handler`].
pub fn handler(f: impl FnMut(&Value) + 'static) -> Handler {
    Rc::new(RefCell::new(f))
}

/// Identifier of one installed subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Persisted key/value settings with per-key change notification.
///
/// Implementations are single-threaded and use interior mutability: handlers may read
/// the store, and may write other keys, while being notified.
pub trait SettingStore {
    /// Current value for `key`, or [`Value::Null`] when unset.
    fn get(&self, key: &str) -> Value;

    /// Store `value` under `key` and notify that key's subscribers in installation order.
    ///
    /// Writing an unchanged value still notifies. Persistence failures are the store's
    /// concern and never surface here.
    fn set(&self, key: &str, value: Value);

    /// Install `handler` for `key`. The handler is invoked once immediately with the
    /// current value.
    fn subscribe(&self, key: &str, handler: Handler) -> SubscriptionId;

    /// Remove a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Copy of every stored value.
    fn snapshot(&self) -> Snapshot;
}

/// Subscribe through a shared store handle and get a guard that unsubscribes on drop.
pub fn subscribe(store: &Rc<dyn SettingStore>, key: &str, handler: Handler) -> Subscription {
    let id = store.subscribe(key, handler);
    Subscription {
        store: Rc::downgrade(store),
        key: key.to_string(),
        id,
    }
}

/// Live subscription; dropping it releases the handler.
///
/// Holds only a weak reference so an outstanding guard never keeps the store alive.
pub struct Subscription {
    /// Store the handler was installed on.
    store: Weak<dyn SettingStore>,
    /// Subscribed key, kept for diagnostics.
    key: String,
    /// Store-assigned id.
    id: SubscriptionId,
}

impl Subscription {
    /// The subscribed key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.unsubscribe(self.id);
        }
    }
}
