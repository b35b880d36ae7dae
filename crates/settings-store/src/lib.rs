//! Persisted settings with per-key change subscriptions.
//!
//! The settings screen treats this crate as its source of truth:
//! - [`SettingStore`]: the `get`/`set`/`subscribe` contract the binding engine consumes
//! - [`Subscription`]: RAII guard that unsubscribes on drop
//! - [`MemoryStore`]: the default implementation, optionally mirrored to a JSON file
//!
//! Everything here is single-threaded; handlers run synchronously inside `set`.

mod memory;
mod store;
mod value;

use std::{io, path::PathBuf};

use thiserror::Error;

pub use memory::MemoryStore;
pub use store::{Handler, SettingStore, Subscription, SubscriptionId, handler, subscribe};
pub use value::{Snapshot, Value};

/// Errors raised while loading a persisted store.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing file exists but could not be read.
    #[error("failed to read settings from {}: {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The backing file is not a JSON object of setting values.
    #[error("invalid settings file {}: {source}", .path.display())]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
}
