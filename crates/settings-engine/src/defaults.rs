//! Fallback values for unset or invalid settings.

use std::{collections::BTreeMap, fmt};

use config::ScreenDecl;
use settings_store::{Snapshot, Value};
use tracing::error;

/// Default computed from the full current settings snapshot.
pub type ComputeDefault = Box<dyn Fn(&Snapshot) -> Value>;

/// One default table entry.
pub enum DefaultValue {
    /// Fixed value.
    Literal(Value),
    /// Derived from other settings at resolution time.
    Computed(ComputeDefault),
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Immutable key -> default mapping.
///
/// Built once with [`DefaultTable::builder`] and shared read-only afterwards.
#[derive(Debug, Default)]
pub struct DefaultTable {
    /// Entries by setting key.
    entries: BTreeMap<String, DefaultValue>,
}

impl DefaultTable {
    /// Start building a table.
    pub fn builder() -> DefaultTableBuilder {
        DefaultTableBuilder::default()
    }

    /// Defaults for a declared screen: its literal defaults, with `tracking_period` computed
    /// by [`tracking_period_for_plan`].
    pub fn for_screen(decl: &ScreenDecl) -> Self {
        Self::builder()
            .literals(&decl.defaults)
            .computed("tracking_period", tracking_period_for_plan)
            .build()
    }

    /// Whether `key` has an entry.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Resolve the default for `key` against `snapshot`.
    ///
    /// Every bindable key must have an entry. A missing entry panics in debug builds and
    /// yields [`Value::Null`] in release builds.
    pub fn resolve(&self, key: &str, snapshot: &Snapshot) -> Value {
        match self.entries.get(key) {
            Some(DefaultValue::Literal(v)) => v.clone(),
            Some(DefaultValue::Computed(f)) => f(snapshot),
            None => {
                debug_assert!(false, "no default registered for setting '{key}'");
                error!(key, "missing_default");
                Value::Null
            }
        }
    }
}

/// Builder for [`DefaultTable`].
#[derive(Debug, Default)]
pub struct DefaultTableBuilder {
    /// Entries collected so far.
    entries: BTreeMap<String, DefaultValue>,
}

impl DefaultTableBuilder {
    /// Add or replace a literal default.
    #[must_use]
    pub fn literal(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.entries
            .insert(key.to_string(), DefaultValue::Literal(value.into()));
        self
    }

    /// Add or replace a literal default for every entry of `literals`.
    #[must_use]
    pub fn literals(mut self, literals: &BTreeMap<String, Value>) -> Self {
        for (key, value) in literals {
            self = self.literal(key, value.clone());
        }
        self
    }

    /// Add or replace a computed default.
    #[must_use]
    pub fn computed(mut self, key: &str, f: impl Fn(&Snapshot) -> Value + 'static) -> Self {
        self.entries
            .insert(key.to_string(), DefaultValue::Computed(Box::new(f)));
        self
    }

    /// Freeze the table.
    pub fn build(self) -> DefaultTable {
        DefaultTable {
            entries: self.entries,
        }
    }
}

/// Tracking period for the current plan: `monthly` on postpaid plans, `never` otherwise.
pub fn tracking_period_for_plan(snapshot: &Snapshot) -> Value {
    let postpaid = snapshot
        .get("plantype")
        .and_then(Value::as_text)
        .is_some_and(|plan| plan == "postpaid");
    Value::from(if postpaid { "monthly" } else { "never" })
}
