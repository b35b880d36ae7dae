//! Settings Engine
//!
//! Binds declared settings-screen controls to keys in a [`SettingStore`] and keeps the two
//! in sync:
//! - choice, toggle and input controls render from the store and write user changes back
//! - absent values render from a [`DefaultTable`] without being written
//! - `key=literal` / `key!=literal` rules drive each control's disabled and hidden state
//! - a layout shows, hides and refills sections as a choice setting changes
//! - telephony counters render call minutes and SMS count, reset through a confirmation dialog
//!
//! Everything runs on one thread. Store notifications are delivered synchronously, so a
//! write is fully reflected in every bound control by the time `set` returns.
//!
//! The main entry point is [`Screen`].
//!
//! [`SettingStore`]: settings_store::SettingStore

mod binder;
mod control;
mod defaults;
mod dependency;
mod error;
mod expr;
mod layout;
mod locale;
mod registry;
mod screen;
mod telephony;
mod view;

pub mod test_support;

pub use control::{
    ControlHandle, ControlState, Display, EntryState, SectionHandle, SectionState,
};
pub use defaults::{
    ComputeDefault, DefaultTable, DefaultTableBuilder, DefaultValue, tracking_period_for_plan,
};
pub use dependency::{install_dependency, install_expr};
pub use error::{Error, Result};
pub use expr::{Expr, Operator};
pub use locale::Catalog;
pub use registry::{ControlClass, InputKind, classify};
pub use screen::Screen;
pub use telephony::{
    CALLTIME_KEY, LASTRESET_KEY, SMSCOUNT_KEY, TelephonyHandle, TelephonyState, reset_counters,
    to_minutes,
};
pub use view::{View, ViewManager};
