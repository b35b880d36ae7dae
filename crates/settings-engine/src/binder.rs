//! Control Binders: two-way sync between one control and one setting key.
//!
//! Store notifications render into the control's [`ControlState`]; user interactions
//! write back to the store. Rendering never writes, so a notification can't feed back
//! into another write.
//!
//! [`ControlState`]: crate::ControlState

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use settings_store::{SettingStore, Subscription, Value, handler, subscribe};
use tracing::{debug, error, trace, warn};

use crate::{
    Catalog, ControlHandle, DefaultTable, Display, Error, Result,
    registry::{ControlClass, InputKind},
};

/// Collaborators every binder on a screen shares.
pub(crate) struct BindContext {
    /// Store the screen is bound to. Weak so installed handlers never keep it alive.
    pub(crate) store: Weak<dyn SettingStore>,
    /// Fallback values.
    pub(crate) defaults: Rc<DefaultTable>,
    /// Active option labels.
    pub(crate) catalog: Rc<RefCell<Catalog>>,
}

impl BindContext {
    /// Resolve `key`'s default against the store's current snapshot.
    pub(crate) fn default_for(&self, key: &str) -> Value {
        let snapshot = self
            .store
            .upgrade()
            .map(|s| s.snapshot())
            .unwrap_or_default();
        self.defaults.resolve(key, &snapshot)
    }

    /// Write through to the store, if it is still alive.
    pub(crate) fn write(&self, key: &str, value: Value) {
        match self.store.upgrade() {
            Some(store) => store.set(key, value),
            None => warn!(key, "store_gone"),
        }
    }

    /// Current stored value, if the store is still alive.
    pub(crate) fn read(&self, key: &str) -> Value {
        self.store
            .upgrade()
            .map(|s| s.get(key))
            .unwrap_or_default()
    }
}

/// Binding of one control to one setting key.
pub(crate) struct Binder {
    /// Bound setting key.
    key: String,
    /// Control kind and its options.
    class: ControlClass,
    /// Rendered state shared with the screen.
    state: ControlHandle,
    /// Shared collaborators.
    ctx: Rc<BindContext>,
}

impl Binder {
    /// Create a binder. Nothing is installed until [`Binder::install`].
    pub(crate) fn new(
        key: &str,
        class: ControlClass,
        state: ControlHandle,
        ctx: Rc<BindContext>,
    ) -> Rc<Self> {
        Rc::new(Self {
            key: key.to_string(),
            class,
            state,
            ctx,
        })
    }

    /// Subscribe to the bound key; the control renders immediately from the current value.
    pub(crate) fn install(self: &Rc<Self>, store: &Rc<dyn SettingStore>) -> Subscription {
        debug!(key = %self.key, class = self.class.name(), "bind_control");
        let this = Rc::clone(self);
        subscribe(
            store,
            &self.key,
            handler(move |value: &Value| this.refresh(value)),
        )
    }

    /// Shared state handle.
    pub(crate) fn state(&self) -> &ControlHandle {
        &self.state
    }

    /// Render from a store value, substituting the default for an absent value.
    pub(crate) fn refresh(&self, value: &Value) {
        let value = if value.is_null() {
            self.ctx.default_for(&self.key)
        } else {
            value.clone()
        };
        let rendered = match &self.class {
            ControlClass::Choice(options) => match self.choice_display(options, &value) {
                Some(d) => d,
                None => return,
            },
            ControlClass::Toggle => Display::Toggle(value.as_bool().unwrap_or(value.truthy())),
            ControlClass::Input(_) => Display::Field(field_text(&value)),
        };
        trace!(key = %self.key, display = ?rendered, "render");
        self.state.borrow_mut().display = rendered;
    }

    /// Pick the option to show for `value`, falling back to the default when `value` is
    /// not one of `options`.
    fn choice_display(&self, options: &[String], value: &Value) -> Option<Display> {
        let wanted = value.to_string();
        let selected = if options.contains(&wanted) {
            wanted
        } else {
            let fallback = self.ctx.default_for(&self.key).to_string();
            warn!(key = %self.key, value = %wanted, fallback = %fallback, "invalid_choice_value");
            fallback
        };
        if !options.contains(&selected) {
            error!(key = %self.key, default = %selected, "default_not_an_option");
            return None;
        }
        let label = self.ctx.catalog.borrow().label(&self.key, &selected);
        Some(Display::Choice { selected, label })
    }

    /// Re-render the current display for the active locale without touching the store.
    pub(crate) fn relocalize(&self) {
        let mut state = self.state.borrow_mut();
        match &mut state.display {
            Display::Choice { selected, label } => {
                *label = self.ctx.catalog.borrow().label(&self.key, selected);
            }
            Display::Toggle(_) | Display::Field(_) | Display::Unrendered => {}
        }
        trace!(key = %self.key, display = ?state.display, "relocalize");
    }

    /// Reject interaction while the control is disabled.
    fn ensure_enabled(&self) -> Result<()> {
        if self.state.borrow().disabled {
            return Err(Error::ControlDisabled {
                key: self.key.clone(),
            });
        }
        Ok(())
    }

    /// Options of a choice control.
    fn options(&self) -> Result<&[String]> {
        match &self.class {
            ControlClass::Choice(options) => Ok(options),
            _ => Err(self.wrong_kind("choice")),
        }
    }

    /// Error for an interaction that does not fit this control.
    fn wrong_kind(&self, expected: &'static str) -> Error {
        Error::WrongKind {
            key: self.key.clone(),
            expected,
        }
    }

    /// Check that a choice dialog may be opened for this control.
    pub(crate) fn ensure_choice_interactive(&self) -> Result<()> {
        self.options()?;
        self.ensure_enabled()
    }

    /// Confirm `option` in this control's dialog.
    pub(crate) fn confirm(&self, option: &str) -> Result<()> {
        self.ensure_enabled()?;
        if !self.options()?.iter().any(|o| o == option) {
            return Err(Error::UnknownOption {
                key: self.key.clone(),
                option: option.to_string(),
            });
        }
        self.ctx.write(&self.key, Value::from(option));
        Ok(())
    }

    /// Cancel this control's dialog: re-write the stored value so the control re-syncs.
    pub(crate) fn cancel(&self) -> Result<()> {
        self.options()?;
        let current = self.ctx.read(&self.key);
        self.ctx.write(&self.key, current);
        Ok(())
    }

    /// Flip a toggle to `checked`.
    pub(crate) fn toggle(&self, checked: bool) -> Result<()> {
        if !matches!(self.class, ControlClass::Toggle) {
            return Err(self.wrong_kind("toggle"));
        }
        self.ensure_enabled()?;
        self.ctx.write(&self.key, Value::Bool(checked));
        Ok(())
    }

    /// Commit field text. Numeric fields parse to a finite float first; the parsed value is
    /// not range-checked.
    pub(crate) fn edit(&self, text: &str) -> Result<()> {
        let ControlClass::Input(kind) = &self.class else {
            return Err(self.wrong_kind("input"));
        };
        self.ensure_enabled()?;
        let value = match kind {
            InputKind::Text => Value::from(text),
            InputKind::Number => match text.trim().parse::<f64>() {
                // NaN and infinities have no JSON form and would not survive a reload.
                Ok(n) if n.is_finite() => Value::Number(n),
                _ => {
                    // Put the field back to what the store holds.
                    self.refresh(&self.ctx.read(&self.key));
                    return Err(Error::InvalidNumber {
                        key: self.key.clone(),
                        input: text.to_string(),
                    });
                }
            },
        };
        self.ctx.write(&self.key, value);
        Ok(())
    }
}

/// Field text for a value; an absent value renders empty.
fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use settings_store::MemoryStore;

    use super::*;
    use crate::ControlState;

    struct Fixture {
        store: Rc<dyn SettingStore>,
        binder: Rc<Binder>,
        _sub: Subscription,
    }

    fn bind(class: ControlClass, key: &str, initial: Option<Value>) -> Fixture {
        let store: Rc<dyn SettingStore> = Rc::new(MemoryStore::new());
        if let Some(v) = initial {
            store.set(key, v);
        }
        let defaults = DefaultTable::builder()
            .literal("plantype", "prepaid")
            .literal("lowlimit", true)
            .literal("lowlimit_threshold", 5)
            .literal("nickname", "")
            .build();
        let ctx = Rc::new(BindContext {
            store: Rc::downgrade(&store),
            defaults: Rc::new(defaults),
            catalog: Rc::new(RefCell::new(Catalog::default())),
        });
        let state = Rc::new(RefCell::new(ControlState::new(key, None)));
        let binder = Binder::new(key, class, state, ctx);
        let sub = binder.install(&store);
        Fixture {
            store,
            binder,
            _sub: sub,
        }
    }

    fn plan_choice() -> ControlClass {
        ControlClass::Choice(vec!["prepaid".into(), "postpaid".into()])
    }

    fn shown(f: &Fixture) -> Display {
        f.binder.state().borrow().display.clone()
    }

    #[test]
    fn choice_renders_default_when_unset() {
        let f = bind(plan_choice(), "plantype", None);
        assert_eq!(
            shown(&f),
            Display::Choice {
                selected: "prepaid".into(),
                label: "prepaid".into()
            }
        );
    }

    #[test]
    fn choice_falls_back_on_unknown_value() {
        let f = bind(plan_choice(), "plantype", Some(Value::from("corrupt")));
        assert!(matches!(shown(&f), Display::Choice { selected, .. } if selected == "prepaid"));
        // The stored value is left alone.
        assert_eq!(f.store.get("plantype"), Value::from("corrupt"));
    }

    #[test]
    fn choice_follows_store() {
        let f = bind(plan_choice(), "plantype", None);
        f.store.set("plantype", Value::from("postpaid"));
        assert!(matches!(shown(&f), Display::Choice { selected, .. } if selected == "postpaid"));
    }

    #[test]
    fn confirm_rejects_unknown_option() {
        let f = bind(plan_choice(), "plantype", None);
        assert!(matches!(
            f.binder.confirm("bogus"),
            Err(Error::UnknownOption { .. })
        ));
        assert_eq!(f.store.get("plantype"), Value::Null);
        f.binder.confirm("postpaid").unwrap();
        assert_eq!(f.store.get("plantype"), Value::from("postpaid"));
    }

    #[test]
    fn toggle_renders_written_boolean() {
        let f = bind(ControlClass::Toggle, "lowlimit", None);
        assert_eq!(shown(&f), Display::Toggle(true));
        f.binder.toggle(false).unwrap();
        assert_eq!(f.store.get("lowlimit"), Value::Bool(false));
        assert_eq!(shown(&f), Display::Toggle(false));
    }

    #[test]
    fn numeric_edit_parses_and_accepts_any_range() {
        let f = bind(
            ControlClass::Input(InputKind::Number),
            "lowlimit_threshold",
            None,
        );
        assert_eq!(shown(&f), Display::Field("5".into()));
        f.binder.edit(" 12.5 ").unwrap();
        assert_eq!(f.store.get("lowlimit_threshold"), Value::Number(12.5));
        f.binder.edit("-1e9").unwrap();
        assert_eq!(shown(&f), Display::Field("-1000000000".into()));
    }

    #[test]
    fn unparseable_number_is_rejected_without_write() {
        let f = bind(
            ControlClass::Input(InputKind::Number),
            "lowlimit_threshold",
            Some(Value::from(7)),
        );
        assert!(matches!(
            f.binder.edit("seven"),
            Err(Error::InvalidNumber { .. })
        ));
        assert_eq!(f.store.get("lowlimit_threshold"), Value::Number(7.0));
        assert_eq!(shown(&f), Display::Field("7".into()));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let f = bind(
            ControlClass::Input(InputKind::Number),
            "lowlimit_threshold",
            Some(Value::from(7)),
        );
        for input in ["NaN", "inf", "-infinity", "1e400"] {
            assert!(
                matches!(f.binder.edit(input), Err(Error::InvalidNumber { .. })),
                "{input}"
            );
            assert_eq!(f.store.get("lowlimit_threshold"), Value::Number(7.0));
            assert_eq!(shown(&f), Display::Field("7".into()));
        }
    }

    #[test]
    fn text_edit_writes_raw_text() {
        let f = bind(ControlClass::Input(InputKind::Text), "nickname", None);
        assert_eq!(shown(&f), Display::Field(String::new()));
        f.binder.edit("work phone").unwrap();
        assert_eq!(f.store.get("nickname"), Value::from("work phone"));
        assert_eq!(shown(&f), Display::Field("work phone".into()));
    }

    #[test]
    fn wrong_kind_interactions_fail() {
        let f = bind(ControlClass::Toggle, "lowlimit", None);
        assert!(matches!(f.binder.edit("x"), Err(Error::WrongKind { .. })));
        assert!(matches!(f.binder.confirm("x"), Err(Error::WrongKind { .. })));
        assert!(matches!(f.binder.cancel(), Err(Error::WrongKind { .. })));
    }

    #[test]
    fn disabled_control_ignores_input() {
        let f = bind(ControlClass::Toggle, "lowlimit", None);
        f.binder.state().borrow_mut().set_disabled(true);
        assert!(matches!(
            f.binder.toggle(false),
            Err(Error::ControlDisabled { .. })
        ));
        assert_eq!(f.store.get("lowlimit"), Value::Null);
    }

    #[test]
    fn confirm_rechecks_disabled() {
        let f = bind(plan_choice(), "plantype", None);
        f.binder.ensure_choice_interactive().unwrap();
        f.binder.state().borrow_mut().set_disabled(true);
        assert!(matches!(
            f.binder.confirm("postpaid"),
            Err(Error::ControlDisabled { .. })
        ));
        assert_eq!(f.store.get("plantype"), Value::Null);
    }
}
