//! A bound settings screen: controls, sections, telephony counters, the modal view and every
//! subscription.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
};

use config::{ControlDecl, LayoutDecl, ScreenDecl, SectionDecl};
use settings_store::{SettingStore, Subscription};
use tracing::{debug, info};

use crate::{
    Catalog, ControlState, DefaultTable, Display, Error, Result, SectionHandle, SectionState,
    TelephonyHandle, TelephonyState, View, ViewManager,
    binder::{BindContext, Binder},
    dependency::install_expr,
    expr::Expr,
    layout::Layout,
    registry::{Plan, plan_all},
    telephony,
};

/// Controls bound to one store.
///
/// The screen owns every subscription it installs; they are released by
/// [`Screen::dispose`] or when the screen is dropped.
pub struct Screen {
    /// Store the controls are bound to.
    store: Rc<dyn SettingStore>,
    /// Shared binder collaborators.
    ctx: Rc<BindContext>,
    /// Binders by setting key.
    binders: HashMap<String, Rc<Binder>>,
    /// Bound keys in declaration order.
    order: Vec<String>,
    /// Section states in declaration order.
    sections: Vec<SectionHandle>,
    /// Telephony counters, once bound.
    telephony: Option<TelephonyHandle>,
    /// Everything installed on the store.
    subscriptions: Vec<Subscription>,
    /// Open modal view.
    views: ViewManager,
}

impl Screen {
    /// Empty screen over `store`.
    pub fn new(store: Rc<dyn SettingStore>, defaults: DefaultTable, catalog: Catalog) -> Self {
        let ctx = Rc::new(BindContext {
            store: Rc::downgrade(&store),
            defaults: Rc::new(defaults),
            catalog: Rc::new(RefCell::new(catalog)),
        });
        Self {
            store,
            ctx,
            binders: HashMap::new(),
            order: Vec::new(),
            sections: Vec::new(),
            telephony: None,
            subscriptions: Vec::new(),
            views: ViewManager::default(),
        }
    }

    /// Build and bind a whole declared screen: controls, sections, the layout and, when
    /// declared, the telephony counters. `defaults` replaces the declaration's literal
    /// defaults, so callers can register computed ones.
    pub fn from_decl(
        store: Rc<dyn SettingStore>,
        defaults: DefaultTable,
        decl: &ScreenDecl,
    ) -> Result<Self> {
        let mut screen = Self::new(store, defaults, Catalog::new(decl.labels.clone()));
        screen.bind_all(&decl.controls)?;
        screen.bind_sections(&decl.sections)?;
        if let Some(layout) = &decl.layout {
            screen.bind_layout(layout)?;
        }
        if decl.telephony {
            screen.bind_telephony();
        }
        Ok(screen)
    }

    /// Bind every declared control.
    ///
    /// All declarations are classified and their expressions parsed first; if any is invalid
    /// nothing from this batch is installed.
    pub fn bind_all(&mut self, decls: &[ControlDecl]) -> Result<()> {
        let bound: HashSet<String> = self.binders.keys().cloned().collect();
        let plans = plan_all(decls, &bound)?;
        for plan in plans {
            self.install(plan);
        }
        info!(controls = self.order.len(), subscriptions = self.subscriptions.len(), "bind_all");
        Ok(())
    }

    /// Install one planned control: its binder, then its disable rule, then its hide rule.
    fn install(&mut self, plan: Plan) {
        let Plan {
            key,
            entry,
            class,
            disable,
            hide,
        } = plan;
        let state = Rc::new(RefCell::new(ControlState::new(&key, entry.as_deref())));
        let binder = Binder::new(&key, class, Rc::clone(&state), Rc::clone(&self.ctx));
        self.subscriptions.push(binder.install(&self.store));
        if let Some(expr) = disable {
            debug!(key = %key, rule = %expr, "bind_disable_rule");
            let state = Rc::clone(&state);
            self.subscriptions.push(install_expr(&self.store, expr, move |d| {
                state.borrow_mut().set_disabled(d);
            }));
        }
        if let Some(expr) = hide {
            debug!(key = %key, rule = %expr, "bind_hide_rule");
            self.subscriptions.push(install_expr(&self.store, expr, move |h| {
                state.borrow_mut().set_hidden(h);
            }));
        }
        self.order.push(key.clone());
        self.binders.insert(key, binder);
    }

    /// Add the declared sections, attaching each section's hide rule when it has one.
    /// Expressions are all parsed before any rule is installed.
    pub fn bind_sections(&mut self, decls: &[SectionDecl]) -> Result<()> {
        let mut parsed = Vec::with_capacity(decls.len());
        for decl in decls {
            let rule = decl.hide_when.as_deref().map(Expr::parse).transpose()?;
            parsed.push((decl, rule));
        }
        for (decl, rule) in parsed {
            let state = Rc::new(RefCell::new(SectionState {
                id: decl.id.clone(),
                hidden: false,
                entries: decl.entries.clone(),
            }));
            if let Some(expr) = rule {
                debug!(section = %decl.id, rule = %expr, "bind_section");
                let sink = Rc::clone(&state);
                self.subscriptions.push(install_expr(&self.store, expr, move |h| {
                    sink.borrow_mut().hidden = h;
                }));
            }
            self.sections.push(state);
        }
        Ok(())
    }

    /// Arrange the bound sections by the value of `decl.key`, resolved the way its choice
    /// control renders it. Sections must be bound first.
    pub fn bind_layout(&mut self, decl: &LayoutDecl) -> Result<()> {
        let layout = Layout::new(decl, &self.sections, Rc::clone(&self.ctx))?;
        self.subscriptions.push(layout.install(&self.store));
        Ok(())
    }

    /// Show the call time and SMS counters, kept in sync with the store.
    pub fn bind_telephony(&mut self) {
        let state = TelephonyHandle::default();
        self.subscriptions
            .extend(telephony::install(&self.store, &self.ctx, &state));
        self.telephony = Some(state);
    }

    /// Binder for `key`.
    fn binder(&self, key: &str) -> Result<Rc<Binder>> {
        self.binders
            .get(key)
            .cloned()
            .ok_or_else(|| Error::UnknownControl {
                key: key.to_string(),
            })
    }

    /// The store this screen is bound to.
    pub fn store(&self) -> &Rc<dyn SettingStore> {
        &self.store
    }

    /// Current state of the control bound to `key`.
    pub fn control(&self, key: &str) -> Option<ControlState> {
        self.binders.get(key).map(|b| b.state().borrow().clone())
    }

    /// States of all bound controls, in declaration order.
    pub fn controls(&self) -> Vec<ControlState> {
        self.order
            .iter()
            .filter_map(|key| self.control(key))
            .collect()
    }

    /// What the control bound to `key` shows.
    pub fn display(&self, key: &str) -> Option<Display> {
        self.control(key).map(|c| c.display)
    }

    /// Current state of section `id`.
    pub fn section(&self, id: &str) -> Option<SectionState> {
        self.sections
            .iter()
            .map(|s| s.borrow().clone())
            .find(|s| s.id == id)
    }

    /// States of all declared sections, in declaration order.
    pub fn sections(&self) -> Vec<SectionState> {
        self.sections.iter().map(|s| s.borrow().clone()).collect()
    }

    /// What the telephony counters show, when bound.
    pub fn telephony(&self) -> Option<TelephonyState> {
        self.telephony.as_ref().map(|t| *t.borrow())
    }

    /// Open the option dialog of a choice control.
    pub fn open_choice(&mut self, key: &str) -> Result<()> {
        self.binder(key)?.ensure_choice_interactive()?;
        self.views.change_view_to(View::ChoiceDialog(key.to_string()));
        Ok(())
    }

    /// Confirm `option` in the open dialog of `key` and close it.
    pub fn confirm_choice(&mut self, key: &str, option: &str) -> Result<()> {
        let binder = self.open_dialog_binder(key)?;
        binder.confirm(option)?;
        self.views.close_current_view();
        Ok(())
    }

    /// Close the open dialog of `key` without choosing; the control re-syncs to the store.
    pub fn cancel_choice(&mut self, key: &str) -> Result<()> {
        let binder = self.open_dialog_binder(key)?;
        self.views.close_current_view();
        binder.cancel()
    }

    /// Binder of `key`, provided its dialog is the open view.
    fn open_dialog_binder(&self, key: &str) -> Result<Rc<Binder>> {
        let binder = self.binder(key)?;
        if !self.views.is_dialog_open(key) {
            return Err(Error::NoOpenDialog {
                key: key.to_string(),
            });
        }
        Ok(binder)
    }

    /// Ask to reset the telephony counters; opens the confirmation dialog.
    pub fn request_reset(&mut self) -> Result<()> {
        if self.telephony.is_none() {
            return Err(Error::NoTelephony);
        }
        self.views.change_view_to(View::ResetConfirmation);
        Ok(())
    }

    /// Confirm the open reset dialog: close it, then zero the counters, stamping `now_ms`
    /// (milliseconds since the epoch) as the reset time.
    pub fn confirm_reset(&mut self, now_ms: f64) -> Result<()> {
        self.close_reset_dialog()?;
        telephony::reset_counters(&*self.store, now_ms);
        Ok(())
    }

    /// Dismiss the open reset dialog without resetting.
    pub fn cancel_reset(&mut self) -> Result<()> {
        self.close_reset_dialog()
    }

    /// Close the reset dialog, provided it is the open view.
    fn close_reset_dialog(&mut self) -> Result<()> {
        if !self.views.is_open(&View::ResetConfirmation) {
            return Err(Error::ResetNotRequested);
        }
        self.views.close_current_view();
        Ok(())
    }

    /// Flip the toggle bound to `key`.
    pub fn toggle(&self, key: &str, checked: bool) -> Result<()> {
        self.binder(key)?.toggle(checked)
    }

    /// Commit `text` into the input field bound to `key`.
    pub fn edit(&self, key: &str, text: &str) -> Result<()> {
        self.binder(key)?.edit(text)
    }

    /// Switch the label locale and re-render every control. The store is not touched.
    pub fn relocalize(&self, locale: &str) {
        self.ctx.catalog.borrow_mut().set_locale(locale);
        info!(locale, "relocalize");
        for key in &self.order {
            if let Some(binder) = self.binders.get(key) {
                binder.relocalize();
            }
        }
    }

    /// Active label locale.
    pub fn locale(&self) -> Option<String> {
        self.ctx.catalog.borrow().locale().map(str::to_string)
    }

    /// The open modal view.
    pub fn current_view(&self) -> Option<&View> {
        self.views.current()
    }

    /// Number of live subscriptions this screen holds.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Release every subscription. Control states keep their last rendering.
    pub fn dispose(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        debug!(subscriptions = self.subscriptions.len(), "screen_dispose");
        self.views.close_current_view();
        self.subscriptions.clear();
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        self.dispose();
    }
}
