//! Section arrangement driven by one choice setting.

use std::{collections::BTreeMap, rc::Rc};

use config::{ArrangementDecl, LayoutDecl};
use settings_store::{SettingStore, Subscription, Value, handler, subscribe};
use tracing::{debug, warn};

use crate::{Error, Result, SectionHandle, binder::BindContext};

/// Shows, hides and refills sections as the layout key changes.
pub(crate) struct Layout {
    /// Setting key the layout follows.
    key: String,
    /// Entries that move with the arrangement.
    movable: Vec<String>,
    /// Arrangement per setting value.
    arrangements: BTreeMap<String, ArrangementDecl>,
    /// Sections some arrangement shows.
    arranged: Vec<SectionHandle>,
    /// Every section on the screen, searched when entries move.
    sections: Vec<SectionHandle>,
    /// Default resolution.
    ctx: Rc<BindContext>,
}

impl Layout {
    /// Resolve `decl` against the screen's sections.
    pub(crate) fn new(
        decl: &LayoutDecl,
        sections: &[SectionHandle],
        ctx: Rc<BindContext>,
    ) -> Result<Rc<Self>> {
        let find = |id: &str| {
            sections
                .iter()
                .find(|s| s.borrow().id == id)
                .cloned()
                .ok_or_else(|| Error::UnknownSection { id: id.to_string() })
        };
        let mut arranged = Vec::new();
        for id in decl.arranged_sections() {
            arranged.push(find(id)?);
        }
        for target in decl
            .arrangements
            .values()
            .filter_map(|a| a.move_entries_to.as_deref())
        {
            find(target)?;
        }
        Ok(Rc::new(Self {
            key: decl.key.clone(),
            movable: decl.movable.clone(),
            arrangements: decl.arrangements.clone(),
            arranged,
            sections: sections.to_vec(),
            ctx,
        }))
    }

    /// Subscribe to the layout key; the current value is applied immediately.
    pub(crate) fn install(self: &Rc<Self>, store: &Rc<dyn SettingStore>) -> Subscription {
        debug!(key = %self.key, arrangements = self.arrangements.len(), "bind_layout");
        let this = Rc::clone(self);
        subscribe(
            store,
            &self.key,
            handler(move |value: &Value| this.apply(value)),
        )
    }

    /// Arrangement for a stored value: the value itself when arranged, else the default.
    fn resolve(&self, value: &Value) -> Option<(String, &ArrangementDecl)> {
        let wanted = if value.is_null() {
            self.ctx.default_for(&self.key)
        } else {
            value.clone()
        }
        .to_string();
        if let Some(a) = self.arrangements.get(&wanted) {
            return Some((wanted, a));
        }
        let fallback = self.ctx.default_for(&self.key).to_string();
        match self.arrangements.get(&fallback) {
            Some(a) => {
                warn!(key = %self.key, value = %wanted, fallback = %fallback, "layout_fallback");
                Some((fallback, a))
            }
            None => {
                debug!(key = %self.key, value = %wanted, "layout_unchanged");
                None
            }
        }
    }

    /// Apply the arrangement for `value`.
    fn apply(&self, value: &Value) {
        let Some((name, arrangement)) = self.resolve(value) else {
            return;
        };
        for section in &self.arranged {
            let mut s = section.borrow_mut();
            s.hidden = !arrangement.show.contains(&s.id);
        }
        if let Some(target) = &arrangement.move_entries_to {
            self.move_entries_to(target);
        }
        debug!(key = %self.key, arrangement = %name, "layout_applied");
    }

    /// Append every movable entry to section `target`, removing it from wherever it was.
    fn move_entries_to(&self, target: &str) {
        for section in &self.sections {
            let mut s = section.borrow_mut();
            s.entries.retain(|e| !self.movable.contains(e));
            if s.id == target {
                s.entries.extend(self.movable.iter().cloned());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use settings_store::MemoryStore;

    use super::*;
    use crate::{Catalog, DefaultTable, SectionState};

    fn section(id: &str, entries: &[&str]) -> SectionHandle {
        Rc::new(RefCell::new(SectionState {
            id: id.to_string(),
            hidden: false,
            entries: entries.iter().map(|e| e.to_string()).collect(),
        }))
    }

    fn decl() -> LayoutDecl {
        let arrangement = |show: &str, to: &str| ArrangementDecl {
            show: vec![show.to_string()],
            move_entries_to: Some(to.to_string()),
        };
        LayoutDecl {
            key: "plantype".into(),
            movable: vec!["reset".into()],
            arrangements: BTreeMap::from([
                ("prepaid".to_string(), arrangement("a", "a")),
                ("postpaid".to_string(), arrangement("b", "b")),
            ]),
        }
    }

    fn ctx(store: &Rc<dyn SettingStore>, default: &str) -> Rc<BindContext> {
        Rc::new(BindContext {
            store: Rc::downgrade(store),
            defaults: Rc::new(DefaultTable::builder().literal("plantype", default).build()),
            catalog: Rc::new(RefCell::new(Catalog::default())),
        })
    }

    #[test]
    fn unset_value_uses_default_arrangement() {
        let store: Rc<dyn SettingStore> = Rc::new(MemoryStore::new());
        let sections = [section("a", &[]), section("b", &["reset", "other"])];
        let layout = Layout::new(&decl(), &sections, ctx(&store, "prepaid")).unwrap();
        let _sub = layout.install(&store);
        let (a, b) = (sections[0].borrow().clone(), sections[1].borrow().clone());
        assert!(!a.hidden && b.hidden);
        assert_eq!(a.entries, vec!["reset"]);
        assert_eq!(b.entries, vec!["other"]);
    }

    #[test]
    fn entries_follow_the_plan() {
        let store: Rc<dyn SettingStore> = Rc::new(MemoryStore::new());
        let sections = [section("a", &["x", "reset"]), section("b", &["y"])];
        let layout = Layout::new(&decl(), &sections, ctx(&store, "prepaid")).unwrap();
        let _sub = layout.install(&store);
        store.set("plantype", Value::from("postpaid"));
        assert!(sections[0].borrow().hidden);
        assert_eq!(sections[0].borrow().entries, vec!["x"]);
        assert_eq!(sections[1].borrow().entries, vec!["y", "reset"]);
        store.set("plantype", Value::from("corporate"));
        assert!(!sections[0].borrow().hidden);
        assert_eq!(sections[0].borrow().entries, vec!["x", "reset"]);
    }

    #[test]
    fn unarranged_default_leaves_layout_alone() {
        let store: Rc<dyn SettingStore> = Rc::new(MemoryStore::new());
        let sections = [section("a", &[]), section("b", &["reset"])];
        let layout = Layout::new(&decl(), &sections, ctx(&store, "corporate")).unwrap();
        let _sub = layout.install(&store);
        assert!(!sections[0].borrow().hidden && !sections[1].borrow().hidden);
        assert_eq!(sections[1].borrow().entries, vec!["reset"]);
        store.set("plantype", Value::from("prepaid"));
        assert!(sections[1].borrow().hidden);
    }

    #[test]
    fn undeclared_section_is_rejected() {
        let store: Rc<dyn SettingStore> = Rc::new(MemoryStore::new());
        let sections = [section("a", &[])];
        let err = Layout::new(&decl(), &sections, ctx(&store, "prepaid"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::UnknownSection { id } if id == "b"));
    }
}
