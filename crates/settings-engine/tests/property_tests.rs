use std::{cell::Cell, rc::Rc};

use proptest::prelude::*;
use settings_engine::{Display, install_dependency, test_support::cost_control_screen};
use settings_store::{MemoryStore, SettingStore, Value};

fn store() -> Rc<dyn SettingStore> {
    Rc::new(MemoryStore::new())
}

fn stored_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1.0e6f64..1.0e6).prop_map(Value::Number),
        "[a-z]{0,10}".prop_map(Value::Text),
    ]
}

proptest! {
    #[test]
    fn foreign_choice_values_render_the_default(v in stored_value()) {
        prop_assume!(v != Value::from("prepaid") && v != Value::from("postpaid"));
        let store = store();
        store.set("plantype", v);
        let screen = cost_control_screen(Rc::clone(&store)).unwrap();
        let shown = screen.display("plantype");
        prop_assert!(
            matches!(&shown, Some(Display::Choice { selected, .. }) if selected == "prepaid"),
            "{:?}",
            shown
        );
    }

    #[test]
    fn clause_holds_iff_stringified_value_matches(v in stored_value(), negate in any::<bool>()) {
        let store = store();
        store.set("plantype", v.clone());
        let expr = if negate { "plantype!=prepaid" } else { "plantype=prepaid" };
        let last = Rc::new(Cell::new(None));
        let sink = Rc::clone(&last);
        let _sub = install_dependency(&store, expr, move |b| sink.set(Some(b))).unwrap();
        let matches = v.to_string() == "prepaid";
        prop_assert_eq!(last.get(), Some(matches != negate));
    }

    #[test]
    fn toggle_renders_what_was_written(writes in proptest::collection::vec(any::<bool>(), 1..8)) {
        let screen = cost_control_screen(store()).unwrap();
        for checked in writes {
            screen.toggle("lowlimit", checked).unwrap();
            prop_assert_eq!(screen.display("lowlimit"), Some(Display::Toggle(checked)));
        }
    }

    #[test]
    fn numeric_edits_round_trip(n in -1.0e9f64..1.0e9) {
        let store = store();
        let screen = cost_control_screen(Rc::clone(&store)).unwrap();
        screen.edit("lowlimit_threshold", &n.to_string()).unwrap();
        prop_assert_eq!(store.get("lowlimit_threshold"), Value::Number(n));
        prop_assert_eq!(
            screen.display("lowlimit_threshold"),
            Some(Display::Field(Value::Number(n).to_string()))
        );
    }
}
