#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use settings_store::Value;

    use crate::*; // bring ScreenDecl and helpers into scope

    #[test]
    fn builtin_screen_parses() {
        let screen = cost_control_screen().unwrap();
        assert_eq!(screen.controls.len(), 5);
        assert_eq!(screen.defaults["plantype"], Value::from("prepaid"));
        assert_eq!(screen.defaults["reset_time"], Value::Number(1.0));
        assert_eq!(screen.defaults["lowlimit"], Value::Bool(true));
        let threshold = screen.control("lowlimit_threshold").unwrap();
        assert_eq!(threshold.kind, ControlKind::Number);
        assert_eq!(threshold.disable_when.as_deref(), Some("lowlimit=false"));
        assert_eq!(threshold.hide_when.as_deref(), Some("plantype!=prepaid"));
        assert_eq!(screen.sections.len(), 5);
        assert!(screen.sections.iter().all(|s| s.hide_when.is_none()));
        assert!(screen.telephony);
        let layout = screen.layout.as_ref().unwrap();
        assert_eq!(layout.key, "plantype");
        assert_eq!(
            layout.arranged_sections(),
            vec![
                "phone-activity-settings",
                "phone-internet-settings",
                "balance-settings",
                "data-usage-settings"
            ]
        );
        assert_eq!(
            layout.arrangements["prepaid"].move_entries_to.as_deref(),
            Some("data-usage-settings")
        );
        assert_eq!(screen.locales().collect::<Vec<_>>(), vec!["en-US", "es"]);
    }

    #[test]
    fn options_need_no_some_wrapper() {
        let ron = r#"(
            controls: [
                (key: "period", kind: choice, options: ["a", "b"], entry: "li-1"),
            ],
        )"#;
        let screen = loader::load_from_str(ron, None).unwrap();
        let c = &screen.controls[0];
        assert_eq!(c.options.as_deref(), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(c.entry.as_deref(), Some("li-1"));
        assert!(screen.defaults.is_empty());
    }

    #[test]
    fn unknown_control_field_fails() {
        // misspelled hide_when => hide_on should error
        let ron = r#"(
            controls: [
                (key: "x", kind: toggle, hide_on: "a=b"),
            ],
        )"#;
        let err = loader::load_from_str(ron, None).unwrap_err();
        match err {
            Error::Parse { excerpt, .. } => {
                assert!(excerpt.contains("hide_on"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn choice_without_options_fails_validation() {
        let ron = r#"(
            controls: [
                (key: "plan", kind: choice),
            ],
        )"#;
        let err = loader::load_from_str(ron, None).unwrap_err();
        match &err {
            Error::Validation { line, message, .. } => {
                assert_eq!(*line, Some(3));
                assert!(message.contains("plan"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(err.pretty().starts_with("Screen validation error at 3:"));
    }

    #[test]
    fn duplicate_option_fails_validation() {
        let ron = r#"(controls: [(key: "p", kind: choice, options: ["a", "a"])])"#;
        let err = loader::load_from_str(ron, None).unwrap_err();
        assert!(err.to_string().contains("option 'a' twice"));
    }

    #[test]
    fn empty_key_fails_validation() {
        let ron = r#"(controls: [(key: " ", kind: text)])"#;
        assert!(loader::load_from_str(ron, None).is_err());
    }

    #[test]
    fn layout_must_name_declared_sections() {
        let ron = r#"(
            sections: [(id: "a")],
            layout: (
                key: "plan",
                arrangements: {"x": (show: ["a"], move_entries_to: "b")},
            ),
        )"#;
        let err = loader::load_from_str(ron, None).unwrap_err();
        assert!(err.to_string().contains("undeclared section 'b'"));
    }

    #[test]
    fn arranged_section_cannot_have_hide_rule() {
        let ron = r#"(
            sections: [(id: "a", hide_when: "plan=x"), (id: "b", entries: ["e"])],
            layout: (key: "plan", arrangements: {"x": (show: ["a", "b"])}),
        )"#;
        let err = loader::load_from_str(ron, None).unwrap_err();
        assert!(err.to_string().contains("section 'a' has a hide rule"));
    }

    #[test]
    fn non_ron_extension_is_rejected() {
        let err = load_from_path(Path::new("/tmp/screen.json")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn load_from_file_annotates_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.ron");
        fs::write(&path, "(controls: [(key: \"k\", kind: bogus)])").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert_eq!(err.path(), Some(path.as_path()));
        assert!(err.pretty().contains("screen.ron:1:"));
    }

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.ron");
        fs::write(&path, "(controls: [(key: \"k\", kind: text)])").unwrap();
        let screen = resolve_screen(Some(&path)).unwrap();
        assert_eq!(screen.controls, vec![ControlDecl::new("k", ControlKind::Text)]);
    }
}
