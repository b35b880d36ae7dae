//! Binding Registry: classify declared controls and plan their bindings.
//!
//! Planning is separate from installation so a bad declaration anywhere in a batch
//! fails before anything is subscribed.

use std::collections::HashSet;

use config::{ControlDecl, ControlKind};

use crate::{Error, Result, expr::Expr};

/// Sub-kind of a free-form input control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Text is parsed as a float before writing.
    Number,
    /// Text is written as-is.
    Text,
}

/// How a declared control is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlClass {
    /// Modal option picker over these values.
    Choice(Vec<String>),
    /// Boolean switch.
    Toggle,
    /// Free-form field.
    Input(InputKind),
}

impl ControlClass {
    /// Short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Choice(_) => "choice",
            Self::Toggle => "toggle",
            Self::Input(InputKind::Number) => "number",
            Self::Input(InputKind::Text) => "text",
        }
    }
}

/// Classify a declaration. An option list makes a choice; otherwise the declared kind
/// decides. Contradictory declarations are rejected.
pub fn classify(decl: &ControlDecl) -> Result<ControlClass> {
    let unbound = |reason: String| Error::UnboundKind {
        key: decl.key.clone(),
        reason,
    };
    match (&decl.options, decl.kind) {
        (Some(options), ControlKind::Choice) if !options.is_empty() => {
            Ok(ControlClass::Choice(options.clone()))
        }
        (Some(_), ControlKind::Choice) => Err(unbound("empty option set".to_string())),
        (Some(_), kind) => Err(unbound(format!("options declared on a {kind:?} control"))),
        (None, ControlKind::Choice) => Err(unbound("choice control without options".to_string())),
        (None, ControlKind::Toggle) => Ok(ControlClass::Toggle),
        (None, ControlKind::Number) => Ok(ControlClass::Input(InputKind::Number)),
        (None, ControlKind::Text) => Ok(ControlClass::Input(InputKind::Text)),
    }
}

/// Everything needed to install one control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Plan {
    /// Bound setting key.
    pub(crate) key: String,
    /// Containing list entry.
    pub(crate) entry: Option<String>,
    /// Binding kind.
    pub(crate) class: ControlClass,
    /// Parsed disable rule.
    pub(crate) disable: Option<Expr>,
    /// Parsed hide rule.
    pub(crate) hide: Option<Expr>,
}

/// Classify and parse every declaration, rejecting keys already in `bound` or repeated
/// within `decls`.
pub(crate) fn plan_all(decls: &[ControlDecl], bound: &HashSet<String>) -> Result<Vec<Plan>> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut plans = Vec::with_capacity(decls.len());
    for decl in decls {
        if bound.contains(&decl.key) || !seen.insert(decl.key.as_str()) {
            return Err(Error::DuplicateControl {
                key: decl.key.clone(),
            });
        }
        plans.push(Plan {
            key: decl.key.clone(),
            entry: decl.entry.clone(),
            class: classify(decl)?,
            disable: decl.disable_when.as_deref().map(Expr::parse).transpose()?,
            hide: decl.hide_when.as_deref().map(Expr::parse).transpose()?,
        });
    }
    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Operator;

    #[test]
    fn classification() {
        let choice = ControlDecl::choice("plantype", ["prepaid", "postpaid"]);
        assert_eq!(
            classify(&choice).unwrap(),
            ControlClass::Choice(vec!["prepaid".into(), "postpaid".into()])
        );
        assert_eq!(
            classify(&ControlDecl::new("lowlimit", ControlKind::Toggle)).unwrap(),
            ControlClass::Toggle
        );
        assert_eq!(
            classify(&ControlDecl::new("x", ControlKind::Number)).unwrap(),
            ControlClass::Input(InputKind::Number)
        );
        assert_eq!(
            classify(&ControlDecl::new("x", ControlKind::Text)).unwrap(),
            ControlClass::Input(InputKind::Text)
        );
    }

    #[test]
    fn unclassifiable_controls_fail() {
        let bare_choice = ControlDecl::new("p", ControlKind::Choice);
        let mut toggle_with_options = ControlDecl::choice("p", ["a"]);
        toggle_with_options.kind = ControlKind::Toggle;
        let empty = ControlDecl::choice("p", Vec::<String>::new());
        for decl in [bare_choice, toggle_with_options, empty] {
            assert!(matches!(classify(&decl), Err(Error::UnboundKind { .. })));
        }
    }

    #[test]
    fn plan_parses_rules() {
        let decls = vec![
            ControlDecl::new("lowlimit_threshold", ControlKind::Number)
                .in_entry("li")
                .disable_when("lowlimit=false")
                .hide_when("plantype!=prepaid"),
        ];
        let plans = plan_all(&decls, &HashSet::new()).unwrap();
        let p = &plans[0];
        assert_eq!(p.entry.as_deref(), Some("li"));
        assert_eq!(p.disable.as_ref().unwrap().key, "lowlimit");
        assert_eq!(p.hide.as_ref().unwrap().op, Operator::NotEquals);
    }

    #[test]
    fn plan_rejects_bad_expression() {
        let decls = vec![ControlDecl::new("a", ControlKind::Toggle).hide_when("plantype")];
        assert!(matches!(
            plan_all(&decls, &HashSet::new()),
            Err(Error::MalformedExpression { .. })
        ));
    }

    #[test]
    fn plan_rejects_duplicates() {
        let decls = vec![
            ControlDecl::new("a", ControlKind::Toggle),
            ControlDecl::new("a", ControlKind::Text),
        ];
        assert!(matches!(
            plan_all(&decls, &HashSet::new()),
            Err(Error::DuplicateControl { .. })
        ));
        let bound = HashSet::from(["b".to_string()]);
        let again = vec![ControlDecl::new("b", ControlKind::Toggle)];
        assert!(matches!(
            plan_all(&again, &bound),
            Err(Error::DuplicateControl { .. })
        ));
    }
}
