//! Static descriptors for a settings screen.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use settings_store::Value;

/// Declared kind of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// Pick one of a fixed option set through a modal dialog.
    Choice,
    /// Boolean switch.
    Toggle,
    /// Free-form field whose text is parsed as a float before writing.
    Number,
    /// Free-form text field.
    Text,
}

/// One bindable control on the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlDecl {
    /// Setting key the control is bound to.
    pub key: String,
    /// Control kind.
    pub kind: ControlKind,
    /// Valid option values for a choice control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Id of the list entry containing the control, mirrored for accessibility state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    /// Expression under which the control is disabled, e.g. `tracking_period=never`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_when: Option<String>,
    /// Expression under which the control is hidden, e.g. `plantype!=prepaid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_when: Option<String>,
}

impl ControlDecl {
    /// A bare control of `kind` bound to `key`.
    pub fn new(key: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            key: key.into(),
            kind,
            options: None,
            entry: None,
            disable_when: None,
            hide_when: None,
        }
    }

    /// A choice control over `options`.
    pub fn choice<I, S>(key: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: Some(options.into_iter().map(Into::into).collect()),
            ..Self::new(key, ControlKind::Choice)
        }
    }

    /// Set the containing list entry.
    #[must_use]
    pub fn in_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Set the disable rule.
    #[must_use]
    pub fn disable_when(mut self, expr: impl Into<String>) -> Self {
        self.disable_when = Some(expr.into());
        self
    }

    /// Set the hide rule.
    #[must_use]
    pub fn hide_when(mut self, expr: impl Into<String>) -> Self {
        self.hide_when = Some(expr.into());
        self
    }
}

/// A titled group of list entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionDecl {
    /// Section id.
    pub id: String,
    /// Expression under which the whole section is hidden. Sections arranged by the
    /// screen's [`LayoutDecl`] leave this unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_when: Option<String>,
    /// Entry ids listed in the section before any layout moves them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<String>,
}

impl SectionDecl {
    /// An empty, always visible section.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hide_when: None,
            entries: Vec::new(),
        }
    }

    /// Set the hide rule.
    #[must_use]
    pub fn hide_when(mut self, expr: impl Into<String>) -> Self {
        self.hide_when = Some(expr.into());
        self
    }
}

/// How one value of the layout key arranges the screen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArrangementDecl {
    /// Sections shown under this value. Every other arranged section is hidden.
    #[serde(default)]
    pub show: Vec<String>,
    /// Section the movable entries are appended to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_entries_to: Option<String>,
}

/// Section arrangement driven by one choice setting, e.g. the plan type.
///
/// The arrangement follows the value the setting's control shows: an unset or unknown
/// stored value resolves to the setting's default. If that is not arranged either, the
/// layout is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutDecl {
    /// Setting key the layout follows.
    pub key: String,
    /// Entry ids that move between sections with the arrangement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub movable: Vec<String>,
    /// Arrangement per setting value.
    pub arrangements: BTreeMap<String, ArrangementDecl>,
}

impl LayoutDecl {
    /// Every section some arrangement shows, in first-mention order.
    pub fn arranged_sections(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for arrangement in self.arrangements.values() {
            for id in &arrangement.show {
                if !ids.contains(&id.as_str()) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

/// Full declaration of a settings screen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenDecl {
    /// Literal default per setting key.
    #[serde(default)]
    pub defaults: BTreeMap<String, Value>,
    /// Controls in declaration order.
    #[serde(default)]
    pub controls: Vec<ControlDecl>,
    /// Sections in display order.
    #[serde(default)]
    pub sections: Vec<SectionDecl>,
    /// Value-driven section arrangement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutDecl>,
    /// Whether the screen shows the telephony counters and their reset dialog.
    #[serde(default)]
    pub telephony: bool,
    /// Display labels: locale -> `"key.option"` -> text.
    #[serde(default)]
    pub labels: BTreeMap<String, BTreeMap<String, String>>,
}

impl ScreenDecl {
    /// The declared control bound to `key`, if any.
    pub fn control(&self, key: &str) -> Option<&ControlDecl> {
        self.controls.iter().find(|c| c.key == key)
    }

    /// The declared section `id`, if any.
    pub fn section(&self, id: &str) -> Option<&SectionDecl> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Locales with at least one label.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }
}
