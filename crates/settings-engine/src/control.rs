//! Rendered state of controls, entries and sections.

use std::{cell::RefCell, rc::Rc};

/// What a control currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Display {
    /// Nothing rendered yet.
    #[default]
    Unrendered,
    /// Selected option value plus its localized label.
    Choice {
        /// Option value.
        selected: String,
        /// Label shown in the control's tag.
        label: String,
    },
    /// Switch position.
    Toggle(bool),
    /// Field text.
    Field(String),
}

/// Accessibility state of the list entry containing a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryState {
    /// Entry id.
    pub id: String,
    /// `aria-disabled` mirror of the control's disabled flag.
    pub disabled: bool,
    /// `aria-hidden` mirror of the control's hidden flag.
    pub hidden: bool,
}

/// Full visual state of one bound control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    /// Bound setting key.
    pub key: String,
    /// Current display.
    pub display: Display,
    /// Interactive-disabled flag.
    pub disabled: bool,
    /// Accessible-hidden flag.
    pub hidden: bool,
    /// Containing entry, if declared.
    pub entry: Option<EntryState>,
}

impl ControlState {
    /// Fresh, enabled, visible, unrendered state.
    pub fn new(key: &str, entry: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            display: Display::Unrendered,
            disabled: false,
            hidden: false,
            entry: entry.map(|id| EntryState {
                id: id.to_string(),
                disabled: false,
                hidden: false,
            }),
        }
    }

    /// Apply a disable rule result to the control and its entry in lockstep.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if let Some(entry) = &mut self.entry {
            entry.disabled = disabled;
        }
    }

    /// Apply a hide rule result to the control and its entry in lockstep.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
        if let Some(entry) = &mut self.entry {
            entry.hidden = hidden;
        }
    }
}

/// Shared handle to a control's state; binders write it, the host reads it.
pub type ControlHandle = Rc<RefCell<ControlState>>;

/// Visibility and contents of a declared section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionState {
    /// Section id.
    pub id: String,
    /// Whether the section header and its entries are hidden.
    pub hidden: bool,
    /// Entry ids currently listed in the section, in display order.
    pub entries: Vec<String>,
}

/// Shared handle to a section's state.
pub type SectionHandle = Rc<RefCell<SectionState>>;
