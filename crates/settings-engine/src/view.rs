//! Modal view tracking for the screen's dialogs.

use tracing::debug;

/// A view that can be opened over the settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Option picker for the choice control bound to this key.
    ChoiceDialog(String),
    /// Confirmation before the telephony counters are reset.
    ResetConfirmation,
}

/// Tracks the single view currently shown over the screen.
#[derive(Debug, Default)]
pub struct ViewManager {
    /// Open view, if any.
    current: Option<View>,
}

impl ViewManager {
    /// Show `view`, replacing whatever was open.
    pub fn change_view_to(&mut self, view: View) {
        debug!(view = ?view, "view_open");
        self.current = Some(view);
    }

    /// Close the open view, returning it.
    pub fn close_current_view(&mut self) -> Option<View> {
        let closed = self.current.take();
        if let Some(v) = &closed {
            debug!(view = ?v, "view_close");
        }
        closed
    }

    /// The open view.
    pub fn current(&self) -> Option<&View> {
        self.current.as_ref()
    }

    /// Whether `view` is the open view.
    pub fn is_open(&self, view: &View) -> bool {
        self.current.as_ref() == Some(view)
    }

    /// Whether the choice dialog for `key` is the open view.
    pub fn is_dialog_open(&self, key: &str) -> bool {
        matches!(&self.current, Some(View::ChoiceDialog(k)) if k == key)
    }
}
