use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the settings binding engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A dependency expression has no usable `key=literal` or `key!=literal` shape.
    #[error("Malformed dependency expression '{expr}': {reason}")]
    MalformedExpression {
        /// Expression as declared.
        expr: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A declared control cannot be classified as choice, toggle or input.
    #[error("Control '{key}' has no bindable kind: {reason}")]
    UnboundKind {
        /// Setting key of the control.
        key: String,
        /// Why classification failed.
        reason: String,
    },

    /// A control for this key is already bound on the screen.
    #[error("Control '{key}' is already bound")]
    DuplicateControl {
        /// Setting key of the control.
        key: String,
    },

    /// No control is bound to this key.
    #[error("No control bound to '{key}'")]
    UnknownControl {
        /// Requested key.
        key: String,
    },

    /// The interaction does not apply to this control's kind.
    #[error("Control '{key}' is not a {expected} control")]
    WrongKind {
        /// Setting key of the control.
        key: String,
        /// Kind the interaction needs.
        expected: &'static str,
    },

    /// A dialog interaction arrived while that control's dialog is not the open view.
    #[error("Choice dialog for '{key}' is not open")]
    NoOpenDialog {
        /// Setting key of the choice control.
        key: String,
    },

    /// The confirmed option is not part of the control's option set.
    #[error("'{option}' is not an option of '{key}'")]
    UnknownOption {
        /// Setting key of the choice control.
        key: String,
        /// Rejected option.
        option: String,
    },

    /// The control is currently disabled by its dependency rule.
    #[error("Control '{key}' is disabled")]
    ControlDisabled {
        /// Setting key of the control.
        key: String,
    },

    /// Numeric field input that does not parse as a number.
    #[error("'{input}' is not a number (control '{key}')")]
    InvalidNumber {
        /// Setting key of the control.
        key: String,
        /// Raw field text.
        input: String,
    },

    /// A layout refers to a section the screen never declared.
    #[error("No section '{id}' on the screen")]
    UnknownSection {
        /// Requested section id.
        id: String,
    },

    /// The screen has no telephony counters bound.
    #[error("Telephony counters are not bound on this screen")]
    NoTelephony,

    /// A reset confirmation arrived while the reset dialog is not the open view.
    #[error("Reset confirmation dialog is not open")]
    ResetNotRequested,

    /// Screen declaration errors.
    #[error("Screen configuration error: {0}")]
    Config(#[from] config::Error),
}
