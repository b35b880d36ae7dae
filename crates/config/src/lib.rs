//! Static settings-screen declarations: controls, defaults, sections and labels.
#![warn(unsafe_op_in_unsafe_fn)]

use std::{
    env,
    path::{Path, PathBuf},
};

mod decl;
mod error;
mod loader;

#[cfg(test)]
mod test_parse;

pub use decl::{ArrangementDecl, ControlDecl, ControlKind, LayoutDecl, ScreenDecl, SectionDecl};
pub use error::{Error, excerpt_at};
pub use loader::{load_from_path, load_from_str};

/// RON source of the built-in cost control screen.
pub const COST_CONTROL_SCREEN: &str = include_str!("../screens/costcontrol.ron");

/// Parse the built-in cost control screen.
pub fn cost_control_screen() -> Result<ScreenDecl, Error> {
    load_from_str(COST_CONTROL_SCREEN, None)
}

/// Determine the preferred user screen path (`~/.costctl/screen.ron`).
pub fn default_screen_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".costctl");
    p.push("screen.ron");
    p
}

/// Load the effective screen declarations.
///
/// Policy:
/// 1) Use `explicit` when provided.
/// 2) Else use `~/.costctl/screen.ron` when it exists.
/// 3) Else fall back to the built-in cost control screen.
pub fn resolve_screen(explicit: Option<&Path>) -> Result<ScreenDecl, Error> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }
    let preferred = default_screen_path();
    if preferred.exists() {
        return load_from_path(&preferred);
    }
    cost_control_screen()
}
