//! Parse and load screen declarations.

use std::{collections::HashSet, ffi::OsStr, fs, path::Path};

use ron::{Options, extensions::Extensions};
use tracing::debug;

use crate::{
    ControlKind, Error, ScreenDecl,
    error::{excerpt_at, locate},
};

/// Load screen declarations from a RON file at `path`.
pub fn load_from_path(path: &Path) -> Result<ScreenDecl, Error> {
    if path.extension() != Some(OsStr::new("ron")) {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported screen format (expected a .ron file)".to_string(),
        });
    }
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    load_from_str(&source, Some(path))
}

/// Parse and validate screen declarations from RON `source`.
///
/// `path` is only used to annotate errors.
pub fn load_from_str(source: &str, path: Option<&Path>) -> Result<ScreenDecl, Error> {
    let options = Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
    let screen: ScreenDecl = options.from_str(source).map_err(|e| {
        let line = e.span.start.line;
        let col = e.span.start.col;
        Error::Parse {
            path: path.map(Path::to_path_buf),
            line,
            col,
            message: e.code.to_string(),
            excerpt: excerpt_at(source, line, col),
        }
    })?;
    validate(&screen, source, path)?;
    debug!(
        controls = screen.controls.len(),
        sections = screen.sections.len(),
        "screen_loaded"
    );
    Ok(screen)
}

/// Structural checks that serde cannot express.
fn validate(screen: &ScreenDecl, source: &str, path: Option<&Path>) -> Result<(), Error> {
    let fail = |needle: Option<String>, message: String| {
        let at = needle.and_then(|n| locate(source, &n));
        Error::Validation {
            path: path.map(Path::to_path_buf),
            line: at.map(|(l, _)| l),
            col: at.map(|(_, c)| c),
            message,
            excerpt: at.map(|(l, c)| excerpt_at(source, l, c)),
        }
    };

    for (i, control) in screen.controls.iter().enumerate() {
        if control.key.trim().is_empty() {
            return Err(fail(None, format!("control #{} has an empty key", i + 1)));
        }
        let quoted = Some(format!("\"{}\"", control.key));
        if let Some(options) = &control.options {
            if options.is_empty() {
                return Err(fail(
                    quoted,
                    format!("control '{}' declares an empty option list", control.key),
                ));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = options.iter().find(|o| !seen.insert(o.as_str())) {
                return Err(fail(
                    quoted,
                    format!("control '{}' lists option '{}' twice", control.key, dup),
                ));
            }
        } else if control.kind == ControlKind::Choice {
            return Err(fail(
                quoted,
                format!("choice control '{}' declares no options", control.key),
            ));
        }
    }

    for section in &screen.sections {
        if section.id.trim().is_empty() {
            return Err(fail(None, "section with an empty id".to_string()));
        }
    }

    if let Some(layout) = &screen.layout {
        let quoted = |id: &str| Some(format!("\"{id}\""));
        if layout.arrangements.is_empty() {
            return Err(fail(
                quoted(&layout.key),
                format!("layout on '{}' declares no arrangements", layout.key),
            ));
        }
        let targets = layout
            .arrangements
            .values()
            .filter_map(|a| a.move_entries_to.as_deref());
        for id in layout.arranged_sections().into_iter().chain(targets) {
            let Some(section) = screen.section(id) else {
                return Err(fail(
                    quoted(id),
                    format!("layout refers to undeclared section '{id}'"),
                ));
            };
            if section.hide_when.is_some() && layout.arranged_sections().contains(&id) {
                return Err(fail(
                    quoted(id),
                    format!("section '{id}' has a hide rule and is also arranged by the layout"),
                ));
            }
        }
    }
    Ok(())
}
