//! Settings service startup and screen wiring.

use std::{
    env,
    io::ErrorKind,
    path::{Path, PathBuf},
    rc::Rc,
};

use config::ScreenDecl;
use settings_engine::{DefaultTable, Screen};
use settings_store::{MemoryStore, SettingStore, Snapshot};
use tracing::{debug, info};

use crate::error::Result;

/// Determine the preferred settings path (`~/.costctl/settings.json`).
pub fn default_store_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".costctl");
    p.push("settings.json");
    p
}

/// Connect to the settings service backed by `path`.
///
/// Resolves once the persisted values are loaded; a missing file yields an empty store.
pub async fn connect(path: &Path) -> Result<MemoryStore> {
    let values = match tokio::fs::read_to_string(path).await {
        Ok(text) => MemoryStore::parse(path, &text)?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "settings_file_missing");
            Snapshot::new()
        }
        Err(source) => {
            return Err(settings_store::Error::Io {
                path: path.to_path_buf(),
                source,
            }
            .into());
        }
    };
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(dir).await?;
    }
    info!(path = %path.display(), keys = values.len(), "settings_service_ready");
    Ok(MemoryStore::from_parts(values, Some(path.to_path_buf())))
}

/// Keys of declared controls that have no default.
pub fn missing_defaults(decl: &ScreenDecl) -> Vec<&str> {
    let table = DefaultTable::for_screen(decl);
    decl.controls
        .iter()
        .map(|c| c.key.as_str())
        .filter(|key| !table.contains(key))
        .collect()
}

/// Bind `decl` over `store`, switching to `locale` when given.
pub fn open_screen(
    store: Rc<dyn SettingStore>,
    decl: &ScreenDecl,
    locale: Option<&str>,
) -> Result<Screen> {
    let screen = Screen::from_decl(store, DefaultTable::for_screen(decl), decl)?;
    if let Some(locale) = locale {
        screen.relocalize(locale);
    }
    Ok(screen)
}
