//! Config editor service.
//!
//! [`ConfigEditor`] owns the single live [`ConfigStore`] and serializes every
//! access to it (file I/O included) behind one mutex, so a load or a
//! set-and-save is never interleaved with another operation.

use crate::config_store::ConfigStore;
use crate::constants::GAME_CONFIG_FILE_NAME;
use crate::error::ConfigError;
use crate::keycode_db::KeyCodeTable;
use crate::models::diff::ConfigDiff;
use crate::models::document::validate_entry;
use crate::services::diff::compute_diff;
use crate::watcher::InternalChanges;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Supplies the game installation directory the config file lives in.
pub trait InstallDirProvider: Send + Sync {
    /// The installation directory, or `None` if it is not known yet.
    fn install_dir(&self) -> Option<PathBuf>;
}

/// Provider returning a fixed directory (CLI override, tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedInstallDir(pub PathBuf);

impl InstallDirProvider for FixedInstallDir {
    fn install_dir(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// Thread-safe editor over one config file.
///
/// # Lifecycle
///
/// Starts unloaded. A successful [`load_config`](Self::load_config) or
/// [`load_from`](Self::load_from) moves it to loaded; a failed load keeps
/// whatever was loaded before. Reads on an unloaded editor return empty
/// strings and writes are no-ops.
pub struct ConfigEditor {
    store: Mutex<ConfigStore>,
    install_dir: Box<dyn InstallDirProvider>,
    keycodes: &'static KeyCodeTable,
    internal_changes: Option<InternalChanges>,
}

impl ConfigEditor {
    /// Creates an unloaded editor resolving its file through `install_dir`.
    pub fn new(install_dir: impl InstallDirProvider + 'static) -> Self {
        Self {
            store: Mutex::new(ConfigStore::new()),
            install_dir: Box::new(install_dir),
            keycodes: KeyCodeTable::global(),
            internal_changes: None,
        }
    }

    /// Marks `handle` before every save so a watcher can ignore our writes.
    #[must_use]
    pub fn with_internal_changes(mut self, handle: InternalChanges) -> Self {
        self.internal_changes = Some(handle);
        self
    }

    fn lock(&self) -> MutexGuard<'_, ConfigStore> {
        // Every operation leaves the store consistent, so a poisoned lock is still usable.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Path of the config file inside the installation directory.
    pub fn config_path(&self) -> Result<PathBuf, ConfigError> {
        self.install_dir
            .install_dir()
            .map(|dir| dir.join(GAME_CONFIG_FILE_NAME))
            .ok_or(ConfigError::NotConfigured)
    }

    /// Loads the config file from the installation directory.
    pub fn load_config(&self) -> Result<(), ConfigError> {
        let path = self.config_path()?;
        self.load_from(&path)
    }

    /// Loads an explicit file instead of the installation default.
    pub fn load_from(&self, path: &Path) -> Result<(), ConfigError> {
        let mut store = self.lock();
        match store.load(path) {
            Ok(()) => {
                info!(path = %path.display(), "Loaded game config");
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load game config");
                Err(e)
            }
        }
    }

    /// True once a load succeeded and the file holds at least one key.
    pub fn is_available(&self) -> bool {
        let store = self.lock();
        store.is_loaded() && !store.is_empty()
    }

    /// Returns the stored value, or `default` if it is empty or missing.
    pub fn get_value(&self, section: &str, option: &str, default: &str) -> String {
        let store = self.lock();
        match store.get(section, option) {
            "" => default.to_string(),
            value => value.to_string(),
        }
    }

    /// Sets a value and writes the file immediately.
    ///
    /// Names or values that cannot be written back unchanged are refused
    /// before anything is touched. If the write fails the in-memory document
    /// is rolled back to its state before the call, so memory keeps matching
    /// what is on disk.
    pub fn set_value(&self, section: &str, option: &str, value: &str) -> Result<(), ConfigError> {
        validate_entry(section, option, value).inspect_err(|e| {
            warn!(section, option, error = %e, "Refusing config value");
        })?;

        let mut store = self.lock();
        if !store.is_loaded() {
            debug!(section, option, "Ignoring set before config is loaded");
            return Ok(());
        }

        let previous = store.document().cloned();
        store.set(section, option, value)?;

        if let Some(internal) = &self.internal_changes {
            internal.mark();
        }
        if let Err(e) = store.save() {
            warn!(section, option, error = %e, "Failed to save config, rolling back");
            store.restore_document(previous);
            return Err(e);
        }

        debug!(section, option, value, "Config value saved");
        Ok(())
    }

    /// Re-reads the file last loaded. Does nothing if nothing was loaded.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let mut store = self.lock();
        let Some(path) = store.path().map(Path::to_path_buf) else {
            debug!("Reload requested before any load");
            return Ok(());
        };
        store.load(&path).inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "Reload failed, keeping previous config");
        })
    }

    /// Returns a hotkey value formatted for display (see
    /// [`KeyCodeTable::format_for_display`]).
    pub fn get_hotkey_value(&self, section: &str, option: &str) -> String {
        let store = self.lock();
        self.keycodes.format_for_display(store.get(section, option))
    }

    /// Compares the live config with the current file on disk.
    pub fn compute_diff(&self) -> Result<ConfigDiff, ConfigError> {
        let store = self.lock();
        compute_diff(&store)
    }

    /// Path of the last successful load.
    pub fn path(&self) -> Option<PathBuf> {
        self.lock().path().map(Path::to_path_buf)
    }

    /// Copy of the current store for read-only inspection.
    pub fn snapshot(&self) -> ConfigStore {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct NoInstallDir;

    impl InstallDirProvider for NoInstallDir {
        fn install_dir(&self) -> Option<PathBuf> {
            None
        }
    }

    fn editor_with(content: &str) -> (ConfigEditor, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(GAME_CONFIG_FILE_NAME), content).unwrap();
        let editor = ConfigEditor::new(FixedInstallDir(temp_dir.path().to_path_buf()));
        (editor, temp_dir)
    }

    #[test]
    fn test_unloaded_editor() {
        let editor = ConfigEditor::new(NoInstallDir);
        assert!(!editor.is_available());
        assert_eq!(editor.get_value("A", "x", "dflt"), "dflt");
        assert_eq!(editor.get_hotkey_value("A", "x"), "");
        assert!(editor.set_value("A", "x", "1").is_ok());
        assert!(editor.reload().is_ok());
        assert!(editor.path().is_none());
        assert!(matches!(editor.compute_diff(), Err(ConfigError::NotLoaded)));
        assert!(matches!(editor.load_config(), Err(ConfigError::NotConfigured)));
    }

    #[test]
    fn test_load_and_get() {
        let (editor, temp_dir) = editor_with("[Hotkeys]\nattack = 0x41\nmod = ctrl\nfire = \n");
        editor.load_config().unwrap();

        assert!(editor.is_available());
        assert_eq!(
            editor.path(),
            Some(temp_dir.path().join(GAME_CONFIG_FILE_NAME))
        );
        assert_eq!(editor.get_value("Hotkeys", "attack", ""), "0x41");
        assert_eq!(editor.get_value("Hotkeys", "fire", "none"), "none");
        assert_eq!(editor.get_value("Hotkeys", "missing", "none"), "none");
        assert_eq!(editor.get_hotkey_value("Hotkeys", "attack"), "A");
        assert_eq!(editor.get_hotkey_value("Hotkeys", "mod"), "Ctrl");
    }

    #[test]
    fn test_empty_file_is_not_available() {
        let (editor, _temp_dir) = editor_with("; nothing here\n");
        editor.load_config().unwrap();
        assert!(!editor.is_available());
    }

    #[test]
    fn test_set_value_writes_through() {
        let (editor, temp_dir) = editor_with("[A]\nx = 1 ; keep\n");
        editor.load_config().unwrap();

        editor.set_value("A", "x", "2").unwrap();
        editor.set_value("B", "y", "3").unwrap();

        let on_disk = fs::read_to_string(temp_dir.path().join(GAME_CONFIG_FILE_NAME)).unwrap();
        assert_eq!(on_disk, "[A]\nx = 2 ; keep\n\n[B]\ny = 3\n");
        assert!(editor.compute_diff().unwrap().is_empty());
    }

    #[test]
    fn test_set_value_marks_internal_change() {
        let (editor, _temp_dir) = editor_with("[A]\nx = 1\n");
        let internal = InternalChanges::new(std::time::Duration::from_secs(60));
        let editor = editor.with_internal_changes(internal.clone());
        editor.load_config().unwrap();

        assert!(!internal.is_suppressed(std::time::Instant::now()));
        editor.set_value("A", "x", "2").unwrap();
        assert!(internal.is_suppressed(std::time::Instant::now()));
    }

    #[test]
    fn test_failed_save_rolls_back_memory() {
        let (editor, temp_dir) = editor_with("[A]\nx = 1\n");
        editor.load_config().unwrap();
        let path = temp_dir.path().join(GAME_CONFIG_FILE_NAME);

        // A directory in the temp file's place makes the write fail.
        fs::create_dir(temp_dir.path().join(format!("{GAME_CONFIG_FILE_NAME}.tmp"))).unwrap();

        let err = editor.set_value("A", "x", "2").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(editor.get_value("A", "x", ""), "1");
        assert_eq!(fs::read_to_string(&path).unwrap(), "[A]\nx = 1\n");
    }

    #[test]
    fn test_rejected_value_changes_nothing() {
        let content = "[A]\nx = 1 ; keep\n";
        let (editor, temp_dir) = editor_with(content);
        editor.load_config().unwrap();
        let path = temp_dir.path().join(GAME_CONFIG_FILE_NAME);
        let before = editor.snapshot();

        let cases = [
            ("A", "x", "1\n[B"),
            ("A", "", "1"),
            ("A", "[k", "1"),
            ("a]b", "k", "1"),
            ("A", ";k", "1"),
            ("A", "a=b", "1"),
        ];
        for (section, option, value) in cases {
            let err = editor.set_value(section, option, value).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidName { .. } | ConfigError::InvalidValue { .. }),
                "unexpected error for {section:?} {option:?}: {err}"
            );
            assert_eq!(editor.snapshot().document(), before.document());
            assert_eq!(fs::read_to_string(&path).unwrap(), content);
        }
        assert!(editor.compute_diff().unwrap().is_empty());
    }

    #[test]
    fn test_set_value_with_quote_in_value() {
        let (editor, temp_dir) = editor_with("[Player]\nname = \"Lady\"\n");
        editor.load_config().unwrap();

        editor.set_value("Player", "name", "say \"hi\"").unwrap();

        assert!(editor.compute_diff().unwrap().is_empty());
        let on_disk = ConfigStore::open(temp_dir.path().join(GAME_CONFIG_FILE_NAME)).unwrap();
        assert_eq!(on_disk.get("Player", "name"), "say \"hi\"");
    }

    #[test]
    fn test_reload_picks_up_external_edit() {
        let (editor, temp_dir) = editor_with("[A]\nx = 1\n");
        editor.load_config().unwrap();

        fs::write(temp_dir.path().join(GAME_CONFIG_FILE_NAME), "[A]\nx = 9\n").unwrap();
        assert_eq!(editor.get_value("A", "x", ""), "1");

        editor.reload().unwrap();
        assert_eq!(editor.get_value("A", "x", ""), "9");
    }

    #[test]
    fn test_failed_reload_keeps_stale_data() {
        let (editor, temp_dir) = editor_with("[A]\nx = 1\n");
        editor.load_config().unwrap();

        fs::write(temp_dir.path().join(GAME_CONFIG_FILE_NAME), "[A\n").unwrap();
        assert!(matches!(editor.reload(), Err(ConfigError::Parse { .. })));
        assert_eq!(editor.get_value("A", "x", ""), "1");
        assert!(editor.is_available());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let editor = ConfigEditor::new(FixedInstallDir(temp_dir.path().to_path_buf()));
        assert!(matches!(editor.load_config(), Err(ConfigError::NotFound { .. })));
        assert!(!editor.is_available());
    }

    #[test]
    fn test_concurrent_set_values() {
        let (editor, temp_dir) = editor_with("[A]\nx = 0\n");
        editor.load_config().unwrap();
        let editor = std::sync::Arc::new(editor);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let editor = std::sync::Arc::clone(&editor);
                std::thread::spawn(move || {
                    editor.set_value("Threads", &format!("t{i}"), &i.to_string()).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = ConfigStore::open(temp_dir.path().join(GAME_CONFIG_FILE_NAME)).unwrap();
        for i in 0..8 {
            assert_eq!(store.get("Threads", &format!("t{i}")), i.to_string());
        }
        assert!(editor.compute_diff().unwrap().is_empty());
    }
}
