use bevy::log::warn;
use bevy::prelude::*;
use bevy_egui::egui;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::model::Catalog;
use crate::storage;

#[derive(Resource, Default)]
pub struct AppState {
    pub catalog: Catalog,
    /// Managed storage root; `None` when the platform gives us no home
    pub data_dir: Option<PathBuf>,

    // UI state
    pub show_active_panel: bool,

    // Dialogs
    pub show_import_dialog: bool,
    pub import_path: String,
    pub show_rename_dialog: bool,
    pub rename_target: Option<Uuid>,
    pub rename_new_name: String,
    pub show_delete_confirm_dialog: bool,
    pub delete_target: Option<Uuid>,

    // Status message
    pub status_message: Option<(String, std::time::Instant)>, // (message, when set)

    // Gallery preview textures (mascot id -> first-frame texture)
    pub preview_textures: HashMap<Uuid, egui::TextureHandle>,
    pub preview_failed: HashSet<Uuid>,
}

impl AppState {
    pub fn new() -> Self {
        let data_dir = storage::app_data_dir();
        let catalog = data_dir
            .as_deref()
            .map(|dir| storage::load_catalog(&storage::catalog_path(dir)))
            .unwrap_or_default();
        Self {
            catalog,
            data_dir,
            ..Default::default()
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), std::time::Instant::now()));
    }

    /// Write the catalog through to disk. In-memory state stays
    /// authoritative; a failed save is logged and life goes on.
    pub fn persist(&self) {
        let Some(dir) = &self.data_dir else { return };
        if let Err(e) = storage::save_catalog(&storage::catalog_path(dir), &self.catalog) {
            warn!("failed to save catalog: {}", e);
        }
    }

    /// Import a sprite folder into managed storage and the catalog. Import
    /// failure is the one error kind that gets a user-facing message.
    pub fn import_from(&mut self, folder: &Path) {
        let Some(data_dir) = self.data_dir.clone() else {
            self.set_status("No data directory available");
            return;
        };
        match storage::import_mascot(folder, &data_dir) {
            Ok(mascot) => {
                // A re-import of the same folder replaces the old entry
                let stale: Vec<Uuid> = self
                    .catalog
                    .mascots
                    .iter()
                    .filter(|m| m.source_dir == mascot.source_dir)
                    .map(|m| m.id)
                    .collect();
                for id in stale {
                    self.catalog.remove(id);
                    self.preview_textures.remove(&id);
                    self.preview_failed.remove(&id);
                }
                let name = mascot.name.clone();
                let frame_count = mascot.frames.len();
                self.catalog.add(mascot);
                self.persist();
                self.set_status(format!("Imported '{}' ({} frames)", name, frame_count));
            }
            Err(e) => {
                warn!("import of {} failed: {}", folder.display(), e);
                self.set_status(format!("Import failed: {}", e));
            }
        }
    }

    /// Delete a mascot: storage folder best-effort, catalog entry for sure
    pub fn delete_mascot(&mut self, id: Uuid) {
        if let Some(mascot) = self.catalog.remove(id) {
            storage::delete_mascot_storage(&mascot);
            self.preview_textures.remove(&id);
            self.preview_failed.remove(&id);
            self.persist();
            self.set_status(format!("Deleted '{}'", mascot.name));
        }
    }

    /// Rename a mascot. Blank names are rejected by the catalog and leave
    /// the entry untouched.
    pub fn rename_mascot(&mut self, id: Uuid, new_name: &str) {
        if self.catalog.rename(id, new_name) {
            self.persist();
            let name = self.catalog.get(id).map(|m| m.name.clone()).unwrap_or_default();
            self.set_status(format!("Renamed to '{}'", name));
        } else {
            self.set_status("Rename rejected: name is empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mascot;
    use std::fs;
    use tempfile::tempdir;

    fn state_with_data_dir(dir: &Path) -> AppState {
        AppState {
            data_dir: Some(dir.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_import_adds_and_persists() {
        let data = tempdir().unwrap();
        let source_root = tempdir().unwrap();
        let source = source_root.path().join("blob");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.png"), b"x").unwrap();

        let mut state = state_with_data_dir(data.path());
        state.import_from(&source);

        assert_eq!(state.catalog.mascots.len(), 1);
        assert!(storage::catalog_path(data.path()).exists());
        let (message, _) = state.status_message.as_ref().unwrap();
        assert!(message.starts_with("Imported"));
    }

    #[test]
    fn test_reimport_replaces_catalog_entry() {
        let data = tempdir().unwrap();
        let source_root = tempdir().unwrap();
        let source = source_root.path().join("blob");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.png"), b"x").unwrap();

        let mut state = state_with_data_dir(data.path());
        state.import_from(&source);
        state.import_from(&source);

        assert_eq!(state.catalog.mascots.len(), 1);
    }

    #[test]
    fn test_failed_import_reports_and_leaves_catalog_alone() {
        let data = tempdir().unwrap();
        let mut state = state_with_data_dir(data.path());
        state.import_from(Path::new("/nonexistent/folder"));

        assert!(state.catalog.mascots.is_empty());
        let (message, _) = state.status_message.as_ref().unwrap();
        assert!(message.starts_with("Import failed"));
    }

    #[test]
    fn test_delete_removes_entry_and_storage() {
        let data = tempdir().unwrap();
        let folder = data.path().join("blob");
        fs::create_dir(&folder).unwrap();

        let mut state = state_with_data_dir(data.path());
        let mascot = Mascot::new("blob", folder.clone(), vec![]);
        let id = mascot.id;
        state.catalog.add(mascot);

        state.delete_mascot(id);
        assert!(state.catalog.mascots.is_empty());
        assert!(!folder.exists());
    }

    #[test]
    fn test_rename_whitespace_is_rejected() {
        let data = tempdir().unwrap();
        let mut state = state_with_data_dir(data.path());
        let mascot = Mascot::new("blob", data.path().join("blob"), vec![]);
        let id = mascot.id;
        state.catalog.add(mascot);

        state.rename_mascot(id, "   ");
        assert_eq!(state.catalog.get(id).unwrap().name, "blob");

        state.rename_mascot(id, " Blobby ");
        assert_eq!(state.catalog.get(id).unwrap().name, "Blobby");
    }
}
