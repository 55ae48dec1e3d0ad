use bevy::log::warn;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::imaging::is_image_file;
use crate::model::{Catalog, Mascot, MascotFrame};

pub const CATALOG_FILE: &str = "mascots.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("catalog encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Managed storage directory for imported mascots and the catalog file
pub fn app_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join("ShimejiDesk"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("shimeji-desk")
        })
    }
}

pub fn catalog_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CATALOG_FILE)
}

/// Load the catalog. A missing file is simply an empty catalog; a file that
/// fails to decode is logged and also treated as empty, so a bad write never
/// blocks startup.
pub fn load_catalog(path: &Path) -> Catalog {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(_) => return Catalog::default(),
    };
    match Catalog::from_json(&json) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("failed to decode catalog {}: {}", path.display(), e);
            Catalog::default()
        }
    }
}

/// Write the catalog as pretty JSON. The write goes to a temp file first and
/// is renamed into place, so a crash mid-write cannot corrupt the catalog.
pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = catalog.to_json()?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Copy `source` into managed storage (replacing any previous copy of the
/// same folder name), scan the copy for image files, and build a mascot with
/// the frame list sorted by file name.
pub fn import_mascot(source: &Path, data_dir: &Path) -> Result<Mascot, StorageError> {
    let folder_name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "mascot".to_string());
    let dest = data_dir.join(&folder_name);

    if dest.exists() {
        fs::remove_dir_all(&dest)?;
    }
    copy_dir(source, &dest)?;

    let frames = scan_frames(&dest)?;
    Ok(Mascot::new(folder_name, dest, frames))
}

fn copy_dir(source: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn scan_frames(folder: &Path) -> io::Result<Vec<MascotFrame>> {
    let mut names: Vec<String> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| is_image_file(Path::new(name)))
        .collect();
    names.sort();
    Ok(names.into_iter().map(MascotFrame::new).collect())
}

/// Best-effort removal of a mascot's managed folder. Failure is logged and
/// otherwise ignored; the catalog entry goes away either way.
pub fn delete_mascot_storage(mascot: &Mascot) {
    if let Err(e) = fs::remove_dir_all(&mascot.source_dir) {
        warn!("failed to delete storage for '{}': {}", mascot.name, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_import_scans_and_sorts_image_frames() {
        let source_root = tempdir().unwrap();
        let data = tempdir().unwrap();
        let source = source_root.path().join("blob");
        fs::create_dir(&source).unwrap();
        touch(&source.join("a.png"));
        touch(&source.join("c.png"));
        touch(&source.join("b.png"));
        touch(&source.join("notes.txt"));

        let mascot = import_mascot(&source, data.path()).unwrap();
        assert_eq!(mascot.name, "blob");
        let names: Vec<&str> = mascot.frames.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
        assert!(mascot.source_dir.starts_with(data.path()));
        assert!(mascot.source_dir.join("a.png").exists());
    }

    #[test]
    fn test_import_replaces_existing_copy() {
        let source_root = tempdir().unwrap();
        let data = tempdir().unwrap();
        let source = source_root.path().join("blob");
        fs::create_dir(&source).unwrap();
        touch(&source.join("a.png"));

        let stale = data.path().join("blob");
        fs::create_dir(&stale).unwrap();
        touch(&stale.join("old.png"));

        let mascot = import_mascot(&source, data.path()).unwrap();
        assert!(!mascot.source_dir.join("old.png").exists());
        assert!(mascot.source_dir.join("a.png").exists());
    }

    #[test]
    fn test_import_without_images_yields_empty_frames() {
        let source_root = tempdir().unwrap();
        let data = tempdir().unwrap();
        let source = source_root.path().join("docs");
        fs::create_dir(&source).unwrap();
        touch(&source.join("readme.txt"));

        let mascot = import_mascot(&source, data.path()).unwrap();
        assert!(mascot.frames.is_empty());
    }

    #[test]
    fn test_load_missing_catalog_is_empty() {
        let data = tempdir().unwrap();
        let catalog = load_catalog(&catalog_path(data.path()));
        assert!(catalog.mascots.is_empty());
    }

    #[test]
    fn test_load_corrupt_catalog_is_empty() {
        let data = tempdir().unwrap();
        let path = catalog_path(data.path());
        fs::write(&path, "not valid json {").unwrap();

        let catalog = load_catalog(&path);
        assert!(catalog.mascots.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let data = tempdir().unwrap();
        let path = catalog_path(data.path());

        let mut catalog = Catalog::default();
        catalog.add(Mascot::new("blob", data.path().join("blob"), vec![]));
        catalog.add(Mascot::new(
            "slime",
            data.path().join("slime"),
            vec![MascotFrame::new("a.png")],
        ));
        save_catalog(&path, &catalog).unwrap();

        let loaded = load_catalog(&path);
        let names: Vec<&str> = loaded.mascots.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["blob", "slime"]);
        assert_eq!(loaded.mascots[1].frames.len(), 1);
    }

    #[test]
    fn test_delete_storage_is_best_effort() {
        let mascot = Mascot::new("ghost", PathBuf::from("/nonexistent/ghost"), vec![]);
        // Must not panic when the folder is already gone
        delete_mascot_storage(&mascot);
    }
}
