use std::path::PathBuf;

#[cfg(target_os = "windows")]
use rfd::FileDialog;

// Native folder picker (Windows only)
#[cfg(target_os = "windows")]
pub fn pick_folder() -> Option<PathBuf> {
    FileDialog::new().pick_folder()
}

// Fallback for non-Windows (returns None, the import dialog takes a typed
// path instead)
#[cfg(not(target_os = "windows"))]
pub fn pick_folder() -> Option<PathBuf> {
    None
}
