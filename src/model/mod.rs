use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// One image file in a mascot's animation sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MascotFrame {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
}

impl MascotFrame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// An imported, named sprite set. Immutable after import except `name`;
/// floating windows hold their own clone, so catalog edits never reach a
/// window that is already on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mascot {
    pub id: Uuid,
    pub name: String,
    /// Managed storage folder holding the copied frame files
    pub source_dir: PathBuf,
    #[serde(default)]
    pub frames: Vec<MascotFrame>,
}

impl Mascot {
    pub fn new(name: impl Into<String>, source_dir: PathBuf, frames: Vec<MascotFrame>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            source_dir,
            frames,
        }
    }

    /// Absolute path of the frame at `index`, if any
    pub fn frame_path(&self, index: usize) -> Option<PathBuf> {
        self.frames.get(index).map(|f| self.source_dir.join(&f.name))
    }

    /// First frame of the sequence, used as the gallery preview
    pub fn preview_path(&self) -> Option<PathBuf> {
        self.frame_path(0)
    }
}

/// The full mascot catalog. Persisted as an ordered JSON array of mascots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub mascots: Vec<Mascot>,
}

impl Catalog {
    pub fn get(&self, id: Uuid) -> Option<&Mascot> {
        self.mascots.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Mascot> {
        self.mascots.iter_mut().find(|m| m.id == id)
    }

    pub fn add(&mut self, mascot: Mascot) {
        self.mascots.push(mascot);
    }

    /// Remove a mascot from the catalog, returning it so the caller can
    /// clean up its storage folder
    pub fn remove(&mut self, id: Uuid) -> Option<Mascot> {
        let index = self.mascots.iter().position(|m| m.id == id)?;
        Some(self.mascots.remove(index))
    }

    /// Rename a mascot. The new name is trimmed; a name that is empty after
    /// trimming leaves the entry unchanged. Returns whether a rename happened.
    pub fn rename(&mut self, id: Uuid, new_name: &str) -> bool {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(mascot) => {
                mascot.name = trimmed.to_string();
                true
            }
            None => false,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
