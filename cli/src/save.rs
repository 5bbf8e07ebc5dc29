use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tilemerge_core::SavedTile;

/// On-disk form of a suspended game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub tiles: Vec<SavedTile>,
}

impl SaveFile {
    pub const VERSION: u32 = 1;

    pub fn new(tiles: Vec<SavedTile>) -> Self {
        Self {
            version: Self::VERSION,
            tiles,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let save: Self = serde_json::from_str(text).context("Save file is not valid JSON")?;
        if save.version != Self::VERSION {
            bail!(
                "Unsupported save file version {}, expected {}",
                save.version,
                Self::VERSION
            );
        }
        Ok(save)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Could not encode save file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read save file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Could not load {}", path.display()))
    }

    pub fn store(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Could not write save file {}", path.display()))?;
        log::debug!("Saved {} tiles to {}", self.tiles.len(), path.display());
        Ok(())
    }
}
