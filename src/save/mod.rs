//! Weekly snapshot persistence: one file per faction per week, a backup
//! store for prior weeks, and restore.

pub mod snapshot;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use thiserror::Error;

use crate::model::{BuildingCatalog, FactionRegistry};

const SAVED_DIR: &str = "saved";
const BACKUP_DIR: &str = "backups";
const BACKUP_PREFIX: &str = "backup.";

/// How long archived snapshots are kept before the sweep deletes them.
pub const DEFAULT_BACKUP_RETENTION: Duration = Duration::from_secs(4 * 7 * 24 * 60 * 60);

#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A faction's snapshot for the requested week does not exist.
    /// Fatal at startup, recoverable when the user picks a week by hand.
    #[error("no snapshot for faction {faction} at week {week}")]
    MissingSnapshot { faction: String, week: u32 },
    #[error("no backups found for week {0}")]
    MissingBackup(u32),
}

/// Writes, archives, and restores per-week snapshot files under a root
/// directory: `saved/<faction>.week_<n>` for the current state,
/// `backups/backup.<faction>.week_<n>` for archived weeks.
#[derive(Debug, Clone)]
pub struct SaveManager {
    root: PathBuf,
}

impl SaveManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn saved_dir(&self) -> PathBuf {
        self.root.join(SAVED_DIR)
    }

    fn backup_dir(&self) -> PathBuf {
        self.root.join(BACKUP_DIR)
    }

    /// Highest week number present in the save directory, 0 when none.
    pub fn current_week(&self) -> u32 {
        list_week_files(&self.saved_dir())
            .map(|files| files.into_iter().map(|(_, week)| week).max().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Saves every faction's snapshot for `week`, first archiving the
    /// preceding week's files into the backup store. Archiving happens
    /// before any write so the prior week is preserved even if the new
    /// write fails partway.
    pub fn save_week(&self, registry: &FactionRegistry, week: u32) -> Result<(), SaveError> {
        if week > 1 {
            self.archive_week(week - 1)?;
        }
        fs::create_dir_all(self.saved_dir())?;
        for faction in registry.iter() {
            let path = self.saved_dir().join(week_file_name(faction.name(), week));
            fs::write(&path, snapshot::render(faction))?;
        }
        tracing::info!(week, "game state saved");
        Ok(())
    }

    /// Loads every registered faction's snapshot for `week`. Each faction
    /// should be freshly constructed; snapshots are applied in place.
    pub fn load_week(
        &self,
        registry: &mut FactionRegistry,
        week: u32,
        catalog: &BuildingCatalog,
    ) -> Result<(), SaveError> {
        let names: Vec<String> = registry.names().map(String::from).collect();
        for name in names {
            let path = self.saved_dir().join(week_file_name(&name, week));
            if !path.exists() {
                return Err(SaveError::MissingSnapshot {
                    faction: name,
                    week,
                });
            }
            let text = fs::read_to_string(&path)?;
            if let Some(faction) = registry.get_mut(&name) {
                snapshot::apply(faction, &text, catalog);
            }
        }
        Ok(())
    }

    fn archive_week(&self, week: u32) -> Result<(), SaveError> {
        if week == 0 {
            return Ok(());
        }
        let saved = self.saved_dir();
        if !saved.is_dir() {
            return Ok(());
        }
        let to_archive: Vec<(String, u32)> = list_week_files(&saved)?
            .into_iter()
            .filter(|(_, w)| *w == week)
            .collect();
        if to_archive.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(self.backup_dir())?;
        for (name, _) in to_archive {
            let destination = self.backup_dir().join(format!("{BACKUP_PREFIX}{name}"));
            fs::rename(saved.join(&name), destination)?;
        }
        tracing::debug!(week, "archived snapshots");
        Ok(())
    }

    /// Copies a backed-up week's snapshots back into the save directory,
    /// overwriting whatever is there.
    pub fn restore_week(&self, week: u32) -> Result<(), SaveError> {
        let backups = self.backup_dir();
        let matching: Vec<String> = list_week_files(&backups)
            .unwrap_or_default()
            .into_iter()
            .filter(|(name, w)| *w == week && name.starts_with(BACKUP_PREFIX))
            .map(|(name, _)| name)
            .collect();
        if matching.is_empty() {
            return Err(SaveError::MissingBackup(week));
        }
        fs::create_dir_all(self.saved_dir())?;
        for name in matching {
            let restored = &name[BACKUP_PREFIX.len()..];
            fs::copy(backups.join(&name), self.saved_dir().join(restored))?;
        }
        tracing::info!(week, "restored from backup");
        Ok(())
    }

    /// Distinct weeks available in the backup store, ascending.
    pub fn list_backup_weeks(&self) -> Vec<u32> {
        let mut weeks: Vec<u32> = list_week_files(&self.backup_dir())
            .unwrap_or_default()
            .into_iter()
            .filter(|(name, _)| name.starts_with(BACKUP_PREFIX))
            .map(|(_, week)| week)
            .collect();
        weeks.sort_unstable();
        weeks.dedup();
        weeks
    }

    /// Removes every weekly snapshot from the save directory.
    pub fn delete_all_saves(&self) -> io::Result<()> {
        let saved = self.saved_dir();
        if !saved.is_dir() {
            return Ok(());
        }
        for (name, _) in list_week_files(&saved)? {
            fs::remove_file(saved.join(name))?;
        }
        Ok(())
    }

    /// Deletes backups whose file modification time is older than the
    /// retention window.
    pub fn prune_backups(&self, retention: Duration) -> io::Result<()> {
        let backups = self.backup_dir();
        if !backups.is_dir() {
            return Ok(());
        }
        let now = SystemTime::now();
        for (name, _) in list_week_files(&backups)? {
            if !name.starts_with(BACKUP_PREFIX) {
                continue;
            }
            let path = backups.join(&name);
            let modified = fs::metadata(&path)?.modified()?;
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age > retention {
                if let Err(err) = fs::remove_file(&path) {
                    tracing::warn!(file = %name, %err, "failed to delete old backup");
                }
            }
        }
        Ok(())
    }
}

fn week_file_name(faction: &str, week: u32) -> String {
    format!("{faction}.week_{week}")
}

/// Parses the trailing `.week_<n>` from a file name.
fn week_suffix(name: &str) -> Option<u32> {
    let (_, digits) = name.rsplit_once(".week_")?;
    digits.parse().ok()
}

/// Every `<anything>.week_<n>` file in a directory, with its week number.
fn list_week_files(dir: &Path) -> io::Result<Vec<(String, u32)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(week) = week_suffix(&name) {
            files.push((name, week));
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_suffix_parses_trailing_number() {
        assert_eq!(week_suffix("dwarfs.week_12"), Some(12));
        assert_eq!(week_suffix("backup.dwarfs.week_3"), Some(3));
        assert_eq!(week_suffix("dwarfs.week_"), None);
        assert_eq!(week_suffix("dwarfs"), None);
        assert_eq!(week_suffix("notes.txt"), None);
    }

    #[test]
    fn current_week_is_zero_without_saves() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path());
        assert_eq!(manager.current_week(), 0);
    }
}
