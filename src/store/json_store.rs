use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::store::schema::{EXPORT_VERSION, ExportData, SCHEMA_VERSION, UserProgress};

const PROGRESS_FILE: &str = "progress.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not valid progress data: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path} has schema version {found} (expected {SCHEMA_VERSION})")]
    StaleSchema { path: PathBuf, found: u32 },
    #[error("Unsupported export version: {found} (expected {EXPORT_VERSION})")]
    UnsupportedExportVersion { found: u32 },
}

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(Config::data_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn write_json<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Read the progress file. A missing file is a fresh start, not an error.
    pub fn read_progress(&self) -> std::result::Result<UserProgress, StoreError> {
        let path = self.file_path(PROGRESS_FILE);
        if !path.exists() {
            return Ok(UserProgress::default());
        }
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;
        let progress: UserProgress =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?;
        if progress.needs_reset() {
            return Err(StoreError::StaleSchema {
                path,
                found: progress.schema_version,
            });
        }
        Ok(progress)
    }

    /// Load progress, falling back to a fresh default on any failure.
    pub fn load_progress(&self) -> UserProgress {
        match self.read_progress() {
            Ok(progress) => progress,
            Err(e) => {
                log::warn!("Discarding saved progress: {e}");
                UserProgress::default()
            }
        }
    }

    pub fn save_progress(&self, data: &UserProgress) -> Result<()> {
        self.write_json(PROGRESS_FILE, data)
    }

    /// Bundle config and progress into an ExportData struct.
    pub fn export_all(&self, config: &Config) -> ExportData {
        ExportData {
            echodrill_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: config.clone(),
            progress: self.load_progress(),
        }
    }

    /// Replace stored progress with an export's.
    ///
    /// The current file is kept as `.bak` until the new one is in place, and
    /// restored if the final rename fails.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.echodrill_export_version != EXPORT_VERSION {
            return Err(StoreError::UnsupportedExportVersion {
                found: data.echodrill_export_version,
            }
            .into());
        }

        let final_path = self.file_path(PROGRESS_FILE);
        let tmp_path = final_path.with_extension("json.tmp");
        let bak_path = final_path.with_extension("json.bak");

        let json = serde_json::to_string_pretty(&data.progress)?;
        let staged = (|| -> Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            Ok(())
        })();
        if let Err(e) = staged {
            let _ = fs::remove_file(&tmp_path);
            anyhow::bail!("Import failed during staging: {e}");
        }

        let had_original = final_path.exists();
        if had_original && let Err(e) = fs::rename(&final_path, &bak_path) {
            let _ = fs::remove_file(&tmp_path);
            anyhow::bail!("Import failed during commit (backup): {e}");
        }

        if let Err(e) = fs::rename(&tmp_path, &final_path) {
            if had_original {
                let _ = fs::rename(&bak_path, &final_path);
            }
            let _ = fs::remove_file(&tmp_path);
            anyhow::bail!("Import failed during commit (rename): {e}");
        }

        if had_original {
            let _ = fs::remove_file(&bak_path);
        }
        Ok(())
    }

    /// Recover from an import that died between its two renames.
    ///
    /// A `.bak` without a progress file is the learner's previous data and is
    /// moved back into place. A `.bak` next to a progress file means the
    /// import committed, so the backup is dropped. Staged `.tmp` files are
    /// removed either way. Returns true if a backup was found.
    pub fn check_interrupted_import(&self) -> bool {
        let final_path = self.file_path(PROGRESS_FILE);
        let bak_path = final_path.with_extension("json.bak");
        let tmp_path = final_path.with_extension("json.tmp");

        if tmp_path.exists() {
            let _ = fs::remove_file(&tmp_path);
        }
        if !bak_path.exists() {
            return false;
        }

        if final_path.exists() {
            if let Err(e) = fs::remove_file(&bak_path) {
                log::warn!("Could not remove {}: {e}", bak_path.display());
            }
        } else if let Err(e) = fs::rename(&bak_path, &final_path) {
            log::warn!("Could not restore {}: {e}", bak_path.display());
        } else {
            log::info!("Restored progress from an interrupted import");
        }
        true
    }
}
