// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory scanner and database lifecycle.
//
// The scan itself is plain synchronous std I/O — a few thousand small
// text files read once. Staleness is decided purely on modification
// times: the database is rebuilt when anything under the PPD directory
// is newer than the database file, never merged incrementally.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info, instrument, warn};

use setzkasten_core::config::AgentConfig;
use setzkasten_core::error::{Result, SetzkastenError};

use crate::db::PpdDb;
use crate::info::DriverInfo;
use crate::parser::parse_ppd;

/// Result of an [`PpdIndexer::ensure_fresh`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Whether a rebuild actually ran.
    pub rebuilt: bool,
    /// Number of PPD files indexed (0 when no rebuild ran).
    pub indexed: usize,
}

/// Owns one index build: the scan root and the database file location.
///
/// The indexer holds no in-memory state between calls and provides no
/// locking; overlapping builds over the same database file are the
/// caller's responsibility to avoid.
#[derive(Debug, Clone)]
pub struct PpdIndexer {
    ppd_dir: PathBuf,
    db_path: PathBuf,
}

impl PpdIndexer {
    pub fn new(ppd_dir: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            ppd_dir: ppd_dir.into(),
            db_path: db_path.into(),
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(&config.ppd_dir, &config.db_path)
    }

    /// Scan the PPD directory and build a fresh database.
    ///
    /// Files that fail to open or are not PPDs are skipped; a directory
    /// that cannot be read aborts the whole build. Returns the database
    /// and the number of files indexed.
    #[instrument(skip(self), fields(dir = %self.ppd_dir.display()))]
    pub fn build(&self) -> Result<(PpdDb, usize)> {
        let mut db = PpdDb::new();
        let mut count = 0usize;
        self.scan_dir(&self.ppd_dir, &mut db, &mut count)?;
        info!(files = count, vendors = db.vendors.len(), "index built");
        Ok((db, count))
    }

    fn scan_dir(&self, dir: &Path, db: &mut PpdDb, count: &mut usize) -> Result<()> {
        let entries = fs::read_dir(dir)
            .map_err(|e| SetzkastenError::Scan(format!("{}: {e}", dir.display())))?;

        for entry in entries {
            let entry =
                entry.map_err(|e| SetzkastenError::Scan(format!("{}: {e}", dir.display())))?;
            let path = entry.path();
            if path.is_dir() {
                self.scan_dir(&path, db, count)?;
                continue;
            }

            let relative = path
                .strip_prefix(&self.ppd_dir)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();

            match parse_ppd(&path) {
                Ok(header) => {
                    db.insert(DriverInfo::derive(&header, &relative));
                    *count += 1;
                }
                Err(SetzkastenError::NotPpd(_)) => {
                    debug!(file = %relative, "not a PPD, skipping");
                }
                Err(e) => {
                    warn!(file = %relative, error = %e, "unreadable file, skipping");
                }
            }
        }
        Ok(())
    }

    /// Write the database to its configured path.
    ///
    /// The JSON is written to a temporary file in the same directory and
    /// renamed into place, so a failed write leaves any previous database
    /// file untouched.
    #[instrument(skip(self, db), fields(path = %self.db_path.display()))]
    pub fn save(&self, db: &PpdDb) -> Result<()> {
        let json = serde_json::to_vec_pretty(db)
            .map_err(|e| SetzkastenError::DbWrite(format!("serialize: {e}")))?;

        let tmp = self.db_path.with_extension("tmp");
        fs::write(&tmp, &json)
            .map_err(|e| SetzkastenError::DbWrite(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.db_path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            SetzkastenError::DbWrite(format!("{}: {e}", self.db_path.display()))
        })?;

        debug!(bytes = json.len(), "database written");
        Ok(())
    }

    /// Read the database back from disk.
    pub fn load(&self) -> Result<PpdDb> {
        let json = fs::read(&self.db_path)
            .map_err(|e| SetzkastenError::DbRead(format!("{}: {e}", self.db_path.display())))?;
        serde_json::from_slice(&json)
            .map_err(|e| SetzkastenError::DbRead(format!("{}: {e}", self.db_path.display())))
    }

    /// Whether the database needs rebuilding: it does not exist, or
    /// anything under the PPD directory is newer than it.
    pub fn is_stale(&self) -> Result<bool> {
        let db_mtime = match fs::metadata(&self.db_path) {
            Ok(meta) => meta.modified()?,
            Err(_) => return Ok(true),
        };
        Ok(newest_mtime(&self.ppd_dir)? > db_mtime)
    }

    /// Rebuild and save when stale or `force`d; otherwise leave the
    /// database untouched.
    #[instrument(skip(self))]
    pub fn ensure_fresh(&self, force: bool) -> Result<BuildOutcome> {
        if !force && !self.is_stale()? {
            debug!("database is current, skipping rebuild");
            return Ok(BuildOutcome {
                rebuilt: false,
                indexed: 0,
            });
        }
        let (db, count) = self.build()?;
        self.save(&db)?;
        Ok(BuildOutcome {
            rebuilt: true,
            indexed: count,
        })
    }

    /// Run [`ensure_fresh`](Self::ensure_fresh) on a background thread so
    /// the caller is not blocked on a large driver tree.
    ///
    /// No internal locking: only one build usefully runs at a time.
    pub fn spawn_build(&self, force: bool) -> std::thread::JoinHandle<Result<BuildOutcome>> {
        let indexer = self.clone();
        std::thread::spawn(move || indexer.ensure_fresh(force))
    }

    /// Parse and normalize a single PPD without touching the database.
    pub fn file_info(path: &Path) -> Result<DriverInfo> {
        let header = parse_ppd(path)?;
        let name = path.to_string_lossy();
        Ok(DriverInfo::derive(&header, &name))
    }
}

/// Newest modification time of `dir` itself and everything under it.
fn newest_mtime(dir: &Path) -> Result<SystemTime> {
    let mut newest = fs::metadata(dir)
        .map_err(|e| SetzkastenError::Scan(format!("{}: {e}", dir.display())))?
        .modified()?;

    for entry in
        fs::read_dir(dir).map_err(|e| SetzkastenError::Scan(format!("{}: {e}", dir.display())))?
    {
        let entry = entry.map_err(|e| SetzkastenError::Scan(format!("{}: {e}", dir.display())))?;
        let path = entry.path();
        let mtime = if path.is_dir() {
            newest_mtime(&path)?
        } else {
            entry.metadata()?.modified()?
        };
        newest = newest.max(mtime);
    }
    Ok(newest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const ACME_PPD: &str = "*PPD-Adobe: \"4.3\"\n\
        *Manufacturer: \"Acme\"\n\
        *ModelName: \"Acme Super 9000\"\n\
        *NickName: \"Acme Super 9000 v2\"\n\
        *LanguageVersion: English\n";

    const HP_PPD: &str = "*PPD-Adobe: \"4.3\"\n\
        *Manufacturer: \"Hewlett-Packard\"\n\
        *ModelName: \"HP LaserJet 4\"\n\
        *NickName: \"HP LaserJet 4 Postscript\"\n\
        *LanguageVersion: English\n";

    fn fixture() -> (tempfile::TempDir, PpdIndexer) {
        let tmp = tempfile::tempdir().unwrap();
        let ppd_dir = tmp.path().join("model");
        fs::create_dir_all(ppd_dir.join("sub")).unwrap();
        fs::write(ppd_dir.join("acme9000.ppd"), ACME_PPD).unwrap();
        fs::write(ppd_dir.join("sub/hp4.ppd"), HP_PPD).unwrap();

        let indexer = PpdIndexer::new(&ppd_dir, tmp.path().join("ppd_db.json"));
        (tmp, indexer)
    }

    /// Push a file's mtime into the past so staleness comparisons do not
    /// depend on filesystem timestamp granularity.
    fn backdate(path: &Path, secs: u64) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn build_indexes_all_ppds_recursively() {
        let (_tmp, indexer) = fixture();
        let (db, count) = indexer.build().unwrap();

        assert_eq!(count, 2);
        assert_eq!(db.len(), 2);
        let hp = &db.drivers("HP", "LaserJet 4").unwrap()["HP LaserJet 4 Postscript"];
        assert_eq!(hp.filename, "sub/hp4.ppd");
        assert!(db.models("ACME").is_some());
    }

    #[test]
    fn non_ppd_files_are_skipped_not_fatal() {
        let (tmp, indexer) = fixture();
        let dir = tmp.path().join("model");
        fs::write(dir.join("error.html"), "<html>404</html>").unwrap();

        let (db, count) = indexer.build().unwrap();
        assert_eq!(count, 2);
        assert_eq!(db.len(), 2);
    }

    #[test]
    fn missing_directory_aborts_build() {
        let tmp = tempfile::tempdir().unwrap();
        let indexer = PpdIndexer::new(tmp.path().join("nonexistent"), tmp.path().join("db.json"));
        assert!(matches!(
            indexer.build(),
            Err(SetzkastenError::Scan(_))
        ));
    }

    #[test]
    fn missing_database_is_stale() {
        let (_tmp, indexer) = fixture();
        assert!(indexer.is_stale().unwrap());
    }

    #[test]
    fn ensure_fresh_skips_when_current() {
        let (tmp, indexer) = fixture();
        let outcome = indexer.ensure_fresh(false).unwrap();
        assert!(outcome.rebuilt);
        assert_eq!(outcome.indexed, 2);

        // Nothing changed since the build: no-op.
        let first = fs::read(tmp.path().join("ppd_db.json")).unwrap();
        let outcome = indexer.ensure_fresh(false).unwrap();
        assert!(!outcome.rebuilt);
        assert_eq!(fs::read(tmp.path().join("ppd_db.json")).unwrap(), first);
    }

    #[test]
    fn newer_tree_triggers_rebuild() {
        let (tmp, indexer) = fixture();
        indexer.ensure_fresh(false).unwrap();

        // Equivalent to touching a PPD after the build: the database
        // file ends up older than the tree.
        backdate(&tmp.path().join("ppd_db.json"), 3600);
        assert!(indexer.is_stale().unwrap());

        let outcome = indexer.ensure_fresh(false).unwrap();
        assert!(outcome.rebuilt);
        assert_eq!(outcome.indexed, 2);
    }

    #[test]
    fn rebuild_is_byte_identical_on_unchanged_tree() {
        let (tmp, indexer) = fixture();
        indexer.ensure_fresh(true).unwrap();
        let first = fs::read(tmp.path().join("ppd_db.json")).unwrap();

        indexer.ensure_fresh(true).unwrap();
        let second = fs::read(tmp.path().join("ppd_db.json")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn load_round_trips_the_built_database() {
        let (_tmp, indexer) = fixture();
        indexer.ensure_fresh(true).unwrap();

        let loaded = indexer.load().unwrap();
        let (built, _) = indexer.build().unwrap();
        assert_eq!(loaded, built);
    }

    #[test]
    fn failed_save_leaves_previous_database_untouched() {
        let (tmp, indexer) = fixture();
        indexer.ensure_fresh(true).unwrap();
        let before = fs::read(tmp.path().join("ppd_db.json")).unwrap();

        // Point a second indexer's database into a directory that does
        // not exist; its save must fail without touching the first file.
        let broken = PpdIndexer::new(
            tmp.path().join("model"),
            tmp.path().join("missing/db.json"),
        );
        let (db, _) = broken.build().unwrap();
        assert!(matches!(broken.save(&db), Err(SetzkastenError::DbWrite(_))));

        assert_eq!(fs::read(tmp.path().join("ppd_db.json")).unwrap(), before);
    }

    #[test]
    fn spawn_build_reports_outcome() {
        let (_tmp, indexer) = fixture();
        let outcome = indexer.spawn_build(true).join().unwrap().unwrap();
        assert!(outcome.rebuilt);
        assert_eq!(outcome.indexed, 2);
    }

    #[test]
    fn file_info_parses_a_single_file() {
        let (tmp, _indexer) = fixture();
        let info = PpdIndexer::file_info(&tmp.path().join("model/sub/hp4.ppd")).unwrap();
        assert_eq!(info.vendor, "HP");
        assert_eq!(info.model, "LaserJet 4");
    }
}
