//! File Operations Engine: the filesystem work behind the `folder`, `trash`
//! and `date` instructions.
//!
//! Every operation scans only the immediate entries of the given directory,
//! skips subdirectories, and keeps going when a single file fails: the
//! failure is reported on `out` and the rest of the batch still runs.

use crate::config::ExtensionMap;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Immediate plain-file entries of `dir`, in directory order.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Lowercased extension of `path`, if it has one.
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

/// Move `file` into the subfolder `folder` of `dir`, creating the subfolder
/// on first use. Refuses to overwrite an existing destination file.
fn move_into(dir: &Path, file: &Path, folder: &str) -> Result<()> {
    let dest_dir = dir.join(folder);
    if !dest_dir.is_dir() {
        fs::create_dir(&dest_dir)?;
    }

    let name = file
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("{} has no file name", file.display()))?;
    let dest = dest_dir.join(name);
    if dest.exists() {
        anyhow::bail!("{} already exists", dest.display());
    }

    fs::rename(file, &dest)?;
    debug!(from = %file.display(), to = %dest.display(), "moved");
    Ok(())
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Sort the files of `dir` into subfolders according to the extension map.
/// Files whose extension is unmapped, or that have no extension, stay where
/// they are.
pub fn folder_sort(dir: &Path, map: &ExtensionMap, out: &mut dyn Write) -> Result<()> {
    let mut moved = 0usize;
    let mut ignored = 0usize;

    for file in list_files(dir)? {
        let folder = extension_of(&file).and_then(|ext| map.folder_for(&ext).map(str::to_owned));
        match folder {
            Some(folder) => match move_into(dir, &file, &folder) {
                Ok(()) => {
                    writeln!(out, "{} -> {}/", file_name_lossy(&file), folder)?;
                    moved += 1;
                }
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "folder sort skipped a file");
                    writeln!(out, "Could not move {}: {}", file_name_lossy(&file), e)?;
                }
            },
            None => ignored += 1,
        }
    }

    writeln!(out, "Sorted {moved} file(s), left {ignored} unrecognized file(s) in place.")?;
    Ok(())
}

/// Age of `file` since last modification, or `None` when the filesystem
/// can't say (mtime in the future included).
fn age_of(file: &Path) -> Option<Duration> {
    let modified = fs::metadata(file).and_then(|m| m.modified()).ok()?;
    SystemTime::now().duration_since(modified).ok()
}

/// Permanently delete every file of `dir` whose extension is in the map and
/// whose last modification is more than `days` days old. There is no
/// recovery for deleted files.
pub fn trash_videos(days: u64, dir: &Path, map: &ExtensionMap, out: &mut dyn Write) -> Result<()> {
    // A threshold too large to express means no file is old enough.
    let threshold = days
        .checked_mul(SECONDS_PER_DAY)
        .map(Duration::from_secs)
        .unwrap_or(Duration::MAX);
    let mut deleted = 0usize;

    for file in list_files(dir)? {
        let recognized = extension_of(&file)
            .map(|ext| map.folder_for(&ext).is_some())
            .unwrap_or(false);
        if !recognized {
            continue;
        }

        let Some(age) = age_of(&file) else {
            warn!(file = %file.display(), "no usable modification time, skipping");
            continue;
        };
        if age <= threshold {
            continue;
        }

        match fs::remove_file(&file) {
            Ok(()) => {
                debug!(file = %file.display(), "deleted");
                writeln!(out, "Deleted {}", file_name_lossy(&file))?;
                deleted += 1;
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "trash skipped a file");
                writeln!(out, "Could not delete {}: {}", file_name_lossy(&file), e)?;
            }
        }
    }

    writeln!(out, "Deleted {deleted} file(s) older than {days} day(s).")?;
    Ok(())
}

/// Move each file of `dir` into a subfolder named after its last
/// modification date, `YYYY-MM-DD` in local time.
pub fn sort_by_date(dir: &Path, out: &mut dyn Write) -> Result<()> {
    let mut moved = 0usize;

    for file in list_files(dir)? {
        let Some(modified) = fs::metadata(&file).and_then(|m| m.modified()).ok() else {
            warn!(file = %file.display(), "no usable modification time, skipping");
            writeln!(out, "Could not read the modification time of {}", file_name_lossy(&file))?;
            continue;
        };
        let folder = DateTime::<Local>::from(modified).format("%Y-%m-%d").to_string();

        match move_into(dir, &file, &folder) {
            Ok(()) => {
                writeln!(out, "{} -> {}/", file_name_lossy(&file), folder)?;
                moved += 1;
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "date sort skipped a file");
                writeln!(out, "Could not move {}: {}", file_name_lossy(&file), e)?;
            }
        }
    }

    writeln!(out, "Moved {moved} file(s) into dated folders.")?;
    Ok(())
}
