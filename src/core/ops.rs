//! Filesystem mutations on the current selection.
//!
//! Every operation snapshots the selection first, works through the snapshot
//! in selection order and clears the live selection once at the end. Checks
//! on the destination run before anything is touched; if one fails the
//! selection is left as it was.
//!
//! A failing item does not stop the batch. The remaining items are still
//! processed and the failures come back together in [ListingError::Partial].
//! None of these operations rebuild the view; call
//! [Listing::refresh](crate::core::Listing::refresh) afterwards.

use crate::core::entry::{EntryInfo, EntryKind};
use crate::core::error::{ListingError, Operation, Result};
use crate::core::listing::Listing;
use crate::utils::{expand_home_path, normalize_path};

use tracing::{info, warn};

use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

/// What a resolved destination path currently points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Missing,
    Directory,
    File,
}

impl Destination {
    /// Classifies `path`, following a final symlink the way `test -d` does.
    pub fn classify(path: &Path) -> Self {
        if fs::symlink_metadata(path).is_err() {
            Destination::Missing
        } else if path.is_dir() {
            Destination::Directory
        } else {
            Destination::File
        }
    }
}

/// Tally of a batch operation.
#[derive(Debug, Default)]
struct BatchReport {
    completed: usize,
    failures: Vec<ListingError>,
}

impl BatchReport {
    fn record(&mut self, op: Operation, path: &Path, res: Result<()>) {
        match res {
            Ok(()) => {
                info!(%op, path = %path.display(), "done");
                self.completed += 1;
            }
            Err(e) => {
                warn!(%op, path = %path.display(), error = %e, "failed");
                self.failures.push(e);
            }
        }
    }

    fn finish(self) -> Result<usize> {
        if self.failures.is_empty() {
            Ok(self.completed)
        } else {
            Err(ListingError::Partial {
                completed: self.completed,
                failures: self.failures,
            })
        }
    }
}

impl Listing {
    /// Removes every selected entry. Directories are removed recursively,
    /// everything else (symlinks included) is unlinked.
    ///
    /// Returns the number of removed entries.
    pub fn delete(&mut self) -> Result<usize> {
        let targets = self.selection_snapshot();
        if targets.is_empty() {
            return Ok(0);
        }

        let mut report = BatchReport::default();
        for entry in &targets {
            let path = self.cwd.join(entry.name());
            report.record(Operation::Delete, &path, remove_entry(entry.kind(), &path));
        }
        self.selected.clear();
        report.finish()
    }

    /// Copies the selected entries to `dest`.
    ///
    /// An existing directory receives each entry under its own name. Any
    /// other destination is a single target path and only accepts a single
    /// selected entry; an existing file there is replaced.
    pub fn copy(&mut self, dest: &str) -> Result<usize> {
        let targets = self.selection_snapshot();
        if targets.is_empty() {
            return Ok(0);
        }
        let dest = self.resolve_destination(dest)?;
        let kind = Destination::classify(&dest);
        check_single_target(&dest, kind, targets.len())?;

        let mut report = BatchReport::default();
        for entry in &targets {
            let src = self.cwd.join(entry.name());
            let res = copy_entry(entry, &src, &dest, kind);
            report.record(Operation::Copy, &src, res);
        }
        self.selected.clear();
        report.finish()
    }

    /// Moves the selected entries to `dest`, with the same destination rules
    /// as [Listing::copy]. A non-directory source replaces an existing file
    /// atomically; a directory never replaces a file.
    pub fn move_to(&mut self, dest: &str) -> Result<usize> {
        let targets = self.selection_snapshot();
        if targets.is_empty() {
            return Ok(0);
        }
        let dest = self.resolve_destination(dest)?;
        let kind = Destination::classify(&dest);
        check_single_target(&dest, kind, targets.len())?;

        let mut report = BatchReport::default();
        for entry in &targets {
            let src = self.cwd.join(entry.name());
            let res = move_entry(entry, &src, &dest, kind);
            report.record(Operation::Move, &src, res);
        }
        self.selected.clear();
        report.finish()
    }

    /// Creates the directory `name` without creating parents.
    ///
    /// Returns `Ok(false)` if a directory already exists there.
    pub fn make_directory(&mut self, name: &str) -> Result<bool> {
        let path = self.resolve_destination(name)?;
        if fs::symlink_metadata(&path).is_ok() {
            if path.is_dir() {
                return Ok(false);
            }
            return Err(ListingError::AlreadyExists {
                op: Operation::MakeDirectory,
                path,
            });
        }
        fs::create_dir(&path)
            .map_err(|e| ListingError::from_io(Operation::MakeDirectory, &path, e))?;
        info!(path = %path.display(), "directory created");
        Ok(true)
    }

    /// Resolves user input to an absolute, lexically normalised path.
    ///
    /// Trailing separators are dropped, a leading `~` expands to the home
    /// directory and relative input is taken relative to the current
    /// directory.
    pub fn resolve_destination(&self, input: &str) -> Result<PathBuf> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ListingError::invalid_destination(
                &self.cwd,
                "no destination given",
            ));
        }
        let stripped = trimmed.trim_end_matches('/');
        let raw = if stripped.is_empty() { "/" } else { stripped };
        let expanded = expand_home_path(Path::new(raw));
        Ok(normalize_path(&self.cwd.join(expanded)))
    }

    fn selection_snapshot(&self) -> Vec<EntryInfo> {
        self.selected_entries().cloned().collect()
    }
}

fn check_single_target(dest: &Path, kind: Destination, count: usize) -> Result<()> {
    if kind != Destination::Directory && count > 1 {
        return Err(ListingError::invalid_destination(
            dest,
            format!("{count} entries selected but the destination is not a directory"),
        ));
    }
    Ok(())
}

fn target_path(entry: &EntryInfo, dest: &Path, kind: Destination) -> PathBuf {
    match kind {
        Destination::Directory => dest.join(entry.name()),
        Destination::Missing | Destination::File => dest.to_path_buf(),
    }
}

fn remove_entry(kind: EntryKind, path: &Path) -> Result<()> {
    let res = if kind == EntryKind::Directory {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    res.map_err(|e| ListingError::from_io(Operation::Delete, path, e))
}

fn copy_entry(entry: &EntryInfo, src: &Path, dest: &Path, kind: Destination) -> Result<()> {
    let to = target_path(entry, dest, kind);
    if to == src {
        return Err(ListingError::invalid_destination(
            &to,
            "source and destination are the same",
        ));
    }

    match entry.kind() {
        EntryKind::Directory => {
            if lies_within(&to, src) {
                return Err(ListingError::invalid_destination(
                    &to,
                    "cannot copy a directory into itself",
                ));
            }
            if kind == Destination::File {
                remove_file(Operation::Copy, dest)?;
            } else if fs::symlink_metadata(&to).is_ok() {
                return Err(ListingError::AlreadyExists {
                    op: Operation::Copy,
                    path: to,
                });
            }
            copy_recursive(src, &to)
        }
        EntryKind::Regular | EntryKind::Symlink => {
            match fs::symlink_metadata(&to) {
                Ok(m) if m.is_dir() => {
                    return Err(ListingError::AlreadyExists {
                        op: Operation::Copy,
                        path: to,
                    });
                }
                Ok(_) => remove_file(Operation::Copy, &to)?,
                Err(_) => {}
            }
            copy_recursive(src, &to)
        }
        EntryKind::Fifo
        | EntryKind::Socket
        | EntryKind::BlockDevice
        | EntryKind::CharDevice
        | EntryKind::Unknown => Err(ListingError::UnsupportedEntryType {
            op: Operation::Copy,
            path: src.to_path_buf(),
        }),
    }
}

fn move_entry(entry: &EntryInfo, src: &Path, dest: &Path, kind: Destination) -> Result<()> {
    let to = target_path(entry, dest, kind);
    if to == src {
        return Ok(());
    }
    if entry.is_dir() && lies_within(&to, src) {
        return Err(ListingError::invalid_destination(
            &to,
            "cannot move a directory into itself",
        ));
    }

    let exists = fs::symlink_metadata(&to).is_ok();
    match kind {
        Destination::File if entry.is_dir() => {
            return Err(ListingError::AlreadyExists {
                op: Operation::Move,
                path: to,
            });
        }
        Destination::File => {}
        Destination::Directory | Destination::Missing if exists => {
            return Err(ListingError::AlreadyExists {
                op: Operation::Move,
                path: to,
            });
        }
        Destination::Directory | Destination::Missing => {}
    }

    match fs::rename(src, &to) {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == Some(libc::EXDEV) => {
            // Different filesystem: copy, then drop the original.
            if kind == Destination::File {
                remove_file(Operation::Move, &to)?;
            }
            copy_recursive(src, &to)?;
            remove_entry(entry.kind(), src)
        }
        Err(e) => Err(ListingError::from_io(Operation::Move, src, e)),
    }
}

/// Whether `path` is `dir` or somewhere below it, after resolving symlinks.
///
/// `path` may not exist yet: its deepest existing ancestor is canonicalized
/// and the missing tail appended again.
fn lies_within(path: &Path, dir: &Path) -> bool {
    if path.starts_with(dir) {
        return true;
    }
    let Ok(real_dir) = fs::canonicalize(dir) else {
        return false;
    };

    let mut base = path;
    let mut tail = Vec::new();
    loop {
        if let Ok(real) = fs::canonicalize(base) {
            let full = tail.iter().rev().fold(real, |acc, part| acc.join(part));
            return full.starts_with(&real_dir);
        }
        match (base.parent(), base.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name);
                base = parent;
            }
            _ => return false,
        }
    }
}

fn remove_file(op: Operation, path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| ListingError::from_io(op, path, e))
}

/// Recursively copies `src` to `dest`, recreating symlinks as links instead
/// of copying what they point to. `dest` must not exist yet.
///
/// Directory permissions are applied after their contents are copied so
/// read-only directories can still be filled.
pub fn copy_recursive(src: &Path, dest: &Path) -> Result<()> {
    let meta =
        fs::symlink_metadata(src).map_err(|e| ListingError::from_io(Operation::Copy, src, e))?;
    let ft = meta.file_type();

    if ft.is_symlink() {
        let target =
            fs::read_link(src).map_err(|e| ListingError::from_io(Operation::Copy, src, e))?;
        symlink(&target, dest).map_err(|e| ListingError::from_io(Operation::Copy, dest, e))
    } else if ft.is_dir() {
        fs::create_dir(dest).map_err(|e| ListingError::from_io(Operation::Copy, dest, e))?;
        let entries =
            fs::read_dir(src).map_err(|e| ListingError::from_io(Operation::Copy, src, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| ListingError::from_io(Operation::Copy, src, e))?;
            copy_recursive(&entry.path(), &dest.join(entry.file_name()))?;
        }
        fs::set_permissions(dest, meta.permissions())
            .map_err(|e| ListingError::from_io(Operation::Copy, dest, e))
    } else if ft.is_file() {
        fs::copy(src, dest).map(|_| ()).map_err(|e| {
            // Blame whichever side is actually broken.
            let at = if fs::symlink_metadata(src).is_ok() { dest } else { src };
            ListingError::from_io(Operation::Copy, at, e)
        })
    } else {
        Err(ListingError::UnsupportedEntryType {
            op: Operation::Copy,
            path: src.to_path_buf(),
        })
    }
}
