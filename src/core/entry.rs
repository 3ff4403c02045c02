//! Per-entry metadata for fnav.
//!
//! Provides the [EntryInfo] snapshot shown on every listing row, the closed
//! [EntryKind] classification and the formatting helpers for sizes, times and
//! permission strings.

use crate::core::error::{ListingError, Operation, Result};
use crate::core::identity::IdentityLookup;

use chrono::DateTime;

use std::borrow::Cow;
use std::ffi::{CString, OsStr, OsString};
use std::fs::{self, Metadata};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

// File type bits of st_mode
const S_IFMT: u32 = 0o170000;
const S_IFSOCK: u32 = 0o140000;
const S_IFLNK: u32 = 0o120000;
const S_IFREG: u32 = 0o100000;
const S_IFBLK: u32 = 0o060000;
const S_IFDIR: u32 = 0o040000;
const S_IFCHR: u32 = 0o020000;
const S_IFIFO: u32 = 0o010000;

/// Unit suffixes for [format_size], one per power of 1024.
const SIZE_UNITS: [&str; 9] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y"];

/// The kind of filesystem object an entry is, as seen by lstat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    BlockDevice,
    CharDevice,
    Fifo,
    Socket,
    Symlink,
    Regular,
    Unknown,
}

impl EntryKind {
    /// Classifies raw mode bits. Checked in the order directory, block device,
    /// char device, fifo, socket, symlink, regular.
    pub fn from_mode(mode: u32) -> Self {
        let fmt = mode & S_IFMT;
        [
            (S_IFDIR, EntryKind::Directory),
            (S_IFBLK, EntryKind::BlockDevice),
            (S_IFCHR, EntryKind::CharDevice),
            (S_IFIFO, EntryKind::Fifo),
            (S_IFSOCK, EntryKind::Socket),
            (S_IFLNK, EntryKind::Symlink),
            (S_IFREG, EntryKind::Regular),
        ]
        .into_iter()
        .find_map(|(bits, kind)| (fmt == bits).then_some(kind))
        .unwrap_or(EntryKind::Unknown)
    }

    /// The single `ls -l` type character.
    pub fn as_char(self) -> char {
        match self {
            EntryKind::Directory => 'd',
            EntryKind::BlockDevice => 'b',
            EntryKind::CharDevice => 'c',
            EntryKind::Fifo => 'p',
            EntryKind::Socket => 's',
            EntryKind::Symlink => 'l',
            EntryKind::Regular => '-',
            EntryKind::Unknown => '?',
        }
    }
}

/// Colour class of an entry, keyed like `LS_COLORS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorClass {
    Directory,
    Symlink,
    File,
    Pipe,
    Socket,
    BlockDevice,
    CharDevice,
    Executable,
    Unknown,
}

impl ColorClass {
    /// The `LS_COLORS` key for this class.
    pub fn key(self) -> &'static str {
        match self {
            ColorClass::Directory => "di",
            ColorClass::Symlink => "ln",
            ColorClass::File => "fi",
            ColorClass::Pipe => "pi",
            ColorClass::Socket => "so",
            ColorClass::BlockDevice => "bd",
            ColorClass::CharDevice => "cd",
            ColorClass::Executable => "ex",
            ColorClass::Unknown => "no",
        }
    }
}

/// Metadata snapshot of a single path, taken with one lstat call.
///
/// Nothing in here is refreshed after construction. Owner/group names and
/// access checks are resolved each time they are asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    dir: PathBuf,
    name: OsString,
    ext: String,
    mode: u32,
    uid: u32,
    gid: u32,
    size: u64,
    atime: i64,
    mtime: i64,
    ctime: i64,
}

impl EntryInfo {
    /// Stats `path` without following a final symlink.
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = fs::symlink_metadata(path)
            .map_err(|e| ListingError::from_io(Operation::Stat, path, e))?;
        Ok(Self::from_metadata(path, &meta))
    }

    /// Builds the snapshot from metadata the caller already holds.
    pub fn from_metadata(path: &Path, meta: &Metadata) -> Self {
        let name = path.file_name().unwrap_or_default().to_os_string();
        let ext = Path::new(&name)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        EntryInfo {
            dir: path.parent().unwrap_or_else(|| Path::new("")).to_path_buf(),
            name,
            ext,
            mode: meta.mode(),
            uid: meta.uid(),
            gid: meta.gid(),
            size: meta.size(),
            atime: meta.atime(),
            mtime: meta.mtime(),
            ctime: meta.ctime(),
        }
    }

    // Accessors

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_str(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    /// Extension without the leading dot, empty if there is none.
    #[inline]
    pub fn ext(&self) -> &str {
        &self.ext
    }

    #[inline]
    pub fn mode(&self) -> u32 {
        self.mode
    }

    #[inline]
    pub fn uid(&self) -> u32 {
        self.uid
    }

    #[inline]
    pub fn gid(&self) -> u32 {
        self.gid
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn atime(&self) -> i64 {
        self.atime
    }

    #[inline]
    pub fn mtime(&self) -> i64 {
        self.mtime
    }

    #[inline]
    pub fn ctime(&self) -> i64 {
        self.ctime
    }

    /// Full path of the entry.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    // Derived values

    #[inline]
    pub fn kind(&self) -> EntryKind {
        EntryKind::from_mode(self.mode)
    }

    /// Single-character type marker as printed by `ls -l`.
    #[inline]
    pub fn kind_char(&self) -> char {
        self.kind().as_char()
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind() == EntryKind::Directory
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.name.as_bytes().first() == Some(&b'.')
    }

    pub fn permissions(&self) -> String {
        format_permissions(self.mode)
    }

    pub fn human_size(&self) -> String {
        format_size(self.size)
    }

    pub fn modified_time(&self) -> String {
        format_time(self.mtime)
    }

    pub fn accessed_time(&self) -> String {
        format_time(self.atime)
    }

    pub fn changed_time(&self) -> String {
        format_time(self.ctime)
    }

    /// Owner name, or the numeric uid when the lookup has no answer.
    pub fn owner(&self, ids: &dyn IdentityLookup) -> String {
        ids.user_name(self.uid)
            .unwrap_or_else(|| self.uid.to_string())
    }

    /// Group name, or the numeric gid when the lookup has no answer.
    pub fn group(&self, ids: &dyn IdentityLookup) -> String {
        ids.group_name(self.gid)
            .unwrap_or_else(|| self.gid.to_string())
    }

    pub fn readable(&self) -> bool {
        access(&self.path(), libc::R_OK)
    }

    pub fn writable(&self) -> bool {
        access(&self.path(), libc::W_OK)
    }

    pub fn executable(&self) -> bool {
        access(&self.path(), libc::X_OK)
    }

    /// A regular file the current user may execute.
    pub fn is_binary(&self) -> bool {
        self.kind() == EntryKind::Regular && self.executable()
    }

    pub fn color_class(&self) -> ColorClass {
        if self.is_binary() {
            return ColorClass::Executable;
        }
        match self.kind() {
            EntryKind::Directory => ColorClass::Directory,
            EntryKind::Symlink => ColorClass::Symlink,
            EntryKind::Regular => ColorClass::File,
            EntryKind::Fifo => ColorClass::Pipe,
            EntryKind::Socket => ColorClass::Socket,
            EntryKind::BlockDevice => ColorClass::BlockDevice,
            EntryKind::CharDevice => ColorClass::CharDevice,
            EntryKind::Unknown => ColorClass::Unknown,
        }
    }

    /// The `ls -lh` style attribute column for this entry, without the name.
    pub fn row(&self, ids: &dyn IdentityLookup) -> String {
        format!(
            "{}{} {:>8} {:>8} {:>7} {}",
            self.kind_char(),
            self.permissions(),
            self.owner(ids),
            self.group(ids),
            self.human_size(),
            self.modified_time()
        )
    }
}

/// Formats the nine permission bits as `rwxr-xr-x`.
pub fn format_permissions(mode: u32) -> String {
    let mut chars = ['-'; 9];
    for (i, shift) in [6u32, 3, 0].into_iter().enumerate() {
        let base = i * 3;
        if (mode >> (shift + 2)) & 1 != 0 {
            chars[base] = 'r';
        }
        if (mode >> (shift + 1)) & 1 != 0 {
            chars[base + 1] = 'w';
        }
        if (mode >> shift) & 1 != 0 {
            chars[base + 2] = 'x';
        }
    }
    chars.iter().collect()
}

/// Formats a byte count in powers of 1024 with one decimal place.
///
/// `0` is rendered as `"0"`, everything else as value plus unit suffix,
/// e.g. `1023.0`, `1.0K`, `1.5M`.
pub fn format_size(size: u64) -> String {
    if size == 0 {
        return "0".to_string();
    }
    let mut base = 0usize;
    let mut scale = 1u128;
    while base + 1 < SIZE_UNITS.len() && u128::from(size) >= scale * 1024 {
        scale *= 1024;
        base += 1;
    }
    let value = size as f64 / scale as f64;
    format!("{:.1}{}", value, SIZE_UNITS[base])
}

/// Formats epoch seconds as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_time(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn access(path: &Path, how: libc::c_int) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string that outlives the call.
    unsafe { libc::access(c_path.as_ptr(), how) == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::os::unix::fs::{PermissionsExt, symlink};
    use tempfile::TempDir;

    struct NoIdentity;

    impl IdentityLookup for NoIdentity {
        fn user_name(&self, _uid: u32) -> Option<String> {
            None
        }
        fn group_name(&self, _gid: u32) -> Option<String> {
            None
        }
    }

    struct FixedIdentity;

    impl IdentityLookup for FixedIdentity {
        fn user_name(&self, _uid: u32) -> Option<String> {
            Some("alice".into())
        }
        fn group_name(&self, _gid: u32) -> Option<String> {
            Some("staff".into())
        }
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(0), "0");
        assert_eq!(format_size(1), "1.0");
        assert_eq!(format_size(1023), "1023.0");
        assert_eq!(format_size(1024), "1.0K");
        assert_eq!(format_size(1536), "1.5K");
        assert_eq!(format_size(1048576), "1.0M");
        assert_eq!(format_size(1 << 30), "1.0G");
        assert_eq!(format_size(u64::MAX), "16.0E");
    }

    #[test]
    fn time_formatting_is_utc() {
        assert_eq!(format_time(0), "1970-01-01 00:00:00");
        assert_eq!(format_time(1_266_537_600), "2010-02-19 00:00:00");
    }

    #[test]
    fn permission_string() {
        assert_eq!(format_permissions(0o755), "rwxr-xr-x");
        assert_eq!(format_permissions(0o100644), "rw-r--r--");
        assert_eq!(format_permissions(0o000), "---------");
        assert_eq!(format_permissions(0o777), "rwxrwxrwx");
    }

    #[test]
    fn kind_from_mode() {
        assert_eq!(EntryKind::from_mode(0o040755), EntryKind::Directory);
        assert_eq!(EntryKind::from_mode(0o100644), EntryKind::Regular);
        assert_eq!(EntryKind::from_mode(0o120777), EntryKind::Symlink);
        assert_eq!(EntryKind::from_mode(0o010644), EntryKind::Fifo);
        assert_eq!(EntryKind::from_mode(0o140755), EntryKind::Socket);
        assert_eq!(EntryKind::from_mode(0o060660), EntryKind::BlockDevice);
        assert_eq!(EntryKind::from_mode(0o020620), EntryKind::CharDevice);
        assert_eq!(EntryKind::from_mode(0o000644), EntryKind::Unknown);
        assert_eq!(EntryKind::Unknown.as_char(), '?');
    }

    #[test]
    fn regular_file_snapshot() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("notes.tar.gz");
        let mut file = File::create(&path)?;
        write!(file, "hello")?;
        drop(file);

        let info = EntryInfo::from_path(&path)?;
        assert_eq!(info.kind(), EntryKind::Regular);
        assert_eq!(info.name_str(), "notes.tar.gz");
        assert_eq!(info.ext(), "gz");
        assert_eq!(info.dir(), tmp.path());
        assert_eq!(info.path(), path);
        assert_eq!(info.size(), 5);
        assert_eq!(info.human_size(), "5.0");
        assert!(info.readable());
        assert!(!info.is_hidden());
        Ok(())
    }

    #[test]
    fn symlink_is_not_followed() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        let target = tmp.path().join("dir");
        fs::create_dir(&target)?;
        let link = tmp.path().join("link");
        symlink(&target, &link)?;

        let info = EntryInfo::from_path(&link)?;
        assert_eq!(info.kind(), EntryKind::Symlink);
        assert_eq!(info.color_class(), ColorClass::Symlink);
        assert!(!info.is_dir());
        Ok(())
    }

    #[test]
    fn executable_file_is_binary() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("run.sh");
        fs::write(&path, "#!/bin/sh\n")?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;

        let info = EntryInfo::from_path(&path)?;
        assert_eq!(info.permissions(), "rwxr-xr-x");
        assert!(info.is_binary());
        assert_eq!(info.color_class(), ColorClass::Executable);
        assert_eq!(info.color_class().key(), "ex");

        let dir_info = EntryInfo::from_path(tmp.path())?;
        assert!(!dir_info.is_binary(), "directories are never binaries");
        assert_eq!(dir_info.color_class().key(), "di");
        Ok(())
    }

    #[test]
    fn identity_falls_back_to_numeric_ids() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("a");
        File::create(&path)?;

        let info = EntryInfo::from_path(&path)?;
        assert_eq!(info.owner(&NoIdentity), info.uid().to_string());
        assert_eq!(info.group(&NoIdentity), info.gid().to_string());
        assert_eq!(info.owner(&FixedIdentity), "alice");

        let row = info.row(&FixedIdentity);
        assert!(row.starts_with("-rw"), "got {row}");
        assert!(row.contains("   alice    staff"), "got {row}");
        assert!(row.ends_with(&info.modified_time()));
        Ok(())
    }

    #[test]
    fn missing_path_is_not_found() {
        let err = EntryInfo::from_path(Path::new("/path/does/not/exist"));
        assert!(matches!(
            err,
            Err(ListingError::NotFound {
                op: Operation::Stat,
                ..
            })
        ));
    }
}
