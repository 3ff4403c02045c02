//! Directory listing state for fnav.
//!
//! [Listing] owns the current directory, the sorted and filtered view of its
//! entries, the parallel name sequence and the multi-selection. The mutation
//! operations that act on the selection live in [ops](crate::core::ops).
//!
//! The view is a snapshot: nothing here watches the filesystem. Callers run
//! [Listing::refresh] whenever they want the directory state reflected again.

use crate::core::entry::EntryInfo;
use crate::core::error::{ListingError, Operation, Result};
use crate::core::identity::{IdentityLookup, SystemIdentity};
use crate::utils::{expand_home_path, normalize_path};

use regex::Regex;
use tracing::{debug, warn};

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// The active sort key. Exactly one is in effect at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Case-insensitive name, ascending.
    #[default]
    Name,
    /// Modification time, newest first, ties broken by name.
    Time,
}

/// Listing switches, modelled on the `ls -atr` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListingOptions {
    pub show_hidden: bool,
    pub sort: SortKey,
    pub reverse: bool,
}

impl ListingOptions {
    /// Parses an `ls` style flag string: `a` shows hidden entries, `t` sorts
    /// by time, `r` reverses. Other characters are ignored.
    pub fn from_flags(flags: &str) -> Self {
        let mut opts = ListingOptions::default();
        for c in flags.chars() {
            match c {
                'a' => opts.show_hidden = true,
                't' => opts.sort = SortKey::Time,
                'r' => opts.reverse = true,
                _ => {}
            }
        }
        opts
    }

    /// Renders the options back into an `ls` style flag string.
    pub fn flags(&self) -> String {
        let mut out = String::with_capacity(3);
        if self.show_hidden {
            out.push('a');
        }
        if self.sort == SortKey::Time {
            out.push('t');
        }
        if self.reverse {
            out.push('r');
        }
        out
    }
}

/// Directory listing with sorting, filtering and multi-selection.
pub struct Listing {
    pub(super) cwd: PathBuf,
    pub(super) view: Vec<EntryInfo>,
    pub(super) names: Vec<OsString>,
    pub(super) selected: Vec<usize>,
    pub(super) options: ListingOptions,
    pub(super) filter: Option<Regex>,
    pub(super) filter_src: String,
    pub(super) skipped: Vec<OsString>,
    pub(super) identity: Box<dyn IdentityLookup>,
}

impl fmt::Debug for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listing")
            .field("cwd", &self.cwd)
            .field("entries", &self.view.len())
            .field("selected", &self.selected)
            .field("options", &self.options)
            .field("filter", &self.filter_src)
            .finish()
    }
}

impl Listing {
    /// Creates an empty listing rooted at `dir`. Call [Listing::refresh] to
    /// populate it.
    pub fn new(dir: &Path) -> Result<Self> {
        Self::with_options(dir, ListingOptions::default())
    }

    pub fn with_options(dir: &Path, options: ListingOptions) -> Result<Self> {
        let cwd = absolute_dir(dir)?;
        Ok(Listing {
            cwd,
            view: Vec::new(),
            names: Vec::new(),
            selected: Vec::new(),
            options,
            filter: None,
            filter_src: String::new(),
            skipped: Vec::new(),
            identity: Box::new(SystemIdentity),
        })
    }

    /// Replaces the owner/group lookup used when rendering rows.
    pub fn with_identity(mut self, identity: Box<dyn IdentityLookup>) -> Self {
        self.identity = identity;
        self
    }

    // Accessors

    #[inline]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    #[inline]
    pub fn view(&self) -> &[EntryInfo] {
        &self.view
    }

    #[inline]
    pub fn names(&self) -> &[OsString] {
        &self.names
    }

    /// Selected view indices in the order they were selected.
    #[inline]
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    #[inline]
    pub fn options(&self) -> ListingOptions {
        self.options
    }

    /// The active filter pattern, empty when no filter is set.
    #[inline]
    pub fn filter(&self) -> &str {
        &self.filter_src
    }

    /// Names dropped by the last refresh because they could not be stat'ed.
    #[inline]
    pub fn skipped(&self) -> &[OsString] {
        &self.skipped
    }

    #[inline]
    pub fn identity(&self) -> &dyn IdentityLookup {
        self.identity.as_ref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&EntryInfo> {
        self.view.get(index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Selected entries in selection order.
    pub fn selected_entries(&self) -> impl Iterator<Item = &EntryInfo> + '_ {
        self.selected.iter().filter_map(|&i| self.view.get(i))
    }

    // Option setters. None of these touch the filesystem.

    pub fn set_options(&mut self, options: ListingOptions) {
        self.options = options;
    }

    pub fn set_show_hidden(&mut self, show: bool) {
        self.options.show_hidden = show;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.options.sort = sort;
    }

    pub fn set_reverse(&mut self, reverse: bool) {
        self.options.reverse = reverse;
    }

    pub fn toggle_hidden(&mut self) {
        self.options.show_hidden = !self.options.show_hidden;
    }

    pub fn toggle_sort(&mut self) {
        self.options.sort = match self.options.sort {
            SortKey::Name => SortKey::Time,
            SortKey::Time => SortKey::Name,
        };
    }

    pub fn toggle_reverse(&mut self) {
        self.options.reverse = !self.options.reverse;
    }

    /// Sets the name filter. The pattern must match at the start of a name;
    /// an empty pattern removes the filter. Invalid patterns leave the
    /// current filter in place.
    pub fn set_filter(&mut self, pattern: &str) -> Result<()> {
        if pattern.is_empty() {
            self.clear_filter();
            return Ok(());
        }
        let re = Regex::new(&format!("^(?:{pattern})"))?;
        self.filter = Some(re);
        self.filter_src = pattern.to_string();
        Ok(())
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.filter_src.clear();
    }

    // Refresh

    /// Rebuilds the view from the current directory.
    ///
    /// Hidden names are dropped first, then the filter is applied, then the
    /// sort key and the reverse flag. Selected entries that are still present
    /// stay selected at their new position; the rest are deselected.
    /// On error the previous view is kept unchanged.
    pub fn refresh(&mut self) -> Result<()> {
        let read = fs::read_dir(&self.cwd)
            .map_err(|e| ListingError::from_io(Operation::List, &self.cwd, e))?;

        let mut names = Vec::new();
        for entry in read {
            match entry {
                Ok(e) => names.push(e.file_name()),
                Err(e) => warn!(dir = %self.cwd.display(), error = %e, "skipping unreadable entry"),
            }
        }

        if !self.options.show_hidden {
            names.retain(|n| !is_hidden_name(n));
        }
        if let Some(re) = &self.filter {
            names.retain(|n| re.is_match(&n.to_string_lossy()));
        }

        let mut skipped = Vec::new();
        let mut view = match self.options.sort {
            SortKey::Name => {
                names.sort_by_cached_key(|n| (sort_key(n), n.clone()));
                self.stat_all(names, &mut skipped)
            }
            SortKey::Time => {
                let mut view = self.stat_all(names, &mut skipped);
                view.sort_by_cached_key(|e| {
                    (std::cmp::Reverse(e.mtime()), sort_key(e.name()), e.name().to_os_string())
                });
                view
            }
        };
        if self.options.reverse {
            view.reverse();
        }

        let names: Vec<OsString> = view.iter().map(|e| e.name().to_os_string()).collect();
        let selected = remap_selection(&self.selected, &self.names, &names);

        debug!(
            dir = %self.cwd.display(),
            entries = view.len(),
            skipped = skipped.len(),
            selected = selected.len(),
            "listing refreshed"
        );

        self.view = view;
        self.names = names;
        self.selected = selected;
        self.skipped = skipped;
        Ok(())
    }

    fn stat_all(&self, names: Vec<OsString>, skipped: &mut Vec<OsString>) -> Vec<EntryInfo> {
        let mut view = Vec::with_capacity(names.len());
        for name in names {
            match EntryInfo::from_path(&self.cwd.join(&name)) {
                Ok(info) => view.push(info),
                Err(e) => {
                    warn!(error = %e, "entry vanished during listing");
                    skipped.push(name);
                }
            }
        }
        view
    }

    // Selection

    /// Adds `index` to the selection, or removes it if already selected.
    /// Indices outside the view are ignored and return `false`.
    pub fn toggle_select(&mut self, index: usize) -> bool {
        if index >= self.view.len() {
            return false;
        }
        if let Some(pos) = self.selected.iter().position(|&i| i == index) {
            self.selected.remove(pos);
        } else {
            self.selected.push(index);
        }
        true
    }

    /// Selects every entry, or clears the selection if everything is
    /// already selected.
    pub fn select_all(&mut self) {
        if self.selected.len() == self.view.len() {
            self.selected.clear();
        } else {
            self.selected = (0..self.view.len()).collect();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    // Navigation

    /// Retargets the listing at `dir` (relative paths resolve against the
    /// current directory), clears the selection and refreshes.
    /// On failure the listing stays where it was.
    pub fn change_dir(&mut self, dir: &Path) -> Result<()> {
        let target = normalize_path(&self.cwd.join(expand_home_path(dir)));
        if !target.is_dir() {
            return match fs::metadata(&target) {
                Err(e) => Err(ListingError::from_io(Operation::Navigate, &target, e)),
                Ok(_) => Err(ListingError::NotADirectory { path: target }),
            };
        }

        let prev_dir = std::mem::replace(&mut self.cwd, target);
        let prev_selection = std::mem::take(&mut self.selected);
        if let Err(e) = self.refresh() {
            self.cwd = prev_dir;
            self.selected = prev_selection;
            return Err(e);
        }
        debug!(dir = %self.cwd.display(), "changed directory");
        Ok(())
    }

    /// Descends into the entry at `index` if it is a directory or a link to
    /// one. Returns `false` for anything else.
    pub fn enter(&mut self, index: usize) -> Result<bool> {
        let Some(entry) = self.view.get(index) else {
            return Ok(false);
        };
        let path = self.cwd.join(entry.name());
        if !path.is_dir() {
            return Ok(false);
        }
        self.change_dir(&path)?;
        Ok(true)
    }

    /// Moves to the parent directory. Returns the name of the directory that
    /// was left so the caller can put the cursor back on it.
    pub fn go_parent(&mut self) -> Result<Option<OsString>> {
        let Some(parent) = self.cwd.parent().map(Path::to_path_buf) else {
            return Ok(None);
        };
        let left = self.cwd.file_name().map(OsStr::to_os_string);
        self.change_dir(&parent)?;
        Ok(left)
    }

    /// View index of the entry called `name`.
    pub fn position(&self, name: &OsStr) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    let abs = std::path::absolute(dir)
        .map_err(|e| ListingError::from_io(Operation::Navigate, dir, e))?;
    let abs = normalize_path(&abs);
    match fs::metadata(&abs) {
        Ok(m) if m.is_dir() => Ok(abs),
        Ok(_) => Err(ListingError::NotADirectory { path: abs }),
        Err(e) => Err(ListingError::from_io(Operation::Navigate, &abs, e)),
    }
}

fn is_hidden_name(name: &OsStr) -> bool {
    name.as_bytes().first() == Some(&b'.')
}

fn sort_key(name: &OsStr) -> String {
    name.to_string_lossy().to_lowercase()
}

/// Carries selected names over from the old name sequence to the new one,
/// keeping selection order.
fn remap_selection(selected: &[usize], old: &[OsString], new: &[OsString]) -> Vec<usize> {
    if selected.is_empty() {
        return Vec::new();
    }
    let positions: HashMap<&OsStr, usize> = new
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_os_str(), i))
        .collect();
    selected
        .iter()
        .filter_map(|&i| old.get(i))
        .filter_map(|name| positions.get(name.as_os_str()).copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rng;
    use rand::seq::SliceRandom;
    use std::error;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn touch_with_mtime(path: &Path, secs_ago: u64) -> Result<(), Box<dyn error::Error>> {
        let file = File::create(path)?;
        file.set_modified(SystemTime::now() - Duration::from_secs(secs_ago))?;
        Ok(())
    }

    fn names_of(listing: &Listing) -> Vec<String> {
        listing
            .names()
            .iter()
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn flags_round_trip() {
        let opts = ListingOptions::from_flags("atr");
        assert!(opts.show_hidden);
        assert_eq!(opts.sort, SortKey::Time);
        assert!(opts.reverse);
        assert_eq!(opts.flags(), "atr");

        let opts = ListingOptions::from_flags("xr");
        assert_eq!(opts, ListingOptions { reverse: true, ..Default::default() });
        assert_eq!(ListingOptions::default().flags(), "");
    }

    #[test]
    fn name_sort_is_case_insensitive() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let mut names = vec!["banana", "Apple", "cherry", "apricot", ".hidden"];
        names.shuffle(&mut rng());
        for n in &names {
            File::create(dir.path().join(n))?;
        }

        let mut listing = Listing::new(dir.path())?;
        listing.refresh()?;
        assert_eq!(names_of(&listing), ["Apple", "apricot", "banana", "cherry"]);

        listing.set_show_hidden(true);
        listing.refresh()?;
        assert_eq!(
            names_of(&listing),
            [".hidden", "Apple", "apricot", "banana", "cherry"]
        );

        listing.set_reverse(true);
        listing.refresh()?;
        assert_eq!(
            names_of(&listing),
            ["cherry", "banana", "apricot", "Apple", ".hidden"]
        );
        Ok(())
    }

    #[test]
    fn time_sort_newest_first_with_name_tiebreak() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        touch_with_mtime(&dir.path().join("old"), 3000)?;
        touch_with_mtime(&dir.path().join("new"), 10)?;
        let tie = SystemTime::now() - Duration::from_secs(500);
        for n in ["b_mid", "A_mid"] {
            File::create(dir.path().join(n))?.set_modified(tie)?;
        }

        let mut listing = Listing::with_options(dir.path(), ListingOptions::from_flags("t"))?;
        listing.refresh()?;
        assert_eq!(names_of(&listing), ["new", "A_mid", "b_mid", "old"]);

        listing.toggle_reverse();
        listing.refresh()?;
        assert_eq!(names_of(&listing), ["old", "b_mid", "A_mid", "new"]);
        Ok(())
    }

    #[test]
    fn filter_matches_prefix_only() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        for n in ["main.rs", "lib.rs", "domain.rs", "mainframe.txt"] {
            File::create(dir.path().join(n))?;
        }

        let mut listing = Listing::new(dir.path())?;
        listing.set_filter("main")?;
        listing.refresh()?;
        assert_eq!(names_of(&listing), ["main.rs", "mainframe.txt"]);

        listing.set_filter(r".*\.rs")?;
        listing.refresh()?;
        assert_eq!(names_of(&listing), ["domain.rs", "lib.rs", "main.rs"]);

        assert!(listing.set_filter("(").is_err());
        assert_eq!(listing.filter(), r".*\.rs", "bad pattern keeps the old filter");

        listing.set_filter("")?;
        listing.refresh()?;
        assert_eq!(listing.len(), 4);
        Ok(())
    }

    #[test]
    fn view_and_names_stay_aligned() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        for i in 0..20 {
            File::create(dir.path().join(format!("f{i:02}")))?;
        }
        let mut listing = Listing::new(dir.path())?;
        for flags in ["", "t", "r", "tr", "a"] {
            listing.set_options(ListingOptions::from_flags(flags));
            listing.refresh()?;
            assert_eq!(listing.view().len(), listing.names().len());
            for (entry, name) in listing.view().iter().zip(listing.names()) {
                assert_eq!(entry.name(), name.as_os_str());
            }
        }
        Ok(())
    }

    #[test]
    fn toggle_select_is_its_own_inverse() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        for n in ["a", "b", "c"] {
            File::create(dir.path().join(n))?;
        }
        let mut listing = Listing::new(dir.path())?;
        listing.refresh()?;

        assert!(listing.toggle_select(1));
        assert_eq!(listing.selected(), &[1]);
        assert!(listing.toggle_select(1));
        assert!(listing.selected().is_empty());

        assert!(!listing.toggle_select(3), "out of range index is ignored");
        assert!(listing.selected().is_empty());
        Ok(())
    }

    #[test]
    fn select_all_toggles() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        for n in ["a", "b", "c"] {
            File::create(dir.path().join(n))?;
        }
        let mut listing = Listing::new(dir.path())?;
        listing.refresh()?;

        listing.select_all();
        assert_eq!(listing.selected(), &[0, 1, 2]);
        listing.select_all();
        assert!(listing.selected().is_empty());

        listing.toggle_select(2);
        listing.select_all();
        assert_eq!(listing.selected(), &[0, 1, 2], "partial selection fills up");
        Ok(())
    }

    #[test]
    fn refresh_remaps_selection_by_name() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        for n in ["a", "b", "c", "d"] {
            File::create(dir.path().join(n))?;
        }
        let mut listing = Listing::new(dir.path())?;
        listing.refresh()?;

        listing.toggle_select(3); // d
        listing.toggle_select(1); // b
        listing.set_reverse(true);
        listing.refresh()?;
        // d c b a
        assert_eq!(listing.selected(), &[0, 2]);
        let picked: Vec<_> = listing.selected_entries().map(|e| e.name_str().into_owned()).collect();
        assert_eq!(picked, ["d", "b"]);

        fs::remove_file(dir.path().join("d"))?;
        listing.refresh()?;
        // c b a
        assert_eq!(listing.selected(), &[1]);
        assert_eq!(listing.get(1).map(|e| e.name_str().into_owned()).as_deref(), Some("b"));

        listing.set_filter("a")?;
        listing.refresh()?;
        assert!(listing.selected().is_empty(), "filtered out entries lose selection");
        Ok(())
    }

    #[test]
    fn change_dir_clears_selection_and_restores_on_failure() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("sub"))?;
        File::create(dir.path().join("sub").join("inner.txt"))?;
        File::create(dir.path().join("file.txt"))?;

        let mut listing = Listing::new(dir.path())?;
        listing.refresh()?;
        listing.select_all();

        let err = listing.change_dir(Path::new("file.txt"));
        assert!(matches!(err, Err(ListingError::NotADirectory { .. })));
        assert_eq!(listing.cwd(), dir.path());
        assert_eq!(listing.selected().len(), 2);

        let err = listing.change_dir(Path::new("missing"));
        assert!(matches!(err, Err(ListingError::NotFound { .. })));

        let sub = listing.position(OsStr::new("sub")).ok_or("sub not listed")?;
        assert!(listing.enter(sub)?);
        assert_eq!(listing.cwd(), dir.path().join("sub"));
        assert!(listing.selected().is_empty());
        assert_eq!(names_of(&listing), ["inner.txt"]);

        let left = listing.go_parent()?;
        assert_eq!(left.as_deref(), Some(OsStr::new("sub")));
        assert_eq!(listing.cwd(), dir.path());
        Ok(())
    }

    #[test]
    fn new_rejects_missing_and_non_directories() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("plain");
        File::create(&file)?;

        assert!(matches!(
            Listing::new(&file),
            Err(ListingError::NotADirectory { .. })
        ));
        assert!(matches!(
            Listing::new(&dir.path().join("nope")),
            Err(ListingError::NotFound { .. })
        ));
        Ok(())
    }

    #[test]
    fn refresh_error_keeps_previous_view() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let sub = dir.path().join("sub");
        fs::create_dir(&sub)?;
        File::create(sub.join("x"))?;

        let mut listing = Listing::new(&sub)?;
        listing.refresh()?;
        fs::remove_dir_all(&sub)?;

        assert!(listing.refresh().is_err());
        assert_eq!(names_of(&listing), ["x"]);
        Ok(())
    }

    #[test]
    fn unstatable_entries_are_skipped() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join("kept"))?;
        let listing = Listing::new(dir.path())?;

        let mut skipped = Vec::new();
        let view = listing.stat_all(
            vec![OsString::from("kept"), OsString::from("vanished")],
            &mut skipped,
        );
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name(), OsStr::new("kept"));
        assert_eq!(skipped, [OsString::from("vanished")]);
        Ok(())
    }
}
