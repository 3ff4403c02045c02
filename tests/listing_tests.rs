//! Integration tests for the listing engine.
//!
//! These drive [Listing] through its public API only: refresh, selection,
//! options and the filesystem mutations. Every test works inside its own
//! temporary directory, which is removed when the test ends.

use fnav::core::{
    EntryInfo, IdentityLookup, Listing, ListingError, ListingOptions, SortKey,
};
use rand::rng;
use rand::seq::SliceRandom;
use std::error;
use std::ffi::OsStr;
use std::fs;
use tempfile::tempdir;

/// Resolves nothing, so every owner and group falls back to its numeric id.
struct NoNames;

impl IdentityLookup for NoNames {
    fn user_name(&self, _uid: u32) -> Option<String> {
        None
    }

    fn group_name(&self, _gid: u32) -> Option<String> {
        None
    }
}

fn names(listing: &Listing) -> Vec<String> {
    listing
        .names()
        .iter()
        .map(|n| n.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn view_order_does_not_depend_on_creation_order() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let mut files = vec!["delta", "Alpha", "charlie", "bravo", ".hidden", "Echo"];
    files.shuffle(&mut rng());
    for f in &files {
        fs::write(dir.path().join(f), f)?;
    }

    let mut listing = Listing::new(dir.path())?;
    listing.refresh()?;
    assert_eq!(names(&listing), ["Alpha", "bravo", "charlie", "delta", "Echo"]);

    listing.set_options(ListingOptions::from_flags("ar"));
    listing.refresh()?;
    assert_eq!(
        names(&listing),
        ["Echo", "delta", "charlie", "bravo", "Alpha", ".hidden"]
    );
    Ok(())
}

#[test]
fn rows_fall_back_to_numeric_ids() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("f"), vec![0u8; 2048])?;

    let mut listing = Listing::new(dir.path())?.with_identity(Box::new(NoNames));
    listing.refresh()?;
    let entry = listing.get(0).ok_or("empty view")?;

    let row = entry.row(listing.identity());
    let uid = entry.uid().to_string();
    assert!(row.starts_with('-'), "got {row}");
    assert!(row.contains(&uid));
    assert!(row.contains("2.0K"));
    assert_eq!(entry.owner(listing.identity()), uid);
    Ok(())
}

#[test]
fn selection_follows_entries_across_option_changes() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    for f in ["a", "b", "c", "d"] {
        fs::write(dir.path().join(f), "")?;
    }
    let mut listing = Listing::new(dir.path())?;
    listing.refresh()?;

    // select c then a; selection order is kept through refreshes
    listing.toggle_select(2);
    listing.toggle_select(0);
    listing.toggle_reverse();
    listing.refresh()?;

    let selected: Vec<_> = listing
        .selected_entries()
        .map(|e| e.name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(selected, ["c", "a"]);
    assert_eq!(listing.selected(), &[1, 3]);

    // filtering out a selected entry drops it from the selection
    listing.set_filter("[ab]")?;
    listing.refresh()?;
    assert_eq!(names(&listing), ["b", "a"]);
    assert_eq!(listing.selected(), &[1]);
    Ok(())
}

#[test]
fn copy_then_move_then_delete() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("src"))?;
    fs::write(dir.path().join("src/file.txt"), "payload")?;
    fs::create_dir(dir.path().join("dst"))?;

    let mut listing = Listing::new(dir.path())?;
    listing.refresh()?;
    let src = listing.position(OsStr::new("src")).ok_or("no src")?;
    listing.toggle_select(src);
    assert_eq!(listing.copy("dst")?, 1);
    assert_eq!(fs::read_to_string(dir.path().join("dst/src/file.txt"))?, "payload");

    listing.change_dir(&dir.path().join("dst/src"))?;
    listing.toggle_select(0);
    assert_eq!(listing.move_to("../renamed.txt")?, 1);
    assert!(dir.path().join("dst/renamed.txt").is_file());

    listing.go_parent()?;
    assert_eq!(names(&listing), ["renamed.txt", "src"]);
    listing.select_all();
    assert_eq!(listing.delete()?, 2);
    listing.refresh()?;
    assert!(listing.is_empty());
    Ok(())
}

#[test]
fn listing_rejects_non_directories() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("plain");
    fs::write(&file, "")?;

    assert!(matches!(
        Listing::new(&file),
        Err(ListingError::NotADirectory { .. })
    ));
    assert!(matches!(
        Listing::new(&dir.path().join("missing")),
        Err(ListingError::NotFound { .. })
    ));

    let mut listing = Listing::new(dir.path())?;
    listing.refresh()?;
    assert!(!listing.enter(0)?, "entering a file is a no-op");
    assert_eq!(listing.cwd(), dir.path());
    Ok(())
}

#[test]
fn entry_snapshot_outlives_the_file() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("gone.rs");
    fs::write(&path, "fn main() {}")?;

    let info = EntryInfo::from_path(&path)?;
    fs::remove_file(&path)?;

    assert_eq!(info.name(), "gone.rs");
    assert_eq!(info.ext(), "rs");
    assert_eq!(info.size(), 12);
    assert!(!info.readable(), "permission checks hit the live filesystem");
    Ok(())
}

#[test]
fn time_sort_uses_modification_time() -> Result<(), Box<dyn error::Error>> {
    use std::time::{Duration, SystemTime};

    let dir = tempdir()?;
    let now = SystemTime::now();
    for (name, age) in [("old", 300), ("new", 10), ("mid", 100)] {
        let f = fs::File::create(dir.path().join(name))?;
        f.set_modified(now - Duration::from_secs(age))?;
    }

    let opts = ListingOptions {
        sort: SortKey::Time,
        ..Default::default()
    };
    let mut listing = Listing::with_options(dir.path(), opts)?;
    listing.refresh()?;
    assert_eq!(names(&listing), ["new", "mid", "old"]);
    Ok(())
}
