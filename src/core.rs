//! Core engine of fnav.
//!
//! This module contains the non-UI pieces of the file browser:
//! - [entry]: a metadata snapshot of a single directory entry ([EntryInfo]).
//! - [listing]: the state of one directory view, its selection and options ([Listing]).
//! - [ops]: delete, copy, move and mkdir on the current selection.
//! - [identity]: owner and group name resolution.
//! - [error]: the [ListingError] taxonomy shared by all of the above.
//! - [terminal]: terminal setup/teardown and the crossterm/ratatui event loop.
//!
//! Most callers only need [Listing] and [EntryInfo].

pub mod entry;
pub mod error;
pub mod identity;
pub mod listing;
pub mod ops;
pub mod terminal;

pub use entry::{
    ColorClass, EntryInfo, EntryKind, format_permissions, format_size, format_time,
};
pub use error::{ListingError, Operation, Result};
pub use identity::{IdentityLookup, SystemIdentity};
pub use listing::{Listing, ListingOptions, SortKey};
pub use ops::{Destination, copy_recursive};
