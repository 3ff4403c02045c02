//! The `[general]` section of fnav.toml.
//!
//! [General] is deserialized as written; [InternalGeneral] is what the rest of
//! fnav reads, with the listing options assembled and the initial filter trimmed.

use crate::core::{ListingOptions, SortKey};

use serde::Deserialize;

/// `sort = "name" | "time"`. Anything else fails to parse.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum SortBy {
    #[default]
    Name,
    #[serde(alias = "mtime")]
    Time,
}

impl From<SortBy> for SortKey {
    fn from(sort: SortBy) -> Self {
        match sort {
            SortBy::Name => SortKey::Name,
            SortBy::Time => SortKey::Time,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub(crate) struct General {
    show_hidden: bool,
    sort: SortBy,
    reverse: bool,
    filter: String,
    confirm_delete: bool,
}

impl Default for General {
    fn default() -> Self {
        General {
            show_hidden: false,
            sort: SortBy::Name,
            reverse: false,
            filter: String::new(),
            confirm_delete: true,
        }
    }
}

#[derive(Debug)]
pub(crate) struct InternalGeneral {
    options: ListingOptions,
    filter: String,
    confirm_delete: bool,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        Self {
            options: ListingOptions {
                show_hidden: g.show_hidden,
                sort: g.sort.into(),
                reverse: g.reverse,
            },
            filter: g.filter.trim().to_string(),
            confirm_delete: g.confirm_delete,
        }
    }
}

impl InternalGeneral {
    #[inline]
    pub(crate) fn listing_options(&self) -> ListingOptions {
        self.options
    }

    #[inline]
    pub(crate) fn filter(&self) -> &str {
        &self.filter
    }

    #[inline]
    pub(crate) fn confirm_delete(&self) -> bool {
        self.confirm_delete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_is_parsed() -> Result<(), Box<dyn std::error::Error>> {
        let general: General = toml::from_str("sort = \"time\"\nreverse = true")?;
        let internal = InternalGeneral::from(general);
        assert_eq!(internal.listing_options().sort, SortKey::Time);
        assert!(internal.listing_options().reverse);
        assert!(internal.confirm_delete());

        let general: General = toml::from_str("sort = \"mtime\"")?;
        assert_eq!(InternalGeneral::from(general).listing_options().sort, SortKey::Time);

        let general: General = toml::from_str("")?;
        assert_eq!(InternalGeneral::from(general).listing_options().sort, SortKey::Name);
        Ok(())
    }

    #[test]
    fn unknown_sort_is_rejected() {
        assert!(toml::from_str::<General>("sort = \"size\"").is_err());
        assert!(toml::from_str::<General>("sort = \"Time\"").is_err());
    }
}
