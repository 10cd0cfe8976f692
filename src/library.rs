//! Library view: derived grouping over the watchlist.
//!
//! Pure functions over already-fetched items: filter by a search term (and
//! optionally a media type or status), then group by media type and status
//! in a fixed display order. Items keep server order inside a group.

use std::collections::BTreeMap;

use crate::net::types::{MediaType, WatchStatus, WatchlistItem};

/// Narrowing applied before grouping. The default keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryFilter {
    pub term: String,
    pub media_type: Option<MediaType>,
    pub status: Option<WatchStatus>,
}

impl LibraryFilter {
    #[must_use]
    pub fn term(term: impl Into<String>) -> Self {
        Self { term: term.into(), ..Self::default() }
    }

    /// Case-insensitive title match; a blank term matches everything.
    #[must_use]
    pub fn matches(&self, item: &WatchlistItem) -> bool {
        if self.media_type.is_some_and(|kind| kind != item.media_type) {
            return false;
        }
        if self.status.is_some_and(|status| status != item.status) {
            return false;
        }
        let needle = self.term.trim().to_lowercase();
        needle.is_empty() || item.title.to_lowercase().contains(&needle)
    }

    /// Matching items in their original order.
    #[must_use]
    pub fn select<'a>(&self, items: &'a [WatchlistItem]) -> Vec<&'a WatchlistItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusGroup<'a> {
    pub status: WatchStatus,
    pub items: Vec<&'a WatchlistItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaSection<'a> {
    pub media_type: MediaType,
    pub groups: Vec<StatusGroup<'a>>,
}

impl MediaSection<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LibraryView<'a> {
    /// One section per media type that has matching items, movies first.
    pub sections: Vec<MediaSection<'a>>,
    pub status_counts: BTreeMap<WatchStatus, usize>,
    pub media_counts: BTreeMap<MediaType, usize>,
    pub total: usize,
}

impl<'a> LibraryView<'a> {
    #[must_use]
    pub fn build(items: &'a [WatchlistItem], filter: &LibraryFilter) -> Self {
        let matching = filter.select(items);

        let mut status_counts = BTreeMap::new();
        let mut media_counts = BTreeMap::new();
        for item in &matching {
            *status_counts.entry(item.status).or_insert(0) += 1;
            *media_counts.entry(item.media_type).or_insert(0) += 1;
        }

        let sections = MediaType::ALL
            .into_iter()
            .map(|media_type| MediaSection {
                media_type,
                groups: WatchStatus::ALL
                    .into_iter()
                    .map(|status| StatusGroup {
                        status,
                        items: matching
                            .iter()
                            .copied()
                            .filter(|item| item.media_type == media_type && item.status == status)
                            .collect(),
                    })
                    .filter(|group| !group.items.is_empty())
                    .collect(),
            })
            .filter(|section| !section.is_empty())
            .collect();

        Self { sections, status_counts, media_counts, total: matching.len() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    #[must_use]
    pub fn section(&self, media_type: MediaType) -> Option<&MediaSection<'a>> {
        self.sections.iter().find(|s| s.media_type == media_type)
    }

    #[must_use]
    pub fn count(&self, status: WatchStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "library_test.rs"]
mod tests;
