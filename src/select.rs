//! Chooses which entries of a feed to announce on this run.

use crate::feed::FeedEntry;
use crate::storage::PostedLinks;

/// Only the newest few entries of a feed are ever considered, so a first run
/// (or a feed that suddenly republishes its archive) cannot flood the channel.
pub const MAX_ENTRIES_PER_SOURCE: usize = 3;

/// Returns the entries to announce, oldest first.
///
/// `entries` must be newest-first, as feeds publish them. The newest
/// [`MAX_ENTRIES_PER_SOURCE`] are taken, reversed into chronological order,
/// and each one whose link is not yet in `posted` is selected. Selected links
/// are recorded in `posted` immediately, so a link appearing twice in the
/// window is selected once.
pub fn select_new<'a>(entries: &'a [FeedEntry], posted: &mut PostedLinks) -> Vec<&'a FeedEntry> {
    entries
        .iter()
        .take(MAX_ENTRIES_PER_SOURCE)
        .rev()
        .filter(|entry| posted.record(&entry.link))
        .collect()
}
