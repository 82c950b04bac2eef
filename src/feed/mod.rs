//! Feed retrieval for the announcer.
//!
//! - [`parser`] - Converts RSS/Atom documents into [`FeedEntry`] values using `feed-rs`
//! - [`fetcher`] - The [`FeedSource`] seam and its HTTP implementation
//!
//! Entries come out in document order, which for well-behaved feeds is
//! newest-first. Ordering for announcement happens later, in [`crate::select`].

mod fetcher;
mod parser;
mod types;

pub use fetcher::{FeedSource, FetchError, HttpFeedSource};
pub use parser::{parse_feed, ParseResult};
pub use types::{EntryLink, FeedEntry, MediaRef};
