//! The fixed set of feeds announced to the channel.

use std::borrow::Cow;

/// Kind of content a source publishes. Drives the message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Article,
    Video,
}

/// A feed the announcer polls on every run.
///
/// The built-in catalog borrows `'static` strings; [`Source::owned`] exists for
/// sources assembled at runtime (mock servers in tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Display name, unique within the catalog. Also the hashtag seed.
    pub name: Cow<'static, str>,
    pub feed_url: Cow<'static, str>,
    pub category: Category,
}

impl Source {
    pub const fn new(name: &'static str, feed_url: &'static str, category: Category) -> Self {
        Self {
            name: Cow::Borrowed(name),
            feed_url: Cow::Borrowed(feed_url),
            category,
        }
    }

    pub fn owned(name: impl Into<String>, feed_url: impl Into<String>, category: Category) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            feed_url: Cow::Owned(feed_url.into()),
            category,
        }
    }
}

/// Sources in announcement order.
pub const SOURCES: &[Source] = &[
    Source::new(
        "BBC News",
        "http://feeds.bbci.co.uk/news/rss.xml",
        Category::Article,
    ),
    Source::new("TechCrunch", "https://techcrunch.com/feed/", Category::Article),
    Source::new(
        "The Verge",
        "https://www.theverge.com/rss/index.xml",
        Category::Article,
    ),
    Source::new(
        "MKBHD (YouTube)",
        "https://www.youtube.com/feeds/videos.xml?channel_id=UCBJycsmduvYEL83R_U4JriQ",
        Category::Video,
    ),
    Source::new(
        "Jack Dorsey (Nitter)",
        "https://nitter.net/jack/rss",
        Category::Article,
    ),
    Source::new(
        "NatGeo (Bibliogram)",
        "https://bibliogram.art/u/natgeo/rss.xml",
        Category::Article,
    ),
];
