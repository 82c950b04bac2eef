/// A media attachment advertised by a feed entry (`media:thumbnail`,
/// `media:content`, `<enclosure>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub url: String,
    /// Top-level medium such as `image` or `video`, when the feed declares one.
    pub medium: Option<String>,
}

impl MediaRef {
    pub fn new(url: impl Into<String>, medium: Option<&str>) -> Self {
        Self {
            url: url.into(),
            medium: medium.map(str::to_string),
        }
    }
}

/// A generic `<link>` on an entry together with its declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLink {
    pub href: String,
    pub media_type: Option<String>,
}

/// One item of a fetched feed, reduced to what an announcement needs.
///
/// `link` is the stable identifier used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedEntry {
    pub link: String,
    pub title: String,
    /// Raw summary markup as published by the feed.
    pub summary: Option<String>,
    pub thumbnails: Vec<MediaRef>,
    pub contents: Vec<MediaRef>,
    pub links: Vec<EntryLink>,
}

impl FeedEntry {
    /// Entry with only a link and title, no summary or media.
    pub fn new(link: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}
