use super::types::{EntryLink, FeedEntry, MediaRef};
use anyhow::Result;
use feed_rs::model::Entry;
use feed_rs::parser;

/// Entries recovered from one feed document.
#[derive(Debug)]
pub struct ParseResult {
    /// Entries in document order (newest-first for well-behaved feeds).
    pub entries: Vec<FeedEntry>,
    /// Entries dropped because they carried no link.
    pub skipped: usize,
}

pub fn parse_feed(bytes: &[u8]) -> Result<ParseResult> {
    let feed = parser::parse(bytes)?;

    let mut skipped = 0;
    let entries = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let converted = convert_entry(entry);
            if converted.is_none() {
                skipped += 1;
            }
            converted
        })
        .collect();

    Ok(ParseResult { entries, skipped })
}

fn convert_entry(entry: Entry) -> Option<FeedEntry> {
    // Atom entries may list replies/edit/self links ahead of the post itself
    let link = entry
        .links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| entry.links.first())
        .map(|l| l.href.trim().to_string())
        .filter(|href| !href.is_empty())?;

    let title = entry
        .title
        .map(|t| t.content)
        .unwrap_or_else(|| "Untitled".to_string());

    // YouTube and other media RSS feeds carry the description on the media group
    let summary = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body))
        .or_else(|| {
            entry
                .media
                .iter()
                .find_map(|m| m.description.as_ref().map(|d| d.content.clone()))
        });

    let thumbnails = entry
        .media
        .iter()
        .flat_map(|m| m.thumbnails.iter())
        .map(|t| MediaRef::new(t.image.uri.clone(), Some("image")))
        .collect();

    let contents = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .filter_map(|c| {
            let url = c.url.as_ref()?;
            let medium = c.content_type.as_ref().map(|ct| ct.ty().as_str().to_string());
            Some(MediaRef {
                url: url.to_string(),
                medium,
            })
        })
        .collect();

    let links = entry
        .links
        .into_iter()
        .map(|l| EntryLink {
            href: l.href,
            media_type: l.media_type,
        })
        .collect();

    Some(FeedEntry {
        link,
        title,
        summary,
        thumbnails,
        contents,
        links,
    })
}
