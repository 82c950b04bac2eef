//! Turns a feed entry into the text and optional photo posted to the channel.
//!
//! Output uses the HTML subset understood by the Telegram Bot API
//! (`<b>`, `<a href>`), so every feed-supplied string is escaped before it is
//! placed in the template.

use crate::catalog::{Category, Source};
use crate::feed::FeedEntry;
use crate::util::{clean_markup, hashtag, truncate_chars, validate_media_url};

/// Summaries longer than this many characters are cut and get `...` appended.
pub const SUMMARY_MAX_CHARS: usize = 350;

/// A message ready for the publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// HTML-formatted body, used as the text or as the photo caption.
    pub body: String,
    /// Absolute http(s) URL of an image to attach.
    pub media_url: Option<String>,
}

/// Fixed wording for one content category.
#[derive(Debug, Clone, Copy)]
struct Template {
    intro: &'static str,
    call_to_action: &'static str,
}

const VIDEO: Template = Template {
    intro: "🎬 New video from",
    call_to_action: "▶️ Watch now",
};

const ARTICLE: Template = Template {
    intro: "📰 New article from",
    call_to_action: "📖 Read more",
};

fn template(category: Category) -> Template {
    match category {
        Category::Video => VIDEO,
        Category::Article => ARTICLE,
    }
}

/// Builds the announcement for `entry` published by `source`.
///
/// Layout, one blank line between segments:
///
/// ```text
/// 🎬 New video from <b>Source</b>
///
/// <b>Title</b>
///
/// Summary...
///
/// <a href="link">▶️ Watch now</a>
///
/// #Source
/// ```
///
/// An entry without a summary still renders the summary segment, empty.
pub fn compose(entry: &FeedEntry, source: &Source) -> OutboundMessage {
    let template = template(source.category);
    let summary = summary_text(entry);

    let body = format!(
        "{intro} <b>{name}</b>\n\n<b>{title}</b>\n\n{summary}\n\n<a href=\"{link}\">{cta}</a>\n\n{tag}",
        intro = template.intro,
        name = html_escape::encode_text(&source.name),
        title = html_escape::encode_text(entry.title.trim()),
        summary = html_escape::encode_text(&summary),
        link = html_escape::encode_double_quoted_attribute(&entry.link),
        cta = template.call_to_action,
        tag = html_escape::encode_text(&hashtag(&source.name)),
    );

    OutboundMessage {
        body,
        media_url: media_url(entry),
    }
}

/// Plain-text summary of `entry`: markup stripped, trimmed, and capped at
/// [`SUMMARY_MAX_CHARS`]. Empty when the entry has no summary.
pub fn summary_text(entry: &FeedEntry) -> String {
    match entry.summary.as_deref() {
        Some(raw) => truncate_chars(&clean_markup(raw), SUMMARY_MAX_CHARS).into_owned(),
        None => String::new(),
    }
}

/// Picks the image to attach, if any.
///
/// Candidates, first usable one wins:
/// 1. the first thumbnail
/// 2. the first content reference declared as an image, else the first content reference
/// 3. the first generic link whose type mentions `image`
///
/// Candidates that are not absolute http(s) URLs are passed over.
pub fn media_url(entry: &FeedEntry) -> Option<String> {
    let thumbnail = entry.thumbnails.first().map(|m| m.url.as_str());

    let content = entry
        .contents
        .iter()
        .find(|m| {
            m.medium
                .as_deref()
                .is_some_and(|medium| medium.eq_ignore_ascii_case("image"))
        })
        .or_else(|| entry.contents.first())
        .map(|m| m.url.as_str());

    let image_link = entry
        .links
        .iter()
        .find(|l| {
            l.media_type
                .as_deref()
                .is_some_and(|t| t.contains("image"))
        })
        .map(|l| l.href.as_str());

    [thumbnail, content, image_link]
        .into_iter()
        .flatten()
        .find(|candidate| match validate_media_url(candidate) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(link = %entry.link, url = %candidate, error = %e, "Skipping media candidate");
                false
            }
        })
        .map(|url| url.trim().to_string())
}
