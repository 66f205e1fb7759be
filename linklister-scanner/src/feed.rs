//! RSS feed parsing and item selection.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::{debug, warn};

use crate::error::{Result, ScanError};
use crate::links::canonical_url;

/// A single `<item>` of an RSS feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub link: String,
    pub title: String,
}

/// Which feed items become seed URLs.
#[derive(Debug, Clone)]
pub struct FeedFilter {
    /// Case-insensitive substring that must appear in the link or the title.
    pub match_text: Option<String>,
    /// Keep the first `limit` selected items; negative means unbounded.
    pub limit: i64,
}

impl Default for FeedFilter {
    fn default() -> Self {
        Self {
            match_text: None,
            limit: -1,
        }
    }
}

impl FeedFilter {
    pub fn with_match(mut self, match_text: impl Into<String>) -> Self {
        self.match_text = Some(match_text.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn matches(&self, item: &FeedItem) -> bool {
        match &self.match_text {
            Some(needle) => {
                let needle = needle.to_lowercase();
                item.link.to_lowercase().contains(&needle)
                    || item.title.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    /// Filter the items and truncate to the limit, keeping feed order.
    ///
    /// Links come back in canonical form so they compare equal to the links
    /// extracted from pages.
    pub fn select(&self, items: &[FeedItem]) -> Vec<String> {
        let selected = items
            .iter()
            .filter(|item| self.matches(item))
            .map(|item| canonical_url(&item.link));

        match usize::try_from(self.limit) {
            Ok(limit) => selected.take(limit).collect(),
            Err(_) => selected.collect(),
        }
    }
}

/// Parse an RSS document into its items.
///
/// Malformed XML fails the whole document. An item without a `<link>` or
/// `<title>` is logged and skipped.
pub fn parse_feed(xml: &[u8]) -> Result<Vec<FeedItem>> {
    let mut items = Vec::new();

    for (index, item) in parse_feed_items(xml)?.into_iter().enumerate() {
        match item {
            Ok(item) => items.push(item),
            Err(e) => warn!("Skipping feed item {}: {}", index + 1, e),
        }
    }

    debug!("Parsed {} items from feed", items.len());
    Ok(items)
}

/// Parse an RSS document, keeping the per-item outcome.
pub fn parse_feed_items(xml: &[u8]) -> Result<Vec<Result<FeedItem>>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut buf = Vec::new();

    let mut current_item: Option<FeedItemBuilder> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                if name == "item" {
                    current_item = Some(FeedItemBuilder::default());
                } else if let Some(ref mut item) = current_item {
                    item.open(&name);
                }
                current_element = name;
            }
            Ok(Event::Empty(e)) => {
                // <link/> counts as present but empty
                if let Some(ref mut item) = current_item {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    item.open(&name);
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                if name == "item"
                    && let Some(builder) = current_item.take()
                {
                    items.push(builder.build(items.len() + 1));
                }
                current_element.clear();
            }
            Ok(Event::Text(e)) => {
                if let Some(ref mut item) = current_item
                    && FeedItemBuilder::reads(&current_element)
                {
                    match e.unescape() {
                        Ok(text) => item.push_text(&current_element, &text),
                        Err(err) => item.fail(&current_element, err),
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(ref mut item) = current_item {
                    let text = String::from_utf8_lossy(&e);
                    item.push_text(&current_element, text.trim());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ScanError::ParseError(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    if current_item.is_some() {
        return Err(ScanError::ParseError(
            "XML parse error: unterminated <item>".to_string(),
        ));
    }

    Ok(items)
}

#[derive(Default)]
struct FeedItemBuilder {
    link: Option<String>,
    title: Option<String>,
    error: Option<String>,
}

impl FeedItemBuilder {
    /// Elements whose text ends up in a [`FeedItem`].
    fn reads(element: &str) -> bool {
        matches!(element, "link" | "title")
    }

    fn fail(&mut self, element: &str, err: impl std::fmt::Display) {
        self.error
            .get_or_insert_with(|| format!("unreadable <{}> text: {}", element, err));
    }

    fn open(&mut self, element: &str) {
        match element {
            "link" => {
                self.link.get_or_insert_with(String::new);
            }
            "title" => {
                self.title.get_or_insert_with(String::new);
            }
            _ => {}
        }
    }

    fn push_text(&mut self, element: &str, text: &str) {
        let target = match element {
            "link" => self.link.get_or_insert_with(String::new),
            "title" => self.title.get_or_insert_with(String::new),
            _ => return,
        };
        target.push_str(text);
    }

    fn build(self, position: usize) -> Result<FeedItem> {
        if let Some(error) = self.error {
            return Err(ScanError::ParseError(format!("item {} has {}", position, error)));
        }
        let link = self.link.ok_or_else(|| {
            ScanError::ParseError(format!("item {} has no <link> element", position))
        })?;
        let title = self.title.ok_or_else(|| {
            ScanError::ParseError(format!("item {} has no <title> element", position))
        })?;

        Ok(FeedItem {
            link: link.trim().to_string(),
            title: title.trim().to_string(),
        })
    }
}
