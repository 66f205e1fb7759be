//! Keyword search over the text of content containers.

use std::collections::HashSet;

use regex::Regex;
use scraper::{Html, Node};

use crate::error::Result;
use crate::links::select_containers;

/// A page whose content matched the keyword at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHit {
    pub url: String,
    pub count: usize,
}

/// Count the text nodes under the containers that the keyword matches.
///
/// Each text node counts once, however many times the pattern occurs in it
/// and however deeply containers are nested.
pub fn count_matches(html: &str, container_class: &str, keyword: &Regex) -> Result<usize> {
    let document = Html::parse_document(html);
    let mut matched = HashSet::new();

    for container in select_containers(&document, container_class)? {
        for node in container.descendants() {
            if let Node::Text(text) = node.value()
                && keyword.is_match(text)
            {
                matched.insert(node.id());
            }
        }
    }

    Ok(matched.len())
}
