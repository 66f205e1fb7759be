use std::time::Duration;

use crate::links::LinkSet;

/// Outcome of crawling one seed page.
#[derive(Debug, Clone)]
pub struct PageLinks {
    pub url: String,
    pub status_code: u16,
    pub response_time: Duration,
    pub links: LinkSet,
    pub error: Option<String>,
}

impl PageLinks {
    pub fn new(url: String) -> Self {
        Self {
            url,
            status_code: 0,
            response_time: Duration::from_secs(0),
            links: LinkSet::new(),
            error: None,
        }
    }

    pub fn with_error(url: String, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(url)
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Page URL to link set, in the order the pages were crawled.
#[derive(Debug, Clone, Default)]
pub struct PageLinkMap {
    pages: Vec<PageLinks>,
}

impl PageLinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a page. A page crawled twice keeps its first result.
    pub fn insert(&mut self, page: PageLinks) {
        if self.get(&page.url).is_none() {
            self.pages.push(page);
        }
    }

    pub fn get(&self, url: &str) -> Option<&PageLinks> {
        self.pages.iter().find(|p| p.url == url)
    }

    pub fn links_of(&self, url: &str) -> Option<&LinkSet> {
        self.get(url).map(|p| &p.links)
    }

    pub fn pages(&self) -> &[PageLinks] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn total_links(&self) -> usize {
        self.pages.iter().map(|p| p.links.len()).sum()
    }

    pub fn failed(&self) -> impl Iterator<Item = &PageLinks> {
        self.pages.iter().filter(|p| !p.is_ok())
    }
}

impl FromIterator<PageLinks> for PageLinkMap {
    fn from_iter<I: IntoIterator<Item = PageLinks>>(iter: I) -> Self {
        let mut map = PageLinkMap::new();
        for page in iter {
            map.insert(page);
        }
        map
    }
}
