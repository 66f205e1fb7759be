use crate::error::{Result, ScanError};
use crate::feed::{FeedFilter, parse_feed};
use crate::keyword::{KeywordHit, count_matches};
use crate::links::{LinkScope, extract_links};
use crate::result::{PageLinkMap, PageLinks};
use regex::Regex;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Called with the 0-based position and URL of each page before it is fetched.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

struct FetchedPage {
    status_code: u16,
    response_time: Duration,
    body: String,
}

/// Fetches the feed and its pages one request at a time.
pub struct Crawler {
    client: Client,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Without a timeout the client waits as long as the server does.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("linklister/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout).connect_timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ScanError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            progress_callback: None,
        })
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Fetch the feed and return the selected item links.
    pub async fn fetch_feed(&self, feed_url: &str, filter: &FeedFilter) -> Result<Vec<String>> {
        if filter.limit >= 0 {
            info!("Processing first {} item(s) of {}", filter.limit, feed_url);
        } else {
            info!("Processing all items of {}", feed_url);
        }

        let page = self.fetch(feed_url).await?;
        let items = parse_feed(page.body.as_bytes())?;
        let urls = filter.select(&items);

        info!("Selected {} of {} feed items", urls.len(), items.len());
        Ok(urls)
    }

    /// Fetch one page and extract its in-scope links.
    ///
    /// Failures are logged and produce an empty link set.
    pub async fn collect_links(&self, url: &str, scope: &LinkScope) -> PageLinks {
        let page = match self.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Skipping {}: {}", url, e);
                return PageLinks::with_error(url.to_string(), e.to_string());
            }
        };

        let mut result = PageLinks::new(url.to_string());
        result.status_code = page.status_code;
        result.response_time = page.response_time;

        match extract_links(&page.body, url, scope) {
            Ok(links) => {
                info!("Processed {}: found {} links", url, links.len());
                result.links = links;
            }
            Err(e) => {
                warn!("Could not extract links from {}: {}", url, e);
                result.error = Some(e.to_string());
            }
        }

        result
    }

    /// Crawl every page in order. One failing page never stops the others.
    pub async fn crawl(&self, urls: &[String], scope: &LinkScope) -> PageLinkMap {
        info!("Crawling {} pages", urls.len());

        let mut pages = PageLinkMap::new();
        for (idx, url) in urls.iter().enumerate() {
            self.report_progress(idx, url);
            pages.insert(self.collect_links(url, scope).await);
        }

        info!(
            "Crawl complete. {} pages, {} links",
            pages.len(),
            pages.total_links()
        );
        pages
    }

    /// Fetch one page and count the container text nodes matching `keyword`.
    pub async fn count_keyword(
        &self,
        url: &str,
        container_class: &str,
        keyword: &Regex,
    ) -> Result<usize> {
        let page = self.fetch(url).await?;
        count_matches(&page.body, container_class, keyword)
    }

    /// Pages whose content matches `keyword`, in crawl order.
    pub async fn search_keyword(
        &self,
        urls: &[String],
        container_class: &str,
        keyword: &Regex,
    ) -> Vec<KeywordHit> {
        info!("Searching content for keyword \"{}\"", keyword);

        let mut hits = Vec::new();
        for (idx, url) in urls.iter().enumerate() {
            self.report_progress(idx, url);

            match self.count_keyword(url, container_class, keyword).await {
                Ok(0) => debug!("No matches in {}", url),
                Ok(count) => {
                    debug!("{} matches in {}", count, url);
                    hits.push(KeywordHit {
                        url: url.clone(),
                        count,
                    });
                }
                Err(e) => warn!("Skipping {}: {}", url, e),
            }
        }

        hits
    }

    fn report_progress(&self, idx: usize, url: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(idx, url.to_string());
        }
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScanError::fetch(url, e))?;
        let response_time = start.elapsed();

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::fetch(url, format!("HTTP {}", status)));
        }

        let body = response.text().await.map_err(|e| ScanError::fetch(url, e))?;

        Ok(FetchedPage {
            status_code: status.as_u16(),
            response_time,
            body,
        })
    }
}
