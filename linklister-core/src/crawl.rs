use indicatif::{ProgressBar, ProgressStyle};
use linklister_scanner::{Crawler, FeedFilter, KeywordHit, LinkScope, PageLinkMap};
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Content container class used by the blog this tool was written for.
pub const DEFAULT_CONTAINER_CLASS: &str = "blogpost-content";

/// Default location of the adjacency matrix.
pub const DEFAULT_OUTPUT: &str = "matrix.csv";

/// What to do with the selected feed URLs
#[derive(Debug, Clone)]
pub enum RunMode {
    /// Print the selected URLs without crawling them
    List,
    /// Count keyword matches in each page's content
    Keyword(Regex),
    /// Crawl each page and collect its links
    Matrix,
}

/// Options for configuring a run
pub struct RunOptions {
    pub feed_url: String,
    pub subdirectory: String,
    pub container_class: String,
    pub filter: FeedFilter,
    pub timeout: Option<Duration>,
    pub mode: RunMode,
    pub show_progress_bars: bool,
}

impl RunOptions {
    pub fn new(feed_url: impl Into<String>, subdirectory: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            subdirectory: subdirectory.into(),
            container_class: DEFAULT_CONTAINER_CLASS.to_string(),
            filter: FeedFilter::default(),
            timeout: None,
            mode: RunMode::Matrix,
            show_progress_bars: false,
        }
    }
}

/// Result of a run, one variant per [`RunMode`]
#[derive(Debug)]
pub enum RunOutcome {
    Listed {
        urls: Vec<String>,
    },
    Keyword {
        urls: Vec<String>,
        hits: Vec<KeywordHit>,
    },
    Matrix {
        urls: Vec<String>,
        pages: PageLinkMap,
    },
}

/// Callback for reporting run progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Everything in a URL after its host: path, query and fragment.
pub fn extract_url_slug(url: &str) -> String {
    match Url::parse(url) {
        Ok(u) if u.has_host() => {
            let mut slug = extract_url_path(url);
            if let Some(query) = u.query() {
                slug.push('?');
                slug.push_str(query);
            }
            if let Some(fragment) = u.fragment() {
                slug.push('#');
                slug.push_str(fragment);
            }
            slug
        }
        _ => url.to_string(),
    }
}

/// Fetch the feed and run the selected mode over its URLs.
///
/// Only a failure to fetch or parse the feed is an error; page failures are
/// logged and leave that page empty.
pub async fn execute_run(
    options: RunOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<RunOutcome, String> {
    let RunOptions {
        feed_url,
        subdirectory,
        container_class,
        filter,
        timeout,
        mode,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Fetching feed...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(Arc::new(pb))
    } else {
        None
    };

    let crawler = Crawler::with_timeout(timeout).map_err(|e| e.to_string())?;

    let urls = match crawler.fetch_feed(&feed_url, &filter).await {
        Ok(urls) => urls,
        Err(e) => {
            if let Some(ref pb) = progress_bar {
                pb.finish_and_clear();
            }
            return Err(format!("Could not process feed {}: {}", feed_url, e));
        }
    };

    if let Some(ref callback) = progress_callback {
        callback(format!("Selected {} URL(s) from {}", urls.len(), feed_url));
    }

    if matches!(mode, RunMode::List) {
        if let Some(ref pb) = progress_bar {
            pb.finish_and_clear();
        }
        return Ok(RunOutcome::Listed { urls });
    }

    let total = urls.len();
    let crawler = match progress_bar.clone() {
        Some(pb) => crawler.with_progress_callback(Arc::new(move |idx: usize, url: String| {
            pb.set_message(format!(
                "Processing {}/{}: {}",
                idx + 1,
                total,
                extract_url_path(&url)
            ));
        })),
        None => crawler,
    };

    let outcome = match mode {
        RunMode::Keyword(keyword) => {
            let hits = crawler
                .search_keyword(&urls, &container_class, &keyword)
                .await;
            info!("{} of {} pages match \"{}\"", hits.len(), total, keyword);
            RunOutcome::Keyword { urls, hits }
        }
        RunMode::Matrix => {
            let scope = LinkScope::new(subdirectory, feed_url, container_class);
            let pages = crawler.crawl(&urls, &scope).await;

            if let Some(ref callback) = progress_callback {
                for page in pages.failed() {
                    callback(format!(
                        "[!] Failed to process {}: {}",
                        page.url,
                        page.error.as_deref().unwrap_or("unknown error")
                    ));
                }
            }
            RunOutcome::Matrix { urls, pages }
        }
        RunMode::List => RunOutcome::Listed { urls },
    };

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!("Done! {} URL(s) processed", total));
    }

    Ok(outcome)
}
