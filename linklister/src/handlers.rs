use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use linklister_core::report::{format_keyword_hits, format_listing, generate_crawl_report};
use linklister_core::{
    AdjacencyMatrix, RunMode, RunOptions, RunOutcome, execute_run, extract_url_slug,
};
use linklister_scanner::{FeedFilter, KeywordHit, PageLinkMap};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, warn};
use url::Url;

/// Install the fmt subscriber, writing to stderr.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Pick the run mode from the flags. Listing wins over everything else.
pub fn select_mode(args: &ArgMatches) -> RunMode {
    if args.get_flag("just_list_em") {
        RunMode::List
    } else if let Some(keyword) = args.get_one::<Regex>("keyword") {
        RunMode::Keyword(keyword.clone())
    } else {
        RunMode::Matrix
    }
}

pub fn build_run_options(args: &ArgMatches) -> RunOptions {
    let feed_url = args
        .get_one::<Url>("RSS_URL")
        .map(|u| u.as_str().to_string())
        .unwrap_or_default();
    let subdirectory = args
        .get_one::<String>("SUBDIRECTORY")
        .cloned()
        .unwrap_or_default();

    let mut filter = FeedFilter::default();
    if let Some(limit) = args.get_one::<i64>("limit") {
        filter = filter.with_limit(*limit);
    }
    if let Some(match_text) = args.get_one::<String>("match") {
        filter = filter.with_match(match_text.clone());
    }

    let mut options = RunOptions::new(feed_url, subdirectory);
    if let Some(class) = args.get_one::<String>("parent_class") {
        options.container_class = class.clone();
    }
    options.filter = filter;
    options.timeout = args
        .get_one::<u64>("timeout")
        .map(|secs| Duration::from_secs(*secs));
    options.mode = select_mode(args);
    // The spinner stands in for the info-level progress logs
    options.show_progress_bars = args.get_flag("quiet");
    options
}

/// Path suffixes of the listed URLs, in feed order.
pub fn listing_entries(urls: &[String]) -> Vec<String> {
    urls.iter().map(|url| extract_url_slug(url)).collect()
}

pub fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| format!("Clipboard unavailable: {}", e))?;
    clipboard
        .set_text(text)
        .map_err(|e| format!("Could not copy to clipboard: {}", e))
}

/// Run the selected mode. Logging is set up by the caller.
pub async fn handle_run(args: &ArgMatches) -> anyhow::Result<()> {
    let options = build_run_options(args);
    let output = args
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(linklister_core::DEFAULT_OUTPUT));

    println!(
        "\n{} {}",
        "→".blue(),
        format!("Reading {}", options.feed_url).bright_white()
    );

    let progress_callback = Arc::new(|msg: String| {
        println!("{} {}", "→".blue(), msg);
    });

    let outcome = execute_run(options, Some(progress_callback))
        .await
        .map_err(anyhow::Error::msg)?;

    match outcome {
        RunOutcome::Listed { urls } => handle_listing(&urls),
        RunOutcome::Keyword { hits, .. } => handle_keyword(&hits),
        RunOutcome::Matrix { urls, pages } => handle_matrix(&urls, &pages, &output),
    }
}

fn handle_listing(urls: &[String]) -> anyhow::Result<()> {
    let entries = listing_entries(urls);
    println!("{}", format_listing(&entries)?);

    match copy_to_clipboard(&entries.join("\n")) {
        Ok(()) => println!("{} List copied to clipboard", "✓".green().bold()),
        Err(e) => warn!("{}", e),
    }
    Ok(())
}

fn handle_keyword(hits: &[KeywordHit]) -> anyhow::Result<()> {
    println!("{}", format_keyword_hits(hits)?);
    Ok(())
}

fn handle_matrix(urls: &[String], pages: &PageLinkMap, output: &Path) -> anyhow::Result<()> {
    println!("{} Building matrix...", "→".blue());
    let matrix = AdjacencyMatrix::build(pages, urls);

    matrix
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print!("{}", generate_crawl_report(pages, &matrix));
    println!(
        "\n{} Matrix saved as {}",
        "✓".green().bold(),
        output.display().to_string().bright_white()
    );
    Ok(())
}
