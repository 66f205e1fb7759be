use clap::{arg, value_parser};
use linklister_core::{DEFAULT_CONTAINER_CLASS, DEFAULT_OUTPUT};
use regex::Regex;
use std::path::PathBuf;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

fn parse_keyword(value: &str) -> Result<Regex, String> {
    Regex::new(value).map_err(|e| format!("invalid keyword pattern: {}", e))
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("linklister")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linklister")
        .about(
            "Crawls the posts listed in an RSS feed and writes a CSV adjacency matrix of the \
            links between them.",
        )
        .styles(CLAP_STYLING)
        .arg(
            arg!(<RSS_URL>)
                .help("URL of the RSS feed listing the pages to crawl")
                .value_parser(value_parser!(Url)),
        )
        .arg(
            arg!(<SUBDIRECTORY>)
                .help("Only links whose path starts with this prefix are kept, e.g. /blog/"),
        )
        .arg(
            arg!(-l --"limit" <LIMIT>)
                .required(false)
                .help("Analyze the first <LIMIT> URLs in the RSS feed (negative: all)")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("-1"),
        )
        .arg(
            arg!(-p --"parent_class" <CLASS>)
                .required(false)
                .visible_alias("parent-class")
                .help("Search only for content nested underneath an element with this class")
                .default_value(DEFAULT_CONTAINER_CLASS),
        )
        .arg(
            arg!(-m --"match" <TEXT>)
                .required(false)
                .help("Keep only feed items whose link or title contains TEXT (case-insensitive)"),
        )
        .arg(
            arg!(-k --"keyword" <REGEX>)
                .required(false)
                .help(
                    "Count keyword matches in each page's content and print the matching URLs \
                    instead of building the matrix",
                )
                .value_parser(parse_keyword),
        )
        .arg(
            arg!(-e --"just_list_em")
                .required(false)
                .visible_alias("just-list-em")
                .help("Just list the feed URLs, subject to --match and --limit, and copy them to the clipboard")
                .action(clap::ArgAction::SetTrue)
                .conflicts_with("keyword"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Where to write the adjacency matrix")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_OUTPUT),
        )
        .arg(
            arg!(-t --"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds (default: no timeout)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(-v --"verbose" "Log every link decision")
                .required(false)
                .conflicts_with("quiet"),
        )
        .arg(arg!(-q --"quiet" "Only log warnings and errors, showing a progress spinner instead").required(false))
}
