pub mod crawl;
pub mod matrix;
pub mod report;

pub use crawl::{
    CrawlProgressCallback, DEFAULT_CONTAINER_CLASS, DEFAULT_OUTPUT, RunMode, RunOptions,
    RunOutcome, execute_run, extract_url_path, extract_url_slug,
};
pub use matrix::AdjacencyMatrix;
