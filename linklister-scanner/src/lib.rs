pub mod crawler;
pub mod error;
pub mod feed;
pub mod keyword;
pub mod links;
pub mod result;

pub use crawler::{Crawler, ProgressCallback};
pub use error::ScanError;
pub use feed::{FeedFilter, FeedItem};
pub use keyword::KeywordHit;
pub use links::{LinkScope, LinkSet};
pub use result::{PageLinkMap, PageLinks};
