//! Article fetching, section segmentation, image extraction, and reference
//! summarization for Wikipedia slide generation.

pub mod fetch;
pub mod references;
pub mod segment;

pub use fetch::{build_client, fetch_article, HttpImageFetcher, ImageFetcher};
pub use references::ReferenceCollector;
pub use segment::{segment_article, SegmentedArticle};
