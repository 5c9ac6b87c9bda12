pub mod http;
pub mod suumo;
pub mod traits;
pub mod types;

pub use http::HttpPageSource;
pub use suumo::{SuumoExtractor, SuumoScraper};
pub use traits::PageSource;
pub use types::{Crawl, ResultsPage};
