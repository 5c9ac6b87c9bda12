use crate::models::PropertyRecord;

/// Records and pagination info extracted from one search-results page
#[derive(Debug, Clone, Default)]
pub struct ResultsPage {
    pub records: Vec<PropertyRecord>,
    /// Total number of result pages announced by the pagination bar
    pub page_count: u32,
}

/// Everything collected by one sequential pass over the result pages
#[derive(Debug, Clone, Default)]
pub struct Crawl {
    pub records: Vec<PropertyRecord>,
    pub pages: u32,
}
