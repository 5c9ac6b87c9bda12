use crate::config::Config;
use crate::error::{Result, WatchError};
use crate::models::{PropertyId, PropertyRecord};
use crate::scrapers::traits::PageSource;
use crate::scrapers::types::{Crawl, ResultsPage};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

/// Parsed selectors for SUUMO search-results markup
struct Selectors {
    unit: Selector,
    dottable_line: Selector,
    dd: Selector,
    span: Selector,
    link: Selector,
    company: Selector,
    pagination: Selector,
    li: Selector,
    anchor: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            unit: parse("div.property_unit")?,
            dottable_line: parse("div.dottable-line")?,
            dd: parse("dd")?,
            span: parse("span")?,
            link: parse("a[href]")?,
            company: parse("div.shopmore-title")?,
            pagination: parse("div.pagination.pagination_set-nav")?,
            li: parse("li")?,
            anchor: parse("a")?,
        })
    }
}

fn parse(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| WatchError::Markup(format!("bad selector {css}: {e:?}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Turns SUUMO search-results pages into property records
pub struct SuumoExtractor {
    site_url: String,
    selectors: Selectors,
}

impl SuumoExtractor {
    pub fn new(site_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            site_url: site_url.into(),
            selectors: Selectors::new()?,
        })
    }

    /// Extract every listing block and the page count from one page
    pub fn parse_page(&self, html: &str) -> Result<ResultsPage> {
        let document = Html::parse_document(html);
        Ok(ResultsPage {
            records: self.extract_records(&document)?,
            page_count: self.page_count(&document)?,
        })
    }

    /// Extract listing blocks only. A page without listings yields an empty list.
    pub fn extract(&self, html: &str) -> Result<Vec<PropertyRecord>> {
        self.extract_records(&Html::parse_document(html))
    }

    fn extract_records(&self, document: &Html) -> Result<Vec<PropertyRecord>> {
        document
            .select(&self.selectors.unit)
            .enumerate()
            .map(|(index, unit)| self.extract_unit(index, unit))
            .collect()
    }

    fn extract_unit(&self, index: usize, unit: ElementRef<'_>) -> Result<PropertyRecord> {
        let s = &self.selectors;
        let missing = |field: &str| WatchError::Extraction {
            index,
            field: field.to_string(),
        };

        let lines: Vec<ElementRef<'_>> = unit.select(&s.dottable_line).collect();
        let line = |i: usize| {
            lines
                .get(i)
                .copied()
                .ok_or_else(|| missing(&format!("dottable-line {i}")))
        };
        let dd = |i: usize, nth: usize, field: &str| -> Result<String> {
            line(i)?
                .select(&s.dd)
                .nth(nth)
                .map(text_of)
                .ok_or_else(|| missing(field))
        };

        let link = unit
            .select(&s.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or_else(|| missing("link"))?;
        let id = detail_segment(link).ok_or_else(|| missing("id"))?;

        let price = line(1)?
            .select(&s.span)
            .next()
            .map(text_of)
            .ok_or_else(|| missing("price"))?;

        let company = unit
            .select(&s.company)
            .next()
            .map(|el| text_of(el).trim().to_string())
            .unwrap_or_default();

        Ok(PropertyRecord {
            id: PropertyId::new(id),
            name: dd(0, 0, "name")?,
            url: format!("{}{}", self.site_url, link),
            price,
            location: dd(2, 0, "location")?,
            station: dd(2, 1, "station")?,
            area: dd(3, 0, "area")?,
            floor_plan: dd(3, 1, "floor_plan")?,
            balcony: dd(4, 0, "balcony")?,
            built_date: dd(4, 1, "built_date")?,
            company,
        })
    }

    /// Number of result pages; 1 when the pagination bar is absent
    fn page_count(&self, document: &Html) -> Result<u32> {
        let s = &self.selectors;
        let Some(bar) = document.select(&s.pagination).next() else {
            return Ok(1);
        };

        let text = bar
            .select(&s.li)
            .last()
            .and_then(|li| li.select(&s.anchor).next())
            .map(text_of)
            .ok_or_else(|| WatchError::Markup("pagination has no page links".to_string()))?;

        text.trim()
            .parse::<u32>()
            .map_err(|_| WatchError::Markup(format!("unreadable page count {:?}", text.trim())))
    }
}

/// Second-to-last `/` segment of a listing link, e.g. `nc_123` for
/// `/ms/chuko/tokyo/sc_setagaya/nc_123/`
fn detail_segment(link: &str) -> Option<&str> {
    let mut segments = link.rsplit('/');
    segments.next()?;
    segments.next().filter(|s| !s.is_empty())
}

/// Sequential crawler over the configured search results
pub struct SuumoScraper<S> {
    source: S,
    extractor: SuumoExtractor,
    config: Config,
}

impl<S: PageSource> SuumoScraper<S> {
    pub fn new(source: S, config: &Config) -> Result<Self> {
        Ok(Self {
            source,
            extractor: SuumoExtractor::new(config.site_url.clone())?,
            config: config.clone(),
        })
    }

    /// Fetch page 1, then pages 2..=N one at a time. Any fetch or
    /// extraction failure aborts the crawl.
    pub async fn scrape(&self) -> Result<Crawl> {
        info!(source = self.source.source_name(), "Starting search-results crawl");

        let first = self.source.fetch(&self.config.page_url(1)).await?;
        let ResultsPage {
            mut records,
            page_count,
        } = self.extractor.parse_page(&first)?;
        info!(page = 1, pages = page_count, count = records.len(), "Got property information");

        for page in 2..=page_count {
            let html = self.source.fetch(&self.config.page_url(page)).await?;
            let mut found = self.extractor.extract(&html)?;
            debug!(page, found = found.len(), "Extracted listings");
            records.append(&mut found);
            info!(page, count = records.len(), "Got property information");
        }

        Ok(Crawl {
            records,
            pages: page_count,
        })
    }
}
