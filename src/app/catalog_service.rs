use crate::apis::FacultyDirectory;
use crate::app::ports::PageFetcher;
use crate::common::constants::{DEBUG_SAMPLE_CHARS, DEBUG_SAMPLE_MARKER, DEBUG_SAMPLE_MESSAGE};
use crate::common::error::{CatalogError, Result};
use crate::common::types::{CourseRecord, FacultyData, GroupedCourses};
use crate::config::Config;
use crate::infra::ReqwestFetcher;
use crate::parser::{CourseExtractor, ExtractionStrategy, SectionedExtractor, TableExtractor};
use crate::pipeline::group_courses;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Raw HTML excerpt for manual selector discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlSample {
    pub html_sample: String,
    pub message: String,
}

/// Entry points of the scraper: fetch, parse, extract and group.
///
/// Stateless between calls; the only blocking step is the fetch.
pub struct CatalogService {
    fetcher: Arc<dyn PageFetcher>,
    directory: FacultyDirectory,
    link_template: String,
}

impl CatalogService {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Self {
        Self {
            fetcher,
            directory: FacultyDirectory::new(config.directory.url.clone()),
            link_template: config.extraction.link_template.clone(),
        }
    }

    /// Service backed by the retrying reqwest fetcher.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = ReqwestFetcher::new(&config.fetch)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }

    /// Flat course list using the generic table strategy.
    pub async fn scrape_courses(&self, url: &str) -> Result<Vec<CourseRecord>> {
        self.scrape(url, ExtractionStrategy::Table).await
    }

    /// Year and category grouped courses using the sectioned strategy.
    pub async fn scrape_grouped_courses(&self, url: &str) -> Result<GroupedCourses> {
        let records = self.scrape(url, ExtractionStrategy::Sectioned).await?;
        Ok(group_courses(records))
    }

    #[instrument(skip(self))]
    pub async fn scrape(&self, url: &str, strategy: ExtractionStrategy) -> Result<Vec<CourseRecord>> {
        let url = validate_url(url)?;
        let html = self.fetcher.fetch(url).await?;
        let records = self.extract(&html, strategy);
        crate::metrics::record_extracted(records.len());
        info!("Extracted {} courses from {}", records.len(), url);
        Ok(records)
    }

    /// Run one extraction strategy over already fetched HTML.
    pub fn extract(&self, html: &str, strategy: ExtractionStrategy) -> Vec<CourseRecord> {
        match strategy {
            ExtractionStrategy::Table => TableExtractor::new().extract_html(html),
            ExtractionStrategy::Sectioned => {
                SectionedExtractor::new(self.link_template.clone()).extract_html(html)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn inspect_html(&self, url: &str) -> Result<HtmlSample> {
        let url = validate_url(url)?;
        let html = self.fetcher.fetch(url).await?;
        Ok(HtmlSample {
            html_sample: truncate_sample(&html),
            message: DEBUG_SAMPLE_MESSAGE.to_string(),
        })
    }

    pub async fn list_faculties(&self) -> Result<Vec<FacultyData>> {
        self.directory.load(self.fetcher.as_ref()).await
    }
}

/// Reject blank URLs before any network activity.
pub fn validate_url(url: &str) -> Result<&str> {
    let url = url.trim();
    if url.is_empty() {
        return Err(CatalogError::Validation("Valid URL is required".to_string()));
    }
    Ok(url)
}

/// First [`DEBUG_SAMPLE_CHARS`] characters followed by the `...` marker.
/// Counted in characters so multi-byte text is never split.
pub fn truncate_sample(html: &str) -> String {
    let mut sample: String = html.chars().take(DEBUG_SAMPLE_CHARS).collect();
    sample.push_str(DEBUG_SAMPLE_MARKER);
    sample
}
