//! Course extraction engine.
//!
//! Two strategies read the same family of catalog pages:
//! - [`TableExtractor`] scans every table and keys fields off the column count.
//! - [`SectionedExtractor`] follows year/category markers down to the course
//!   grids they introduce and tags records with that context.
//!
//! Extraction never fails. Missing elements degrade to empty fields and rows
//! without a course id are dropped.

pub mod sectioned;
pub mod table;

pub use sectioned::{ScanContext, SectionedExtractor};
pub use table::{ColumnLayout, TableExtractor};

use crate::common::types::CourseRecord;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

pub trait CourseExtractor {
    /// Extract course records from a parsed catalog page, in document order.
    fn extract(&self, document: &Html) -> Vec<CourseRecord>;

    /// Convenience wrapper that parses raw HTML first.
    fn extract_html(&self, html: &str) -> Vec<CourseRecord> {
        let document = Html::parse_document(html);
        self.extract(&document)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Flat list from every wide-enough table
    #[default]
    Table,
    /// Year/category tagged records from annotated course grids
    Sectioned,
}

/// Trimmed text content of an element.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first descendant matching `selector`, or an empty
/// string when there is none.
pub(crate) fn first_text(scope: &ElementRef, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default()
}

/// Empty cells mean "no limit" for the until-year field.
pub(crate) fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector '{css}': {e:?}"))
}
