use super::{element_text, first_text, non_empty, selector, CourseExtractor};
use crate::common::constants::{
    CELL_MARKER_SELECTOR, COURSE_GRID_SELECTOR, COURSE_NAME_SUFFIX, COURSE_NUMBER_SUFFIX,
    DATA_ROW_SELECTOR, DEFAULT_LINK_TEMPLATE, ELECTIVE_PHRASE, FACULTY_SUFFIX,
    HEADER_MARKER_SELECTOR, MANDATORY_PHRASE, MAX_YEAR_SUFFIX, POINTS_SUFFIX,
    REQUIRED_ELECTIVE_PHRASE, SEMESTER_SUFFIX, TYPE_MARKER_SELECTOR, YEAR_LABEL, YEAR_ORDINALS,
};
use crate::common::types::{CourseCategory, CourseRecord};
use chrono::Datelike;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

static MARKERS: Lazy<Selector> = Lazy::new(|| {
    selector(&format!(
        "{HEADER_MARKER_SELECTOR}, {TYPE_MARKER_SELECTOR}, {CELL_MARKER_SELECTOR}"
    ))
});
static HEADER_MARKER: Lazy<Selector> = Lazy::new(|| selector(HEADER_MARKER_SELECTOR));
static TYPE_MARKER: Lazy<Selector> = Lazy::new(|| selector(TYPE_MARKER_SELECTOR));
static TABLE: Lazy<Selector> = Lazy::new(|| selector("table"));
static GRID: Lazy<Selector> = Lazy::new(|| selector(COURSE_GRID_SELECTOR));
static DATA_ROW: Lazy<Selector> = Lazy::new(|| selector(DATA_ROW_SELECTOR));

static COURSE_NUMBER: Lazy<Selector> = Lazy::new(|| id_suffix(COURSE_NUMBER_SUFFIX));
static COURSE_NAME: Lazy<Selector> = Lazy::new(|| id_suffix(COURSE_NAME_SUFFIX));
static POINTS: Lazy<Selector> = Lazy::new(|| id_suffix(POINTS_SUFFIX));
static SEMESTER: Lazy<Selector> = Lazy::new(|| id_suffix(SEMESTER_SUFFIX));
static MAX_YEAR: Lazy<Selector> = Lazy::new(|| id_suffix(MAX_YEAR_SUFFIX));
static FACULTY: Lazy<Selector> = Lazy::new(|| id_suffix(FACULTY_SUFFIX));

/// Phrase to category, first match wins.
pub const CATEGORY_PHRASES: &[(&str, CourseCategory)] = &[
    (REQUIRED_ELECTIVE_PHRASE, CourseCategory::RequiredElective),
    (MANDATORY_PHRASE, CourseCategory::Mandatory),
    (ELECTIVE_PHRASE, CourseCategory::Optional),
];

fn id_suffix(suffix: &str) -> Selector {
    selector(&format!(r#"[id$="{suffix}"]"#))
}

/// Study year named by a marker text: the year label together with one of
/// the ordinal words. Ordinals are checked in ascending year order.
pub fn year_from_text(text: &str) -> Option<u8> {
    if !text.contains(YEAR_LABEL) {
        return None;
    }
    YEAR_ORDINALS
        .iter()
        .find(|(_, words)| words.iter().any(|word| text.contains(word)))
        .map(|(year, _)| *year)
}

pub fn category_from_text(text: &str) -> CourseCategory {
    CATEGORY_PHRASES
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|(_, category)| *category)
        .unwrap_or(CourseCategory::Unknown)
}

/// Year and category in effect while scanning markers in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanContext {
    pub year: Option<u8>,
    pub category: CourseCategory,
}

impl ScanContext {
    /// Context after reading one marker. The year carries over until another
    /// year is named; the category is re-derived from every marker, so a
    /// marker without a known phrase resets it to `Unknown`.
    pub fn advance(self, marker_text: &str) -> ScanContext {
        ScanContext {
            year: year_from_text(marker_text).or(self.year),
            category: category_from_text(marker_text),
        }
    }
}

struct Marker<'a> {
    text: String,
    grid: Option<ElementRef<'a>>,
}

/// Annotated strategy: walks header, type-label and year cells in document
/// order and tags the rows of each course grid with the context in effect.
#[derive(Debug, Clone)]
pub struct SectionedExtractor {
    link_template: String,
    link_year: i32,
}

impl Default for SectionedExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_TEMPLATE)
    }
}

impl SectionedExtractor {
    pub fn new(link_template: impl Into<String>) -> Self {
        Self {
            link_template: link_template.into(),
            link_year: chrono::Local::now().year(),
        }
    }

    /// Pin the catalog year used in course links.
    pub fn with_link_year(mut self, year: i32) -> Self {
        self.link_year = year;
        self
    }

    pub fn course_link(&self, course_id: &str) -> String {
        self.link_template
            .replace("{course}", course_id)
            .replace("{year}", &self.link_year.to_string())
    }

    fn extract_grid(&self, grid: ElementRef, context: ScanContext, out: &mut Vec<CourseRecord>) {
        for row in grid.select(&DATA_ROW) {
            let id = first_text(&row, &COURSE_NUMBER);
            if id.is_empty() {
                continue;
            }
            out.push(CourseRecord {
                link: self.course_link(&id),
                name: first_text(&row, &COURSE_NAME),
                points: first_text(&row, &POINTS),
                semester: first_text(&row, &SEMESTER),
                until_year: non_empty(first_text(&row, &MAX_YEAR)),
                faculty: first_text(&row, &FACULTY),
                year: context.year,
                category: context.category,
                id,
            });
        }
    }
}

impl CourseExtractor for SectionedExtractor {
    fn extract(&self, document: &Html) -> Vec<CourseRecord> {
        let markers: Vec<Marker> = document
            .select(&MARKERS)
            .filter(is_marker)
            .map(|element| Marker {
                text: element_text(&element),
                grid: following_grid(element),
            })
            .collect();

        // A grid belongs to the last marker resolving to it.
        let last_marker: HashMap<_, usize> = markers
            .iter()
            .enumerate()
            .filter_map(|(index, marker)| marker.grid.map(|grid| (grid.id(), index)))
            .collect();

        let (_, records) = markers.iter().enumerate().fold(
            (ScanContext::default(), Vec::new()),
            |(context, mut records), (index, marker)| {
                let context = context.advance(&marker.text);
                if let Some(grid) = marker.grid {
                    if last_marker.get(&grid.id()) == Some(&index) {
                        self.extract_grid(grid, context, &mut records);
                    }
                }
                (context, records)
            },
        );

        debug!(
            "SectionedExtractor: {} markers, {} grids, {} records",
            markers.len(),
            last_marker.len(),
            records.len()
        );
        records
    }
}

/// Header and type-label elements are always markers. Table cells only count
/// when they name the year label, are not part of a course grid and do not
/// wrap a table themselves (layout cells).
fn is_marker(element: &ElementRef) -> bool {
    if HEADER_MARKER.matches(element) || TYPE_MARKER.matches(element) {
        return true;
    }
    element_text(element).contains(YEAR_LABEL)
        && !inside_grid(element)
        && element.select(&TABLE).next().is_none()
}

fn inside_grid(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| GRID.matches(&ancestor))
}

/// Nearest course grid after the marker: the marker's following siblings are
/// searched first (a sibling may be the grid or contain it), then those of
/// each ancestor in turn. The search does not climb past the nearest
/// enclosing table.
fn following_grid(marker: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut node = *marker;
    loop {
        for sibling in node.next_siblings().filter_map(ElementRef::wrap) {
            if GRID.matches(&sibling) {
                return Some(sibling);
            }
            if let Some(grid) = sibling.select(&GRID).next() {
                return Some(grid);
            }
        }
        let is_table = node
            .value()
            .as_element()
            .map_or(false, |element| element.name() == "table");
        if is_table {
            return None;
        }
        node = node.parent()?;
    }
}
