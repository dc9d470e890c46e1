use super::{element_text, non_empty, selector, CourseExtractor};
use crate::common::constants::MIN_COURSE_COLUMNS;
use crate::common::types::CourseRecord;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static TABLE: Lazy<Selector> = Lazy::new(|| selector("table"));
static ROW: Lazy<Selector> = Lazy::new(|| selector("tr"));

/// Cell positions of each field for one rendered column count. The catalog
/// only renders the until-year and faculty columns when they have content, so
/// the width of a row is the only reliable key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub width: usize,
    pub id: usize,
    pub name: usize,
    pub points: usize,
    pub semester: usize,
    pub until_year: Option<usize>,
    pub faculty: usize,
}

pub const COLUMN_LAYOUTS: &[ColumnLayout] = &[
    ColumnLayout { width: 5, id: 0, name: 1, points: 2, semester: 3, until_year: None, faculty: 4 },
    ColumnLayout { width: 6, id: 0, name: 1, points: 2, semester: 3, until_year: Some(4), faculty: 5 },
    // column 5 is unused in the seven column layout
    ColumnLayout { width: 7, id: 0, name: 1, points: 2, semester: 3, until_year: Some(4), faculty: 6 },
];

impl ColumnLayout {
    pub fn for_width(width: usize) -> Option<&'static ColumnLayout> {
        COLUMN_LAYOUTS.iter().find(|layout| layout.width == width)
    }

    /// Build a record from already trimmed cell texts. `cells` must be exactly
    /// `self.width` long.
    pub fn record(&self, cells: &[String]) -> CourseRecord {
        let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();
        CourseRecord {
            id: cell(self.id),
            name: cell(self.name),
            points: cell(self.points),
            semester: cell(self.semester),
            until_year: self.until_year.map(cell).and_then(non_empty),
            faculty: cell(self.faculty),
            ..Default::default()
        }
    }
}

/// Generic strategy: every table whose first row is at least
/// [`MIN_COURSE_COLUMNS`] wide is treated as a course table.
#[derive(Debug, Clone, Default)]
pub struct TableExtractor;

impl TableExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_table(&self, table: ElementRef, out: &mut Vec<CourseRecord>) {
        let rows = own_rows(table);
        let Some((header, body)) = rows.split_first() else {
            return;
        };

        let header_width = cells(*header, true).len();
        if header_width < MIN_COURSE_COLUMNS {
            debug!("TableExtractor: skipping table with {} header cells", header_width);
            return;
        }

        for row in body {
            let texts: Vec<String> = cells(*row, false).iter().map(element_text).collect();
            if texts.len() < MIN_COURSE_COLUMNS {
                continue;
            }
            let Some(layout) = ColumnLayout::for_width(texts.len()) else {
                debug!("TableExtractor: no layout for a {} column row", texts.len());
                continue;
            };
            let record = layout.record(&texts);
            if record.is_valid() {
                out.push(record);
            }
        }
    }
}

impl CourseExtractor for TableExtractor {
    fn extract(&self, document: &Html) -> Vec<CourseRecord> {
        let mut records = Vec::new();
        let mut tables = 0usize;
        for table in document.select(&TABLE) {
            tables += 1;
            self.extract_table(table, &mut records);
        }
        debug!("TableExtractor: scanned {} tables, {} records", tables, records.len());
        records
    }
}

/// Rows that belong to `table` itself, excluding rows of nested tables.
fn own_rows(table: ElementRef) -> Vec<ElementRef> {
    table
        .select(&ROW)
        .filter(|row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|ancestor| ancestor.value().name() == "table")
                .map(|owner| owner.id() == table.id())
                .unwrap_or(false)
        })
        .collect()
}

/// Direct cells of a row. Header rows count `th` as well as `td`.
fn cells(row: ElementRef, include_headers: bool) -> Vec<ElementRef> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| match cell.value().name() {
            "td" => true,
            "th" => include_headers,
            _ => false,
        })
        .collect()
}
