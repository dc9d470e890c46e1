/// Selector strings, catalog vocabulary and defaults shared across the crate.
/// The catalog pages are the Hebrew University "Shnaton" pages, so the marker
/// vocabulary below is Hebrew.

// Generic (table) strategy
pub const MIN_COURSE_COLUMNS: usize = 5;

// Sectioned strategy: marker selectors
pub const HEADER_MARKER_SELECTOR: &str = ".subtitle";
pub const TYPE_MARKER_SELECTOR: &str = ".courseType";
pub const CELL_MARKER_SELECTOR: &str = "td";

// Sectioned strategy: course grid and its data rows
pub const COURSE_GRID_SELECTOR: &str = r#"table[id*="gvCourses"]"#;
pub const DATA_ROW_SELECTOR: &str = "tr.GridRow, tr.GridAltRow";

// Sectioned strategy: element id suffixes, one per field
pub const COURSE_NUMBER_SUFFIX: &str = "_lblCourseNum";
pub const COURSE_NAME_SUFFIX: &str = "_lblCourseName";
pub const POINTS_SUFFIX: &str = "_lblPoints";
pub const SEMESTER_SUFFIX: &str = "_lblSemester";
pub const MAX_YEAR_SUFFIX: &str = "_lblMaxYear";
pub const FACULTY_SUFFIX: &str = "_lblFaculty";

// Year context: a cell is a year marker candidate when it contains the label,
// the ordinal decides which year. Spelling variants share a year.
pub const YEAR_LABEL: &str = "שנה";
pub const YEAR_ORDINALS: &[(u8, &[&str])] = &[
    (1, &["ראשונה"]),
    (2, &["שנייה", "שניה"]),
    (3, &["שלישית"]),
    (4, &["רביעית"]),
    (5, &["חמישית"]),
    (6, &["שישית"]),
    (7, &["שביעית"]),
    (8, &["שמינית"]),
];

// Category phrases, checked in order; "required-elective" contains the elective
// word so it must come first.
pub const REQUIRED_ELECTIVE_PHRASE: &str = "חובת בחירה";
pub const MANDATORY_PHRASE: &str = "לימודי חובה";
pub const ELECTIVE_PHRASE: &str = "קורסי בחירה";

// Course detail link
pub const DEFAULT_LINK_TEMPLATE: &str = "https://shnaton.huji.ac.il/index.php/NewSyl/{course}/1/{year}/";

// Fetching
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;he;q=0.9";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;

// Debug inspection
pub const DEBUG_SAMPLE_CHARS: usize = 10_000;
pub const DEBUG_SAMPLE_MARKER: &str = "...";
pub const DEBUG_SAMPLE_MESSAGE: &str =
    "This is a truncated sample of the HTML. Use this to identify the correct CSS selectors for scraping.";

// Faculty directory
pub const DEFAULT_DIRECTORY_URL: &str =
    "https://raw.githubusercontent.com/Shakedkod/FacultiesFinding/refs/heads/main/data/faculty-data.json";

// Server
pub const DEFAULT_PORT: u16 = 8080;
