use serde::{Deserialize, Deserializer, Serialize};

/// Curricular requirement status of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CourseCategory {
    Mandatory,
    Optional,
    RequiredElective,
    #[default]
    Unknown,
}

impl CourseCategory {
    pub const ALL: [CourseCategory; 4] = [
        CourseCategory::Mandatory,
        CourseCategory::Optional,
        CourseCategory::RequiredElective,
        CourseCategory::Unknown,
    ];
}

/// One row of catalog data.
///
/// Text fields are kept as the catalog renders them (trimmed); `points` in
/// particular is not numeric on every page. An empty `link` means there is no
/// detail page to point at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub id: String,
    pub name: String,
    pub link: String,
    pub points: String,
    pub semester: String,
    /// `None` means the course has no expiry year.
    pub until_year: Option<String>,
    pub faculty: String,
    /// Study year 1..=8, `None` when the strategy does not track year context.
    pub year: Option<u8>,
    pub category: CourseCategory,
}

impl CourseRecord {
    /// A record is retained downstream only when it carries a course id.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Records of one study year, split by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBuckets {
    pub mandatory: Vec<CourseRecord>,
    pub optional: Vec<CourseRecord>,
    pub required_elective: Vec<CourseRecord>,
    pub unknown: Vec<CourseRecord>,
}

impl CategoryBuckets {
    pub fn bucket(&self, category: CourseCategory) -> &[CourseRecord] {
        match category {
            CourseCategory::Mandatory => &self.mandatory,
            CourseCategory::Optional => &self.optional,
            CourseCategory::RequiredElective => &self.required_elective,
            CourseCategory::Unknown => &self.unknown,
        }
    }

    pub fn bucket_mut(&mut self, category: CourseCategory) -> &mut Vec<CourseRecord> {
        match category {
            CourseCategory::Mandatory => &mut self.mandatory,
            CourseCategory::Optional => &mut self.optional,
            CourseCategory::RequiredElective => &mut self.required_elective,
            CourseCategory::Unknown => &mut self.unknown,
        }
    }

    pub fn len(&self) -> usize {
        CourseCategory::ALL.iter().map(|c| self.bucket(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Year-indexed view of an extraction result. Slot `n - 1` holds study year
/// `n`; a `None` slot is a year the page never mentioned. Records without a
/// year land in `unassigned`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedCourses {
    pub years: Vec<Option<CategoryBuckets>>,
    pub unassigned: CategoryBuckets,
}

impl GroupedCourses {
    /// Buckets for a 1-based study year.
    pub fn year(&self, year: u8) -> Option<&CategoryBuckets> {
        let index = usize::from(year).checked_sub(1)?;
        self.years.get(index).and_then(Option::as_ref)
    }

    pub fn total_records(&self) -> usize {
        self.years
            .iter()
            .flatten()
            .map(CategoryBuckets::len)
            .sum::<usize>()
            + self.unassigned.len()
    }
}

/// A study program listed under a faculty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramPath {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Entry of the external faculty directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyData {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub programs: Vec<ProgramPath>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
