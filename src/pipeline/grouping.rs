use crate::common::types::{CategoryBuckets, CourseRecord, GroupedCourses};
use tracing::debug;

/// Partition records into year slots and category buckets.
///
/// The partition is stable: within a (year, category) bucket records keep
/// their input order. A year slot is created on the first record of that
/// year with all four buckets empty; years never seen stay `None`. Records
/// without a usable year are kept in `unassigned` rather than dropped.
pub fn group_courses(records: Vec<CourseRecord>) -> GroupedCourses {
    let mut grouped = GroupedCourses::default();

    for record in records {
        let category = record.category;
        let buckets = match record.year {
            Some(year) if year >= 1 => year_slot(&mut grouped.years, usize::from(year) - 1),
            _ => &mut grouped.unassigned,
        };
        buckets.bucket_mut(category).push(record);
    }

    debug!(
        "group_courses: {} year slots, {} unassigned",
        grouped.years.len(),
        grouped.unassigned.len()
    );
    grouped
}

fn year_slot(years: &mut Vec<Option<CategoryBuckets>>, index: usize) -> &mut CategoryBuckets {
    if years.len() <= index {
        years.resize(index + 1, None);
    }
    years[index].get_or_insert_with(CategoryBuckets::default)
}
