// Post-extraction processing of course records

pub mod grouping;

pub use grouping::group_courses;
