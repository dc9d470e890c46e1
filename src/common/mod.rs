// Common utilities and shared types used across the application

pub mod constants;
pub mod error;
pub mod types;

pub use error::{CatalogError, Result};
pub use types::{CategoryBuckets, CourseCategory, CourseRecord, FacultyData, GroupedCourses, ProgramPath};
