// External data sources consumed as-is

pub mod faculties;

pub use faculties::FacultyDirectory;
