pub mod catalog_service;
pub mod ports;

pub use catalog_service::{CatalogService, HtmlSample};
pub use ports::PageFetcher;
