use crate::app::ports::PageFetcher;
use crate::common::error::Result;
use crate::common::types::FacultyData;
use tracing::{info, instrument};

/// Static faculty/program directory published as a JSON array.
#[derive(Debug, Clone)]
pub struct FacultyDirectory {
    url: String,
}

impl FacultyDirectory {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    #[instrument(skip(self, fetcher), fields(url = %self.url))]
    pub async fn load(&self, fetcher: &dyn PageFetcher) -> Result<Vec<FacultyData>> {
        let body = fetcher.fetch(&self.url).await?;
        let faculties = parse_directory(&body)?;
        info!("Loaded {} faculties", faculties.len());
        Ok(faculties)
    }
}

pub fn parse_directory(json: &str) -> Result<Vec<FacultyData>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::CatalogError;

    #[test]
    fn maps_faculties_and_programs() {
        let json = r#"[
            {"id": 2, "name": "Science", "url": "https://example.org/science", "programs": [
                {"id": "3010", "name": "Physics", "url": "https://example.org/physics"},
                {"id": 3020, "name": "Chemistry", "url": "https://example.org/chemistry"}
            ]},
            {"id": 5, "name": "Law", "url": "https://example.org/law", "programs": []}
        ]"#;

        let faculties = parse_directory(json).unwrap();

        assert_eq!(faculties.len(), 2);
        assert_eq!(faculties[0].name, "Science");
        let ids: Vec<&str> = faculties[0].programs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3010", "3020"]);
        assert!(faculties[1].programs.is_empty());
    }

    #[test]
    fn rejects_non_array_documents() {
        assert!(matches!(parse_directory(r#"{"faculties": []}"#), Err(CatalogError::Json(_))));
    }
}
