use crate::domain::error::RewardError;
use crate::domain::model::Attraction;
use crate::domain::traits::LocationProvider;
use async_trait::async_trait;
use std::path::PathBuf;

/// In-memory attraction catalog
pub struct StaticCatalog {
    attractions: Vec<Attraction>,
}

impl StaticCatalog {
    pub fn new(attractions: Vec<Attraction>) -> Self {
        Self { attractions }
    }
}

#[async_trait]
impl LocationProvider for StaticCatalog {
    async fn list_attractions(&self) -> Result<Vec<Attraction>, RewardError> {
        Ok(self.attractions.clone())
    }
}

/// Catalog read from a JSON array of attractions
pub struct CatalogFile {
    path: PathBuf,
}

impl CatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LocationProvider for CatalogFile {
    async fn list_attractions(&self) -> Result<Vec<Attraction>, RewardError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            RewardError::LocationProvider(format!(
                "Failed to read catalog {}: {}",
                self.path.display(),
                e
            ))
        })?;
        let attractions: Vec<Attraction> = serde_json::from_str(&content).map_err(|e| {
            RewardError::LocationProvider(format!(
                "Failed to parse catalog {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %self.path.display(),
            attractions = attractions.len(),
            "loaded attraction catalog"
        );
        Ok(attractions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Location;

    #[tokio::test]
    async fn reads_json_catalog() {
        let attractions = vec![
            Attraction::new("Disneyland", "Anaheim", "CA", Location::new(33.817595, -117.922008)),
            Attraction::new(
                "Jackson Hole",
                "Jackson Hole",
                "WY",
                Location::new(43.582767, -110.821999),
            ),
        ];
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, serde_json::to_string(&attractions).unwrap()).unwrap();

        let loaded = CatalogFile::new(&path).list_attractions().await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, attractions);
    }

    #[tokio::test]
    async fn missing_file_is_a_provider_error() {
        let path = std::env::temp_dir().join(format!("missing-{}.json", uuid::Uuid::new_v4()));
        let err = CatalogFile::new(path).list_attractions().await.unwrap_err();
        assert!(matches!(err, RewardError::LocationProvider(_)));
    }
}
