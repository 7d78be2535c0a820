// JSON file repository implementation
use crate::application::catalog::CollaboratorError;
use crate::application::repository::DashboardRepository;
use crate::domain::dashboard::Dashboard;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Keeps one dashboard document as pretty-printed JSON on disk.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DashboardRepository for JsonFileRepository {
    async fn load(&self) -> Result<Option<Dashboard>, CollaboratorError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CollaboratorError::Transient(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let dashboard = serde_json::from_slice(&content).map_err(|e| {
            CollaboratorError::Permanent(format!(
                "Malformed dashboard document {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(dashboard))
    }

    async fn save(&self, dashboard: Dashboard) -> Result<Dashboard, CollaboratorError> {
        let content = serde_json::to_vec_pretty(&dashboard)
            .map_err(|e| CollaboratorError::Permanent(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| CollaboratorError::Transient(e.to_string()))?;
            }
        }

        // the document on disk is replaced atomically
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, &content)
            .await
            .map_err(|e| CollaboratorError::Transient(e.to_string()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| CollaboratorError::Transient(e.to_string()))?;

        tracing::debug!("Wrote dashboard document to {}", self.path.display());
        Ok(dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::refs::ObjectIdentity;
    use tempfile::TempDir;

    fn dashboard() -> Dashboard {
        Dashboard {
            identity: ObjectIdentity::new("dash.ops"),
            title: "Operations".to_string(),
            description: String::new(),
            layout: Default::default(),
            filter_context: Default::default(),
            sharing: Default::default(),
            updated: None,
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_nothing() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let repository = JsonFileRepository::new(temp_dir.path().join("missing.json"));

        assert_eq!(repository.load().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_then_load() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let repository = JsonFileRepository::new(temp_dir.path().join("nested/ops.json"));

        let saved = repository.save(dashboard()).await?;
        let loaded = repository.load().await?;

        assert_eq!(loaded, Some(saved));
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_document_is_permanent() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json")?;

        let err = JsonFileRepository::new(path).load().await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Permanent(_)));
        Ok(())
    }
}
