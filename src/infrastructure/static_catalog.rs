// Static catalog - metadata descriptors loaded from configuration
use crate::application::catalog::{
    Catalog, CollaboratorError, DateDataSetDescriptor, DisplayFormDescriptor,
};
use crate::domain::refs::{ObjRef, ObjectIdentity};
use crate::infrastructure::config::CatalogSettings;
use async_trait::async_trait;

pub struct StaticCatalog {
    display_forms: Vec<DisplayFormDescriptor>,
    date_data_sets: Vec<DateDataSetDescriptor>,
}

impl StaticCatalog {
    pub fn new(
        display_forms: Vec<DisplayFormDescriptor>,
        date_data_sets: Vec<DateDataSetDescriptor>,
    ) -> Self {
        Self {
            display_forms,
            date_data_sets,
        }
    }

    pub fn from_settings(settings: &CatalogSettings) -> Self {
        let display_forms = settings
            .display_forms
            .iter()
            .map(|df| DisplayFormDescriptor {
                identity: identity(&df.id, df.uri.as_deref()),
                title: df.title.clone(),
                attribute: df.attribute.clone(),
            })
            .collect();

        let date_data_sets = settings
            .date_data_sets
            .iter()
            .map(|ds| DateDataSetDescriptor {
                identity: identity(&ds.id, ds.uri.as_deref()),
                title: ds.title.clone(),
            })
            .collect();

        Self::new(display_forms, date_data_sets)
    }
}

fn identity(id: &str, uri: Option<&str>) -> ObjectIdentity {
    match uri {
        Some(uri) => ObjectIdentity::new(id).with_uri(uri),
        None => ObjectIdentity::new(id),
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn resolve_display_form(
        &self,
        reference: &ObjRef,
    ) -> Result<DisplayFormDescriptor, CollaboratorError> {
        self.display_forms
            .iter()
            .find(|df| df.identity.matches(reference))
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("Display form {}", reference)))
    }

    async fn resolve_date_data_set(
        &self,
        reference: &ObjRef,
    ) -> Result<DateDataSetDescriptor, CollaboratorError> {
        self.date_data_sets
            .iter()
            .find(|ds| ds.identity.matches(reference))
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("Date data set {}", reference)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::{DateDataSetConfig, DisplayFormConfig};

    fn catalog() -> StaticCatalog {
        StaticCatalog::from_settings(&CatalogSettings {
            display_forms: vec![DisplayFormConfig {
                id: "label.region".to_string(),
                title: "Region".to_string(),
                attribute: "attr.region".to_string(),
                uri: Some("/md/obj/12".to_string()),
            }],
            date_data_sets: vec![DateDataSetConfig {
                id: "dt.created".to_string(),
                title: "Created".to_string(),
                uri: None,
            }],
        })
    }

    #[tokio::test]
    async fn test_resolve_by_identifier_and_uri() {
        let catalog = catalog();

        let by_id = catalog
            .resolve_display_form(&ObjRef::identifier("label.region"))
            .await
            .unwrap();
        let by_uri = catalog
            .resolve_display_form(&ObjRef::uri("/md/obj/12"))
            .await
            .unwrap();

        assert_eq!(by_id, by_uri);
        assert_eq!(by_id.title, "Region");
        assert_eq!(by_id.attribute, "attr.region");
    }

    #[tokio::test]
    async fn test_unknown_reference_is_not_found() {
        let catalog = catalog();

        let err = catalog
            .resolve_date_data_set(&ObjRef::identifier("dt.closed"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CollaboratorError::NotFound("Date data set id:dt.closed".to_string())
        );
        assert!(
            catalog
                .resolve_date_data_set(&ObjRef::identifier("dt.created"))
                .await
                .is_ok()
        );
    }
}
