use crate::application::environment::HandlerOptions;
use crate::domain::sharing::{Actor, ActorRole};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
    pub actor: ActorSettings,
    #[serde(default)]
    pub events: EventSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub workspace: String,
    /// Path of the JSON document; `${workspace}` is replaced with the workspace id.
    pub document: String,
    #[serde(default = "default_title")]
    pub default_title: String,
    #[serde(default = "default_strict_placement")]
    pub strict_placement: bool,
}

fn default_title() -> String {
    "Untitled".to_string()
}

fn default_strict_placement() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActorSettings {
    pub login: String,
    pub role: ActorRole,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventSettings {
    pub buffer: usize,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self { buffer: 256 }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogSettings {
    #[serde(default)]
    pub display_forms: Vec<DisplayFormConfig>,
    #[serde(default)]
    pub date_data_sets: Vec<DateDataSetConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayFormConfig {
    pub id: String,
    pub title: String,
    pub attribute: String,
    pub uri: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DateDataSetConfig {
    pub id: String,
    pub title: String,
    pub uri: Option<String>,
}

impl AppConfig {
    pub fn handler_options(&self) -> HandlerOptions {
        HandlerOptions {
            workspace: self.dashboard.workspace.clone(),
            default_title: self.dashboard.default_title.clone(),
            strict_placement: self.dashboard.strict_placement,
        }
    }

    pub fn actor(&self) -> Actor {
        Actor {
            login: self.actor.login.clone(),
            role: self.actor.role,
        }
    }

    pub fn document_path(&self) -> String {
        let mut vars = HashMap::new();
        vars.insert("workspace".to_string(), self.dashboard.workspace.clone());
        expand_template(&self.dashboard.document, &vars)
    }
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from("config/dashboard")
}

/// File settings overridden by `DASHBOARD__SECTION__KEY` environment variables
pub fn load_app_config_from(name: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(name))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in a path or string
pub fn expand_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
