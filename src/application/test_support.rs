// Test fixtures and in-memory collaborators
use crate::application::catalog::{
    Catalog, CollaboratorError, DateDataSetDescriptor, DisplayFormDescriptor,
};
use crate::application::environment::{Clock, Environment, HandlerOptions, IdGenerator};
use crate::application::repository::DashboardRepository;
use crate::domain::dashboard::{Dashboard, DashboardState};
use crate::domain::filters::{AttributeFilter, FilterContext, FilterContextItem};
use crate::domain::layout::{Item, ItemSize, Layout, Section, SectionHeader};
use crate::domain::refs::{ObjRef, ObjectIdentity};
use crate::domain::sharing::{Actor, ActorRole, ShareStatus, SharingProperties};
use crate::domain::widget::{
    InsightWidget, KpiComparison, KpiWidget, RichTextWidget, Widget,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub enum CatalogBehavior {
    Resolve,
    Fail(CollaboratorError),
    Panic,
}

pub struct FakeCatalog {
    display_forms: Vec<DisplayFormDescriptor>,
    date_data_sets: Vec<DateDataSetDescriptor>,
    behavior: CatalogBehavior,
}

impl FakeCatalog {
    pub fn standard() -> Self {
        Self {
            display_forms: vec![
                display_form("label.region", "Region"),
                display_form("label.product", "Product"),
            ],
            date_data_sets: vec![DateDataSetDescriptor {
                identity: ObjectIdentity::new("dt.created"),
                title: "Created".to_string(),
            }],
            behavior: CatalogBehavior::Resolve,
        }
    }

    pub fn with_behavior(behavior: CatalogBehavior) -> Self {
        Self {
            behavior,
            ..Self::standard()
        }
    }

    fn check(&self) -> Result<(), CollaboratorError> {
        match &self.behavior {
            CatalogBehavior::Resolve => Ok(()),
            CatalogBehavior::Fail(error) => Err(error.clone()),
            CatalogBehavior::Panic => panic!("catalog index corrupted"),
        }
    }
}

fn display_form(id: &str, title: &str) -> DisplayFormDescriptor {
    DisplayFormDescriptor {
        identity: ObjectIdentity::new(id).with_uri(format!("/obj/{}", id)),
        title: title.to_string(),
        attribute: id.replace("label.", "attr."),
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn resolve_display_form(
        &self,
        reference: &ObjRef,
    ) -> Result<DisplayFormDescriptor, CollaboratorError> {
        self.check()?;
        self.display_forms
            .iter()
            .find(|d| d.identity.matches(reference))
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(reference.to_string()))
    }

    async fn resolve_date_data_set(
        &self,
        reference: &ObjRef,
    ) -> Result<DateDataSetDescriptor, CollaboratorError> {
        self.check()?;
        self.date_data_sets
            .iter()
            .find(|d| d.identity.matches(reference))
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(reference.to_string()))
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    pub stored: Mutex<Option<Dashboard>>,
    pub failure: Option<CollaboratorError>,
}

#[async_trait]
impl DashboardRepository for MemoryRepository {
    async fn load(&self) -> Result<Option<Dashboard>, CollaboratorError> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save(&self, dashboard: Dashboard) -> Result<Dashboard, CollaboratorError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        *self.stored.lock().unwrap() = Some(dashboard.clone());
        Ok(dashboard)
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Yields `id-1`, `id-2`, ...
#[derive(Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        format!("id-{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn environment() -> Environment {
    environment_with(Arc::new(FakeCatalog::standard()), ActorRole::Owner)
}

pub fn environment_with(catalog: Arc<dyn Catalog>, role: ActorRole) -> Environment {
    Environment {
        catalog,
        repository: Arc::new(MemoryRepository::default()),
        ids: Arc::new(SequentialIds::default()),
        clock: Arc::new(FixedClock(fixed_time())),
        actor: Actor {
            login: "tester".to_string(),
            role,
        },
        options: HandlerOptions {
            workspace: "test-workspace".to_string(),
            default_title: "Untitled".to_string(),
            strict_placement: true,
        },
    }
}

pub fn text_item(id: &str, width: u32) -> Item {
    Item::new(
        ItemSize::xl(width),
        Widget::RichText(RichTextWidget {
            identity: ObjectIdentity::new(id),
            content: format!("notes for {}", id),
        }),
    )
}

pub fn kpi_item(id: &str) -> Item {
    Item::new(
        ItemSize::xl(4),
        Widget::Kpi(KpiWidget {
            identity: ObjectIdentity::new(id),
            title: "Revenue".to_string(),
            description: String::new(),
            measure: ObjRef::identifier("m.revenue"),
            comparison: KpiComparison::PreviousPeriod,
            ignore_dashboard_filters: Vec::new(),
            date_data_set: None,
        }),
    )
}

pub fn insight_item(id: &str) -> Item {
    Item::new(
        ItemSize::xl(8),
        Widget::Insight(InsightWidget {
            identity: ObjectIdentity::new(id),
            title: "Trend".to_string(),
            description: String::new(),
            insight: ObjRef::identifier("vis.trend"),
            drills: Vec::new(),
            ignore_dashboard_filters: Vec::new(),
            date_data_set: None,
        }),
    )
}

pub fn persisted_dashboard() -> Dashboard {
    Dashboard {
        identity: ObjectIdentity::new("dash.sales"),
        title: "Sales".to_string(),
        description: "Quarterly numbers".to_string(),
        layout: Layout::new(vec![
            Section {
                header: Some(SectionHeader::titled("Overview")),
                items: vec![kpi_item("kpi.revenue"), insight_item("insight.trend")],
            },
            Section {
                header: None,
                items: vec![text_item("text.notes", 12)],
            },
        ]),
        filter_context: FilterContext::new(vec![FilterContextItem::Attribute(
            AttributeFilter::select_all(
                "f-region",
                ObjRef::identifier("label.region"),
                Some("Region".to_string()),
            ),
        )]),
        sharing: SharingProperties {
            share_status: ShareStatus::Shared,
            is_locked: false,
            is_under_strict_control: false,
        },
        updated: None,
    }
}

pub fn new_state() -> DashboardState {
    DashboardState::new_dashboard("Untitled", ActorRole::Owner)
}

pub fn persisted_state() -> DashboardState {
    DashboardState::from_persisted(persisted_dashboard(), ActorRole::Owner)
}

/// New, unsaved dashboard with `sections` empty sections.
pub fn state_with_sections(sections: usize) -> DashboardState {
    let mut state = new_state();
    state.layout = Arc::new(Layout::new(vec![Section::default(); sections]));
    state
}
