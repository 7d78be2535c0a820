// Dashboard events - facts emitted after a command was processed
use super::commands::CommandPayload;
use super::dashboard::Dashboard;
use super::errors::FailureReason;
use super::filters::{AttributeFilter, DateFilter, FilterContext};
use super::layout::{Item, Layout, Section, SectionHeader};
use super::refs::ObjRef;
use super::sharing::{DashboardPermissions, SharingProperties};
use super::stash::StashIdentifier;
use super::widget::{DrillDefinition, FilterReference, KpiComparison, WidgetHeader};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    pub workspace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<ObjRef>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EventPayload {
    CommandStarted {
        command: String,
    },
    CommandFailed {
        reason: FailureReason,
        message: String,
        command: CommandPayload,
    },
    InternalErrorOccurred {
        message: String,
    },
    SectionAdded {
        index: usize,
        section: Section,
        stashes_used: Vec<StashIdentifier>,
    },
    SectionMoved {
        section: Section,
        from_index: usize,
        to_index: usize,
    },
    SectionRemoved {
        index: usize,
        section: Section,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_identifier: Option<StashIdentifier>,
    },
    SectionHeaderChanged {
        index: usize,
        header: SectionHeader,
    },
    SectionItemsAdded {
        section_index: usize,
        start_index: usize,
        items: Vec<Item>,
        stashes_used: Vec<StashIdentifier>,
    },
    SectionItemMoved {
        item: Item,
        from_section_index: usize,
        to_section_index: usize,
        from_index: usize,
        to_index: usize,
    },
    SectionItemRemoved {
        item: Item,
        section_index: usize,
        item_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_identifier: Option<StashIdentifier>,
    },
    SectionItemReplaced {
        section_index: usize,
        item_index: usize,
        items: Vec<Item>,
        previous_item: Item,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_identifier: Option<StashIdentifier>,
        stashes_used: Vec<StashIdentifier>,
    },
    ItemsHeightResized {
        section_index: usize,
        item_indexes: Vec<usize>,
        height: u32,
    },
    ItemWidthResized {
        section_index: usize,
        item_index: usize,
        width: u32,
    },
    LayoutChanged {
        layout: Layout,
    },
    StashCleared {
        stash_identifiers: Vec<StashIdentifier>,
    },
    KpiWidgetHeaderChanged {
        widget: ObjRef,
        header: WidgetHeader,
    },
    InsightWidgetHeaderChanged {
        widget: ObjRef,
        header: WidgetHeader,
    },
    WidgetFilterSettingsChanged {
        widget: ObjRef,
        ignore_dashboard_filters: Vec<FilterReference>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_data_set: Option<ObjRef>,
    },
    KpiWidgetComparisonChanged {
        widget: ObjRef,
        comparison: KpiComparison,
    },
    InsightWidgetDrillsModified {
        widget: ObjRef,
        added: Vec<DrillDefinition>,
        updated: Vec<DrillDefinition>,
    },
    InsightWidgetDrillsRemoved {
        widget: ObjRef,
        removed: Vec<DrillDefinition>,
    },
    AttributeFilterAdded {
        filter: AttributeFilter,
        index: usize,
    },
    AttributeFilterRemoved {
        filters: Vec<AttributeFilter>,
    },
    AttributeFilterMoved {
        filter: AttributeFilter,
        from_index: usize,
        to_index: usize,
    },
    AttributeFilterSelectionChanged {
        filter: AttributeFilter,
    },
    DateFilterSelectionChanged {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<DateFilter>,
    },
    FilterContextChanged {
        filter_context: FilterContext,
    },
    DashboardRenamed {
        title: String,
    },
    SharingChanged {
        sharing: SharingProperties,
        permissions: DashboardPermissions,
    },
    DashboardWasReset {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dashboard: Option<Dashboard>,
    },
    DashboardSaved {
        dashboard: Dashboard,
        new_dashboard: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    CommandStarted,
    CommandFailed,
    InternalErrorOccurred,
    SectionAdded,
    SectionMoved,
    SectionRemoved,
    SectionHeaderChanged,
    SectionItemsAdded,
    SectionItemMoved,
    SectionItemRemoved,
    SectionItemReplaced,
    ItemsHeightResized,
    ItemWidthResized,
    LayoutChanged,
    StashCleared,
    KpiWidgetHeaderChanged,
    InsightWidgetHeaderChanged,
    WidgetFilterSettingsChanged,
    KpiWidgetComparisonChanged,
    InsightWidgetDrillsModified,
    InsightWidgetDrillsRemoved,
    AttributeFilterAdded,
    AttributeFilterRemoved,
    AttributeFilterMoved,
    AttributeFilterSelectionChanged,
    DateFilterSelectionChanged,
    FilterContextChanged,
    DashboardRenamed,
    SharingChanged,
    DashboardWasReset,
    DashboardSaved,
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::CommandStarted { .. } => EventKind::CommandStarted,
            EventPayload::CommandFailed { .. } => EventKind::CommandFailed,
            EventPayload::InternalErrorOccurred { .. } => EventKind::InternalErrorOccurred,
            EventPayload::SectionAdded { .. } => EventKind::SectionAdded,
            EventPayload::SectionMoved { .. } => EventKind::SectionMoved,
            EventPayload::SectionRemoved { .. } => EventKind::SectionRemoved,
            EventPayload::SectionHeaderChanged { .. } => EventKind::SectionHeaderChanged,
            EventPayload::SectionItemsAdded { .. } => EventKind::SectionItemsAdded,
            EventPayload::SectionItemMoved { .. } => EventKind::SectionItemMoved,
            EventPayload::SectionItemRemoved { .. } => EventKind::SectionItemRemoved,
            EventPayload::SectionItemReplaced { .. } => EventKind::SectionItemReplaced,
            EventPayload::ItemsHeightResized { .. } => EventKind::ItemsHeightResized,
            EventPayload::ItemWidthResized { .. } => EventKind::ItemWidthResized,
            EventPayload::LayoutChanged { .. } => EventKind::LayoutChanged,
            EventPayload::StashCleared { .. } => EventKind::StashCleared,
            EventPayload::KpiWidgetHeaderChanged { .. } => EventKind::KpiWidgetHeaderChanged,
            EventPayload::InsightWidgetHeaderChanged { .. } => EventKind::InsightWidgetHeaderChanged,
            EventPayload::WidgetFilterSettingsChanged { .. } => EventKind::WidgetFilterSettingsChanged,
            EventPayload::KpiWidgetComparisonChanged { .. } => EventKind::KpiWidgetComparisonChanged,
            EventPayload::InsightWidgetDrillsModified { .. } => EventKind::InsightWidgetDrillsModified,
            EventPayload::InsightWidgetDrillsRemoved { .. } => EventKind::InsightWidgetDrillsRemoved,
            EventPayload::AttributeFilterAdded { .. } => EventKind::AttributeFilterAdded,
            EventPayload::AttributeFilterRemoved { .. } => EventKind::AttributeFilterRemoved,
            EventPayload::AttributeFilterMoved { .. } => EventKind::AttributeFilterMoved,
            EventPayload::AttributeFilterSelectionChanged { .. } => {
                EventKind::AttributeFilterSelectionChanged
            }
            EventPayload::DateFilterSelectionChanged { .. } => EventKind::DateFilterSelectionChanged,
            EventPayload::FilterContextChanged { .. } => EventKind::FilterContextChanged,
            EventPayload::DashboardRenamed { .. } => EventKind::DashboardRenamed,
            EventPayload::SharingChanged { .. } => EventKind::SharingChanged,
            EventPayload::DashboardWasReset { .. } => EventKind::DashboardWasReset,
            EventPayload::DashboardSaved { .. } => EventKind::DashboardSaved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEvent {
    pub correlation_id: String,
    pub context: EventContext,
    pub payload: EventPayload,
}

impl DashboardEvent {
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self.payload,
            EventPayload::CommandFailed { .. } | EventPayload::InternalErrorOccurred { .. }
        )
    }
}
