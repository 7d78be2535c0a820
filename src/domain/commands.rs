// Dashboard commands - every permissible mutation of the dashboard
use super::filters::{DateBound, DateFilterType, DateGranularity};
use super::layout::{Item, ItemPath, SectionHeader};
use super::refs::ObjRef;
use super::sharing::SharingProperties;
use super::stash::StashIdentifier;
use super::widget::{DrillDefinition, FilterReference, KpiComparison, WidgetHeader};
use serde::{Deserialize, Serialize};

/// Item to place on the layout: a concrete item or everything stashed under an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemDefinition {
    Item(Item),
    Stashed(StashIdentifier),
}

/// How a widget command addresses its widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetTarget {
    Ref(ObjRef),
    Path(ItemPath),
}

impl From<ObjRef> for WidgetTarget {
    fn from(reference: ObjRef) -> Self {
        WidgetTarget::Ref(reference)
    }
}

impl From<ItemPath> for WidgetTarget {
    fn from(path: ItemPath) -> Self {
        WidgetTarget::Path(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFilterSelection {
    pub filter_type: DateFilterType,
    pub granularity: DateGranularity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateBound>,
}

impl DateFilterSelection {
    /// Relative selection without bounds.
    pub fn all_time() -> Self {
        Self {
            filter_type: DateFilterType::Relative,
            granularity: DateGranularity::Date,
            from: None,
            to: None,
        }
    }

    pub fn is_all_time(&self) -> bool {
        self.filter_type == DateFilterType::Relative && self.from.is_none() && self.to.is_none()
    }
}

/// How far back `UndoLayoutChanges` goes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UndoPoint {
    /// Only the newest layout change.
    #[default]
    Last,
    /// The newest `count` layout changes.
    Count { count: usize },
    /// The newest run of changes whose correlation ids start with `prefix`,
    /// for interactions spread over several commands (drag, then drop).
    /// Falls back to the newest change when it does not match.
    CorrelationPrefix { prefix: String },
}

/// Drills to drop from an insight widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DrillSelection {
    All,
    Origins { origins: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CommandPayload {
    AddLayoutSection {
        index: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_header: Option<SectionHeader>,
        #[serde(default)]
        initial_items: Vec<ItemDefinition>,
    },
    MoveLayoutSection {
        section_index: usize,
        to_index: i64,
    },
    RemoveLayoutSection {
        index: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_identifier: Option<StashIdentifier>,
    },
    ChangeLayoutSectionHeader {
        index: usize,
        header: SectionHeader,
        #[serde(default)]
        merge: bool,
    },
    AddSectionItems {
        section_index: usize,
        item_index: i64,
        items: Vec<ItemDefinition>,
    },
    MoveSectionItem {
        section_index: usize,
        item_index: usize,
        to_section_index: usize,
        to_item_index: i64,
    },
    RemoveSectionItem {
        section_index: usize,
        item_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_identifier: Option<StashIdentifier>,
        /// Also remove the section when this was its last item.
        #[serde(default)]
        eager: bool,
    },
    ReplaceSectionItem {
        section_index: usize,
        item_index: usize,
        items: Vec<ItemDefinition>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_identifier: Option<StashIdentifier>,
    },
    ResizeItemsHeight {
        section_index: usize,
        item_indexes: Vec<usize>,
        height: u32,
    },
    ResizeItemWidth {
        section_index: usize,
        item_index: usize,
        width: u32,
    },
    ClearStash {
        #[serde(default)]
        stash_identifiers: Vec<StashIdentifier>,
    },
    UndoLayoutChanges {
        #[serde(default)]
        undo_point: UndoPoint,
    },
    ChangeKpiWidgetHeader {
        target: WidgetTarget,
        header: WidgetHeader,
    },
    ChangeInsightWidgetHeader {
        target: WidgetTarget,
        header: WidgetHeader,
    },
    ChangeWidgetFilterSettings {
        target: WidgetTarget,
        #[serde(default)]
        ignore_dashboard_filters: Vec<FilterReference>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_data_set: Option<ObjRef>,
    },
    ChangeKpiWidgetComparison {
        target: WidgetTarget,
        comparison: KpiComparison,
    },
    ModifyDrillsForInsightWidget {
        target: WidgetTarget,
        drills: Vec<DrillDefinition>,
    },
    RemoveDrillsForInsightWidget {
        target: WidgetTarget,
        selection: DrillSelection,
    },
    AddAttributeFilter {
        display_form: ObjRef,
        index: i64,
    },
    RemoveAttributeFilters {
        local_identifiers: Vec<String>,
    },
    MoveAttributeFilter {
        local_identifier: String,
        index: i64,
    },
    ChangeAttributeFilterSelection {
        local_identifier: String,
        #[serde(default)]
        elements: Vec<String>,
        #[serde(default)]
        negative_selection: bool,
    },
    ChangeDateFilterSelection {
        selection: DateFilterSelection,
    },
    RenameDashboard {
        title: String,
    },
    ChangeSharing {
        sharing: SharingProperties,
    },
    ResetDashboard,
    SaveDashboard,
}

impl CommandPayload {
    pub fn name(&self) -> &'static str {
        match self {
            CommandPayload::AddLayoutSection { .. } => "addLayoutSection",
            CommandPayload::MoveLayoutSection { .. } => "moveLayoutSection",
            CommandPayload::RemoveLayoutSection { .. } => "removeLayoutSection",
            CommandPayload::ChangeLayoutSectionHeader { .. } => "changeLayoutSectionHeader",
            CommandPayload::AddSectionItems { .. } => "addSectionItems",
            CommandPayload::MoveSectionItem { .. } => "moveSectionItem",
            CommandPayload::RemoveSectionItem { .. } => "removeSectionItem",
            CommandPayload::ReplaceSectionItem { .. } => "replaceSectionItem",
            CommandPayload::ResizeItemsHeight { .. } => "resizeItemsHeight",
            CommandPayload::ResizeItemWidth { .. } => "resizeItemWidth",
            CommandPayload::ClearStash { .. } => "clearStash",
            CommandPayload::UndoLayoutChanges { .. } => "undoLayoutChanges",
            CommandPayload::ChangeKpiWidgetHeader { .. } => "changeKpiWidgetHeader",
            CommandPayload::ChangeInsightWidgetHeader { .. } => "changeInsightWidgetHeader",
            CommandPayload::ChangeWidgetFilterSettings { .. } => "changeWidgetFilterSettings",
            CommandPayload::ChangeKpiWidgetComparison { .. } => "changeKpiWidgetComparison",
            CommandPayload::ModifyDrillsForInsightWidget { .. } => "modifyDrillsForInsightWidget",
            CommandPayload::RemoveDrillsForInsightWidget { .. } => "removeDrillsForInsightWidget",
            CommandPayload::AddAttributeFilter { .. } => "addAttributeFilter",
            CommandPayload::RemoveAttributeFilters { .. } => "removeAttributeFilters",
            CommandPayload::MoveAttributeFilter { .. } => "moveAttributeFilter",
            CommandPayload::ChangeAttributeFilterSelection { .. } => "changeAttributeFilterSelection",
            CommandPayload::ChangeDateFilterSelection { .. } => "changeDateFilterSelection",
            CommandPayload::RenameDashboard { .. } => "renameDashboard",
            CommandPayload::ChangeSharing { .. } => "changeSharing",
            CommandPayload::ResetDashboard => "resetDashboard",
            CommandPayload::SaveDashboard => "saveDashboard",
        }
    }
}

/// Immutable command value; the correlation id is echoed on every resulting event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub payload: CommandPayload,
}

impl DashboardCommand {
    pub fn new(payload: CommandPayload) -> Self {
        Self {
            correlation_id: None,
            payload,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn add_layout_section(index: i64) -> Self {
        Self::new(CommandPayload::AddLayoutSection {
            index,
            initial_header: None,
            initial_items: Vec::new(),
        })
    }

    pub fn remove_layout_section(index: i64, stash_identifier: Option<&str>) -> Self {
        Self::new(CommandPayload::RemoveLayoutSection {
            index,
            stash_identifier: stash_identifier.map(str::to_string),
        })
    }

    pub fn undo_layout_changes() -> Self {
        Self::undo_layout_changes_to(UndoPoint::Last)
    }

    pub fn undo_layout_changes_to(undo_point: UndoPoint) -> Self {
        Self::new(CommandPayload::UndoLayoutChanges { undo_point })
    }

    pub fn remove_section_item(
        section_index: usize,
        item_index: usize,
        stash_identifier: Option<&str>,
    ) -> Self {
        Self::new(CommandPayload::RemoveSectionItem {
            section_index,
            item_index,
            stash_identifier: stash_identifier.map(str::to_string),
            eager: false,
        })
    }

    /// Removes the item and, if it was the only one, its section too.
    pub fn eager_remove_section_item(
        section_index: usize,
        item_index: usize,
        stash_identifier: Option<&str>,
    ) -> Self {
        Self::new(CommandPayload::RemoveSectionItem {
            section_index,
            item_index,
            stash_identifier: stash_identifier.map(str::to_string),
            eager: true,
        })
    }

    pub fn change_kpi_widget_header(target: impl Into<WidgetTarget>, header: WidgetHeader) -> Self {
        Self::new(CommandPayload::ChangeKpiWidgetHeader {
            target: target.into(),
            header,
        })
    }

    pub fn add_attribute_filter(display_form: ObjRef, index: i64) -> Self {
        Self::new(CommandPayload::AddAttributeFilter {
            display_form,
            index,
        })
    }

    pub fn change_sharing(sharing: SharingProperties) -> Self {
        Self::new(CommandPayload::ChangeSharing { sharing })
    }

    pub fn rename_dashboard(title: impl Into<String>) -> Self {
        Self::new(CommandPayload::RenameDashboard {
            title: title.into(),
        })
    }

    pub fn reset_dashboard() -> Self {
        Self::new(CommandPayload::ResetDashboard)
    }
}
