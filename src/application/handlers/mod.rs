// Command handlers - map (revision, command) to a new revision and its events
pub mod dashboard;
pub mod filters;
pub mod layout;
pub mod widgets;

use crate::application::environment::Environment;
use crate::application::history::UndoHistory;
use crate::domain::commands::{CommandPayload, ItemDefinition, WidgetTarget};
use crate::domain::dashboard::DashboardState;
use crate::domain::errors::{user_error, CommandError};
use crate::domain::events::EventPayload;
use crate::domain::layout::{Item, Layout};
use crate::domain::refs::ObjectIdentity;
use crate::domain::stash::{Stash, StashIdentifier};
use crate::domain::widget::Widget;

/// What the dispatcher must do with the undo history after a successful command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEffect {
    Untouched,
    /// Record layout and stash as they were before the command.
    Record,
    /// Drop the newest entries that were just restored.
    Pop(usize),
    Clear,
}

#[derive(Debug)]
pub struct Applied {
    pub state: DashboardState,
    pub events: Vec<EventPayload>,
    pub history: HistoryEffect,
}

impl Applied {
    pub fn new(state: DashboardState, events: Vec<EventPayload>, history: HistoryEffect) -> Self {
        Self {
            state,
            events,
            history,
        }
    }
}

/// Routes a command to its handler.
///
/// Handlers never touch `state`; they work on a copy whose heavy parts are
/// shared until first written.
pub async fn handle(
    state: &DashboardState,
    history: &UndoHistory,
    payload: &CommandPayload,
    env: &Environment,
) -> Result<Applied, CommandError> {
    match payload {
        CommandPayload::AddLayoutSection {
            index,
            initial_header,
            initial_items,
        } => layout::add_section(state, *index, initial_header.as_ref(), initial_items, env),
        CommandPayload::MoveLayoutSection {
            section_index,
            to_index,
        } => layout::move_section(state, *section_index, *to_index, env),
        CommandPayload::RemoveLayoutSection {
            index,
            stash_identifier,
        } => layout::remove_section(state, *index, stash_identifier.as_ref()),
        CommandPayload::ChangeLayoutSectionHeader {
            index,
            header,
            merge,
        } => layout::change_section_header(state, *index, header, *merge),
        CommandPayload::AddSectionItems {
            section_index,
            item_index,
            items,
        } => layout::add_items(state, *section_index, *item_index, items, env),
        CommandPayload::MoveSectionItem {
            section_index,
            item_index,
            to_section_index,
            to_item_index,
        } => layout::move_item(
            state,
            *section_index,
            *item_index,
            *to_section_index,
            *to_item_index,
            env,
        ),
        CommandPayload::RemoveSectionItem {
            section_index,
            item_index,
            stash_identifier,
            eager,
        } => layout::remove_item(
            state,
            *section_index,
            *item_index,
            stash_identifier.as_ref(),
            *eager,
        ),
        CommandPayload::ReplaceSectionItem {
            section_index,
            item_index,
            items,
            stash_identifier,
        } => layout::replace_item(
            state,
            *section_index,
            *item_index,
            items,
            stash_identifier.as_ref(),
        ),
        CommandPayload::ResizeItemsHeight {
            section_index,
            item_indexes,
            height,
        } => layout::resize_height(state, *section_index, item_indexes, *height),
        CommandPayload::ResizeItemWidth {
            section_index,
            item_index,
            width,
        } => layout::resize_width(state, *section_index, *item_index, *width),
        CommandPayload::ClearStash { stash_identifiers } => {
            layout::clear_stash(state, stash_identifiers)
        }
        CommandPayload::UndoLayoutChanges { undo_point } => {
            layout::undo(state, history, undo_point)
        }
        CommandPayload::ChangeKpiWidgetHeader { target, header } => {
            widgets::change_kpi_header(state, target, header)
        }
        CommandPayload::ChangeInsightWidgetHeader { target, header } => {
            widgets::change_insight_header(state, target, header)
        }
        CommandPayload::ChangeWidgetFilterSettings {
            target,
            ignore_dashboard_filters,
            date_data_set,
        } => {
            widgets::change_filter_settings(
                state,
                target,
                ignore_dashboard_filters,
                date_data_set.as_ref(),
                env,
            )
            .await
        }
        CommandPayload::ChangeKpiWidgetComparison { target, comparison } => {
            widgets::change_kpi_comparison(state, target, *comparison)
        }
        CommandPayload::ModifyDrillsForInsightWidget { target, drills } => {
            widgets::modify_drills(state, target, drills)
        }
        CommandPayload::RemoveDrillsForInsightWidget { target, selection } => {
            widgets::remove_drills(state, target, selection)
        }
        CommandPayload::AddAttributeFilter {
            display_form,
            index,
        } => filters::add_attribute_filter(state, display_form, *index, env).await,
        CommandPayload::RemoveAttributeFilters { local_identifiers } => {
            filters::remove_attribute_filters(state, local_identifiers)
        }
        CommandPayload::MoveAttributeFilter {
            local_identifier,
            index,
        } => filters::move_attribute_filter(state, local_identifier, *index, env),
        CommandPayload::ChangeAttributeFilterSelection {
            local_identifier,
            elements,
            negative_selection,
        } => filters::change_attribute_selection(
            state,
            local_identifier,
            elements,
            *negative_selection,
        ),
        CommandPayload::ChangeDateFilterSelection { selection } => {
            filters::change_date_selection(state, selection, env)
        }
        CommandPayload::RenameDashboard { title } => dashboard::rename(state, title),
        CommandPayload::ChangeSharing { sharing } => dashboard::change_sharing(state, sharing, env),
        CommandPayload::ResetDashboard => Ok(dashboard::reset(state, env)),
        CommandPayload::SaveDashboard => dashboard::save(state, env).await,
    }
}

/// Identities of every widget in `items`, including widgets of nested layouts.
pub(crate) fn item_identities<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<ObjectIdentity> {
    let mut identities = Vec::new();
    for item in items {
        if let Some(widget) = &item.widget {
            identities.push(widget.identity().clone());
            if let Widget::Layout(nested) = widget {
                identities.extend(
                    nested
                        .layout
                        .widgets()
                        .into_iter()
                        .map(|w| w.identity().clone()),
                );
            }
        }
    }
    identities
}

pub(crate) fn layout_identities(layout: &Layout) -> Vec<ObjectIdentity> {
    layout
        .widgets()
        .into_iter()
        .map(|w| w.identity().clone())
        .collect()
}

/// Turns item definitions into items, consuming stash entries they name.
///
/// Rejects invalid sizes and widgets whose identity is already in `existing`
/// or appears twice among the new items.
pub(crate) fn resolve_items(
    definitions: &[ItemDefinition],
    stash: &mut Stash,
    existing: &[ObjectIdentity],
) -> Result<(Vec<Item>, Vec<StashIdentifier>), CommandError> {
    let mut items = Vec::new();
    let mut stashes_used = Vec::new();

    for definition in definitions {
        match definition {
            ItemDefinition::Item(item) => items.push(item.clone()),
            ItemDefinition::Stashed(key) => {
                let Some(stashed) = stash.take(key) else {
                    return user_error(format!("Stash {} does not exist", key));
                };
                items.extend(stashed);
                stashes_used.push(key.clone());
            }
        }
    }

    if let Some(item) = items.iter().find(|item| !item.size.all_widths_valid()) {
        return user_error(format!(
            "Item width {} is outside of the 1-12 column grid",
            item.size.xl.grid_width
        ));
    }

    let mut seen: Vec<ObjectIdentity> = existing.to_vec();
    for identity in item_identities(&items) {
        if seen.iter().any(|other| other.same_object(&identity)) {
            return user_error(format!(
                "Widget {} is already placed on the dashboard",
                identity.identifier
            ));
        }
        seen.push(identity);
    }

    Ok((items, stashes_used))
}

pub(crate) fn describe_target(target: &WidgetTarget) -> String {
    match target {
        WidgetTarget::Ref(reference) => reference.to_string(),
        WidgetTarget::Path(path) => {
            let steps: Vec<String> = path
                .steps()
                .iter()
                .map(|step| format!("{}/{}", step.section, step.item))
                .collect();
            format!("path:{}", steps.join("."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layout::{ItemPath, ItemSize};
    use crate::domain::refs::ObjRef;
    use crate::domain::widget::RichTextWidget;

    fn text(id: &str, width: u32) -> Item {
        Item::new(
            ItemSize::xl(width),
            Widget::RichText(RichTextWidget {
                identity: ObjectIdentity::new(id),
                content: String::new(),
            }),
        )
    }

    #[test]
    fn test_resolve_items_consumes_stash() {
        let mut stash = Stash::default();
        stash.put("s1", vec![text("a", 6), text("b", 6)]);
        let definitions = vec![
            ItemDefinition::Item(text("c", 12)),
            ItemDefinition::Stashed("s1".to_string()),
        ];

        let (items, used) = resolve_items(&definitions, &mut stash, &[]).unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(used, vec!["s1".to_string()]);
        assert!(stash.is_empty());
    }

    #[test]
    fn test_resolve_items_rejects_duplicates_and_bad_sizes() {
        let mut stash = Stash::default();

        let duplicate = vec![ItemDefinition::Item(text("a", 6))];
        let existing = vec![ObjectIdentity::new("a")];
        assert!(resolve_items(&duplicate, &mut stash, &existing).is_err());

        let twice = vec![
            ItemDefinition::Item(text("a", 6)),
            ItemDefinition::Item(text("a", 6)),
        ];
        assert!(resolve_items(&twice, &mut stash, &[]).is_err());

        let too_wide = vec![ItemDefinition::Item(text("a", 13))];
        assert!(resolve_items(&too_wide, &mut stash, &[]).is_err());

        let missing = vec![ItemDefinition::Stashed("nope".to_string())];
        assert!(resolve_items(&missing, &mut stash, &[]).is_err());
    }

    #[test]
    fn test_describe_target() {
        assert_eq!(
            describe_target(&WidgetTarget::Ref(ObjRef::identifier("kpi.1"))),
            "id:kpi.1"
        );
        assert_eq!(
            describe_target(&WidgetTarget::Path(ItemPath::root(0, 2).nested(1, 0))),
            "path:0/2.1/0"
        );
    }
}
