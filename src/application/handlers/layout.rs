// Layout handlers - sections, items, stash and undo
use super::{item_identities, layout_identities, resolve_items, Applied, HistoryEffect};
use crate::application::environment::Environment;
use crate::application::history::UndoHistory;
use crate::domain::commands::{ItemDefinition, UndoPoint};
use crate::domain::dashboard::DashboardState;
use crate::domain::errors::{user_error, CommandError};
use crate::domain::events::EventPayload;
use crate::domain::layout::{
    resolve_existing_index, resolve_insertion_index, GridSize, Section, SectionHeader,
};
use crate::domain::stash::StashIdentifier;
use crate::domain::widget::Widget;
use std::sync::Arc;

fn missing_section(index: impl std::fmt::Display, len: usize) -> Result<Applied, CommandError> {
    user_error(format!(
        "Section {} does not exist; the layout has {} sections",
        index, len
    ))
}

fn missing_item(section: usize, item: usize, len: usize) -> Result<Applied, CommandError> {
    user_error(format!(
        "Item {} does not exist in section {} which has {} items",
        item, section, len
    ))
}

fn section_len(state: &DashboardState, index: usize) -> Option<usize> {
    state.layout.section(index).map(|s| s.items.len())
}

pub fn add_section(
    state: &DashboardState,
    index: i64,
    header: Option<&SectionHeader>,
    definitions: &[ItemDefinition],
    env: &Environment,
) -> Result<Applied, CommandError> {
    let len = state.layout.sections.len();
    let Some(position) = resolve_insertion_index(index, len, env.options.strict_placement) else {
        return user_error(format!(
            "Cannot add section at index {}; the layout has {} sections",
            index, len
        ));
    };

    let mut next = state.clone();
    let existing = layout_identities(&state.layout);
    let (items, stashes_used) =
        resolve_items(definitions, Arc::make_mut(&mut next.stash), &existing)?;

    let section = Section {
        header: header.cloned(),
        items,
    };
    Arc::make_mut(&mut next.layout)
        .sections
        .insert(position, section.clone());

    tracing::debug!("Added section at {} ({} sections)", position, len + 1);
    Ok(Applied::new(
        next,
        vec![EventPayload::SectionAdded {
            index: position,
            section,
            stashes_used,
        }],
        HistoryEffect::Record,
    ))
}

pub fn move_section(
    state: &DashboardState,
    section_index: usize,
    to_index: i64,
    env: &Environment,
) -> Result<Applied, CommandError> {
    let len = state.layout.sections.len();
    if section_index >= len {
        return missing_section(section_index, len);
    }
    let Some(target) = resolve_insertion_index(to_index, len - 1, env.options.strict_placement)
    else {
        return user_error(format!(
            "Cannot move section to index {}; the layout has {} sections",
            to_index, len
        ));
    };
    if target == section_index {
        return user_error(format!("Section {} is already at index {}", section_index, target));
    }

    let mut next = state.clone();
    let layout = Arc::make_mut(&mut next.layout);
    let section = layout.sections.remove(section_index);
    layout.sections.insert(target, section.clone());

    Ok(Applied::new(
        next,
        vec![EventPayload::SectionMoved {
            section,
            from_index: section_index,
            to_index: target,
        }],
        HistoryEffect::Record,
    ))
}

pub fn remove_section(
    state: &DashboardState,
    index: i64,
    stash_identifier: Option<&StashIdentifier>,
) -> Result<Applied, CommandError> {
    let len = state.layout.sections.len();
    let Some(position) = resolve_existing_index(index, len) else {
        return missing_section(index, len);
    };

    let mut next = state.clone();
    let section = Arc::make_mut(&mut next.layout).sections.remove(position);
    if let Some(key) = stash_identifier {
        Arc::make_mut(&mut next.stash).put(key.clone(), section.items.clone());
    }

    tracing::debug!(
        "Removed section {} with {} items, stashed as {:?}",
        position,
        section.items.len(),
        stash_identifier
    );
    Ok(Applied::new(
        next,
        vec![EventPayload::SectionRemoved {
            index: position,
            section,
            stash_identifier: stash_identifier.cloned(),
        }],
        HistoryEffect::Record,
    ))
}

pub fn change_section_header(
    state: &DashboardState,
    index: usize,
    header: &SectionHeader,
    merge: bool,
) -> Result<Applied, CommandError> {
    let len = state.layout.sections.len();
    if index >= len {
        return missing_section(index, len);
    }

    let mut next = state.clone();
    let layout = Arc::make_mut(&mut next.layout);
    let section = &mut layout.sections[index];
    let updated = match (&section.header, merge) {
        (Some(current), true) => current.merge(header),
        _ => header.clone(),
    };
    section.header = Some(updated.clone());

    Ok(Applied::new(
        next,
        vec![EventPayload::SectionHeaderChanged {
            index,
            header: updated,
        }],
        HistoryEffect::Record,
    ))
}

pub fn add_items(
    state: &DashboardState,
    section_index: usize,
    item_index: i64,
    definitions: &[ItemDefinition],
    env: &Environment,
) -> Result<Applied, CommandError> {
    let Some(len) = section_len(state, section_index) else {
        return missing_section(section_index, state.layout.sections.len());
    };
    if definitions.is_empty() {
        return user_error("No items to add");
    }
    let Some(position) = resolve_insertion_index(item_index, len, env.options.strict_placement)
    else {
        return user_error(format!(
            "Cannot add items at index {}; section {} has {} items",
            item_index, section_index, len
        ));
    };

    let mut next = state.clone();
    let existing = layout_identities(&state.layout);
    let (items, stashes_used) =
        resolve_items(definitions, Arc::make_mut(&mut next.stash), &existing)?;

    let section = &mut Arc::make_mut(&mut next.layout).sections[section_index];
    section
        .items
        .splice(position..position, items.iter().cloned());

    Ok(Applied::new(
        next,
        vec![EventPayload::SectionItemsAdded {
            section_index,
            start_index: position,
            items,
            stashes_used,
        }],
        HistoryEffect::Record,
    ))
}

pub fn move_item(
    state: &DashboardState,
    section_index: usize,
    item_index: usize,
    to_section_index: usize,
    to_item_index: i64,
    env: &Environment,
) -> Result<Applied, CommandError> {
    let sections = state.layout.sections.len();
    let Some(len) = section_len(state, section_index) else {
        return missing_section(section_index, sections);
    };
    if item_index >= len {
        return missing_item(section_index, item_index, len);
    }
    let Some(target_len) = section_len(state, to_section_index) else {
        return missing_section(to_section_index, sections);
    };

    let same_section = section_index == to_section_index;
    let available = if same_section { len - 1 } else { target_len };
    let Some(target) =
        resolve_insertion_index(to_item_index, available, env.options.strict_placement)
    else {
        return user_error(format!(
            "Cannot move item to index {} of section {}",
            to_item_index, to_section_index
        ));
    };
    if same_section && target == item_index {
        return user_error(format!(
            "Item {} is already at index {} of section {}",
            item_index, target, section_index
        ));
    }

    let mut next = state.clone();
    let layout = Arc::make_mut(&mut next.layout);
    let item = layout.sections[section_index].items.remove(item_index);
    layout.sections[to_section_index]
        .items
        .insert(target, item.clone());

    Ok(Applied::new(
        next,
        vec![EventPayload::SectionItemMoved {
            item,
            from_section_index: section_index,
            to_section_index,
            from_index: item_index,
            to_index: target,
        }],
        HistoryEffect::Record,
    ))
}

/// Removes one item. An emptied section stays in place unless `eager` is set.
pub fn remove_item(
    state: &DashboardState,
    section_index: usize,
    item_index: usize,
    stash_identifier: Option<&StashIdentifier>,
    eager: bool,
) -> Result<Applied, CommandError> {
    let Some(len) = section_len(state, section_index) else {
        return missing_section(section_index, state.layout.sections.len());
    };
    if item_index >= len {
        return missing_item(section_index, item_index, len);
    }

    let mut next = state.clone();
    let layout = Arc::make_mut(&mut next.layout);
    let item = layout.sections[section_index].items.remove(item_index);
    let emptied = eager && layout.sections[section_index].items.is_empty();
    let removed_section = emptied.then(|| layout.sections.remove(section_index));
    if let Some(key) = stash_identifier {
        Arc::make_mut(&mut next.stash).put(key.clone(), vec![item.clone()]);
    }

    let mut events = vec![EventPayload::SectionItemRemoved {
        item,
        section_index,
        item_index,
        stash_identifier: stash_identifier.cloned(),
    }];
    if let Some(section) = removed_section {
        tracing::debug!("Removed emptied section {}", section_index);
        events.push(EventPayload::SectionRemoved {
            index: section_index,
            section,
            stash_identifier: None,
        });
    }
    Ok(Applied::new(next, events, HistoryEffect::Record))
}

/// Replaces one item with the given items.
///
/// Stash entries named by the definitions are consumed before the replaced
/// item is stashed, so reusing the same key keeps the replaced item.
pub fn replace_item(
    state: &DashboardState,
    section_index: usize,
    item_index: usize,
    definitions: &[ItemDefinition],
    stash_identifier: Option<&StashIdentifier>,
) -> Result<Applied, CommandError> {
    let Some(len) = section_len(state, section_index) else {
        return missing_section(section_index, state.layout.sections.len());
    };
    if item_index >= len {
        return missing_item(section_index, item_index, len);
    }
    if definitions.is_empty() {
        return user_error("No replacement items given");
    }

    let previous = state.layout.sections[section_index].items[item_index].clone();
    let replaced = item_identities([&previous]);
    let existing: Vec<_> = layout_identities(&state.layout)
        .into_iter()
        .filter(|identity| !replaced.contains(identity))
        .collect();

    let mut next = state.clone();
    let stash = Arc::make_mut(&mut next.stash);
    let (items, stashes_used) = resolve_items(definitions, stash, &existing)?;
    if let Some(key) = stash_identifier {
        stash.put(key.clone(), vec![previous.clone()]);
    }

    Arc::make_mut(&mut next.layout).sections[section_index]
        .items
        .splice(item_index..=item_index, items.iter().cloned());

    Ok(Applied::new(
        next,
        vec![EventPayload::SectionItemReplaced {
            section_index,
            item_index,
            items,
            previous_item: previous,
            stash_identifier: stash_identifier.cloned(),
            stashes_used,
        }],
        HistoryEffect::Record,
    ))
}

pub fn resize_height(
    state: &DashboardState,
    section_index: usize,
    item_indexes: &[usize],
    height: u32,
) -> Result<Applied, CommandError> {
    let Some(len) = section_len(state, section_index) else {
        return missing_section(section_index, state.layout.sections.len());
    };
    if item_indexes.is_empty() {
        return user_error("No items to resize");
    }
    if let Some(&missing) = item_indexes.iter().find(|&&i| i >= len) {
        return missing_item(section_index, missing, len);
    }
    if height == 0 {
        return user_error("Item height must be at least 1");
    }

    let mut next = state.clone();
    let section = &mut Arc::make_mut(&mut next.layout).sections[section_index];
    for &index in item_indexes {
        let size = &mut section.items[index].size;
        size.xl.grid_height = Some(height);
        for grid in size.overrides.values_mut() {
            grid.grid_height = Some(height);
        }
    }

    Ok(Applied::new(
        next,
        vec![EventPayload::ItemsHeightResized {
            section_index,
            item_indexes: item_indexes.to_vec(),
            height,
        }],
        HistoryEffect::Record,
    ))
}

pub fn resize_width(
    state: &DashboardState,
    section_index: usize,
    item_index: usize,
    width: u32,
) -> Result<Applied, CommandError> {
    let Some(len) = section_len(state, section_index) else {
        return missing_section(section_index, state.layout.sections.len());
    };
    if item_index >= len {
        return missing_item(section_index, item_index, len);
    }
    if !GridSize::is_valid_width(width) {
        return user_error(format!("Width {} is outside of the 1-12 column grid", width));
    }

    let mut next = state.clone();
    Arc::make_mut(&mut next.layout).sections[section_index].items[item_index]
        .size
        .xl
        .grid_width = width;

    Ok(Applied::new(
        next,
        vec![EventPayload::ItemWidthResized {
            section_index,
            item_index,
            width,
        }],
        HistoryEffect::Record,
    ))
}

/// Drops the named stash entries, or all of them when none are named.
/// Unknown identifiers are skipped.
pub fn clear_stash(
    state: &DashboardState,
    stash_identifiers: &[StashIdentifier],
) -> Result<Applied, CommandError> {
    let mut next = state.clone();
    let stash = Arc::make_mut(&mut next.stash);
    let cleared = if stash_identifiers.is_empty() {
        stash.clear()
    } else {
        stash_identifiers
            .iter()
            .filter(|key| stash.take(key).is_some())
            .cloned()
            .collect()
    };

    Ok(Applied::new(
        next,
        vec![EventPayload::StashCleared {
            stash_identifiers: cleared,
        }],
        HistoryEffect::Record,
    ))
}

/// Number of newest history entries `undo_point` reaches back through.
fn undo_depth(history: &UndoHistory, undo_point: &UndoPoint) -> Result<usize, CommandError> {
    let available = history.len();
    let depth = match undo_point {
        UndoPoint::Last => 1,
        UndoPoint::Count { count: 0 } => {
            return user_error("Undo needs to revert at least one change");
        }
        UndoPoint::Count { count } => *count,
        UndoPoint::CorrelationPrefix { prefix } => history
            .newest_first()
            .take_while(|entry| entry.correlation_id.starts_with(prefix.as_str()))
            .count()
            .max(1),
    };
    Ok(depth.min(available))
}

/// Restores layout and stash from before the changes selected by `undo_point`.
///
/// Filter commands are not undone, so widgets in the restored layout stop
/// ignoring attribute filters the filter context no longer has. With an empty
/// history the layout is reported unchanged.
pub fn undo(
    state: &DashboardState,
    history: &UndoHistory,
    undo_point: &UndoPoint,
) -> Result<Applied, CommandError> {
    let depth = undo_depth(history, undo_point)?;
    let mut next = state.clone();
    let target = depth
        .checked_sub(1)
        .and_then(|newest| history.newest_first().nth(newest));
    let effect = match target {
        Some(entry) => {
            tracing::debug!(
                "Undoing {} changes back to {} ({}), {} entries left",
                depth,
                entry.command,
                entry.correlation_id,
                history.len() - depth
            );
            next.layout = entry.layout.clone();
            next.stash = entry.stash.clone();
            HistoryEffect::Pop(depth)
        }
        None => HistoryEffect::Untouched,
    };

    let context = &state.filter_context;
    let mut drop_stale = |widget: &Widget| {
        widget.retaining_ignored_attributes(|display_form| {
            context.attribute_filter_for_display_form(display_form).is_some()
        })
    };
    if next.layout.widgets().into_iter().any(|w| drop_stale(w).is_some()) {
        let cleaned = Arc::make_mut(&mut next.layout).replace_widgets(&mut drop_stale);
        tracing::debug!("Dropped ignored filters that no longer exist from {} widgets", cleaned);
    }

    let layout = (*next.layout).clone();
    Ok(Applied::new(
        next,
        vec![EventPayload::LayoutChanged { layout }],
        effect,
    ))
}
