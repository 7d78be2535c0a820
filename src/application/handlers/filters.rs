// Filter handlers - attribute and date filters of the filter context
use super::{Applied, HistoryEffect};
use crate::application::environment::Environment;
use crate::domain::commands::DateFilterSelection;
use crate::domain::dashboard::DashboardState;
use crate::domain::errors::{user_error, CommandError, CommandFailed};
use crate::domain::events::EventPayload;
use crate::domain::filters::{AttributeFilter, DateBound, DateFilter, DateFilterType, FilterContext};
use crate::domain::layout::resolve_insertion_index;
use crate::domain::refs::ObjRef;
use crate::domain::widget::Widget;
use std::sync::Arc;

const MAX_ID_ATTEMPTS: usize = 16;

/// Filter commands are not undoable; every one ends with the resulting filter context.
fn filter_change(next: DashboardState, mut events: Vec<EventPayload>) -> Applied {
    events.push(EventPayload::FilterContextChanged {
        filter_context: (*next.filter_context).clone(),
    });
    Applied::new(next, events, HistoryEffect::Untouched)
}

fn fresh_local_identifier(
    context: &FilterContext,
    env: &Environment,
) -> Result<String, CommandError> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = env.ids.next_id();
        if !context.has_local_identifier(&candidate) {
            return Ok(candidate);
        }
    }
    Err(CommandError::Invariant(format!(
        "no unique filter identifier after {} attempts",
        MAX_ID_ATTEMPTS
    )))
}

/// Adds a select-all filter for the display form at `index` among attribute filters.
pub async fn add_attribute_filter(
    state: &DashboardState,
    display_form: &ObjRef,
    index: i64,
    env: &Environment,
) -> Result<Applied, CommandError> {
    let count = state.filter_context.attribute_filter_count();
    let Some(position) = resolve_insertion_index(index, count, env.options.strict_placement) else {
        return user_error(format!(
            "Cannot add attribute filter at index {}; there are {} attribute filters",
            index, count
        ));
    };

    let descriptor = env
        .catalog
        .resolve_display_form(display_form)
        .await
        .map_err(CommandFailed::from)?;

    if let Some(existing) = state
        .filter_context
        .attribute_filters()
        .find(|f| &f.display_form == display_form || descriptor.identity.matches(&f.display_form))
    {
        return user_error(format!(
            "Dashboard already filters by display form {} in filter {}",
            display_form, existing.local_identifier
        ));
    }

    let local_identifier = fresh_local_identifier(&state.filter_context, env)?;
    let filter = AttributeFilter::select_all(
        local_identifier,
        display_form.clone(),
        Some(descriptor.title),
    );

    let mut next = state.clone();
    Arc::make_mut(&mut next.filter_context).insert_attribute_filter(position, filter.clone());

    tracing::debug!(
        "Added attribute filter {} for {} at {}",
        filter.local_identifier,
        display_form,
        position
    );
    Ok(filter_change(
        next,
        vec![EventPayload::AttributeFilterAdded {
            filter,
            index: position,
        }],
    ))
}

/// Removes the filters and drops references to them from every widget's ignore list.
pub fn remove_attribute_filters(
    state: &DashboardState,
    local_identifiers: &[String],
) -> Result<Applied, CommandError> {
    if local_identifiers.is_empty() {
        return user_error("No attribute filters to remove");
    }
    if let Some(missing) = local_identifiers
        .iter()
        .find(|id| state.filter_context.attribute_filter(id).is_none())
    {
        return user_error(format!("Attribute filter {} does not exist", missing));
    }

    let mut next = state.clone();
    let context = Arc::make_mut(&mut next.filter_context);
    let removed: Vec<AttributeFilter> = local_identifiers
        .iter()
        .filter_map(|id| context.remove_attribute_filter(id))
        .collect();

    let display_forms: Vec<ObjRef> = removed.iter().map(|f| f.display_form.clone()).collect();
    let affected = state
        .layout
        .widgets()
        .into_iter()
        .any(|w| w.without_ignored_display_forms(&display_forms).is_some());
    if affected {
        let cleaned = Arc::make_mut(&mut next.layout)
            .replace_widgets(&mut |w: &Widget| w.without_ignored_display_forms(&display_forms));
        tracing::debug!("Dropped removed filters from {} widgets", cleaned);
    }

    Ok(filter_change(
        next,
        vec![EventPayload::AttributeFilterRemoved { filters: removed }],
    ))
}

pub fn move_attribute_filter(
    state: &DashboardState,
    local_identifier: &str,
    index: i64,
    env: &Environment,
) -> Result<Applied, CommandError> {
    let Some(from) = state.filter_context.attribute_filter_index(local_identifier) else {
        return user_error(format!("Attribute filter {} does not exist", local_identifier));
    };
    let count = state.filter_context.attribute_filter_count();
    let Some(to) = resolve_insertion_index(index, count - 1, env.options.strict_placement) else {
        return user_error(format!(
            "Cannot move attribute filter to index {}; there are {} attribute filters",
            index, count
        ));
    };
    if from == to {
        return user_error(format!(
            "Attribute filter {} is already at index {}",
            local_identifier, to
        ));
    }

    let mut next = state.clone();
    let context = Arc::make_mut(&mut next.filter_context);
    let Some(filter) = context.remove_attribute_filter(local_identifier) else {
        return Err(CommandError::Invariant(format!(
            "attribute filter {} vanished",
            local_identifier
        )));
    };
    context.insert_attribute_filter(to, filter.clone());

    Ok(filter_change(
        next,
        vec![EventPayload::AttributeFilterMoved {
            filter,
            from_index: from,
            to_index: to,
        }],
    ))
}

pub fn change_attribute_selection(
    state: &DashboardState,
    local_identifier: &str,
    elements: &[String],
    negative_selection: bool,
) -> Result<Applied, CommandError> {
    if state.filter_context.attribute_filter(local_identifier).is_none() {
        return user_error(format!("Attribute filter {} does not exist", local_identifier));
    }

    let mut next = state.clone();
    let Some(filter) = Arc::make_mut(&mut next.filter_context).attribute_filter_mut(local_identifier)
    else {
        return Err(CommandError::Invariant(format!(
            "attribute filter {} vanished",
            local_identifier
        )));
    };
    filter.elements = elements.to_vec();
    filter.negative_selection = negative_selection;
    let filter = filter.clone();

    Ok(filter_change(
        next,
        vec![EventPayload::AttributeFilterSelectionChanged { filter }],
    ))
}

fn validate_date_selection(selection: &DateFilterSelection) -> Result<(), CommandError> {
    match (selection.filter_type, selection.from, selection.to) {
        (DateFilterType::Relative, Some(DateBound::Offset(from)), Some(DateBound::Offset(to))) => {
            if from > to {
                return user_error(format!("Relative range {}..{} is reversed", from, to));
            }
            Ok(())
        }
        (DateFilterType::Absolute, Some(DateBound::Date(from)), Some(DateBound::Date(to))) => {
            if from > to {
                return user_error(format!("Date range {}..{} is reversed", from, to));
            }
            Ok(())
        }
        (DateFilterType::Relative, _, _) => {
            user_error("Relative date filters need both offsets or none")
        }
        (DateFilterType::Absolute, _, _) => user_error("Absolute date filters need both dates"),
    }
}

/// Changes the common date filter; a relative selection without bounds removes it.
pub fn change_date_selection(
    state: &DashboardState,
    selection: &DateFilterSelection,
    env: &Environment,
) -> Result<Applied, CommandError> {
    let mut next = state.clone();

    if selection.is_all_time() {
        Arc::make_mut(&mut next.filter_context).remove_common_date_filter();
        return Ok(filter_change(
            next,
            vec![EventPayload::DateFilterSelectionChanged { filter: None }],
        ));
    }

    validate_date_selection(selection)?;
    let local_identifier = match state.filter_context.common_date_filter() {
        Some(existing) => existing.local_identifier.clone(),
        None => fresh_local_identifier(&state.filter_context, env)?,
    };
    let filter = DateFilter {
        local_identifier,
        data_set: None,
        filter_type: selection.filter_type,
        granularity: selection.granularity,
        from: selection.from,
        to: selection.to,
    };
    Arc::make_mut(&mut next.filter_context).upsert_common_date_filter(filter.clone());

    Ok(filter_change(
        next,
        vec![EventPayload::DateFilterSelectionChanged {
            filter: Some(filter),
        }],
    ))
}
