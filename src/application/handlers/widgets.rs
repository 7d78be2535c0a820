// Widget handlers - headers, filter settings, KPI comparison and insight drills
use super::{describe_target, Applied, HistoryEffect};
use crate::application::environment::Environment;
use crate::domain::commands::{DrillSelection, WidgetTarget};
use crate::domain::dashboard::DashboardState;
use crate::domain::errors::{user_error, CommandError, CommandFailed};
use crate::domain::events::EventPayload;
use crate::domain::refs::ObjRef;
use crate::domain::selectors::select_widget;
use crate::domain::widget::{
    DrillDefinition, FilterReference, InsightWidget, KpiComparison, KpiWidget, Widget,
    WidgetHeader,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Builds a replacement for the targeted widget and assigns it back into its item.
fn replace_widget<F>(
    state: &DashboardState,
    target: &WidgetTarget,
    build: F,
) -> Result<(DashboardState, ObjRef), CommandError>
where
    F: FnOnce(&Widget) -> Result<Widget, CommandError>,
{
    let Some((path, widget)) = select_widget(state, target) else {
        return user_error(format!(
            "Widget {} could not be found",
            describe_target(target)
        ));
    };
    let replacement = build(widget)?;
    let reference = widget.identity().to_ref();

    let mut next = state.clone();
    let item = Arc::make_mut(&mut next.layout)
        .get_item_mut(&path)
        .ok_or_else(|| {
            CommandError::Invariant(format!("item at {} vanished", describe_target(target)))
        })?;
    item.widget = Some(replacement);
    Ok((next, reference))
}

fn wrong_kind(widget: &Widget, expected: &str) -> Result<Widget, CommandError> {
    user_error(format!(
        "Widget {} is a {:?} widget, not {}",
        widget.identity().identifier,
        widget.kind(),
        expected
    ))
}

pub fn change_kpi_header(
    state: &DashboardState,
    target: &WidgetTarget,
    header: &WidgetHeader,
) -> Result<Applied, CommandError> {
    let (next, widget) = replace_widget(state, target, |widget| match widget {
        Widget::Kpi(kpi) => Ok(Widget::Kpi(KpiWidget {
            title: header.title.clone().unwrap_or_default(),
            ..kpi.clone()
        })),
        Widget::Insight(_)
        | Widget::RichText(_)
        | Widget::VisualizationSwitcher(_)
        | Widget::Layout(_)
        | Widget::Placeholder(_) => wrong_kind(widget, "a KPI"),
    })?;

    Ok(Applied::new(
        next,
        vec![EventPayload::KpiWidgetHeaderChanged {
            widget,
            header: header.clone(),
        }],
        HistoryEffect::Record,
    ))
}

pub fn change_insight_header(
    state: &DashboardState,
    target: &WidgetTarget,
    header: &WidgetHeader,
) -> Result<Applied, CommandError> {
    let (next, widget) = replace_widget(state, target, |widget| match widget {
        Widget::Insight(insight) => Ok(Widget::Insight(InsightWidget {
            title: header.title.clone().unwrap_or_default(),
            ..insight.clone()
        })),
        Widget::Kpi(_)
        | Widget::RichText(_)
        | Widget::VisualizationSwitcher(_)
        | Widget::Layout(_)
        | Widget::Placeholder(_) => wrong_kind(widget, "an insight"),
    })?;

    Ok(Applied::new(
        next,
        vec![EventPayload::InsightWidgetHeaderChanged {
            widget,
            header: header.clone(),
        }],
        HistoryEffect::Record,
    ))
}

/// Sets which dashboard filters a KPI or insight ignores and which date data set it uses.
pub async fn change_filter_settings(
    state: &DashboardState,
    target: &WidgetTarget,
    ignore_dashboard_filters: &[FilterReference],
    date_data_set: Option<&ObjRef>,
    env: &Environment,
) -> Result<Applied, CommandError> {
    for filter in ignore_dashboard_filters {
        match filter {
            FilterReference::Attribute { display_form } => {
                if state
                    .filter_context
                    .attribute_filter_for_display_form(display_form)
                    .is_none()
                {
                    return user_error(format!(
                        "No dashboard filter uses display form {}",
                        display_form
                    ));
                }
            }
            FilterReference::Date { data_set } => {
                env.catalog
                    .resolve_date_data_set(data_set)
                    .await
                    .map_err(CommandFailed::from)?;
            }
        }
    }
    if let Some(data_set) = date_data_set {
        env.catalog
            .resolve_date_data_set(data_set)
            .await
            .map_err(CommandFailed::from)?;
    }

    let ignored = ignore_dashboard_filters.to_vec();
    let (next, widget) = replace_widget(state, target, |widget| match widget {
        Widget::Insight(insight) => Ok(Widget::Insight(InsightWidget {
            ignore_dashboard_filters: ignored.clone(),
            date_data_set: date_data_set.cloned(),
            ..insight.clone()
        })),
        Widget::Kpi(kpi) => Ok(Widget::Kpi(KpiWidget {
            ignore_dashboard_filters: ignored.clone(),
            date_data_set: date_data_set.cloned(),
            ..kpi.clone()
        })),
        Widget::RichText(_)
        | Widget::VisualizationSwitcher(_)
        | Widget::Layout(_)
        | Widget::Placeholder(_) => wrong_kind(widget, "a KPI or insight"),
    })?;

    Ok(Applied::new(
        next,
        vec![EventPayload::WidgetFilterSettingsChanged {
            widget,
            ignore_dashboard_filters: ignored,
            date_data_set: date_data_set.cloned(),
        }],
        HistoryEffect::Record,
    ))
}

pub fn change_kpi_comparison(
    state: &DashboardState,
    target: &WidgetTarget,
    comparison: KpiComparison,
) -> Result<Applied, CommandError> {
    let (next, widget) = replace_widget(state, target, |widget| match widget {
        Widget::Kpi(kpi) => Ok(Widget::Kpi(KpiWidget {
            comparison,
            ..kpi.clone()
        })),
        Widget::Insight(_)
        | Widget::RichText(_)
        | Widget::VisualizationSwitcher(_)
        | Widget::Layout(_)
        | Widget::Placeholder(_) => wrong_kind(widget, "a KPI"),
    })?;

    Ok(Applied::new(
        next,
        vec![EventPayload::KpiWidgetComparisonChanged { widget, comparison }],
        HistoryEffect::Record,
    ))
}

fn validate_drills(drills: &[DrillDefinition]) -> Result<(), CommandError> {
    if drills.is_empty() {
        return user_error("No drills given");
    }
    let mut origins = HashSet::new();
    for drill in drills {
        if drill.origin.trim().is_empty() {
            return user_error(format!("Drill {} has no origin", drill.local_identifier));
        }
        if !origins.insert(drill.origin.as_str()) {
            return user_error(format!("More than one drill starts from {}", drill.origin));
        }
    }
    Ok(())
}

/// Adds drills to an insight widget; a drill replaces the existing one with the same origin.
pub fn modify_drills(
    state: &DashboardState,
    target: &WidgetTarget,
    drills: &[DrillDefinition],
) -> Result<Applied, CommandError> {
    validate_drills(drills)?;

    let mut added = Vec::new();
    let mut updated = Vec::new();
    let (next, widget) = replace_widget(state, target, |widget| match widget {
        Widget::Insight(insight) => {
            let mut merged = insight.drills.clone();
            for drill in drills {
                match merged.iter_mut().find(|d| d.origin == drill.origin) {
                    Some(existing) => {
                        *existing = drill.clone();
                        updated.push(drill.clone());
                    }
                    None => {
                        merged.push(drill.clone());
                        added.push(drill.clone());
                    }
                }
            }
            Ok(Widget::Insight(InsightWidget {
                drills: merged,
                ..insight.clone()
            }))
        }
        Widget::Kpi(_)
        | Widget::RichText(_)
        | Widget::VisualizationSwitcher(_)
        | Widget::Layout(_)
        | Widget::Placeholder(_) => wrong_kind(widget, "an insight"),
    })?;

    tracing::debug!(
        "Insight {} drills: {} added, {} updated",
        widget,
        added.len(),
        updated.len()
    );
    Ok(Applied::new(
        next,
        vec![EventPayload::InsightWidgetDrillsModified {
            widget,
            added,
            updated,
        }],
        HistoryEffect::Record,
    ))
}

pub fn remove_drills(
    state: &DashboardState,
    target: &WidgetTarget,
    selection: &DrillSelection,
) -> Result<Applied, CommandError> {
    let mut removed = Vec::new();
    let (next, widget) = replace_widget(state, target, |widget| match widget {
        Widget::Insight(insight) => {
            let kept = match selection {
                DrillSelection::All => {
                    removed = insight.drills.clone();
                    Vec::new()
                }
                DrillSelection::Origins { origins } => {
                    if let Some(unknown) = origins
                        .iter()
                        .find(|origin| !insight.drills.iter().any(|d| &d.origin == *origin))
                    {
                        return user_error(format!(
                            "Insight {} has no drill starting from {}",
                            insight.identity.identifier, unknown
                        ));
                    }
                    let (dropped, kept): (Vec<_>, Vec<_>) = insight
                        .drills
                        .iter()
                        .cloned()
                        .partition(|d| origins.contains(&d.origin));
                    removed = dropped;
                    kept
                }
            };
            Ok(Widget::Insight(InsightWidget {
                drills: kept,
                ..insight.clone()
            }))
        }
        Widget::Kpi(_)
        | Widget::RichText(_)
        | Widget::VisualizationSwitcher(_)
        | Widget::Layout(_)
        | Widget::Placeholder(_) => wrong_kind(widget, "an insight"),
    })?;

    Ok(Applied::new(
        next,
        vec![EventPayload::InsightWidgetDrillsRemoved { widget, removed }],
        HistoryEffect::Record,
    ))
}
