// Read-only queries over a dashboard revision
use super::commands::WidgetTarget;
use super::dashboard::DashboardState;
use super::filters::{AttributeFilter, FilterContext};
use super::layout::{Item, ItemPath, Layout, Section};
use super::refs::ObjRef;
use super::sharing::DashboardPermissions;
use super::stash::Stash;
use super::widget::Widget;

pub fn select_layout(state: &DashboardState) -> &Layout {
    &state.layout
}

pub fn select_section(state: &DashboardState, index: usize) -> Option<&Section> {
    state.layout.section(index)
}

pub fn select_item<'a>(state: &'a DashboardState, path: &ItemPath) -> Option<&'a Item> {
    state.layout.get_item(path)
}

pub fn select_widget_by_ref<'a>(
    state: &'a DashboardState,
    reference: &ObjRef,
) -> Option<(ItemPath, &'a Widget)> {
    state.layout.find_widget(reference)
}

/// Resolves a target to the widget and the path it lives at.
pub fn select_widget<'a>(
    state: &'a DashboardState,
    target: &WidgetTarget,
) -> Option<(ItemPath, &'a Widget)> {
    match target {
        WidgetTarget::Ref(reference) => select_widget_by_ref(state, reference),
        WidgetTarget::Path(path) => {
            let widget = state.layout.get_item(path)?.widget.as_ref()?;
            Some((path.clone(), widget))
        }
    }
}

pub fn select_filter_context(state: &DashboardState) -> &FilterContext {
    &state.filter_context
}

pub fn select_attribute_filter<'a>(
    state: &'a DashboardState,
    local_identifier: &str,
) -> Option<&'a AttributeFilter> {
    state.filter_context.attribute_filter(local_identifier)
}

pub fn select_stash(state: &DashboardState) -> &Stash {
    &state.stash
}

pub fn select_stashed_items<'a>(state: &'a DashboardState, key: &str) -> Option<&'a [Item]> {
    state.stash.get(key)
}

pub fn select_permissions(state: &DashboardState) -> DashboardPermissions {
    state.permissions
}

pub fn select_is_new_dashboard(state: &DashboardState) -> bool {
    state.is_new()
}

pub fn select_title(state: &DashboardState) -> &str {
    &state.title
}
