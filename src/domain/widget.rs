// Widget domain model - closed set of displayable dashboard content
use super::layout::Layout;
use super::refs::{ObjRef, ObjectIdentity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl WidgetHeader {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

/// Dashboard filter a widget opts out of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterReference {
    #[serde(rename_all = "camelCase")]
    Attribute { display_form: ObjRef },
    #[serde(rename_all = "camelCase")]
    Date { data_set: ObjRef },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DrillTarget {
    ToInsight { insight: ObjRef },
    ToDashboard {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dashboard: Option<ObjRef>,
    },
    ToCustomUrl { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillDefinition {
    pub local_identifier: String,
    /// Local identifier of the measure or attribute the drill starts from.
    pub origin: String,
    pub target: DrillTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiComparison {
    #[default]
    None,
    PreviousPeriod,
    SamePeriodPreviousYear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightWidget {
    pub identity: ObjectIdentity,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub insight: ObjRef,
    #[serde(default)]
    pub drills: Vec<DrillDefinition>,
    #[serde(default)]
    pub ignore_dashboard_filters: Vec<FilterReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_data_set: Option<ObjRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiWidget {
    pub identity: ObjectIdentity,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub measure: ObjRef,
    #[serde(default)]
    pub comparison: KpiComparison,
    #[serde(default)]
    pub ignore_dashboard_filters: Vec<FilterReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_data_set: Option<ObjRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichTextWidget {
    pub identity: ObjectIdentity,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationSwitcherWidget {
    pub identity: ObjectIdentity,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub visualizations: Vec<InsightWidget>,
    #[serde(default)]
    pub active: usize,
}

/// Widget holding a whole layout of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedLayoutWidget {
    pub identity: ObjectIdentity,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderWidget {
    pub identity: ObjectIdentity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetKind {
    Insight,
    Kpi,
    RichText,
    VisualizationSwitcher,
    Layout,
    Placeholder,
}

/// Widgets are values: edits build a new widget and assign it back into the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Widget {
    Insight(InsightWidget),
    Kpi(KpiWidget),
    RichText(RichTextWidget),
    VisualizationSwitcher(VisualizationSwitcherWidget),
    Layout(NestedLayoutWidget),
    Placeholder(PlaceholderWidget),
}

impl Widget {
    pub fn identity(&self) -> &ObjectIdentity {
        match self {
            Widget::Insight(w) => &w.identity,
            Widget::Kpi(w) => &w.identity,
            Widget::RichText(w) => &w.identity,
            Widget::VisualizationSwitcher(w) => &w.identity,
            Widget::Layout(w) => &w.identity,
            Widget::Placeholder(w) => &w.identity,
        }
    }

    pub fn kind(&self) -> WidgetKind {
        match self {
            Widget::Insight(_) => WidgetKind::Insight,
            Widget::Kpi(_) => WidgetKind::Kpi,
            Widget::RichText(_) => WidgetKind::RichText,
            Widget::VisualizationSwitcher(_) => WidgetKind::VisualizationSwitcher,
            Widget::Layout(_) => WidgetKind::Layout,
            Widget::Placeholder(_) => WidgetKind::Placeholder,
        }
    }

    /// Returns a copy without ignored references to the given display forms,
    /// or `None` when nothing would change.
    pub fn without_ignored_display_forms(&self, display_forms: &[ObjRef]) -> Option<Widget> {
        self.retaining_ignored_attributes(|display_form| !display_forms.contains(display_form))
    }

    /// Returns a copy whose ignored attribute filters all satisfy `keep`,
    /// or `None` when nothing would change. Ignored date filters are kept.
    pub fn retaining_ignored_attributes<F>(&self, keep: F) -> Option<Widget>
    where
        F: Fn(&ObjRef) -> bool,
    {
        let retained = |filters: &[FilterReference]| -> Option<Vec<FilterReference>> {
            let kept: Vec<FilterReference> = filters
                .iter()
                .filter(|filter| match filter {
                    FilterReference::Attribute { display_form } => keep(display_form),
                    FilterReference::Date { .. } => true,
                })
                .cloned()
                .collect();
            (kept.len() != filters.len()).then_some(kept)
        };

        match self {
            Widget::Insight(w) => retained(w.ignore_dashboard_filters.as_slice()).map(|kept| {
                Widget::Insight(InsightWidget {
                    ignore_dashboard_filters: kept,
                    ..w.clone()
                })
            }),
            Widget::Kpi(w) => retained(w.ignore_dashboard_filters.as_slice()).map(|kept| {
                Widget::Kpi(KpiWidget {
                    ignore_dashboard_filters: kept,
                    ..w.clone()
                })
            }),
            Widget::RichText(_)
            | Widget::VisualizationSwitcher(_)
            | Widget::Layout(_)
            | Widget::Placeholder(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi_ignoring(display_forms: &[&str]) -> Widget {
        Widget::Kpi(KpiWidget {
            identity: ObjectIdentity::new("kpi.1"),
            title: "Revenue".to_string(),
            description: String::new(),
            measure: ObjRef::identifier("m.revenue"),
            comparison: KpiComparison::None,
            ignore_dashboard_filters: display_forms
                .iter()
                .map(|df| FilterReference::Attribute {
                    display_form: ObjRef::identifier(*df),
                })
                .chain(std::iter::once(FilterReference::Date {
                    data_set: ObjRef::identifier("dt.created"),
                }))
                .collect(),
            date_data_set: None,
        })
    }

    #[test]
    fn test_without_ignored_display_forms() {
        let widget = kpi_ignoring(&["label.region", "label.product"]);
        let updated = widget
            .without_ignored_display_forms(&[ObjRef::identifier("label.region")])
            .expect("widget should change");

        match updated {
            Widget::Kpi(kpi) => {
                assert_eq!(kpi.ignore_dashboard_filters.len(), 2);
                assert!(kpi.ignore_dashboard_filters.contains(&FilterReference::Attribute {
                    display_form: ObjRef::identifier("label.product"),
                }));
            }
            other => panic!("unexpected widget {:?}", other.kind()),
        }

        assert!(widget
            .without_ignored_display_forms(&[ObjRef::identifier("label.city")])
            .is_none());
    }

    #[test]
    fn test_retaining_ignored_attributes_keeps_dates() {
        let widget = kpi_ignoring(&["label.region"]);

        match widget.retaining_ignored_attributes(|_| false) {
            Some(Widget::Kpi(kpi)) => assert_eq!(
                kpi.ignore_dashboard_filters,
                vec![FilterReference::Date {
                    data_set: ObjRef::identifier("dt.created"),
                }]
            ),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(widget.retaining_ignored_attributes(|_| true).is_none());
    }

    #[test]
    fn test_widget_json_is_tagged() {
        let widget = Widget::RichText(RichTextWidget {
            identity: ObjectIdentity::new("text.1"),
            content: "Hello".to_string(),
        });
        let json = serde_json::to_value(&widget).unwrap();
        assert_eq!(json["type"], "richText");
        assert_eq!(json["identity"]["identifier"], "text.1");
    }
}
