// Filter context domain model - dashboard level attribute and date filters
use super::refs::ObjRef;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFilter {
    pub local_identifier: String,
    pub display_form: ObjRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub elements: Vec<String>,
    #[serde(default = "default_negative_selection")]
    pub negative_selection: bool,
}

fn default_negative_selection() -> bool {
    true
}

impl AttributeFilter {
    /// Filter with no effect: negative selection of nothing selects everything.
    pub fn select_all(
        local_identifier: impl Into<String>,
        display_form: ObjRef,
        title: Option<String>,
    ) -> Self {
        Self {
            local_identifier: local_identifier.into(),
            display_form,
            title,
            elements: Vec::new(),
            negative_selection: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateFilterType {
    Relative,
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateGranularity {
    Date,
    Week,
    Month,
    Quarter,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateBound {
    Offset(i32),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFilter {
    pub local_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_set: Option<ObjRef>,
    pub filter_type: DateFilterType,
    pub granularity: DateGranularity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateBound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterContextItem {
    Attribute(AttributeFilter),
    Date(DateFilter),
}

impl FilterContextItem {
    pub fn local_identifier(&self) -> &str {
        match self {
            FilterContextItem::Attribute(f) => &f.local_identifier,
            FilterContextItem::Date(f) => &f.local_identifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterContext {
    #[serde(default)]
    pub filters: Vec<FilterContextItem>,
}

impl FilterContext {
    pub fn new(filters: Vec<FilterContextItem>) -> Self {
        Self { filters }
    }

    pub fn attribute_filters(&self) -> impl Iterator<Item = &AttributeFilter> {
        self.filters.iter().filter_map(|item| match item {
            FilterContextItem::Attribute(filter) => Some(filter),
            FilterContextItem::Date(_) => None,
        })
    }

    pub fn attribute_filter_count(&self) -> usize {
        self.attribute_filters().count()
    }

    pub fn has_local_identifier(&self, local_identifier: &str) -> bool {
        self.filters
            .iter()
            .any(|item| item.local_identifier() == local_identifier)
    }

    pub fn attribute_filter(&self, local_identifier: &str) -> Option<&AttributeFilter> {
        self.attribute_filters()
            .find(|f| f.local_identifier == local_identifier)
    }

    /// Position of the filter among attribute filters.
    pub fn attribute_filter_index(&self, local_identifier: &str) -> Option<usize> {
        self.attribute_filters()
            .position(|f| f.local_identifier == local_identifier)
    }

    pub fn attribute_filter_for_display_form(&self, display_form: &ObjRef) -> Option<&AttributeFilter> {
        self.attribute_filters()
            .find(|f| &f.display_form == display_form)
    }

    /// The date filter without a data set, applied to every date dimension.
    pub fn common_date_filter(&self) -> Option<&DateFilter> {
        self.filters.iter().find_map(|item| match item {
            FilterContextItem::Date(filter) if filter.data_set.is_none() => Some(filter),
            FilterContextItem::Date(_) | FilterContextItem::Attribute(_) => None,
        })
    }

    /// Inserts at position `index` among attribute filters (`index` must be `<= count`).
    pub fn insert_attribute_filter(&mut self, index: usize, filter: AttributeFilter) {
        let position = self
            .filters
            .iter()
            .enumerate()
            .filter(|(_, item)| matches!(item, FilterContextItem::Attribute(_)))
            .nth(index)
            .map(|(position, _)| position)
            .unwrap_or(self.filters.len());
        self.filters
            .insert(position, FilterContextItem::Attribute(filter));
    }

    pub fn remove_attribute_filter(&mut self, local_identifier: &str) -> Option<AttributeFilter> {
        let position = self.filters.iter().position(|item| {
            matches!(item, FilterContextItem::Attribute(f) if f.local_identifier == local_identifier)
        })?;
        match self.filters.remove(position) {
            FilterContextItem::Attribute(filter) => Some(filter),
            FilterContextItem::Date(_) => None,
        }
    }

    pub fn attribute_filter_mut(&mut self, local_identifier: &str) -> Option<&mut AttributeFilter> {
        self.filters.iter_mut().find_map(|item| match item {
            FilterContextItem::Attribute(filter) if filter.local_identifier == local_identifier => {
                Some(filter)
            }
            FilterContextItem::Attribute(_) | FilterContextItem::Date(_) => None,
        })
    }

    /// Replaces the common date filter, or puts it first when there is none.
    pub fn upsert_common_date_filter(&mut self, filter: DateFilter) {
        let existing = self.filters.iter().position(|item| {
            matches!(item, FilterContextItem::Date(f) if f.data_set.is_none())
        });
        match existing {
            Some(position) => self.filters[position] = FilterContextItem::Date(filter),
            None => self.filters.insert(0, FilterContextItem::Date(filter)),
        }
    }

    pub fn remove_common_date_filter(&mut self) -> Option<DateFilter> {
        let position = self.filters.iter().position(|item| {
            matches!(item, FilterContextItem::Date(f) if f.data_set.is_none())
        })?;
        match self.filters.remove(position) {
            FilterContextItem::Date(filter) => Some(filter),
            FilterContextItem::Attribute(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> FilterContext {
        FilterContext::new(vec![
            FilterContextItem::Date(DateFilter {
                local_identifier: "date".to_string(),
                data_set: None,
                filter_type: DateFilterType::Relative,
                granularity: DateGranularity::Month,
                from: Some(DateBound::Offset(-11)),
                to: Some(DateBound::Offset(0)),
            }),
            FilterContextItem::Attribute(AttributeFilter::select_all(
                "f1",
                ObjRef::identifier("label.region"),
                None,
            )),
            FilterContextItem::Attribute(AttributeFilter::select_all(
                "f2",
                ObjRef::identifier("label.product"),
                None,
            )),
        ])
    }

    #[test]
    fn test_insert_positions_are_among_attribute_filters() {
        let mut ctx = context();
        ctx.insert_attribute_filter(0, AttributeFilter::select_all("new", ObjRef::identifier("a"), None));

        assert_eq!(ctx.filters[0].local_identifier(), "date");
        assert_eq!(ctx.filters[1].local_identifier(), "new");
        assert_eq!(ctx.attribute_filter_index("f2"), Some(2));

        ctx.insert_attribute_filter(3, AttributeFilter::select_all("last", ObjRef::identifier("b"), None));
        assert_eq!(ctx.filters.last().unwrap().local_identifier(), "last");
    }

    #[test]
    fn test_remove_and_lookup() {
        let mut ctx = context();
        assert!(ctx.has_local_identifier("date"));
        assert!(ctx
            .attribute_filter_for_display_form(&ObjRef::identifier("label.product"))
            .is_some());

        let removed = ctx.remove_attribute_filter("f1").unwrap();
        assert_eq!(removed.display_form, ObjRef::identifier("label.region"));
        assert!(ctx.remove_attribute_filter("date").is_none());
        assert_eq!(ctx.attribute_filter_count(), 1);
    }

    #[test]
    fn test_common_date_filter_upsert() {
        let mut ctx = FilterContext::default();
        assert!(ctx.common_date_filter().is_none());

        let filter = DateFilter {
            local_identifier: "d".to_string(),
            data_set: None,
            filter_type: DateFilterType::Absolute,
            granularity: DateGranularity::Date,
            from: NaiveDate::from_ymd_opt(2024, 1, 1).map(DateBound::Date),
            to: NaiveDate::from_ymd_opt(2024, 3, 31).map(DateBound::Date),
        };
        ctx.upsert_common_date_filter(filter.clone());
        ctx.upsert_common_date_filter(filter);
        assert_eq!(ctx.filters.len(), 1);
        assert!(ctx.remove_common_date_filter().is_some());
        assert!(ctx.filters.is_empty());
    }
}
