// Layout domain model - sections, items and grid sizing
use super::refs::ObjRef;
use super::widget::Widget;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of columns of the dashboard grid.
pub const GRID_COLUMNS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSize {
    pub grid_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_height: Option<u32>,
}

impl GridSize {
    pub fn new(grid_width: u32) -> Self {
        Self {
            grid_width,
            grid_height: None,
        }
    }

    pub fn is_valid_width(width: u32) -> bool {
        (1..=GRID_COLUMNS).contains(&width)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSize {
    pub xl: GridSize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<Breakpoint, GridSize>,
}

impl ItemSize {
    pub fn xl(grid_width: u32) -> Self {
        Self {
            xl: GridSize::new(grid_width),
            overrides: BTreeMap::new(),
        }
    }

    pub fn for_breakpoint(&self, breakpoint: Breakpoint) -> &GridSize {
        match breakpoint {
            Breakpoint::Xl => &self.xl,
            other => self.overrides.get(&other).unwrap_or(&self.xl),
        }
    }

    pub fn all_widths_valid(&self) -> bool {
        GridSize::is_valid_width(self.xl.grid_width)
            && self
                .overrides
                .values()
                .all(|size| GridSize::is_valid_width(size.grid_width))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SectionHeader {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    /// Fields present in `update` win; missing ones keep the current value.
    pub fn merge(&self, update: &SectionHeader) -> SectionHeader {
        SectionHeader {
            title: update.title.clone().or_else(|| self.title.clone()),
            description: update
                .description
                .clone()
                .or_else(|| self.description.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub size: ItemSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<Widget>,
}

impl Item {
    pub fn new(size: ItemSize, widget: Widget) -> Self {
        Self {
            size,
            widget: Some(widget),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<SectionHeader>,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCoordinates {
    pub section: usize,
    pub item: usize,
}

/// Location of an item; every step after the first descends into a nested layout widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemPath(Vec<ItemCoordinates>);

impl ItemPath {
    pub fn root(section: usize, item: usize) -> Self {
        ItemPath(vec![ItemCoordinates { section, item }])
    }

    pub fn nested(mut self, section: usize, item: usize) -> Self {
        self.0.push(ItemCoordinates { section, item });
        self
    }

    pub fn steps(&self) -> &[ItemCoordinates] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Layout {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn section_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.get_mut(index)
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    pub fn get_item(&self, path: &ItemPath) -> Option<&Item> {
        let (first, rest) = path.steps().split_first()?;
        let mut item = self.sections.get(first.section)?.items.get(first.item)?;
        for step in rest {
            let Some(Widget::Layout(nested)) = &item.widget else {
                return None;
            };
            item = nested.layout.sections.get(step.section)?.items.get(step.item)?;
        }
        Some(item)
    }

    pub fn get_item_mut(&mut self, path: &ItemPath) -> Option<&mut Item> {
        let (first, rest) = path.steps().split_first()?;
        let mut item = self
            .sections
            .get_mut(first.section)?
            .items
            .get_mut(first.item)?;
        for step in rest {
            let Some(Widget::Layout(nested)) = &mut item.widget else {
                return None;
            };
            item = nested
                .layout
                .sections
                .get_mut(step.section)?
                .items
                .get_mut(step.item)?;
        }
        Some(item)
    }

    /// Depth-first search through this layout and all nested layouts.
    pub fn find_widget(&self, reference: &ObjRef) -> Option<(ItemPath, &Widget)> {
        for (section_index, section) in self.sections.iter().enumerate() {
            for (item_index, item) in section.items.iter().enumerate() {
                let Some(widget) = &item.widget else {
                    continue;
                };
                if widget.identity().matches(reference) {
                    return Some((ItemPath::root(section_index, item_index), widget));
                }
                if let Widget::Layout(nested) = widget {
                    if let Some((inner, found)) = nested.layout.find_widget(reference) {
                        let mut steps = vec![ItemCoordinates {
                            section: section_index,
                            item: item_index,
                        }];
                        steps.extend_from_slice(inner.steps());
                        return Some((ItemPath(steps), found));
                    }
                }
            }
        }
        None
    }

    pub fn widgets(&self) -> Vec<&Widget> {
        let mut out = Vec::new();
        collect_widgets(self, &mut out);
        out
    }

    /// Replaces every widget for which `update` produces a new value.
    pub fn replace_widgets<F>(&mut self, update: &mut F) -> usize
    where
        F: FnMut(&Widget) -> Option<Widget>,
    {
        let mut replaced = 0;
        for section in &mut self.sections {
            for item in &mut section.items {
                let Some(widget) = item.widget.as_mut() else {
                    continue;
                };
                if let Widget::Layout(nested) = &mut *widget {
                    replaced += nested.layout.replace_widgets(update);
                }
                if let Some(next) = update(&*widget) {
                    *widget = next;
                    replaced += 1;
                }
            }
        }
        replaced
    }
}

fn collect_widgets<'a>(layout: &'a Layout, out: &mut Vec<&'a Widget>) {
    for section in &layout.sections {
        for item in &section.items {
            if let Some(widget) = &item.widget {
                out.push(widget);
                if let Widget::Layout(nested) = widget {
                    collect_widgets(&nested.layout, out);
                }
            }
        }
    }
}

/// Resolves a relative insertion index against a collection of `len` elements.
///
/// `-1` appends; other negative values and values past `len` are invalid in
/// strict mode and clamped into `[0, len]` otherwise.
pub fn resolve_insertion_index(index: i64, len: usize, strict: bool) -> Option<usize> {
    if index == -1 {
        return Some(len);
    }
    if (0..=len as i64).contains(&index) {
        return Some(index as usize);
    }
    if strict {
        None
    } else if index < 0 {
        Some(0)
    } else {
        Some(len)
    }
}

/// Resolves an index that must point at an existing element.
pub fn resolve_existing_index(index: i64, len: usize) -> Option<usize> {
    if index >= 0 && (index as usize) < len {
        Some(index as usize)
    } else {
        None
    }
}
