use super::{AttributeId, Category};
use serde::{Deserialize, Serialize};

/// Identifier of a schedule in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub u32);

/// Identifier of a field, stable within its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Value read from the record itself.
    Instance,
    /// Value computed in the schedule's own view (e.g. area).
    ViewBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayType {
    #[default]
    Standard,
    /// Sum the column across each group and the grand total.
    Totals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleField {
    pub id: FieldId,
    pub kind: FieldKind,
    pub attribute: AttributeId,
    pub heading: String,
    pub hidden: bool,
    #[serde(default)]
    pub display: DisplayType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortGroupRule {
    pub field: FieldId,
    pub order: SortOrder,
    #[serde(default)]
    pub show_header: bool,
    #[serde(default)]
    pub show_footer: bool,
    #[serde(default)]
    pub show_blank_line: bool,
}

impl SortGroupRule {
    /// Plain rule: no header, footer or blank line.
    #[must_use]
    pub fn new(field: FieldId, order: SortOrder) -> Self {
        Self {
            field,
            order,
            show_header: false,
            show_footer: false,
            show_blank_line: false,
        }
    }

    #[must_use]
    pub fn grouped(mut self) -> Self {
        self.show_header = true;
        self.show_footer = true;
        self.show_blank_line = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleFilter {
    pub field: FieldId,
    pub operator: FilterOperator,
    /// Literal compared verbatim against the field's display text.
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReportFlags {
    pub itemized: bool,
    pub show_grand_total: bool,
    pub show_grand_total_title: bool,
    pub show_grand_total_count: bool,
}

impl Default for ReportFlags {
    fn default() -> Self {
        Self {
            itemized: true,
            show_grand_total: false,
            show_grand_total_title: false,
            show_grand_total_count: false,
        }
    }
}

/// A schedule: a named, filtered, sorted table over one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDefinition {
    pub id: ReportId,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub fields: Vec<ScheduleField>,
    #[serde(default)]
    pub sort_group: Vec<SortGroupRule>,
    #[serde(default)]
    pub filter: Option<ScheduleFilter>,
    #[serde(default)]
    pub flags: ReportFlags,
}

impl ScheduleDefinition {
    #[must_use]
    pub fn new(id: ReportId, name: String, category: Category) -> Self {
        Self {
            id,
            name,
            category,
            fields: Vec::new(),
            sort_group: Vec::new(),
            filter: None,
            flags: ReportFlags::default(),
        }
    }

    #[must_use]
    pub fn field(&self, id: FieldId) -> Option<&ScheduleField> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut ScheduleField> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    /// Headings of the fields shown as columns, in order.
    #[must_use]
    pub fn visible_headings(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.hidden)
            .map(|f| f.heading.as_str())
            .collect()
    }
}
