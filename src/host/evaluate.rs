use crate::model::{
    AttributeValue, DisplayType, FieldId, FilterOperator, Record, ScheduleDefinition,
    ScheduleField, SortGroupRule, SortOrder,
};
use serde::Serialize;
use std::cmp::Ordering;

pub const GRAND_TOTAL_TITLE: &str = "Grand total";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScheduleRow {
    Header {
        label: String,
    },
    /// One record when itemized, otherwise one group of `records` rows.
    Item {
        cells: Vec<String>,
        records: usize,
    },
    Footer {
        label: String,
        count: usize,
        totals: Vec<Option<f64>>,
    },
    Blank,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrandTotal {
    pub title: Option<String>,
    pub count: Option<usize>,
    /// Aligned with the table columns; `Some` for `Totals` columns.
    pub totals: Vec<Option<f64>>,
}

/// The rows a host lists for a schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<ScheduleRow>,
    pub grand_total: Option<GrandTotal>,
}

impl ScheduleTable {
    /// Cells of every item row, in order.
    #[must_use]
    pub fn items(&self) -> Vec<&[String]> {
        self.rows
            .iter()
            .filter_map(|row| match row {
                ScheduleRow::Item { cells, .. } => Some(cells.as_slice()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn column(&self, heading: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == heading)
    }
}

/// Evaluates `definition` over `records`.
///
/// Records are filtered by exact text equality, then stably sorted by each
/// sort/group rule in turn. Itemized schedules list every record and honour the
/// rules' header, footer and blank-line flags; non-itemized schedules list one row
/// per distinct combination of sort/group values. Hidden fields take part in
/// filtering and sorting but are not columns.
#[must_use]
pub fn evaluate(definition: &ScheduleDefinition, records: &[&Record]) -> ScheduleTable {
    let mut matching: Vec<&Record> = records
        .iter()
        .copied()
        .filter(|r| passes_filter(definition, r))
        .collect();
    matching.sort_by(|a, b| compare_records(definition, a, b));

    let visible: Vec<&ScheduleField> = definition.fields.iter().filter(|f| !f.hidden).collect();
    let columns = visible.iter().map(|f| f.heading.clone()).collect();

    let rows = if definition.flags.itemized {
        itemized_rows(definition, &visible, &matching)
    } else {
        grouped_rows(definition, &visible, &matching)
    };

    let flags = definition.flags;
    let grand_total = flags.show_grand_total.then(|| GrandTotal {
        title: flags
            .show_grand_total_title
            .then(|| GRAND_TOTAL_TITLE.to_string()),
        count: flags.show_grand_total_count.then_some(matching.len()),
        totals: totals(&visible, &matching),
    });

    ScheduleTable {
        name: definition.name.clone(),
        columns,
        rows,
        grand_total,
    }
}

fn value<'r>(
    definition: &ScheduleDefinition,
    record: &'r Record,
    field: FieldId,
) -> Option<&'r AttributeValue> {
    let field = definition.field(field)?;
    record.attribute(field.attribute).map(|a| &a.value)
}

fn text(definition: &ScheduleDefinition, record: &Record, field: FieldId) -> Option<String> {
    value(definition, record, field).and_then(AttributeValue::display)
}

fn passes_filter(definition: &ScheduleDefinition, record: &Record) -> bool {
    let Some(filter) = &definition.filter else {
        return true;
    };
    let actual = text(definition, record, filter.field);
    match filter.operator {
        FilterOperator::Equal => actual == filter.value,
        FilterOperator::NotEqual => actual != filter.value,
    }
}

/// Sort rank of a value: numbers, then level references, then text, then unset.
fn rank(value: Option<&AttributeValue>) -> u8 {
    match value {
        Some(AttributeValue::Number(_)) => 0,
        Some(AttributeValue::Reference { .. }) => 1,
        Some(AttributeValue::Text(Some(_))) => 2,
        Some(AttributeValue::Text(None)) | None => 3,
    }
}

/// Total order over attribute values, so mixed-type columns still sort.
fn compare_values(a: Option<&AttributeValue>, b: Option<&AttributeValue>) -> Ordering {
    match (a, b) {
        (Some(AttributeValue::Number(x)), Some(AttributeValue::Number(y))) => x.total_cmp(y),
        (
            Some(AttributeValue::Reference {
                elevation: x,
                label: x_label,
                ..
            }),
            Some(AttributeValue::Reference {
                elevation: y,
                label: y_label,
                ..
            }),
        ) => x.total_cmp(y).then_with(|| x_label.cmp(y_label)),
        (Some(AttributeValue::Text(Some(x))), Some(AttributeValue::Text(Some(y)))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn compare_records(definition: &ScheduleDefinition, a: &Record, b: &Record) -> Ordering {
    for rule in &definition.sort_group {
        let ordering = compare_values(
            value(definition, a, rule.field),
            value(definition, b, rule.field),
        );
        let ordering = match rule.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn cell(record: &Record, field: &ScheduleField) -> String {
    record
        .attribute(field.attribute)
        .and_then(|a| a.value.display())
        .unwrap_or_default()
}

fn totals(visible: &[&ScheduleField], records: &[&Record]) -> Vec<Option<f64>> {
    visible
        .iter()
        .map(|field| {
            (field.display == DisplayType::Totals).then(|| {
                records
                    .iter()
                    .filter_map(|r| r.attribute(field.attribute))
                    .filter_map(|a| a.value.as_number())
                    .sum::<f64>()
            })
        })
        .collect()
}

fn group_keys(definition: &ScheduleDefinition, record: &Record) -> Vec<Option<String>> {
    definition
        .sort_group
        .iter()
        .map(|rule| text(definition, record, rule.field))
        .collect()
}

fn close_groups(
    rules: &[SortGroupRule],
    visible: &[&ScheduleField],
    keys: &[Option<String>],
    members: &[Vec<&Record>],
    from: usize,
    separate: bool,
    rows: &mut Vec<ScheduleRow>,
) {
    for level in (from..rules.len()).rev() {
        let rule = &rules[level];
        if rule.show_footer {
            rows.push(ScheduleRow::Footer {
                label: keys[level].clone().unwrap_or_default(),
                count: members[level].len(),
                totals: totals(visible, &members[level]),
            });
        }
        if separate && rule.show_blank_line {
            rows.push(ScheduleRow::Blank);
        }
    }
}

fn itemized_rows(
    definition: &ScheduleDefinition,
    visible: &[&ScheduleField],
    records: &[&Record],
) -> Vec<ScheduleRow> {
    let rules = &definition.sort_group;
    let mut rows = Vec::new();
    let mut current: Option<Vec<Option<String>>> = None;
    let mut members: Vec<Vec<&Record>> = vec![Vec::new(); rules.len()];

    for &record in records {
        let keys = group_keys(definition, record);

        let opened_from = match &current {
            None => Some(0),
            Some(previous) => previous.iter().zip(&keys).position(|(p, k)| p != k),
        };

        if let Some(level) = opened_from {
            if let Some(previous) = &current {
                close_groups(rules, visible, previous, &members, level, true, &mut rows);
            }
            for (depth, rule) in rules.iter().enumerate().skip(level) {
                if rule.show_header {
                    rows.push(ScheduleRow::Header {
                        label: keys[depth].clone().unwrap_or_default(),
                    });
                }
                members[depth].clear();
            }
        }

        for group in &mut members {
            group.push(record);
        }
        rows.push(ScheduleRow::Item {
            cells: visible.iter().map(|f| cell(record, f)).collect(),
            records: 1,
        });
        current = Some(keys);
    }

    if let Some(previous) = &current {
        close_groups(rules, visible, previous, &members, 0, false, &mut rows);
    }

    rows
}

fn grouped_rows(
    definition: &ScheduleDefinition,
    visible: &[&ScheduleField],
    records: &[&Record],
) -> Vec<ScheduleRow> {
    let mut groups: Vec<(Vec<Option<String>>, Vec<&Record>)> = Vec::new();
    for &record in records {
        let keys = group_keys(definition, record);
        match groups.last_mut() {
            Some((last, members)) if *last == keys => members.push(record),
            _ => groups.push((keys, vec![record])),
        }
    }

    groups
        .into_iter()
        .map(|(_, members)| {
            let cells = visible
                .iter()
                .map(|field| {
                    if field.display == DisplayType::Totals {
                        let sum: f64 = members
                            .iter()
                            .filter_map(|r| r.attribute(field.attribute))
                            .filter_map(|a| a.value.as_number())
                            .sum();
                        return AttributeValue::Number(sum).display().unwrap_or_default();
                    }
                    let first = cell(members[0], field);
                    if members.iter().all(|r| cell(r, field) == first) {
                        first
                    } else {
                        String::new()
                    }
                })
                .collect();
            ScheduleRow::Item {
                cells,
                records: members.len(),
            }
        })
        .collect()
}
