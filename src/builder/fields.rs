use crate::error::{AttributeLocation, ScheduleError};
use crate::host::Host;
use crate::model::{
    AttributeId, AttributeKey, BuiltInAttribute, Category, DisplayType, ElementId, FieldId,
    FieldKind, Record, ReportId,
};
use std::collections::HashMap;
use tracing::debug;

/// Attribute ids resolved once for a whole run.
///
/// Ids are read off the first record and then checked against every other
/// record, so a heterogeneous record set fails up front instead of producing
/// schedules bound to attributes some rooms lack.
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    representative: ElementId,
    ids: HashMap<AttributeKey, AttributeId>,
}

impl AttributeSchema {
    pub fn resolve(
        records: &[Record],
        category: Category,
        keys: &[AttributeKey],
    ) -> Result<Self, ScheduleError> {
        let Some(representative) = records.first() else {
            return Err(ScheduleError::MissingAttribute {
                attribute: keys.first().map_or_else(String::new, ToString::to_string),
                location: AttributeLocation::NoRecords(category),
            });
        };

        let mut ids = HashMap::with_capacity(keys.len());
        for key in keys {
            let id = representative
                .lookup(key)
                .ok_or_else(|| ScheduleError::MissingAttribute {
                    attribute: key.to_string(),
                    location: AttributeLocation::Record(representative.id),
                })?
                .id;

            if let Some(record) = records.iter().find(|r| r.attribute(id).is_none()) {
                return Err(ScheduleError::MissingAttribute {
                    attribute: key.to_string(),
                    location: AttributeLocation::Record(record.id),
                });
            }
            ids.insert(key.clone(), id);
        }

        Ok(Self {
            representative: representative.id,
            ids,
        })
    }

    pub fn id(&self, key: &AttributeKey) -> Result<AttributeId, ScheduleError> {
        self.ids
            .get(key)
            .copied()
            .ok_or_else(|| ScheduleError::MissingAttribute {
                attribute: key.to_string(),
                location: AttributeLocation::Record(self.representative),
            })
    }
}

/// A column to add to a schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub key: AttributeKey,
    pub kind: FieldKind,
    pub hidden: bool,
    pub display: DisplayType,
}

impl FieldSpec {
    /// Visible field; view-based for area, instance for everything else.
    #[must_use]
    pub fn new(key: AttributeKey) -> Self {
        let kind = match key {
            AttributeKey::BuiltIn(BuiltInAttribute::RoomArea) => FieldKind::ViewBased,
            AttributeKey::Named(_) => FieldKind::Instance,
        };
        Self {
            key,
            kind,
            hidden: false,
            display: DisplayType::Standard,
        }
    }

    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::new(AttributeKey::named(name))
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn totals(mut self) -> Self {
        self.display = DisplayType::Totals;
        self
    }
}

/// Adds `specs` to `report` in order and returns the new field ids, in the same order.
pub fn bind_fields<H: Host + ?Sized, const N: usize>(
    host: &mut H,
    report: ReportId,
    schema: &AttributeSchema,
    specs: &[FieldSpec; N],
) -> Result<[FieldId; N], ScheduleError> {
    let mut fields = [FieldId(0); N];
    for (slot, spec) in fields.iter_mut().zip(specs) {
        let attribute = schema.id(&spec.key)?;
        let field = host.add_field(report, spec.kind, attribute, spec.hidden)?;
        if spec.display != DisplayType::Standard {
            host.set_field_display(report, field, spec.display)?;
        }
        debug!(report = report.0, field = field.0, key = %spec.key, hidden = spec.hidden, "field bound");
        *slot = field;
    }
    Ok(fields)
}
