use crate::error::{AttributeLocation, ScheduleError};
use crate::model::{AttributeKey, Record};
use std::collections::HashSet;
use std::fmt;

/// A distinct value of the grouping attribute. `None` is an unset value and is
/// a key of its own, distinct from the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(pub Option<String>);

impl GroupKey {
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_deref().unwrap_or_default())
    }
}

/// Collects the distinct values of `attribute` across `records`, in first-seen order.
///
/// Unset and empty values are kept as keys. A record that does not carry the
/// attribute at all is an error.
pub fn distinct_keys(records: &[Record], attribute: &str) -> Result<Vec<GroupKey>, ScheduleError> {
    let key = AttributeKey::named(attribute);
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    for record in records {
        let value = record
            .lookup(&key)
            .ok_or_else(|| ScheduleError::MissingAttribute {
                attribute: attribute.to_string(),
                location: AttributeLocation::Record(record.id),
            })?
            .value
            .display();

        let group = GroupKey(value);
        if seen.insert(group.clone()) {
            keys.push(group);
        }
    }

    Ok(keys)
}
