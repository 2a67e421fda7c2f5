use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an element (room, level) in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of an attribute definition. Built-in attributes use negative ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(pub i64);

/// Element category a record or schedule is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Rooms,
    Spaces,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Rooms => f.write_str("Rooms"),
            Category::Spaces => f.write_str("Spaces"),
        }
    }
}

/// Attributes the host computes itself and exposes under a fixed identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltInAttribute {
    /// Room area, computed in the context of the view that reads it.
    RoomArea,
}

impl BuiltInAttribute {
    #[must_use]
    pub fn id(self) -> AttributeId {
        match self {
            BuiltInAttribute::RoomArea => AttributeId(-1),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BuiltInAttribute::RoomArea => "Area",
        }
    }
}

/// How an attribute is looked up on a record: by display name or well-known id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    Named(String),
    BuiltIn(BuiltInAttribute),
}

impl AttributeKey {
    #[must_use]
    pub fn named(name: &str) -> Self {
        AttributeKey::Named(name.to_string())
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKey::Named(name) => f.write_str(name),
            AttributeKey::BuiltIn(built_in) => write!(f, "{built_in:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AttributeValue {
    /// String value; `None` when the attribute exists but was never set.
    Text(Option<String>),
    Number(f64),
    /// Reference to a level, with the label the host shows for it. References
    /// sort by elevation.
    Reference {
        id: ElementId,
        label: String,
        elevation: f64,
    },
}

impl AttributeValue {
    /// Text shown in a schedule cell and compared by filters.
    #[must_use]
    pub fn display(&self) -> Option<String> {
        match self {
            AttributeValue::Text(text) => text.clone(),
            AttributeValue::Number(n) => Some(format!("{n:.2}")),
            AttributeValue::Reference { label, .. } => Some(label.clone()),
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub id: AttributeId,
    pub name: String,
    pub built_in: Option<BuiltInAttribute>,
    pub value: AttributeValue,
}

/// A host element of a schedulable category, e.g. a room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: ElementId,
    pub category: Category,
    pub attributes: Vec<Attribute>,
}

impl Record {
    /// Finds an attribute by name or built-in identifier.
    #[must_use]
    pub fn lookup(&self, key: &AttributeKey) -> Option<&Attribute> {
        self.attributes.iter().find(|a| match key {
            AttributeKey::Named(name) => a.name == *name,
            AttributeKey::BuiltIn(built_in) => a.built_in == Some(*built_in),
        })
    }

    #[must_use]
    pub fn attribute(&self, id: AttributeId) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id == id)
    }
}
