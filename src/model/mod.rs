pub mod document;
pub mod record;
pub mod schedule;

pub use document::{DocumentFile, LevelEntry, ParameterValue, RoomEntry};
pub use record::{
    Attribute, AttributeId, AttributeKey, AttributeValue, BuiltInAttribute, Category, ElementId,
    Record,
};
pub use schedule::{
    DisplayType, FieldId, FieldKind, FilterOperator, ReportFlags, ReportId, ScheduleDefinition,
    ScheduleField, ScheduleFilter, SortGroupRule, SortOrder,
};
