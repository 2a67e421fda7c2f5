//! The boundary between schedule building and the document that stores schedules.
//!
//! Every call takes its target handle explicitly; there is no ambient "current
//! document". Mutating calls are only valid between [`Host::begin_scope`] and
//! [`Host::commit`] / [`Host::rollback`], which [`Transaction`] wraps.

pub mod evaluate;
pub mod memory;
pub mod transaction;

pub use crate::error::HostError;
pub use evaluate::{evaluate, GrandTotal, ScheduleRow, ScheduleTable};
pub use memory::{load_document, MemoryHost};
pub use transaction::Transaction;

use crate::model::{
    AttributeId, Category, DisplayType, FieldId, FieldKind, FilterOperator, Record, ReportFlags,
    ReportId, SortGroupRule,
};

/// Handle of an open mutation scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u64);

pub trait Host {
    /// Every record of `category`, in host order.
    fn fetch_records(&self, category: Category) -> Result<Vec<Record>, HostError>;

    /// Names of all schedules the document already holds, including ones created
    /// in the open scope.
    fn report_names(&self) -> Vec<String>;

    fn begin_scope(&mut self, label: &str) -> Result<ScopeId, HostError>;

    fn commit(&mut self, scope: ScopeId) -> Result<(), HostError>;

    /// Discards everything created since `scope` began. Never fails.
    fn rollback(&mut self, scope: ScopeId);

    fn create_report(&mut self, category: Category, name: &str) -> Result<ReportId, HostError>;

    fn add_field(
        &mut self,
        report: ReportId,
        kind: FieldKind,
        attribute: AttributeId,
        hidden: bool,
    ) -> Result<FieldId, HostError>;

    fn set_field_display(
        &mut self,
        report: ReportId,
        field: FieldId,
        display: DisplayType,
    ) -> Result<(), HostError>;

    fn add_filter(
        &mut self,
        report: ReportId,
        field: FieldId,
        operator: FilterOperator,
        value: Option<&str>,
    ) -> Result<(), HostError>;

    fn add_sort_group_rule(&mut self, report: ReportId, rule: SortGroupRule)
        -> Result<(), HostError>;

    fn set_report_flags(&mut self, report: ReportId, flags: ReportFlags) -> Result<(), HostError>;
}
