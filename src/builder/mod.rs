//! Builds one filtered schedule per department plus one department rollup.
//!
//! All schedules of a run are created inside a single [`Transaction`]: if any of
//! them fails, none are committed.

pub mod fields;
pub mod keys;
pub mod naming;

pub use fields::{bind_fields, AttributeSchema, FieldSpec};
pub use keys::{distinct_keys, GroupKey};
pub use naming::ReportNames;

use crate::error::ScheduleError;
use crate::host::{Host, Transaction};
use crate::model::{
    AttributeKey, BuiltInAttribute, Category, FilterOperator, ReportFlags, SortGroupRule,
    SortOrder,
};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};

/// What to group by and how to name the results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub category: Category,
    pub group_attribute: String,
    /// Prefix of each per-group schedule name; the key follows verbatim.
    pub name_prefix: String,
    pub aggregate_name: String,
    pub transaction_label: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            category: Category::Rooms,
            group_attribute: "Department".to_string(),
            name_prefix: "Department - ".to_string(),
            aggregate_name: "All Departments".to_string(),
            transaction_label: "Create schedule".to_string(),
        }
    }
}

/// Schedules created by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub group_schedules: Vec<String>,
    pub aggregate_schedule: String,
}

impl BuildSummary {
    /// Per-group schedules created; the rollup is not counted.
    #[must_use]
    pub fn created(&self) -> usize {
        self.group_schedules.len()
    }
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Created {} schedules.", self.created())
    }
}

pub struct ScheduleBuilder {
    config: ScheduleConfig,
}

impl ScheduleBuilder {
    #[must_use]
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    fn group_key(&self) -> AttributeKey {
        AttributeKey::named(&self.config.group_attribute)
    }

    /// Columns of every per-group schedule, in display order. Level is hidden and
    /// only used for grouping.
    #[must_use]
    pub fn group_fields(&self) -> [FieldSpec; 6] {
        [
            FieldSpec::named("Number"),
            FieldSpec::named("Name"),
            FieldSpec::new(self.group_key()),
            FieldSpec::named("Comments"),
            FieldSpec::new(AttributeKey::BuiltIn(BuiltInAttribute::RoomArea)).totals(),
            FieldSpec::named("Level").hidden(),
        ]
    }

    #[must_use]
    pub fn aggregate_fields(&self) -> [FieldSpec; 2] {
        [
            FieldSpec::new(self.group_key()),
            FieldSpec::new(AttributeKey::BuiltIn(BuiltInAttribute::RoomArea)).totals(),
        ]
    }

    /// Name of the per-group schedule for `key`, before collision handling.
    #[must_use]
    pub fn schedule_name(&self, key: &GroupKey) -> String {
        format!("{}{key}", self.config.name_prefix)
    }

    /// Fetches the records, derives the group keys and creates every schedule in
    /// one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::MissingAttribute`] if a required attribute cannot be
    /// resolved, including when there are no records at all, and
    /// [`ScheduleError::Host`] if the host rejects an operation. In both cases the
    /// transaction is rolled back.
    pub fn run<H: Host + ?Sized>(&self, host: &mut H) -> Result<BuildSummary, ScheduleError> {
        let category = self.config.category;
        let records = host.fetch_records(category)?;
        info!(%category, records = records.len(), "records fetched");

        let keys = distinct_keys(&records, &self.config.group_attribute)?;
        info!(
            attribute = %self.config.group_attribute,
            keys = keys.len(),
            "group keys derived"
        );

        let mut wanted: Vec<AttributeKey> = Vec::new();
        for spec in self.group_fields().into_iter().chain(self.aggregate_fields()) {
            if !wanted.contains(&spec.key) {
                wanted.push(spec.key);
            }
        }
        let schema = AttributeSchema::resolve(&records, category, &wanted)?;

        let mut names = ReportNames::new(host.report_names());
        let mut transaction = Transaction::start(host, &self.config.transaction_label)?;

        let mut group_schedules = Vec::with_capacity(keys.len());
        for key in &keys {
            let name = names.claim(&self.schedule_name(key));
            self.build_group_schedule(transaction.host(), &schema, key, &name)?;
            group_schedules.push(name);
        }

        let aggregate_schedule = names.claim(&self.config.aggregate_name);
        self.build_aggregate_schedule(transaction.host(), &schema, &aggregate_schedule)?;

        transaction.commit()?;

        let summary = BuildSummary {
            group_schedules,
            aggregate_schedule,
        };
        info!(created = summary.created(), "schedules committed");
        Ok(summary)
    }

    /// Creates the itemized schedule of the records whose group attribute equals `key`.
    pub fn build_group_schedule<H: Host + ?Sized>(
        &self,
        host: &mut H,
        schema: &AttributeSchema,
        key: &GroupKey,
        name: &str,
    ) -> Result<(), ScheduleError> {
        let report = host.create_report(self.config.category, name)?;
        debug!(report = report.0, name, "group schedule created");

        let [_number, name_field, group_field, _comments, _area, level_field] =
            bind_fields(host, report, schema, &self.group_fields())?;

        host.add_filter(report, group_field, FilterOperator::Equal, key.as_deref())?;

        host.add_sort_group_rule(
            report,
            SortGroupRule::new(level_field, SortOrder::Ascending).grouped(),
        )?;
        host.add_sort_group_rule(report, SortGroupRule::new(name_field, SortOrder::Ascending))?;

        host.set_report_flags(
            report,
            ReportFlags {
                itemized: true,
                show_grand_total: true,
                show_grand_total_title: true,
                show_grand_total_count: true,
            },
        )?;
        Ok(())
    }

    /// Creates the non-itemized rollup: one row per group with its total area.
    pub fn build_aggregate_schedule<H: Host + ?Sized>(
        &self,
        host: &mut H,
        schema: &AttributeSchema,
        name: &str,
    ) -> Result<(), ScheduleError> {
        let report = host.create_report(self.config.category, name)?;
        debug!(report = report.0, name, "aggregate schedule created");

        let [group_field, _area] = bind_fields(host, report, schema, &self.aggregate_fields())?;

        host.add_sort_group_rule(report, SortGroupRule::new(group_field, SortOrder::Ascending))?;

        host.set_report_flags(
            report,
            ReportFlags {
                itemized: false,
                show_grand_total: true,
                show_grand_total_title: true,
                show_grand_total_count: false,
            },
        )?;
        Ok(())
    }
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new(ScheduleConfig::default())
    }
}
