use pretty_assertions::assert_eq;
use serde_json::json;

use room_schedules::builder::{ScheduleBuilder, ScheduleConfig};
use room_schedules::error::{AttributeLocation, HostError, ScheduleError};
use room_schedules::host::{load_document, GrandTotal, Host, MemoryHost, ScheduleRow, ScopeId};
use room_schedules::model::{
    AttributeId, Category, DisplayType, DocumentFile, ElementId, FieldId, FieldKind,
    FilterOperator, Record, ReportFlags, ReportId, SortGroupRule, SortOrder,
};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/office.json");

fn office() -> MemoryHost {
    load_document(FIXTURE).unwrap()
}

fn document(value: serde_json::Value) -> MemoryHost {
    let document: DocumentFile = serde_json::from_value(value).unwrap();
    MemoryHost::from_document(document).unwrap()
}

fn room(id: u64, department: Option<&str>) -> serde_json::Value {
    json!({
        "id": id, "level": 1, "area": 10.0,
        "parameters": {
            "Number": id.to_string(), "Name": format!("Room {id}"),
            "Department": department, "Comments": ""
        }
    })
}

#[test]
fn one_schedule_per_department_plus_rollup() {
    let mut host = office();
    let summary = ScheduleBuilder::default().run(&mut host).unwrap();

    assert_eq!(summary.created(), 2);
    assert_eq!(
        summary.group_schedules,
        vec!["Department - Sales", "Department - Eng"]
    );
    assert_eq!(summary.aggregate_schedule, "All Departments");
    assert_eq!(summary.to_string(), "Created 2 schedules.");
    assert_eq!(host.schedules().len(), 3);

    assert_eq!(host.evaluate("Department - Sales").unwrap().items().len(), 2);
    assert_eq!(host.evaluate("Department - Eng").unwrap().items().len(), 3);

    let rollup = host.evaluate("All Departments").unwrap();
    assert_eq!(
        rollup.rows,
        vec![
            ScheduleRow::Item {
                cells: vec!["Eng".into(), "52.25".into()],
                records: 3
            },
            ScheduleRow::Item {
                cells: vec!["Sales".into(), "35.50".into()],
                records: 2
            },
        ]
    );
}

#[test]
fn department_schedules_have_the_fixed_field_layout() {
    let mut host = office();
    ScheduleBuilder::default().run(&mut host).unwrap();

    for name in ["Department - Sales", "Department - Eng"] {
        let schedule = host.schedule(name).unwrap();
        assert_eq!(
            schedule.visible_headings(),
            vec!["Number", "Name", "Department", "Comments", "Area"]
        );

        let level = &schedule.fields[5];
        assert_eq!(level.heading, "Level");
        assert!(level.hidden);

        let area = &schedule.fields[4];
        assert_eq!(area.kind, FieldKind::ViewBased);
        assert_eq!(area.display, DisplayType::Totals);
        assert!(schedule.fields[..4]
            .iter()
            .all(|f| f.kind == FieldKind::Instance && f.display == DisplayType::Standard));

        assert_eq!(
            schedule.sort_group,
            vec![
                SortGroupRule::new(level.id, SortOrder::Ascending).grouped(),
                SortGroupRule::new(schedule.fields[1].id, SortOrder::Ascending),
            ]
        );
        assert_eq!(
            schedule.flags,
            ReportFlags {
                itemized: true,
                show_grand_total: true,
                show_grand_total_title: true,
                show_grand_total_count: true,
            }
        );
    }
}

#[test]
fn department_filter_matches_exactly() {
    let mut host = office();
    ScheduleBuilder::default().run(&mut host).unwrap();

    for department in ["Sales", "Eng"] {
        let name = format!("Department - {department}");
        let schedule = host.schedule(&name).unwrap();
        let filter = schedule.filter.as_ref().unwrap();
        assert_eq!(filter.field, schedule.fields[2].id);
        assert_eq!(filter.operator, FilterOperator::Equal);
        assert_eq!(filter.value.as_deref(), Some(department));

        let table = host.evaluate(&name).unwrap();
        let column = table.column("Department").unwrap();
        assert!(table.items().iter().all(|cells| cells[column] == department));
    }
}

#[test]
fn department_schedule_groups_by_level() {
    let mut host = office();
    ScheduleBuilder::default().run(&mut host).unwrap();

    let table = host.evaluate("Department - Eng").unwrap();
    let item = |cells: [&str; 5]| ScheduleRow::Item {
        cells: cells.iter().map(ToString::to_string).collect(),
        records: 1,
    };
    let footer = |label: &str, count, area| ScheduleRow::Footer {
        label: label.to_string(),
        count,
        totals: vec![None, None, None, None, Some(area)],
    };

    assert_eq!(
        table.rows,
        vec![
            ScheduleRow::Header {
                label: "Level 1".into()
            },
            item(["102", "Lab", "Eng", "Wet lab", "30.00"]),
            footer("Level 1", 1, 30.0),
            ScheduleRow::Blank,
            ScheduleRow::Header {
                label: "Level 2".into()
            },
            item(["202", "Office B", "Eng", "", "12.25"]),
            item(["203", "Office C", "Eng", "", "10.00"]),
            footer("Level 2", 2, 22.25),
        ]
    );
    assert_eq!(
        table.grand_total,
        Some(GrandTotal {
            title: Some("Grand total".into()),
            count: Some(3),
            totals: vec![None, None, None, None, Some(52.25)],
        })
    );
}

#[test]
fn rollup_is_not_itemized_and_totals_all_area() {
    let mut host = office();
    ScheduleBuilder::default().run(&mut host).unwrap();

    let schedule = host.schedule("All Departments").unwrap();
    assert_eq!(schedule.visible_headings(), vec!["Department", "Area"]);
    assert!(schedule.filter.is_none());
    assert_eq!(
        schedule.sort_group,
        vec![SortGroupRule::new(schedule.fields[0].id, SortOrder::Ascending)]
    );
    assert_eq!(
        schedule.flags,
        ReportFlags {
            itemized: false,
            show_grand_total: true,
            show_grand_total_title: true,
            show_grand_total_count: false,
        }
    );

    let total_area: f64 = host
        .records()
        .iter()
        .filter_map(|r| r.attribute(AttributeId(-1)))
        .filter_map(|a| a.value.as_number())
        .sum();
    let table = host.evaluate("All Departments").unwrap();
    let grand_total = table.grand_total.unwrap();
    assert_eq!(grand_total.count, None);
    assert_eq!(grand_total.totals, vec![None, Some(total_area)]);
    assert_eq!(total_area, 87.75);
}

#[test]
fn no_records_fails_without_creating_anything() {
    let mut host = document(json!({ "name": "Empty" }));
    let err = ScheduleBuilder::default().run(&mut host).unwrap_err();

    assert!(matches!(
        err,
        ScheduleError::MissingAttribute {
            location: AttributeLocation::NoRecords(Category::Rooms),
            ..
        }
    ));
    assert!(host.schedules().is_empty());
}

#[test]
fn unset_and_empty_departments_get_their_own_schedules() {
    let mut host = document(json!({
        "levels": [{ "id": 1, "name": "Level 1" }],
        "rooms": [room(1, None), room(2, Some("")), room(3, Some("Eng")), room(4, None)]
    }));
    let summary = ScheduleBuilder::default().run(&mut host).unwrap();

    assert_eq!(
        summary.group_schedules,
        vec!["Department - ", "Department -  (2)", "Department - Eng"]
    );
    let unset = host.schedule("Department - ").unwrap();
    assert_eq!(unset.filter.as_ref().unwrap().value, None);
    assert_eq!(host.evaluate("Department - ").unwrap().items().len(), 2);
    assert_eq!(host.evaluate("Department -  (2)").unwrap().items().len(), 1);
}

#[test]
fn rerun_creates_new_schedules_with_suffixed_names() {
    let mut host = office();
    ScheduleBuilder::default().run(&mut host).unwrap();
    let second = ScheduleBuilder::default().run(&mut host).unwrap();

    assert_eq!(
        second.group_schedules,
        vec!["Department - Sales (2)", "Department - Eng (2)"]
    );
    assert_eq!(second.aggregate_schedule, "All Departments (2)");
    assert_eq!(host.schedules().len(), 6);
}

#[test]
fn room_missing_an_attribute_aborts_the_run() {
    let mut bare = room(2, Some("Eng"));
    bare["parameters"]
        .as_object_mut()
        .unwrap()
        .remove("Comments");
    let mut host = document(json!({
        "levels": [{ "id": 1, "name": "Level 1" }],
        "rooms": [room(1, Some("Sales")), bare]
    }));

    let err = ScheduleBuilder::default().run(&mut host).unwrap_err();
    assert_eq!(
        err.to_string(),
        "attribute 'Comments' is missing: on record #2"
    );
    assert!(host.schedules().is_empty());
}

#[test]
fn grouping_by_another_attribute() {
    let mut host = office();
    let config = ScheduleConfig {
        group_attribute: "Name".to_string(),
        name_prefix: "Room - ".to_string(),
        ..ScheduleConfig::default()
    };
    let summary = ScheduleBuilder::new(config).run(&mut host).unwrap();

    assert_eq!(summary.created(), 5);
    assert!(host.schedule("Room - Lab").is_some());
}

/// Delegates to a [`MemoryHost`] but rejects the n-th schedule it is asked to create.
struct FailingHost {
    inner: MemoryHost,
    fail_on: usize,
    created: usize,
}

impl Host for FailingHost {
    fn fetch_records(&self, category: Category) -> Result<Vec<Record>, HostError> {
        self.inner.fetch_records(category)
    }

    fn report_names(&self) -> Vec<String> {
        self.inner.report_names()
    }

    fn begin_scope(&mut self, label: &str) -> Result<ScopeId, HostError> {
        self.inner.begin_scope(label)
    }

    fn commit(&mut self, scope: ScopeId) -> Result<(), HostError> {
        self.inner.commit(scope)
    }

    fn rollback(&mut self, scope: ScopeId) {
        self.inner.rollback(scope);
    }

    fn create_report(&mut self, category: Category, name: &str) -> Result<ReportId, HostError> {
        self.created += 1;
        if self.created == self.fail_on {
            return Err(HostError::DuplicateName(name.to_string()));
        }
        self.inner.create_report(category, name)
    }

    fn add_field(
        &mut self,
        report: ReportId,
        kind: FieldKind,
        attribute: AttributeId,
        hidden: bool,
    ) -> Result<FieldId, HostError> {
        self.inner.add_field(report, kind, attribute, hidden)
    }

    fn set_field_display(
        &mut self,
        report: ReportId,
        field: FieldId,
        display: DisplayType,
    ) -> Result<(), HostError> {
        self.inner.set_field_display(report, field, display)
    }

    fn add_filter(
        &mut self,
        report: ReportId,
        field: FieldId,
        operator: FilterOperator,
        value: Option<&str>,
    ) -> Result<(), HostError> {
        self.inner.add_filter(report, field, operator, value)
    }

    fn add_sort_group_rule(
        &mut self,
        report: ReportId,
        rule: SortGroupRule,
    ) -> Result<(), HostError> {
        self.inner.add_sort_group_rule(report, rule)
    }

    fn set_report_flags(&mut self, report: ReportId, flags: ReportFlags) -> Result<(), HostError> {
        self.inner.set_report_flags(report, flags)
    }
}

#[test]
fn failure_mid_run_commits_nothing() {
    for fail_on in 1..=3 {
        let mut host = FailingHost {
            inner: office(),
            fail_on,
            created: 0,
        };
        let err = ScheduleBuilder::default().run(&mut host).unwrap_err();

        assert!(matches!(err, ScheduleError::Host(HostError::DuplicateName(_))));
        assert!(host.inner.schedules().is_empty(), "fail_on = {fail_on}");
        assert!(host.inner.report_names().is_empty());
    }
}

#[test]
fn records_keep_host_ids() {
    let host = office();
    let ids: Vec<ElementId> = host.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, (10..=14).map(ElementId).collect::<Vec<_>>());
}

#[test]
fn grouping_by_a_mixed_number_column_sorts_numbers_first() {
    let rooms: Vec<serde_json::Value> = (0..200u64)
        .map(|id| {
            let mut room = room(id, Some("Eng"));
            if id % 2 == 0 {
                room["parameters"]["Number"] = json!(id);
            }
            room
        })
        .collect();
    let mut host = document(json!({
        "levels": [{ "id": 1, "name": "Level 1" }],
        "rooms": rooms
    }));
    let config = ScheduleConfig {
        group_attribute: "Number".to_string(),
        ..ScheduleConfig::default()
    };
    let summary = ScheduleBuilder::new(config).run(&mut host).unwrap();
    assert_eq!(summary.created(), 200);

    let rollup = host.evaluate("All Departments").unwrap();
    let keys: Vec<&str> = rollup.items().iter().map(|cells| cells[0].as_str()).collect();
    assert_eq!(keys.len(), 200);
    assert_eq!(&keys[..3], &["0.00", "2.00", "4.00"]);
    assert_eq!(keys[99], "198.00");
    assert_eq!(&keys[100..103], &["1", "101", "103"]);
}

#[test]
fn levels_are_ordered_by_elevation_not_name() {
    let rooms: Vec<serde_json::Value> = [1u64, 2, 3]
        .into_iter()
        .map(|level| {
            let mut room = room(level, Some("Eng"));
            room["level"] = json!(level);
            room
        })
        .collect();
    let mut host = document(json!({
        "levels": [
            { "id": 1, "name": "Roof", "elevation": 12.0 },
            { "id": 2, "name": "Basement", "elevation": -3.0 },
            { "id": 3, "name": "Ground", "elevation": 0.0 }
        ],
        "rooms": rooms
    }));
    ScheduleBuilder::default().run(&mut host).unwrap();

    let headers: Vec<String> = host
        .evaluate("Department - Eng")
        .unwrap()
        .rows
        .into_iter()
        .filter_map(|row| match row {
            ScheduleRow::Header { label } => Some(label),
            _ => None,
        })
        .collect();
    assert_eq!(headers, vec!["Basement", "Ground", "Roof"]);
}
