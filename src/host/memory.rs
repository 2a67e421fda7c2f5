use super::evaluate::{evaluate, ScheduleTable};
use super::{Host, HostError, ScopeId};
use crate::error::LoadError;
use crate::model::{
    Attribute, AttributeId, AttributeValue, BuiltInAttribute, Category, DisplayType, DocumentFile,
    ElementId, FieldId, FieldKind, FilterOperator, LevelEntry, ParameterValue, Record, ReportFlags,
    ReportId, RoomEntry, ScheduleDefinition, ScheduleField, ScheduleFilter, SortGroupRule,
};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

const LEVEL_ATTRIBUTE: &str = "Level";

/// Loads a host document from a JSON file.
///
/// Rooms become [`Record`]s of their category, rooms unless stated. Each distinct
/// parameter name gets one attribute id shared by every room; `area` becomes the built-in
/// [`BuiltInAttribute::RoomArea`] and `level` the named `Level` reference, so
/// neither name may appear among a room's parameters.
///
/// # Errors
///
/// Returns [`LoadError::FileRead`] if the file cannot be read.
/// Returns [`LoadError::InvalidDocument`] if the JSON does not match the document shape.
/// Returns [`LoadError::UnknownLevel`] if a room references a level that is not defined.
/// Returns [`LoadError::ReservedParameter`] if a room names a parameter `Level` or `Area`.
///
/// # Example
///
/// ```no_run
/// use room_schedules::host::load_document;
///
/// let host = load_document("office.json")?;
/// println!("{} schedules", host.schedules().len());
/// # Ok::<(), room_schedules::error::LoadError>(())
/// ```
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<MemoryHost, LoadError> {
    let content = std::fs::read_to_string(&path).map_err(|source| LoadError::FileRead {
        path: path.as_ref().to_path_buf(),
        source,
    })?;

    let document: DocumentFile = serde_json::from_str(&content)?;
    MemoryHost::from_document(document)
}

#[derive(Debug)]
struct OpenScope {
    id: ScopeId,
    label: String,
    schedules: Vec<ScheduleDefinition>,
}

/// A host document held in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    pub name: String,
    levels: Vec<LevelEntry>,
    rooms: Vec<RoomEntry>,
    records: Vec<Record>,
    attributes: BTreeMap<AttributeId, String>,
    schedules: Vec<ScheduleDefinition>,
    open_scope: Option<OpenScope>,
    next_scope: u64,
    next_report: u32,
}

impl MemoryHost {
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn from_document(document: DocumentFile) -> Result<Self, LoadError> {
        let mut host = Self::new(document.name);
        let area = BuiltInAttribute::RoomArea;

        let levels: HashMap<u64, &LevelEntry> =
            document.levels.iter().map(|level| (level.id, level)).collect();

        for room in &document.rooms {
            let mut attributes = Vec::with_capacity(room.parameters.len() + 2);

            for (name, value) in &room.parameters {
                if name == LEVEL_ATTRIBUTE || name == area.name() {
                    return Err(LoadError::ReservedParameter {
                        room: room.id,
                        name: name.clone(),
                    });
                }
                let value = match value {
                    None => AttributeValue::Text(None),
                    Some(ParameterValue::Text(text)) => AttributeValue::Text(Some(text.clone())),
                    Some(ParameterValue::Number(n)) => AttributeValue::Number(*n),
                };
                attributes.push(Attribute {
                    id: host.define_attribute(name),
                    name: name.clone(),
                    built_in: None,
                    value,
                });
            }

            let level_value = match room.level {
                Some(level_id) => {
                    let level = levels.get(&level_id).ok_or(LoadError::UnknownLevel {
                        room: room.id,
                        level: level_id,
                    })?;
                    AttributeValue::Reference {
                        id: ElementId(level_id),
                        label: level.name.clone(),
                        elevation: level.elevation,
                    }
                }
                None => AttributeValue::Text(None),
            };
            attributes.push(Attribute {
                id: host.define_attribute(LEVEL_ATTRIBUTE),
                name: LEVEL_ATTRIBUTE.to_string(),
                built_in: None,
                value: level_value,
            });

            host.attributes.insert(area.id(), area.name().to_string());
            attributes.push(Attribute {
                id: area.id(),
                name: area.name().to_string(),
                built_in: Some(area),
                value: AttributeValue::Number(room.area),
            });

            host.records.push(Record {
                id: ElementId(room.id),
                category: room.category,
                attributes,
            });
        }

        host.next_report = document
            .schedules
            .iter()
            .map(|s| s.id.0 + 1)
            .max()
            .unwrap_or(0);
        host.schedules = document.schedules;
        host.levels = document.levels;
        host.rooms = document.rooms;

        debug!(
            records = host.records.len(),
            schedules = host.schedules.len(),
            "document loaded"
        );
        Ok(host)
    }

    /// The document as it would be saved: the loaded levels and rooms plus every
    /// committed schedule.
    #[must_use]
    pub fn to_document(&self) -> DocumentFile {
        DocumentFile {
            name: self.name.clone(),
            levels: self.levels.clone(),
            rooms: self.rooms.clone(),
            schedules: self.schedules.clone(),
        }
    }

    /// Returns the id of the named attribute, defining it if it is new.
    pub fn define_attribute(&mut self, name: &str) -> AttributeId {
        if let Some((id, _)) = self.attributes.iter().find(|(_, n)| *n == name) {
            return *id;
        }
        let id = AttributeId(
            self.attributes
                .keys()
                .map(|id| id.0)
                .max()
                .unwrap_or(0)
                .max(0)
                + 1,
        );
        self.attributes.insert(id, name.to_string());
        id
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Committed schedules.
    #[must_use]
    pub fn schedules(&self) -> &[ScheduleDefinition] {
        &self.schedules
    }

    #[must_use]
    pub fn schedule(&self, name: &str) -> Option<&ScheduleDefinition> {
        self.schedules.iter().find(|s| s.name == name)
    }

    /// Evaluates a committed schedule against the records of its category.
    #[must_use]
    pub fn evaluate(&self, name: &str) -> Option<ScheduleTable> {
        let definition = self.schedule(name)?;
        let records: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| r.category == definition.category)
            .collect();
        Some(evaluate(definition, &records))
    }

    fn open_scope(&mut self) -> Result<&mut OpenScope, HostError> {
        self.open_scope.as_mut().ok_or(HostError::NoActiveScope)
    }

    fn report_mut(&mut self, report: ReportId) -> Result<&mut ScheduleDefinition, HostError> {
        self.open_scope()?
            .schedules
            .iter_mut()
            .find(|s| s.id == report)
            .ok_or(HostError::UnknownReport(report))
    }

    fn field_mut(
        &mut self,
        report: ReportId,
        field: FieldId,
    ) -> Result<&mut ScheduleField, HostError> {
        self.report_mut(report)?
            .field_mut(field)
            .ok_or(HostError::UnknownField { report, field })
    }
}

impl Host for MemoryHost {
    fn fetch_records(&self, category: Category) -> Result<Vec<Record>, HostError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect())
    }

    fn report_names(&self) -> Vec<String> {
        let pending = self.open_scope.iter().flat_map(|s| s.schedules.iter());
        self.schedules
            .iter()
            .chain(pending)
            .map(|s| s.name.clone())
            .collect()
    }

    fn begin_scope(&mut self, label: &str) -> Result<ScopeId, HostError> {
        if let Some(open) = &self.open_scope {
            return Err(HostError::ScopeAlreadyOpen {
                label: open.label.clone(),
            });
        }
        let id = ScopeId(self.next_scope);
        self.next_scope += 1;
        self.open_scope = Some(OpenScope {
            id,
            label: label.to_string(),
            schedules: Vec::new(),
        });
        Ok(id)
    }

    fn commit(&mut self, scope: ScopeId) -> Result<(), HostError> {
        match self.open_scope.take() {
            Some(open) if open.id == scope => {
                self.schedules.extend(open.schedules);
                Ok(())
            }
            Some(open) => {
                self.open_scope = Some(open);
                Err(HostError::ScopeMismatch(scope))
            }
            None => Err(HostError::NoActiveScope),
        }
    }

    fn rollback(&mut self, scope: ScopeId) {
        if self.open_scope.as_ref().is_some_and(|open| open.id == scope) {
            self.open_scope = None;
        }
    }

    fn create_report(&mut self, category: Category, name: &str) -> Result<ReportId, HostError> {
        if self.open_scope.is_none() {
            return Err(HostError::NoActiveScope);
        }
        if self.report_names().iter().any(|n| n == name) {
            return Err(HostError::DuplicateName(name.to_string()));
        }
        let id = ReportId(self.next_report);
        self.next_report += 1;
        self.open_scope()?
            .schedules
            .push(ScheduleDefinition::new(id, name.to_string(), category));
        Ok(id)
    }

    fn add_field(
        &mut self,
        report: ReportId,
        kind: FieldKind,
        attribute: AttributeId,
        hidden: bool,
    ) -> Result<FieldId, HostError> {
        let heading = self
            .attributes
            .get(&attribute)
            .cloned()
            .ok_or(HostError::UnknownAttribute(attribute))?;
        let schedule = self.report_mut(report)?;
        let id = FieldId(
            schedule
                .fields
                .iter()
                .map(|f| f.id.0 + 1)
                .max()
                .unwrap_or(0),
        );
        schedule.fields.push(ScheduleField {
            id,
            kind,
            attribute,
            heading,
            hidden,
            display: DisplayType::Standard,
        });
        Ok(id)
    }

    fn set_field_display(
        &mut self,
        report: ReportId,
        field: FieldId,
        display: DisplayType,
    ) -> Result<(), HostError> {
        self.field_mut(report, field)?.display = display;
        Ok(())
    }

    fn add_filter(
        &mut self,
        report: ReportId,
        field: FieldId,
        operator: FilterOperator,
        value: Option<&str>,
    ) -> Result<(), HostError> {
        self.field_mut(report, field)?;
        let schedule = self.report_mut(report)?;
        if schedule.filter.is_some() {
            return Err(HostError::FilterAlreadySet(report));
        }
        schedule.filter = Some(ScheduleFilter {
            field,
            operator,
            value: value.map(str::to_string),
        });
        Ok(())
    }

    fn add_sort_group_rule(
        &mut self,
        report: ReportId,
        rule: SortGroupRule,
    ) -> Result<(), HostError> {
        self.field_mut(report, rule.field)?;
        self.report_mut(report)?.sort_group.push(rule);
        Ok(())
    }

    fn set_report_flags(&mut self, report: ReportId, flags: ReportFlags) -> Result<(), HostError> {
        self.report_mut(report)?.flags = flags;
        Ok(())
    }
}
