use super::{Category, ScheduleDefinition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk form of a host document: levels, rooms and any schedules it already holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub levels: Vec<LevelEntry>,
    #[serde(default)]
    pub rooms: Vec<RoomEntry>,
    #[serde(default)]
    pub schedules: Vec<ScheduleDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelEntry {
    pub id: u64,
    pub name: String,
    /// Orders level references: schedules grouped by level list lower levels first.
    #[serde(default)]
    pub elevation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomEntry {
    pub id: u64,
    #[serde(default)]
    pub category: Category,
    pub level: Option<u64>,
    #[serde(default)]
    pub area: f64,
    /// Named parameters. A key mapped to `null` exists but is unset; a missing key is absent.
    #[serde(default)]
    pub parameters: BTreeMap<String, Option<ParameterValue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Number(f64),
    Text(String),
}
