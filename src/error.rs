//! Error types for room schedule generation.

use crate::host::ScopeId;
use crate::model::{AttributeId, Category, ElementId, FieldId, ReportId};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Where an attribute lookup came up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeLocation {
    /// The record exists but does not carry the attribute.
    Record(ElementId),
    /// There was no record of the category to resolve the attribute against.
    NoRecords(Category),
}

impl fmt::Display for AttributeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeLocation::Record(id) => write!(f, "on record {id}"),
            AttributeLocation::NoRecords(category) => {
                write!(f, "no {category} records to resolve it against")
            }
        }
    }
}

/// Errors that abort a schedule build. Nothing from the run is committed.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A required attribute could not be resolved.
    #[error("attribute '{attribute}' is missing: {location}")]
    MissingAttribute {
        attribute: String,
        location: AttributeLocation,
    },

    /// The host rejected an operation.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Errors raised by a host document.
#[derive(Debug, Error, PartialEq)]
pub enum HostError {
    #[error("no mutation scope is open")]
    NoActiveScope,

    #[error("mutation scope '{label}' is already open")]
    ScopeAlreadyOpen { label: String },

    #[error("mutation scope {0:?} is not the open scope")]
    ScopeMismatch(ScopeId),

    #[error("schedule {0:?} does not exist in the open scope")]
    UnknownReport(ReportId),

    #[error("field {field:?} does not exist on schedule {report:?}")]
    UnknownField { report: ReportId, field: FieldId },

    #[error("attribute {0:?} is not defined in this document")]
    UnknownAttribute(AttributeId),

    #[error("a schedule named '{0}' already exists")]
    DuplicateName(String),

    #[error("schedule {0:?} already has a filter")]
    FilterAlreadySet(ReportId),
}

/// Errors that can occur when loading a host document file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the document from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not valid JSON for the expected shape.
    #[error("invalid document: {source}")]
    InvalidDocument {
        #[from]
        source: serde_json::Error,
    },

    /// A room points at a level the document does not define.
    #[error("room #{room} references unknown level #{level}")]
    UnknownLevel { room: u64, level: u64 },

    /// A room parameter uses a name the document reserves for its own attributes.
    #[error("room #{room} defines reserved parameter '{name}'")]
    ReservedParameter { room: u64, name: String },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}
