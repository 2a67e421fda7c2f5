use crate::error::ExportError;
use crate::host::MemoryHost;
use crate::model::ScheduleDefinition;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes schedule definitions as pretty-printed JSON.
pub fn export_json<P: AsRef<Path>>(
    schedules: &[ScheduleDefinition],
    path: P,
) -> Result<(), ExportError> {
    write_pretty(schedules, path.as_ref())
}

/// Writes the whole document back out, committed schedules included, in the
/// format [`load_document`](crate::host::load_document) reads.
pub fn save_document<P: AsRef<Path>>(host: &MemoryHost, path: P) -> Result<(), ExportError> {
    write_pretty(&host.to_document(), path.as_ref())
}

fn write_pretty<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(value)?;

    let mut file = File::create(path).map_err(|source| ExportError::FileCreate {
        path: path.to_path_buf(),
        source,
    })?;

    file.write_all(json.as_bytes())
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })?;

    Ok(())
}
