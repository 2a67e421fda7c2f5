use crate::error::ExportError;
use crate::host::{ScheduleRow, ScheduleTable};
use std::fs::File;
use std::path::Path;

/// Writes evaluated schedules to one CSV file.
///
/// Each schedule starts with a `Schedule,<name>` record followed by its column
/// headings; every row is prefixed by its kind. Records have varying lengths.
pub fn export_csv<P: AsRef<Path>>(tables: &[ScheduleTable], path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);

    for table in tables {
        writer.write_record(["Schedule", table.name.as_str()])?;

        let mut heading = vec!["Row".to_string()];
        heading.extend(table.columns.iter().cloned());
        writer.write_record(&heading)?;

        for row in &table.rows {
            let record = match row {
                ScheduleRow::Header { label } => vec!["Header".to_string(), label.clone()],
                ScheduleRow::Item { cells, .. } => {
                    let mut record = vec!["Item".to_string()];
                    record.extend(cells.iter().cloned());
                    record
                }
                ScheduleRow::Footer { label, count, totals } => {
                    footer_record("Footer", &format!("{label}: {count}"), totals)
                }
                ScheduleRow::Blank => vec![String::new()],
            };
            writer.write_record(&record)?;
        }

        if let Some(total) = &table.grand_total {
            let mut label = total.title.clone().unwrap_or_default();
            if let Some(count) = total.count {
                label = format!("{label}: {count}");
            }
            writer.write_record(&footer_record("Total", &label, &total.totals))?;
        }
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}

/// Kind, then the label in the first column and totals under their columns.
fn footer_record(kind: &str, label: &str, totals: &[Option<f64>]) -> Vec<String> {
    let mut record = vec![kind.to_string()];
    record.extend(totals.iter().enumerate().map(|(i, total)| match total {
        Some(sum) => format!("{sum:.2}"),
        None if i == 0 => label.to_string(),
        None => String::new(),
    }));
    if totals.is_empty() {
        record.push(label.to_string());
    }
    record
}
