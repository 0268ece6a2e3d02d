// CSV/JSON export of merged records

use std::path::Path;

use rowfuse_merge::config::ColumnSpec;
use rowfuse_merge::model::{MergeResult, Record};

/// One export column: the record field to read and the header label to show.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportColumn {
    pub key: String,
    pub label: String,
}

/// Columns chosen for export: visible declared columns in config order,
/// optionally followed by the incidental fields observed in the data. With
/// no declared columns at all, every observed field is exported as-is.
pub fn export_columns(
    result: &MergeResult,
    columns: &[ColumnSpec],
    all_fields: bool,
) -> Vec<ExportColumn> {
    let mut out: Vec<ExportColumn> = columns
        .iter()
        .filter(|spec| spec.visible)
        .map(|spec| ExportColumn { key: spec.key.clone(), label: spec.label().to_string() })
        .collect();

    if out.is_empty() {
        return result
            .fields
            .iter()
            .map(|field| ExportColumn { key: field.clone(), label: field.clone() })
            .collect();
    }

    if all_fields {
        for field in &result.fields {
            if !out.iter().any(|column| &column.key == field) {
                out.push(ExportColumn { key: field.clone(), label: field.clone() });
            }
        }
    }

    out
}

/// Write records as CSV: one header row of labels, then one row per record.
pub fn write_csv<W: std::io::Write>(
    writer: W,
    records: &[Record],
    columns: &[ExportColumn],
) -> Result<(), String> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

    csv_writer
        .write_record(columns.iter().map(|column| column.label.as_str()))
        .map_err(|e| e.to_string())?;

    for record in records {
        csv_writer
            .write_record(columns.iter().map(|column| record.value(&column.key)))
            .map_err(|e| e.to_string())?;
    }

    csv_writer.flush().map_err(|e| e.to_string())
}

pub fn export_csv(path: &Path, records: &[Record], columns: &[ExportColumn]) -> Result<(), String> {
    let file = std::fs::File::create(path).map_err(|e| e.to_string())?;
    write_csv(file, records, columns)
}

/// Records as a JSON array of flat objects, fields in the given order.
pub fn records_to_json(records: &[Record], fields: &[String]) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = records
        .iter()
        .map(|record| {
            let mut object = serde_json::Map::new();
            for field in fields {
                object.insert(
                    field.clone(),
                    serde_json::Value::String(record.value(field).to_string()),
                );
            }
            serde_json::Value::Object(object)
        })
        .collect();
    serde_json::Value::Array(rows)
}
