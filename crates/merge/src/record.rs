//! Record building: tokenized rows zipped against a header row.

use crate::error::MergeError;
use crate::model::{Dataset, Record};
use crate::tokenize::tokenize;

impl Dataset {
    /// Parse a raw CSV text into a dataset.
    ///
    /// With `has_headers`, the first row supplies field names (trimmed);
    /// otherwise names `col1..colN` are synthesized from the first row's
    /// width and every row is data. Rows shorter than the header read as
    /// empty strings for the missing trailing fields; extra trailing fields
    /// are dropped.
    pub fn parse(name: &str, text: &str, has_headers: bool) -> Result<Dataset, MergeError> {
        let rows = tokenize(text);
        if rows.is_empty() {
            return Err(MergeError::EmptySource { name: name.into() });
        }

        let (headers, data) = if has_headers {
            let headers: Vec<String> = rows[0].iter().map(|h| h.trim().to_string()).collect();
            (headers, &rows[1..])
        } else {
            let headers = (1..=rows[0].len()).map(|i| format!("col{i}")).collect();
            (headers, &rows[..])
        };

        let records = data.iter().map(|row| build_record(&headers, row)).collect();
        Ok(Dataset { name: name.into(), headers, records })
    }
}

fn build_record(headers: &[String], row: &[String]) -> Record {
    let mut record = Record::new();
    for (i, name) in headers.iter().enumerate() {
        record.set(name.clone(), row.get(i).cloned().unwrap_or_default());
    }
    record
}
