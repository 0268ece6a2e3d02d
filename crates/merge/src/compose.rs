//! Derived-column composition.

use crate::config::ColumnSpec;
use crate::model::Record;

/// Overwrite each combine-derived field with the configured concatenation
/// of its source columns. Blank parts are dropped so no stray delimiter
/// appears. Runs after the merge, once per final record; whatever value the
/// field held before is replaced unconditionally.
pub fn compose(record: &mut Record, columns: &[ColumnSpec]) {
    for spec in columns {
        let Some(ref combine) = spec.combine else {
            continue;
        };
        let parts: Vec<String> = combine
            .columns
            .iter()
            .map(|column| record.value(column).to_string())
            .filter(|value| !value.trim().is_empty())
            .collect();
        record.set(spec.key.clone(), parts.join(&combine.delimiter));
    }
}
