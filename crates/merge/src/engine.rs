//! Merge orchestration: raw texts in, merged records out.

use crate::aggregate::{fold_linked, union_main};
use crate::compose::compose;
use crate::config::MergeConfig;
use crate::model::{
    Dataset, JoinSide, MergeInput, MergeMeta, MergeResult, MergeSummary, MergeWarning, Record,
    SourceText,
};
use crate::normalize::normalize_key;
use crate::reconcile::reconcile;

/// Run a merge per config.
///
/// Never aborts a batch: empty sources and missing join keys degrade the
/// result and are reported through `MergeResult::warnings`. An empty main
/// input yields an empty record sequence, not an error.
pub fn run(config: &MergeConfig, input: &MergeInput) -> MergeResult {
    let mut warnings = Vec::new();
    let has_headers = config.sources.headers;

    let main_sets = parse_side(&input.main, JoinSide::Main, has_headers, &mut warnings);
    let linked_sets = parse_side(&input.linked, JoinSide::Linked, has_headers, &mut warnings);

    let base = union_main(&main_sets);
    let main_rows = base.records.len();

    let main_key_ok = base.headers.iter().any(|h| h == &config.join.main_key);
    if !main_key_ok && !main_sets.is_empty() && !input.linked.is_empty() {
        warnings.push(MergeWarning::JoinKeyMissing {
            side: JoinSide::Main,
            key: config.join.main_key.clone(),
            name: base.name.clone(),
        });
    }

    let mut usable_linked: Vec<Dataset> = Vec::new();
    for dataset in linked_sets {
        if dataset.headers.iter().any(|h| h == &config.join.linked_key) {
            usable_linked.push(dataset);
        } else {
            warnings.push(MergeWarning::JoinKeyMissing {
                side: JoinSide::Linked,
                key: config.join.linked_key.clone(),
                name: dataset.name,
            });
        }
    }

    let mut records = base.records;
    let mut matched = 0usize;
    let mut linked_keys = 0usize;

    if main_key_ok && !usable_linked.is_empty() {
        let linked_map = fold_linked(&usable_linked, &config.join.linked_key, &config.reconcile);
        linked_keys = linked_map.len();

        for record in &mut records {
            let key = normalize_key(record.value(&config.join.main_key));
            if key.is_empty() {
                continue;
            }
            if let Some(linked) = linked_map.get(&key) {
                reconcile(record, linked, Some(config.join.linked_key.as_str()), &config.reconcile);
                matched += 1;
            }
        }
        // linked_map dropped here; no aggregation state survives the call.
    }

    for record in &mut records {
        compose(record, &config.columns);
    }

    let fields = observed_fields(&base.headers, &records);

    MergeResult {
        meta: MergeMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary: MergeSummary {
            main_rows,
            linked_keys,
            matched,
            unmatched: main_rows - matched,
            warnings: warnings.len(),
        },
        fields,
        records,
        warnings,
    }
}

fn parse_side(
    sources: &[SourceText],
    side: JoinSide,
    has_headers: bool,
    warnings: &mut Vec<MergeWarning>,
) -> Vec<Dataset> {
    let mut datasets = Vec::new();
    for source in sources {
        match Dataset::parse(&source.name, &source.text, has_headers) {
            Ok(dataset) => datasets.push(dataset),
            Err(_) => {
                warnings.push(MergeWarning::EmptySource { side, name: source.name.clone() });
            }
        }
    }
    datasets
}

/// Distinct field names across the output: the base header order first,
/// then incidental fields contributed by linked records as they appear.
fn observed_fields(headers: &[String], records: &[Record]) -> Vec<String> {
    let mut fields: Vec<String> = headers.to_vec();
    for record in records {
        for name in record.fields.keys() {
            if !fields.iter().any(|f| f == name) {
                fields.push(name.clone());
            }
        }
    }
    fields
}
