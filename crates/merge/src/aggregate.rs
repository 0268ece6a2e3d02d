//! Multi-source aggregation: row union on the main axis, key union on the
//! linked axis. The two are never conflated.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::config::ReconcilePolicy;
use crate::model::{Dataset, Record};
use crate::normalize::normalize_key;
use crate::reconcile::reconcile;

/// Concatenate main datasets row-wise.
///
/// The first dataset's field set is authoritative: every row of every
/// dataset is re-projected onto it, so schema drift in later files can
/// neither add nor remove columns. Fields a later row lacks read as empty.
pub fn union_main(datasets: &[Dataset]) -> Dataset {
    let Some(first) = datasets.first() else {
        return Dataset { name: String::new(), headers: Vec::new(), records: Vec::new() };
    };

    let headers = first.headers.clone();
    let mut records = Vec::new();
    for dataset in datasets {
        for record in &dataset.records {
            let mut projected = Record::new();
            for name in &headers {
                projected.set(name.clone(), record.value(name).to_string());
            }
            records.push(projected);
        }
    }

    Dataset { name: first.name.clone(), headers, records }
}

/// Fold linked datasets into one normalized-key → record map, in source
/// order. A later record whose key is already present is reconciled into
/// the existing entry; records whose key normalizes to the empty string are
/// skipped (they can never match a main row).
///
/// The map lives for a single merge call and is discarded with it.
pub fn fold_linked(
    datasets: &[Dataset],
    linked_key: &str,
    policy: &ReconcilePolicy,
) -> BTreeMap<String, Record> {
    let mut map: BTreeMap<String, Record> = BTreeMap::new();
    for dataset in datasets {
        for record in &dataset.records {
            let key = normalize_key(record.value(linked_key));
            if key.is_empty() {
                continue;
            }
            match map.entry(key) {
                Entry::Occupied(mut entry) => {
                    reconcile(entry.get_mut(), record, Some(linked_key), policy);
                }
                Entry::Vacant(entry) => {
                    entry.insert(record.clone());
                }
            }
        }
    }
    map
}
