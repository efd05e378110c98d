//! The transformations between tables. Each takes a table by reference and
//! builds a new one; rows are never copied into more than one side of a split.

use std::collections::HashMap;

use crate::errors::{ErrorPosition, TableError};
use crate::record::{Column, DerivedRecord};
use crate::table::{AlignmentTable, DerivedTable, Diagnostic};

/// Alignments covering more than this percentage of the query are full length
pub const DEFAULT_FULL_LENGTH_PCT: f64 = 98.5;

/// Drop rows where a sequence was blasted against itself
pub fn remove_self_matches(table: &AlignmentTable) -> AlignmentTable {
    let records = table
        .iter()
        .filter(|r| !r.is_self_match())
        .cloned()
        .collect();
    AlignmentTable::new(table.layout.clone(), records)
}

/// Attach `length_pct` and `is_full_length` to every row.
///
/// Rows with a query length of 0 have no defined coverage; they are left
/// out and reported as diagnostics.
pub fn compute_derived(
    table: &AlignmentTable,
    full_length_pct: f64,
) -> (DerivedTable, Vec<Diagnostic>) {
    let mut records = Vec::with_capacity(table.len());
    let mut diagnostics = Vec::new();

    for record in table.iter() {
        if record.query_length == 0 {
            let position = ErrorPosition {
                line: record.line(),
                id: Some(record.query_id.clone()),
            };
            let err = TableError::new_zero_query_length(position);
            diagnostics.push(Diagnostic::from(err).report());
            continue;
        }

        let length_pct = record.align_length as f64 / record.query_length as f64 * 100.0;
        records.push(DerivedRecord {
            record: record.clone(),
            length_pct,
            is_full_length: length_pct > full_length_pct,
        });
    }

    (DerivedTable::new(table.layout.clone(), records), diagnostics)
}

/// Split into `(full_length, short)`, keeping input order on both sides
pub fn partition(table: &DerivedTable) -> (DerivedTable, DerivedTable) {
    let (fulls, shorts): (Vec<_>, Vec<_>) =
        table.iter().cloned().partition(|r| r.is_full_length);
    (
        DerivedTable::new(table.layout.clone(), fulls),
        DerivedTable::new(table.layout.clone(), shorts),
    )
}

/// For each distinct value of `group`, keep the row with the greatest value
/// of `rank`.
///
/// A later row only replaces the current best on a strictly greater value,
/// so ties go to the row seen first. Output is ordered by the first
/// appearance of each group.
///
/// # Errors
///
/// Returns a schema error if `rank` is not a numeric column.
pub fn best_matches(
    table: &DerivedTable,
    group: Column,
    rank: Column,
) -> Result<DerivedTable, TableError> {
    if !rank.is_numeric() {
        return Err(TableError::new_unrankable_column(rank.name()));
    }

    let mut slots: HashMap<String, usize> = HashMap::new();
    // (index of best row, its ranking value)
    let mut best: Vec<(usize, f64)> = Vec::new();

    for (idx, row) in table.iter().enumerate() {
        let value = row.record.numeric(rank).unwrap_or(f64::NEG_INFINITY);
        let key = row.record.key(group);
        match slots.get(&*key) {
            Some(&slot) => {
                if value > best[slot].1 {
                    best[slot] = (idx, value);
                }
            }
            None => {
                slots.insert(key.into_owned(), best.len());
                best.push((idx, value));
            }
        }
    }

    let records = best
        .into_iter()
        .map(|(idx, _)| table.records[idx].clone())
        .collect();
    Ok(DerivedTable::new(table.layout.clone(), records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::record;
    use crate::record::AlignmentRecord;
    use crate::table::Layout;

    fn table(records: Vec<AlignmentRecord>) -> AlignmentTable {
        AlignmentTable::new(Layout::default(), records)
    }

    fn derived(records: Vec<AlignmentRecord>) -> DerivedTable {
        compute_derived(&table(records), DEFAULT_FULL_LENGTH_PCT).0
    }

    #[test]
    fn test_remove_self_matches_keeps_order() {
        let t = table(vec![
            record("Q1", "Q1", 100.0, 100, 100),
            record("Q1", "S2", 90.0, 100, 100),
            record("Q2", "Q2", 100.0, 100, 100),
            record("Q2", "S1", 91.0, 100, 100),
        ]);
        let filtered = remove_self_matches(&t);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.query_id != r.subject_id));
        assert_eq!(filtered.records[0].subject_id, "S2");
        assert_eq!(filtered.records[1].subject_id, "S1");
        // the source table is untouched
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn test_compute_derived_threshold_is_strict() {
        let rows = vec![
            record("Q1", "S1", 99.0, 1, 2),
            record("Q1", "S2", 99.0, 3, 4),
            record("Q1", "S3", 99.0, 100, 100),
        ];
        let (d, _) = compute_derived(&table(rows.clone()), 50.0);
        assert_eq!(d.records[0].length_pct, 50.0);
        assert!(!d.records[0].is_full_length);
        assert_eq!(d.records[1].length_pct, 75.0);
        assert!(d.records[1].is_full_length);

        let d = derived(rows);
        assert!(!d.records[1].is_full_length);
        assert_eq!(d.records[2].length_pct, 100.0);
        assert!(d.records[2].is_full_length);
    }

    #[test]
    fn test_compute_derived_custom_threshold() {
        let (d, _) = compute_derived(&table(vec![record("Q1", "S3", 99.0, 90, 100)]), 80.0);
        assert!(d.records[0].is_full_length);
    }

    #[test]
    fn test_zero_query_length_is_skipped() {
        let mut zero = record("Q9", "S1", 99.0, 100, 0);
        zero.line = 5;
        let (d, diagnostics) = compute_derived(
            &table(vec![zero, record("Q1", "S1", 99.0, 100, 100)]),
            DEFAULT_FULL_LENGTH_PCT,
        );
        assert_eq!(d.len(), 1);
        assert_eq!(d.records[0].record.query_id, "Q1");
        assert!(d.iter().all(|r| r.length_pct.is_finite()));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].position.line, 5);
        assert_eq!(diagnostics[0].position.id.as_deref(), Some("Q9"));
    }

    #[test]
    fn test_partition_is_exhaustive_and_disjoint() {
        let d = derived(vec![
            record("Q1", "S1", 99.0, 100, 100),
            record("Q1", "S2", 95.0, 90, 100),
            record("Q2", "S1", 97.0, 99, 100),
            record("Q2", "S3", 97.0, 10, 100),
        ]);
        let (fulls, shorts) = partition(&d);
        assert_eq!(fulls.len() + shorts.len(), d.len());
        assert!(fulls.iter().all(|r| r.is_full_length));
        assert!(shorts.iter().all(|r| !r.is_full_length));
        assert_eq!(fulls.records[0].record.subject_id, "S1");
        assert_eq!(fulls.records[1].record.query_id, "Q2");
        for r in d.iter() {
            let in_fulls = fulls.records.contains(r);
            let in_shorts = shorts.records.contains(r);
            assert!(in_fulls ^ in_shorts);
        }
    }

    #[test]
    fn test_best_matches_picks_max() {
        let d = derived(vec![
            record("Q1", "S1", 95.0, 100, 100),
            record("Q2", "S1", 80.0, 100, 100),
            record("Q1", "S2", 99.0, 100, 100),
            record("Q1", "S3", 97.0, 100, 100),
        ]);
        let best = best_matches(&d, Column::QuerySeqId, Column::PercentIdentity).unwrap();
        assert_eq!(best.len(), 2);
        assert_eq!(best.records[0].record.query_id, "Q1");
        assert_eq!(best.records[0].record.subject_id, "S2");
        assert_eq!(best.records[1].record.query_id, "Q2");

        for chosen in best.iter() {
            assert!(d
                .iter()
                .filter(|r| r.record.query_id == chosen.record.query_id)
                .all(|r| r.record.percent_identity <= chosen.record.percent_identity));
        }
    }

    #[test]
    fn test_best_matches_ties_go_to_first() {
        let d = derived(vec![
            record("Q1", "S1", 97.0, 100, 100),
            record("Q1", "S2", 99.0, 100, 100),
            record("Q1", "S3", 99.0, 100, 100),
        ]);
        let best = best_matches(&d, Column::QuerySeqId, Column::PercentIdentity).unwrap();
        assert_eq!(best.len(), 1);
        assert_eq!(best.records[0].record.subject_id, "S2");
    }

    #[test]
    fn test_best_matches_single_and_empty() {
        let d = derived(vec![record("Q1", "S1", 42.0, 100, 100)]);
        let best = best_matches(&d, Column::QuerySeqId, Column::PercentIdentity).unwrap();
        assert_eq!(best.records, d.records);

        let empty = DerivedTable::default();
        let best = best_matches(&empty, Column::QuerySeqId, Column::PercentIdentity).unwrap();
        assert!(best.is_empty());
    }

    #[test]
    fn test_best_matches_other_keys() {
        let d = derived(vec![
            record("Q1", "S1", 95.0, 100, 100),
            record("Q2", "S1", 99.0, 90, 100),
        ]);
        let best = best_matches(&d, Column::SubjectSeqId, Column::AlignLength).unwrap();
        assert_eq!(best.len(), 1);
        assert_eq!(best.records[0].record.query_id, "Q1");

        let err = best_matches(&d, Column::QuerySeqId, Column::SubjectSeqId).unwrap_err();
        assert_eq!(err.kind, crate::errors::TableErrorKind::Schema);
    }

    #[test]
    fn test_full_and_short_rows_of_one_query() {
        let d = derived(vec![
            record("Q1", "S1", 99.0, 100, 100),
            record("Q1", "S2", 95.0, 90, 100),
        ]);
        let (fulls, shorts) = partition(&d);
        assert_eq!(fulls.len(), 1);
        assert_eq!(shorts.len(), 1);
        assert_eq!(shorts.records[0].length_pct, 90.0);

        let fulls_best = best_matches(&fulls, Column::QuerySeqId, Column::PercentIdentity).unwrap();
        assert_eq!(fulls_best.records[0].record.subject_id, "S1");
        let all_best = best_matches(&d, Column::QuerySeqId, Column::PercentIdentity).unwrap();
        assert_eq!(all_best.len(), 1);
        assert_eq!(all_best.records[0].record.subject_id, "S1");
    }
}
