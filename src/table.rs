// Addressable OID table over one snapshot.
//
// Each row occupies six typed columns under `<root>.<index>`:
//   .1 name (string)          .4 memory used (counter64)
//   .2 state code (integer)   .5 memory limit (counter64)
//   .3 CPU hundredths (int)   .6 restart count (counter32)

use crate::models::MetricRow;
use crate::oid::Oid;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

/// Fixed enterprise subtree the agent is registered under.
pub const ROOT_OID: &[u32] = &[1, 3, 6, 1, 4, 1, 424242, 2, 1];

/// A typed scalar as the pass_persist protocol reports it.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Str(String),
    Int(i64),
    Counter32(u32),
    Counter64(u64),
}

impl TypedValue {
    /// The protocol's type line.
    pub fn type_tag(&self) -> &'static str {
        match self {
            TypedValue::Str(_) => "string",
            TypedValue::Int(_) => "integer",
            TypedValue::Counter32(_) => "counter32",
            TypedValue::Counter64(_) => "counter64",
        }
    }

    /// The protocol's value line.
    pub fn render(&self) -> String {
        match self {
            TypedValue::Str(s) => s.clone(),
            TypedValue::Int(v) => v.to_string(),
            TypedValue::Counter32(v) => v.to_string(),
            TypedValue::Counter64(v) => v.to_string(),
        }
    }
}

/// A pure, stateless view over one snapshot. Rebuilt per protocol command.
pub struct MetricTable {
    entries: BTreeMap<Oid, TypedValue>,
}

impl MetricTable {
    pub fn root() -> Oid {
        Oid::new(ROOT_OID.to_vec())
    }

    pub fn from_snapshot(rows: &[MetricRow]) -> Self {
        let root = Self::root();
        let mut entries = BTreeMap::new();
        for row in rows {
            let base = root.child(row.index);
            entries.insert(base.child(1), TypedValue::Str(row.name.clone()));
            entries.insert(base.child(2), TypedValue::Int(row.state.code()));
            entries.insert(base.child(3), TypedValue::Int(cpu_hundredths(row.cpu_percent)));
            entries.insert(base.child(4), TypedValue::Counter64(row.memory_used_bytes));
            entries.insert(base.child(5), TypedValue::Counter64(row.memory_limit_bytes));
            entries.insert(base.child(6), TypedValue::Counter32(row.restart_count));
        }
        Self { entries }
    }

    /// Exact-match lookup.
    pub fn get(&self, oid: &Oid) -> Option<&TypedValue> {
        self.entries.get(oid)
    }

    /// Smallest entry strictly greater than `oid`. Asking for the table root
    /// (or any prefix of the first entry) yields the first entry.
    pub fn next(&self, oid: &Oid) -> Option<(&Oid, &TypedValue)> {
        self.entries.range((Excluded(oid), Unbounded)).next()
    }

    /// Up to `count` successive entries after `oid`, in table order.
    pub fn next_batch(&self, oid: &Oid, count: usize) -> Vec<(&Oid, &TypedValue)> {
        self.entries
            .range((Excluded(oid), Unbounded))
            .take(count)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// CPU percentage as integer hundredths (0..=10000) for the .3 column.
pub fn cpu_hundredths(percent: f64) -> i64 {
    (percent * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_hundredths_rounds() {
        assert_eq!(cpu_hundredths(0.0), 0);
        assert_eq!(cpu_hundredths(12.345), 1235);
        assert_eq!(cpu_hundredths(100.0), 10000);
    }

    #[test]
    fn empty_table_has_no_next() {
        let table = MetricTable::from_snapshot(&[]);
        assert!(table.is_empty());
        assert!(table.next(&MetricTable::root()).is_none());
    }
}
