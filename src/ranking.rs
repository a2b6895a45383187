//! Top-K selection and per-group extremum.
//!
//! Both operations are deterministic: sorting is stable, so records with
//! equal keys keep their input order, and a record whose key is absent or
//! not finite is never ranked.
use crate::types::SchoolRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Descending,
    Ascending,
}

/// A record with its 1-based display rank and the key it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a> {
    pub rank: usize,
    pub value: f64,
    pub record: &'a SchoolRecord,
}

/// The `k` records with the most extreme `key_fn`, best first.
///
/// Records where `key_fn` returns `None`, NaN or an infinity are skipped. `k == 0` gives an empty
/// result and `k` larger than the rankable set gives all of it.
pub fn top_k_by<'a, F>(records: &'a [SchoolRecord], k: usize, key_fn: F, order: SortOrder) -> Vec<Ranked<'a>>
where
    F: Fn(&SchoolRecord) -> Option<f64>,
{
    if k == 0 {
        return Vec::new();
    }
    let mut keyed: Vec<(f64, &SchoolRecord)> =
        records.iter().filter_map(|r| finite(key_fn(r)).map(|v| (v, r))).collect();
    keyed.sort_by(|a, b| {
        let ord = a.0.total_cmp(&b.0);
        match order {
            SortOrder::Descending => ord.reverse(),
            SortOrder::Ascending => ord,
        }
    });
    keyed
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(idx, (value, record))| Ranked { rank: idx + 1, value, record })
        .collect()
}

/// For every group, the record with the highest `value_fn`.
///
/// A tie inside a group goes to the record that appears first in `records`.
/// Non-finite values count as absent; groups where no record has a value are left out. The result is ordered by
/// value, highest first; equal values keep the order their groups first
/// appeared in.
pub fn best_per_group<'a, G, V>(records: &'a [SchoolRecord], group_fn: G, value_fn: V) -> Vec<Ranked<'a>>
where
    G: Fn(&SchoolRecord) -> &str,
    V: Fn(&SchoolRecord) -> Option<f64>,
{
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut best: Vec<(f64, &SchoolRecord)> = Vec::new();
    for r in records {
        let Some(v) = finite(value_fn(r)) else { continue };
        match slot.get(group_fn(r)) {
            Some(&i) => {
                // strictly greater, so the earlier record wins a tie
                if v > best[i].0 {
                    best[i] = (v, r);
                }
            }
            None => {
                slot.insert(group_fn(r), best.len());
                best.push((v, r));
            }
        }
    }
    best.sort_by(|a, b| b.0.total_cmp(&a.0));
    best.into_iter()
        .enumerate()
        .map(|(idx, (value, record))| Ranked { rank: idx + 1, value, record })
        .collect()
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}
