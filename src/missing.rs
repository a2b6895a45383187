//! Missing-value profile for one optional field.
//!
//! Records are split into those that have the field and those that do not.
//! The absent side is profiled by borough and by total SAT score, and its mean
//! is compared with the mean of the whole dataset. A gap wider than the
//! configured threshold marks the missingness as systematic.
use crate::types::{DescriptiveStats, Missingness, SchoolRecord};
use crate::util::{describe, mean};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct GroupShare {
    pub group: String,
    pub count: usize,
    /// Share of the absent partition, 0–100.
    pub percentage: f64,
}

#[derive(Debug, Clone)]
pub struct MissingnessReport<'a> {
    pub present: Vec<&'a SchoolRecord>,
    pub absent: Vec<&'a SchoolRecord>,
    pub by_group: Vec<GroupShare>,
    /// `total_score` statistics over absent records with a defined total.
    pub absent_total_stats: Option<DescriptiveStats>,
    pub overall_mean: Option<f64>,
    /// Absent-partition mean minus overall mean.
    pub difference: Option<f64>,
    pub bias_threshold: f64,
    pub classification: Option<Missingness>,
}

impl MissingnessReport<'_> {
    pub fn absent_mean(&self) -> Option<f64> {
        self.absent_total_stats.map(|s| s.mean)
    }
}

pub fn analyze_missing<'a, F>(records: &'a [SchoolRecord], field_fn: F, bias_threshold: f64) -> MissingnessReport<'a>
where
    F: Fn(&SchoolRecord) -> Option<f64>,
{
    let (present, absent): (Vec<&SchoolRecord>, Vec<&SchoolRecord>) =
        records.iter().partition(|r| field_fn(*r).is_some());

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in &absent {
        *counts.entry(r.borough.as_str()).or_default() += 1;
    }
    let mut by_group: Vec<GroupShare> = counts
        .into_iter()
        .map(|(group, count)| GroupShare {
            group: group.to_string(),
            count,
            percentage: count as f64 / absent.len() as f64 * 100.0,
        })
        .collect();
    by_group.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));

    let absent_totals: Vec<f64> = absent.iter().filter_map(|r| r.total_score()).collect();
    let all_totals: Vec<f64> = records.iter().filter_map(SchoolRecord::total_score).collect();

    let absent_total_stats = describe(&absent_totals);
    let overall_mean = mean(&all_totals);
    let difference = match (absent_total_stats, overall_mean) {
        (Some(s), Some(all)) => Some(s.mean - all),
        _ => None,
    };
    let classification = difference.map(|d| classify(d, bias_threshold));

    MissingnessReport {
        present,
        absent,
        by_group,
        absent_total_stats,
        overall_mean,
        difference,
        bias_threshold,
        classification,
    }
}

/// Strictly wider than the threshold is systematic.
pub fn classify(difference: f64, bias_threshold: f64) -> Missingness {
    if difference.abs() > bias_threshold {
        Missingness::Systematic
    } else {
        Missingness::Random
    }
}
