use crate::types::SchoolRecord;
use crate::util::mean;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Per-group averages. An average is `None` when no record in the group has
/// that field; `school_count` always counts every record in the group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub avg_math: Option<f64>,
    pub avg_reading: Option<f64>,
    pub avg_writing: Option<f64>,
    pub avg_total: Option<f64>,
    pub school_count: usize,
}

pub fn group_summaries<G>(records: &[SchoolRecord], group_fn: G) -> BTreeMap<String, GroupSummary>
where
    G: Fn(&SchoolRecord) -> &str,
{
    #[derive(Default)]
    struct Acc {
        math: Vec<f64>,
        reading: Vec<f64>,
        writing: Vec<f64>,
        total: Vec<f64>,
        count: usize,
    }

    let mut map: BTreeMap<&str, Acc> = BTreeMap::new();
    for r in records {
        let e = map.entry(group_fn(r)).or_default();
        e.count += 1;
        e.math.extend(r.math);
        e.reading.extend(r.reading);
        e.writing.extend(r.writing);
        e.total.extend(r.total_score());
    }

    map.into_iter()
        .map(|(key, acc)| {
            let summary = GroupSummary {
                avg_math: mean(&acc.math),
                avg_reading: mean(&acc.reading),
                avg_writing: mean(&acc.writing),
                avg_total: mean(&acc.total),
                school_count: acc.count,
            };
            (key.to_string(), summary)
        })
        .collect()
}

/// Groups ordered by average total, highest first. Groups with no defined
/// (or non-finite) average go last; ties fall back to the group key.
pub fn sort_by_avg_total(summaries: BTreeMap<String, GroupSummary>) -> Vec<(String, GroupSummary)> {
    let mut rows: Vec<(String, GroupSummary)> = summaries.into_iter().collect();
    rows.sort_by(|a, b| {
        let finite = |g: &GroupSummary| g.avg_total.filter(|v| v.is_finite());
        let by_total = match (finite(&a.1), finite(&b.1)) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_total.then_with(|| a.0.cmp(&b.0))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(name: &str, borough: &str, m: Option<f64>, r: Option<f64>, w: Option<f64>) -> SchoolRecord {
        SchoolRecord {
            name: name.to_string(),
            borough: borough.to_string(),
            building_code: None,
            math: m,
            reading: r,
            writing: w,
            percent_tested: None,
        }
    }

    fn by_borough(records: &[SchoolRecord]) -> BTreeMap<String, GroupSummary> {
        group_summaries(records, |r| r.borough.as_str())
    }

    #[test]
    fn averages_per_borough() {
        let data = vec![
            school("A", "X", Some(500.0), Some(500.0), Some(500.0)),
            school("B", "X", Some(600.0), Some(600.0), Some(600.0)),
            school("C", "Y", Some(700.0), Some(700.0), Some(700.0)),
        ];
        let groups = by_borough(&data);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["X"].avg_total, Some(1500.0));
        assert_eq!(groups["X"].avg_math, Some(550.0));
        assert_eq!(groups["X"].school_count, 2);
        assert_eq!(groups["Y"].avg_total, Some(2100.0));
        assert_eq!(groups["Y"].school_count, 1);

        let sorted = sort_by_avg_total(groups);
        assert_eq!(sorted[0].0, "Y");
        assert_eq!(sorted[1].0, "X");
    }

    #[test]
    fn single_record_group_equals_the_record() {
        let data = vec![school("Solo", "Staten Island", Some(512.0), Some(498.0), Some(487.0))];
        let g = &by_borough(&data)["Staten Island"];
        assert_eq!(g.avg_math, Some(512.0));
        assert_eq!(g.avg_reading, Some(498.0));
        assert_eq!(g.avg_writing, Some(487.0));
        assert_eq!(g.avg_total, Some(1497.0));
        assert_eq!(g.school_count, 1);
    }

    #[test]
    fn absent_values_are_skipped_but_counted() {
        let data = vec![
            school("A", "X", Some(400.0), Some(420.0), Some(410.0)),
            school("B", "X", None, Some(500.0), Some(480.0)),
        ];
        let g = &by_borough(&data)["X"];
        assert_eq!(g.school_count, 2);
        assert_eq!(g.avg_math, Some(400.0));
        assert_eq!(g.avg_reading, Some(460.0));
        assert_eq!(g.avg_total, Some(1230.0));
    }

    #[test]
    fn group_without_values_is_undefined_and_sorts_last() {
        let data = vec![
            school("A", "Ghost", None, None, None),
            school("B", "Real", Some(400.0), Some(400.0), Some(400.0)),
        ];
        let groups = by_borough(&data);
        assert_eq!(groups["Ghost"].avg_total, None);
        assert_eq!(groups["Ghost"].avg_math, None);
        assert_eq!(groups["Ghost"].school_count, 1);
        let sorted = sort_by_avg_total(groups);
        assert_eq!(sorted.last().map(|(k, _)| k.as_str()), Some("Ghost"));
    }

    #[test]
    fn empty_input_is_empty_map() {
        assert!(by_borough(&[]).is_empty());
        assert!(sort_by_avg_total(BTreeMap::new()).is_empty());
    }

    #[test]
    fn non_finite_average_sorts_with_undefined() {
        let mut data = Vec::new();
        for i in 0..40 {
            let v = 300.0 + i as f64;
            data.push(school(&format!("s{i}"), &format!("g{i:02}"), Some(v), Some(v), Some(v)));
        }
        for i in 0..5 {
            let name = format!("bad{i}");
            data.push(school(&name, &format!("nan{i}"), Some(f64::INFINITY), Some(f64::NEG_INFINITY), Some(400.0)));
        }
        let sorted = sort_by_avg_total(group_summaries(&data, |r| r.borough.as_str()));
        assert_eq!(sorted.len(), 45);
        assert_eq!(sorted[0].0, "g39");
        assert!(sorted[40..].iter().all(|(k, g)| k.starts_with("nan") && g.avg_total.unwrap().is_nan()));
    }
}
