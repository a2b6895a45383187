//! Turns analysis results into display/export rows and insight sentences.
use crate::aggregate::GroupSummary;
use crate::missing::MissingnessReport;
use crate::overview::DatasetOverview;
use crate::ranking::Ranked;
use crate::types::{
    BestSchoolRow, BoroughRow, ColumnInfoRow, DescribeRow, MissingByBoroughRow,
    MissingSchoolRow, Missingness, StatRow, SummaryStats, TopSchoolRow,
};
use crate::util::{format_int, format_number, format_opt, format_signed};

pub fn head_rows(overview: &DatasetOverview<'_>) -> Vec<TopSchoolRow> {
    overview
        .head
        .iter()
        .enumerate()
        .map(|(idx, r)| TopSchoolRow {
            rank: idx + 1,
            school_name: r.name.clone(),
            borough: r.borough.clone(),
            math: format_opt(r.math, 0),
            reading: format_opt(r.reading, 0),
            writing: format_opt(r.writing, 0),
            total_sat: format_opt(r.total_score(), 0),
        })
        .collect()
}

pub fn column_rows(overview: &DatasetOverview<'_>) -> Vec<ColumnInfoRow> {
    overview
        .columns
        .iter()
        .map(|c| ColumnInfoRow {
            column: c.name.to_string(),
            kind: c.kind.as_str().to_string(),
            non_null: c.non_null,
            missing: c.missing,
        })
        .collect()
}

pub fn describe_rows(overview: &DatasetOverview<'_>) -> Vec<DescribeRow> {
    overview
        .describe
        .iter()
        .map(|(name, stats)| {
            let stats = *stats;
            let f = |v: Option<f64>| format_opt(v, 2);
            DescribeRow {
                column: name.to_string(),
                count: stats.map(|s| s.count).unwrap_or(0).to_string(),
                mean: f(stats.map(|s| s.mean)),
                std: f(stats.map(|s| s.std)),
                min: f(stats.map(|s| s.min)),
                q1: f(stats.map(|s| s.q1)),
                median: f(stats.map(|s| s.median)),
                q3: f(stats.map(|s| s.q3)),
                max: f(stats.map(|s| s.max)),
            }
        })
        .collect()
}

pub fn top_school_rows(ranked: &[Ranked<'_>]) -> Vec<TopSchoolRow> {
    ranked
        .iter()
        .map(|r| TopSchoolRow {
            rank: r.rank,
            school_name: r.record.name.clone(),
            borough: r.record.borough.clone(),
            math: format_opt(r.record.math, 0),
            reading: format_opt(r.record.reading, 0),
            writing: format_opt(r.record.writing, 0),
            total_sat: format_number(r.value, 0),
        })
        .collect()
}

pub fn top_school_insight(ranked: &[Ranked<'_>]) -> String {
    let Some(first) = ranked.first() else {
        return "no school has a complete set of SAT scores.".to_string();
    };
    let boroughs = ranked.iter().filter(|r| r.record.borough == first.record.borough).count();
    format!(
        "{} ({}) leads with {} total points; {} of the top {} are in {}.",
        first.record.name,
        first.record.borough,
        format_number(first.value, 0),
        boroughs,
        ranked.len(),
        first.record.borough
    )
}

pub fn borough_rows(sorted: &[(String, GroupSummary)]) -> Vec<BoroughRow> {
    sorted
        .iter()
        .map(|(borough, g)| BoroughRow {
            borough: borough.clone(),
            avg_math: format_opt(g.avg_math, 2),
            avg_reading: format_opt(g.avg_reading, 2),
            avg_writing: format_opt(g.avg_writing, 2),
            avg_total_sat: format_opt(g.avg_total, 2),
            school_count: g.school_count,
        })
        .collect()
}

pub fn borough_insight(sorted: &[(String, GroupSummary)]) -> String {
    let defined: Vec<(&str, f64)> =
        sorted.iter().filter_map(|(b, g)| g.avg_total.map(|t| (b.as_str(), t))).collect();
    match (defined.first(), defined.last()) {
        (Some(best), Some(worst)) if defined.len() > 1 => format!(
            "{} has the highest average total ({}), {} points above {} ({}).",
            best.0,
            format_number(best.1, 2),
            format_number(best.1 - worst.1, 2),
            worst.0,
            format_number(worst.1, 2)
        ),
        (Some(only), _) => format!("only {} has a defined average total ({}).", only.0, format_number(only.1, 2)),
        _ => "no borough has a defined average total (N/A).".to_string(),
    }
}

pub fn missing_school_rows(report: &MissingnessReport<'_>) -> Vec<MissingSchoolRow> {
    report
        .absent
        .iter()
        .map(|r| MissingSchoolRow {
            school_name: r.name.clone(),
            borough: r.borough.clone(),
            total_sat: format_opt(r.total_score(), 0),
        })
        .collect()
}

pub fn missing_by_borough_rows(report: &MissingnessReport<'_>) -> Vec<MissingByBoroughRow> {
    report
        .by_group
        .iter()
        .map(|g| MissingByBoroughRow {
            borough: g.group.clone(),
            count: g.count,
            percentage: format!("{}%", format_number(g.percentage, 1)),
        })
        .collect()
}

pub fn missing_stat_rows(report: &MissingnessReport<'_>) -> Vec<StatRow> {
    let s = report.absent_total_stats;
    let stat = |label: &str, v: Option<f64>| StatRow { statistic: label.to_string(), value: format_opt(v, 2) };
    vec![
        StatRow {
            statistic: "count".to_string(),
            value: s.map(|s| s.count.to_string()).unwrap_or_else(|| "0".to_string()),
        },
        stat("mean", s.map(|s| s.mean)),
        stat("std", s.map(|s| s.std)),
        stat("min", s.map(|s| s.min)),
        stat("25%", s.map(|s| s.q1)),
        stat("50%", s.map(|s| s.median)),
        stat("75%", s.map(|s| s.q3)),
        stat("max", s.map(|s| s.max)),
        stat("overall mean", report.overall_mean),
        StatRow { statistic: "difference".to_string(), value: format_signed(report.difference, 2) },
        stat("bias threshold", Some(report.bias_threshold)),
    ]
}

pub fn missing_insight(field: &str, report: &MissingnessReport<'_>) -> String {
    let n = report.absent.len();
    match (report.classification, report.difference) {
        (Some(class), Some(diff)) => {
            let verdict = match class {
                Missingness::Systematic => "exceeds",
                Missingness::Random => "is within",
            };
            format!(
                "{} school(s) lack {}; their mean total differs from the overall mean by {} points, which {} the {}-point threshold, so the missingness looks {}.",
                format_int(n),
                field,
                format_signed(Some(diff), 2),
                verdict,
                format_number(report.bias_threshold, 0),
                class
            )
        }
        _ if n == 0 => format!("every school reports {}; missingness statistics are N/A.", field),
        _ => format!(
            "{} school(s) lack {} but none has a complete total score; the bias comparison is N/A.",
            format_int(n),
            field
        ),
    }
}

pub fn best_school_rows(best: &[Ranked<'_>]) -> Vec<BestSchoolRow> {
    best.iter()
        .map(|r| BestSchoolRow {
            borough: r.record.borough.clone(),
            school_name: r.record.name.clone(),
            total_sat: format_number(r.value, 0),
        })
        .collect()
}

pub fn best_school_insight(best: &[Ranked<'_>]) -> String {
    match (best.first(), best.last()) {
        (Some(top), Some(low)) if best.len() > 1 => format!(
            "the strongest borough champion is {} ({}, {}); the weakest is {} ({}, {}).",
            top.record.name,
            top.record.borough,
            format_number(top.value, 0),
            low.record.name,
            low.record.borough,
            format_number(low.value, 0)
        ),
        (Some(top), _) => format!("{} ({}) is the only borough champion.", top.record.name, top.record.borough),
        _ => "no borough has a school with a complete total score.".to_string(),
    }
}

pub fn generate_summary(
    total_schools: usize,
    sorted_boroughs: &[(String, GroupSummary)],
    top: &[Ranked<'_>],
    missing_field: &str,
    missing: &MissingnessReport<'_>,
) -> SummaryStats {
    SummaryStats {
        generated_at: chrono::Utc::now(),
        total_schools,
        total_boroughs: sorted_boroughs.len(),
        overall_mean_total_sat: missing.overall_mean,
        top_school: top.first().map(|r| r.record.name.clone()),
        top_school_total_sat: top.first().map(|r| r.value),
        missing_field: missing_field.to_string(),
        missing_count: missing.absent.len(),
        missing_mean_total_sat: missing.absent_mean(),
        missing_mean_difference: missing.difference,
        bias_threshold: missing.bias_threshold,
        missingness: missing.classification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{group_summaries, sort_by_avg_total};
    use crate::missing::analyze_missing;
    use crate::ranking::{best_per_group, top_k_by, SortOrder};
    use crate::types::SchoolRecord;

    fn school(name: &str, borough: &str, score: f64, pct: Option<f64>) -> SchoolRecord {
        SchoolRecord {
            name: name.to_string(),
            borough: borough.to_string(),
            building_code: None,
            math: Some(score),
            reading: Some(score),
            writing: Some(score),
            percent_tested: pct,
        }
    }

    fn abc() -> Vec<SchoolRecord> {
        vec![
            school("A", "X", 500.0, Some(80.0)),
            school("B", "X", 600.0, Some(95.0)),
            school("C", "Y", 700.0, None),
        ]
    }

    #[test]
    fn top_rows_and_insight() {
        let data = abc();
        let top = top_k_by(&data, 2, SchoolRecord::total_score, SortOrder::Descending);
        let rows = top_school_rows(&top);
        assert_eq!(rows[0].school_name, "C");
        assert_eq!(rows[0].total_sat, "2,100");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(top_school_insight(&top), "C (Y) leads with 2,100 total points; 1 of the top 2 are in Y.");
        assert!(top_school_insight(&[]).contains("no school"));
    }

    #[test]
    fn borough_rows_render_undefined_as_na() {
        let mut data = abc();
        data.push(SchoolRecord { math: None, reading: None, writing: None, ..school("D", "Z", 0.0, None) });
        let sorted = sort_by_avg_total(group_summaries(&data, |r| r.borough.as_str()));
        let rows = borough_rows(&sorted);
        assert_eq!(rows[0].borough, "Y");
        assert_eq!(rows[0].avg_total_sat, "2,100.00");
        assert_eq!(rows[2].borough, "Z");
        assert_eq!(rows[2].avg_math, "N/A");
        assert_eq!(rows[2].school_count, 1);
        assert_eq!(
            borough_insight(&sorted),
            "Y has the highest average total (2,100.00), 600.00 points above X (1,500.00)."
        );
    }

    #[test]
    fn missing_rows_and_insight() {
        let data = abc();
        let report = analyze_missing(&data, |r| r.percent_tested, 50.0);
        let by_borough = missing_by_borough_rows(&report);
        assert_eq!(by_borough[0].percentage, "100.0%");
        let stats = missing_stat_rows(&report);
        assert_eq!(stats[1].value, "2,100.00");
        assert_eq!(stats[2].value, "0.00");
        let diff = stats.iter().find(|s| s.statistic == "difference").unwrap();
        assert_eq!(diff.value, "+400.00");
        let insight = missing_insight("percent_tested", &report);
        assert!(insight.contains("+400.00"));
        assert!(insight.ends_with("looks systematic."));
    }

    #[test]
    fn missing_insight_with_no_absent_records() {
        let data = vec![school("A", "X", 500.0, Some(90.0))];
        let report = analyze_missing(&data, |r| r.percent_tested, 50.0);
        assert!(missing_insight("percent_tested", &report).contains("N/A"));
        let stats = missing_stat_rows(&report);
        assert_eq!(stats[0].value, "0");
        assert_eq!(stats[1].value, "N/A");
    }

    #[test]
    fn best_rows_and_summary() {
        let data = abc();
        let best = best_per_group(&data, |r| r.borough.as_str(), SchoolRecord::total_score);
        let rows = best_school_rows(&best);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].school_name, "B");
        assert!(best_school_insight(&best).contains("weakest is B"));

        let top = top_k_by(&data, 10, SchoolRecord::total_score, SortOrder::Descending);
        let sorted = sort_by_avg_total(group_summaries(&data, |r| r.borough.as_str()));
        let report = analyze_missing(&data, |r| r.percent_tested, 50.0);
        let summary = generate_summary(data.len(), &sorted, &top, "percent_tested", &report);
        assert_eq!(summary.total_schools, 3);
        assert_eq!(summary.total_boroughs, 2);
        assert_eq!(summary.top_school.as_deref(), Some("C"));
        assert_eq!(summary.missing_mean_difference, Some(400.0));
        assert_eq!(summary.missingness, Some(Missingness::Systematic));
    }
}
