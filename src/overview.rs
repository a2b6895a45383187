use crate::types::{DescriptiveStats, SchoolRecord};
use crate::util::{describe, pearson};

pub const HEAD_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Number => "number",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub non_null: usize,
    pub missing: usize,
}

#[derive(Debug, Clone)]
pub struct DatasetOverview<'a> {
    pub rows: usize,
    pub head: &'a [SchoolRecord],
    pub columns: Vec<ColumnInfo>,
    /// `None` stats mean the column has no values at all.
    pub describe: Vec<(&'static str, Option<DescriptiveStats>)>,
}

type NumericColumn = (&'static str, fn(&SchoolRecord) -> Option<f64>);

pub const NUMERIC_COLUMNS: [NumericColumn; 5] = [
    ("average_math", |r: &SchoolRecord| r.math),
    ("average_reading", |r: &SchoolRecord| r.reading),
    ("average_writing", |r: &SchoolRecord| r.writing),
    ("percent_tested", |r: &SchoolRecord| r.percent_tested),
    ("total_score", SchoolRecord::total_score),
];

pub fn summarize(records: &[SchoolRecord]) -> DatasetOverview<'_> {
    let rows = records.len();
    let building_codes = records.iter().filter(|r| r.building_code.is_some()).count();

    let mut columns = vec![
        ColumnInfo { name: "school_name", kind: ColumnKind::Text, non_null: rows, missing: 0 },
        ColumnInfo { name: "borough", kind: ColumnKind::Text, non_null: rows, missing: 0 },
        ColumnInfo {
            name: "building_code",
            kind: ColumnKind::Text,
            non_null: building_codes,
            missing: rows - building_codes,
        },
    ];

    let mut stats = Vec::with_capacity(NUMERIC_COLUMNS.len());
    for (name, get) in NUMERIC_COLUMNS {
        let values: Vec<f64> = records.iter().filter_map(get).collect();
        columns.push(ColumnInfo {
            name,
            kind: ColumnKind::Number,
            non_null: values.len(),
            missing: rows - values.len(),
        });
        stats.push((name, describe(&values)));
    }

    DatasetOverview {
        rows,
        head: &records[..rows.min(HEAD_ROWS)],
        columns,
        describe: stats,
    }
}

pub const SUBJECTS: [&str; 3] = ["Math", "Reading", "Writing"];

/// Pearson correlations between the three subject scores, over the records
/// that have all three. `None` entries are undefined (constant column, or
/// fewer than two complete rows).
pub fn correlation_matrix(records: &[SchoolRecord]) -> [[Option<f64>; 3]; 3] {
    let complete: Vec<[f64; 3]> = records
        .iter()
        .filter_map(|r| Some([r.math?, r.reading?, r.writing?]))
        .collect();
    let column = |i: usize| complete.iter().map(|row| row[i]).collect::<Vec<f64>>();
    let cols = [column(0), column(1), column(2)];

    let mut out = [[None; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = pearson(&cols[i], &cols[j]);
        }
    }
    out
}
