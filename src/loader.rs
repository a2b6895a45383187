use crate::error::{ReportError, Result};
use crate::types::{RawRow, SchoolRecord, REQUIRED_COLUMNS};
use crate::util::{clean_text, parse_f64_cell};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows without a school name or borough.
    pub dropped_rows: usize,
    /// Non-empty numeric cells that were unparseable, non-finite or a negative
    /// score, and were read as absent.
    pub parse_warnings: usize,
}

pub fn load_schools(path: impl AsRef<Path>) -> Result<(Vec<SchoolRecord>, LoadReport)> {
    let path = path.as_ref();
    let rdr = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| ReportError::Load { path: path.display().to_string(), source })?;
    read_records(rdr)
}

/// Same as [`load_schools`] but over any reader; handy for in-memory CSV.
pub fn load_from_reader<R: Read>(reader: R) -> Result<(Vec<SchoolRecord>, LoadReport)> {
    let rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    read_records(rdr)
}

fn read_records<R: Read>(mut rdr: csv::Reader<R>) -> Result<(Vec<SchoolRecord>, LoadReport)> {
    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h.trim() == **c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::MissingColumns { columns: missing });
    }

    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let line = report.total_rows + 1;
        let row = result?;

        let (Some(name), Some(borough)) = (clean_text(row.school_name), clean_text(row.borough))
        else {
            warn!(line, "dropping row without school name or borough");
            report.dropped_rows += 1;
            continue;
        };

        // Subject scores must be non-negative; every numeric cell must be finite.
        let mut number = |column: &str, cell: Option<String>, non_negative: bool| {
            let reason = match parse_f64_cell(cell.as_deref()) {
                Ok(Some(v)) if !v.is_finite() => "non-finite number read as absent",
                Ok(Some(v)) if non_negative && v < 0.0 => "negative score read as absent",
                Ok(v) => return v,
                Err(_) => "unparseable number read as absent",
            };
            warn!(line, column, value = ?cell, "{reason}");
            report.parse_warnings += 1;
            None
        };
        let math = number("average_math", row.average_math, true);
        let reading = number("average_reading", row.average_reading, true);
        let writing = number("average_writing", row.average_writing, true);
        let percent_tested = number("percent_tested", row.percent_tested, false);

        records.push(SchoolRecord {
            name,
            borough,
            building_code: clean_text(row.building_code),
            math,
            reading,
            writing,
            percent_tested,
        });
    }

    report.loaded_rows = records.len();
    debug!(?report, "dataset loaded");
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
school_name,borough,building_code,average_math,average_reading,average_writing,percent_tested
New Explorations,Manhattan,M022,657,601,601,
Essex Street Academy,Manhattan,M445,395,411,387,78.9
,Bronx,X001,400,400,400,50
Lab School,Manhattan,M260,abc,560,555,90
Bronx HS of Science,Bronx,X445,714,660,667,98.2
";

    #[test]
    fn loads_rows_and_keeps_absent_values() {
        let (records, report) = load_from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(report.total_rows, 5);
        assert_eq!(report.loaded_rows, 4);
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(report.parse_warnings, 1);

        assert_eq!(records[0].name, "New Explorations");
        assert_eq!(records[0].percent_tested, None);
        assert_eq!(records[0].total_score(), Some(1859.0));
        assert_eq!(records[1].percent_tested, Some(78.9));
        assert_eq!(records[2].math, None);
        assert_eq!(records[2].total_score(), None);
        assert_eq!(records[3].building_code.as_deref(), Some("X445"));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "school_name,borough,average_math,average_reading\nA,X,1,2\n";
        match load_from_reader(csv.as_bytes()) {
            Err(ReportError::MissingColumns { columns }) => {
                assert_eq!(columns, vec!["average_writing", "percent_tested"]);
            }
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn building_code_is_optional() {
        let csv = "school_name,borough,average_math,average_reading,average_writing,percent_tested\nA,X,500,500,500,90\n";
        let (records, _) = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].building_code, None);
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = load_schools("/definitely/not/here/schools.csv").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/schools.csv"));
    }

    #[test]
    fn out_of_range_numbers_are_read_as_absent() {
        let csv = "\
school_name,borough,average_math,average_reading,average_writing,percent_tested
Neg,X,-1,400,400,90
Inf,X,inf,400,400,90
Big,X,1e400,400,400,90
Mixed,X,-inf,inf,400,90
BadPct,Y,500,500,500,inf
NegPct,Y,500,500,500,-5
Ok,Y,0,0,0,0
";
        let (records, report) = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(report.loaded_rows, 7);
        assert_eq!(report.parse_warnings, 6);

        for r in &records[..4] {
            assert_eq!(r.math, None, "{}", r.name);
            assert_eq!(r.total_score(), None, "{}", r.name);
        }
        assert_eq!(records[0].reading, Some(400.0));
        assert_eq!(records[3].reading, None);
        assert_eq!(records[4].percent_tested, None);
        assert_eq!(records[4].total_score(), Some(1500.0));
        // only subject scores are required to be non-negative
        assert_eq!(records[5].percent_tested, Some(-5.0));
        assert_eq!(records[6].total_score(), Some(0.0));
    }
}
