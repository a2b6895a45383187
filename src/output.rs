use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub const DIVIDER_WIDTH: usize = 100;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn divider() -> String {
    "=".repeat(DIVIDER_WIDTH)
}

/// Section header: divider, title, optional note in parentheses, divider.
pub fn section_header(title: &str, note: Option<&str>) -> String {
    let mut out = format!("\n{}\n{}\n", divider(), title);
    if let Some(n) = note {
        out.push_str(&format!("({})\n", n));
    }
    out.push_str(&divider());
    out
}

pub fn render_table<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(rows).with(Style::markdown()).to_string()
}

pub fn print_section<T: Tabled>(title: &str, note: Option<&str>, rows: &[T]) {
    println!("{}", section_header(title, note));
    println!("{}\n", render_table(rows));
}

pub fn print_insight(text: &str) {
    println!("Key insight: {}\n", text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatRow;
    use tempfile::TempDir;

    fn rows() -> Vec<StatRow> {
        vec![
            StatRow { statistic: "count".to_string(), value: "3".to_string() },
            StatRow { statistic: "mean".to_string(), value: "N/A".to_string() },
        ]
    }

    #[test]
    fn header_has_dividers_and_note() {
        let h = section_header("Borough Performance", Some("sorted by AvgTotalSAT"));
        let lines: Vec<&str> = h.trim_start().lines().collect();
        assert_eq!(lines[0].len(), DIVIDER_WIDTH);
        assert_eq!(lines[1], "Borough Performance");
        assert_eq!(lines[2], "(sorted by AvgTotalSAT)");
        assert_eq!(lines[3], divider());
    }

    #[test]
    fn tables_render_as_markdown() {
        let t = render_table(&rows());
        assert!(t.contains("| Statistic | Value |"));
        assert!(t.contains("N/A"));
        assert_eq!(render_table::<StatRow>(&[]), "(no rows)");
    }

    #[test]
    fn csv_and_json_exports() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("stats.csv");
        write_csv(&csv_path, &rows()).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(text, "Statistic,Value\ncount,3\nmean,N/A\n");

        let json_path = dir.path().join("stats.json");
        write_json(&json_path, &rows()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(v[1]["Value"], "N/A");
    }
}
