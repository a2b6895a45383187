use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One CSV row exactly as it appears in `schools.csv`. Everything is optional
/// text here; the loader decides what is absent and what is malformed.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    pub school_name: Option<String>,
    pub borough: Option<String>,
    #[serde(default)]
    pub building_code: Option<String>,
    pub average_math: Option<String>,
    pub average_reading: Option<String>,
    pub average_writing: Option<String>,
    pub percent_tested: Option<String>,
}

/// Header names the loader refuses to run without.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "school_name",
    "borough",
    "average_math",
    "average_reading",
    "average_writing",
    "percent_tested",
];

#[derive(Debug, Clone, PartialEq)]
pub struct SchoolRecord {
    pub name: String,
    pub borough: String,
    pub building_code: Option<String>,
    pub math: Option<f64>,
    pub reading: Option<f64>,
    pub writing: Option<f64>,
    pub percent_tested: Option<f64>,
}

impl SchoolRecord {
    /// Combined SAT score. Recomputed from the subject scores on every call, so
    /// it is absent whenever any one of them is.
    pub fn total_score(&self) -> Option<f64> {
        sum_scores(self.math, self.reading, self.writing)
    }
}

/// Sum of the three subject scores, or `None` if any is missing.
pub fn sum_scores(math: Option<f64>, reading: Option<f64>, writing: Option<f64>) -> Option<f64> {
    Some(math? + reading? + writing?)
}

/// Summary statistics in the shape pandas' `describe()` prints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Missingness {
    Systematic,
    Random,
}

impl std::fmt::Display for Missingness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Missingness::Systematic => write!(f, "systematic"),
            Missingness::Random => write!(f, "random"),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TopSchoolRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "School")]
    #[tabled(rename = "School")]
    pub school_name: String,
    #[serde(rename = "Borough")]
    #[tabled(rename = "Borough")]
    pub borough: String,
    #[serde(rename = "Math")]
    #[tabled(rename = "Math")]
    pub math: String,
    #[serde(rename = "Reading")]
    #[tabled(rename = "Reading")]
    pub reading: String,
    #[serde(rename = "Writing")]
    #[tabled(rename = "Writing")]
    pub writing: String,
    #[serde(rename = "TotalSAT")]
    #[tabled(rename = "TotalSAT")]
    pub total_sat: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BoroughRow {
    #[serde(rename = "Borough")]
    #[tabled(rename = "Borough")]
    pub borough: String,
    #[serde(rename = "AvgMath")]
    #[tabled(rename = "AvgMath")]
    pub avg_math: String,
    #[serde(rename = "AvgReading")]
    #[tabled(rename = "AvgReading")]
    pub avg_reading: String,
    #[serde(rename = "AvgWriting")]
    #[tabled(rename = "AvgWriting")]
    pub avg_writing: String,
    #[serde(rename = "AvgTotalSAT")]
    #[tabled(rename = "AvgTotalSAT")]
    pub avg_total_sat: String,
    #[serde(rename = "SchoolCount")]
    #[tabled(rename = "SchoolCount")]
    pub school_count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MissingSchoolRow {
    #[serde(rename = "School")]
    #[tabled(rename = "School")]
    pub school_name: String,
    #[serde(rename = "Borough")]
    #[tabled(rename = "Borough")]
    pub borough: String,
    #[serde(rename = "TotalSAT")]
    #[tabled(rename = "TotalSAT")]
    pub total_sat: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MissingByBoroughRow {
    #[serde(rename = "Borough")]
    #[tabled(rename = "Borough")]
    pub borough: String,
    #[serde(rename = "MissingCount")]
    #[tabled(rename = "MissingCount")]
    pub count: usize,
    #[serde(rename = "Percentage")]
    #[tabled(rename = "Percentage")]
    pub percentage: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct StatRow {
    #[serde(rename = "Statistic")]
    #[tabled(rename = "Statistic")]
    pub statistic: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BestSchoolRow {
    #[serde(rename = "Borough")]
    #[tabled(rename = "Borough")]
    pub borough: String,
    #[serde(rename = "School")]
    #[tabled(rename = "School")]
    pub school_name: String,
    #[serde(rename = "TotalSAT")]
    #[tabled(rename = "TotalSAT")]
    pub total_sat: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ColumnInfoRow {
    #[serde(rename = "Column")]
    #[tabled(rename = "Column")]
    pub column: String,
    #[serde(rename = "Kind")]
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[serde(rename = "NonNull")]
    #[tabled(rename = "NonNull")]
    pub non_null: usize,
    #[serde(rename = "Missing")]
    #[tabled(rename = "Missing")]
    pub missing: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DescribeRow {
    #[tabled(rename = "Column")]
    pub column: String,
    #[tabled(rename = "count")]
    pub count: String,
    #[tabled(rename = "mean")]
    pub mean: String,
    #[tabled(rename = "std")]
    pub std: String,
    #[tabled(rename = "min")]
    pub min: String,
    #[tabled(rename = "25%")]
    pub q1: String,
    #[tabled(rename = "50%")]
    pub median: String,
    #[tabled(rename = "75%")]
    pub q3: String,
    #[tabled(rename = "max")]
    pub max: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub total_schools: usize,
    pub total_boroughs: usize,
    pub overall_mean_total_sat: Option<f64>,
    pub top_school: Option<String>,
    pub top_school_total_sat: Option<f64>,
    pub missing_field: String,
    pub missing_count: usize,
    pub missing_mean_total_sat: Option<f64>,
    pub missing_mean_difference: Option<f64>,
    pub bias_threshold: f64,
    pub missingness: Option<Missingness>,
}
