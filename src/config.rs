use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "schools.csv";
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_BIAS_THRESHOLD: f64 = 50.0;
pub const DEFAULT_OUT_DIR: &str = "reports";

/// Run parameters. `Default` reproduces the plain `sat-report` invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub top_k: usize,
    /// Absolute gap (in total SAT points) between the mean of records missing
    /// the analysed field and the overall mean above which the gap is
    /// classified as systematic.
    pub bias_threshold: f64,
    pub out_dir: PathBuf,
    pub charts: bool,
    pub export: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_k: DEFAULT_TOP_K,
            bias_threshold: DEFAULT_BIAS_THRESHOLD,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            charts: true,
            export: true,
        }
    }
}
