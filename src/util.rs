// Utility helpers for parsing, statistics and number formatting.
//
// Every statistic here takes only present values. Callers filter absent
// values out first; an empty input yields `None` rather than a zero.
use crate::types::DescriptiveStats;
use num_format::{Locale, ToFormattedString};
use std::num::ParseFloatError;

/// Parse a CSV cell into `f64`.
///
/// - Empty or whitespace-only cells are `Ok(None)` (an absent value).
/// - Thousands separators and a trailing `%` are stripped.
/// - Anything else that fails to parse is an error so the loader can count it.
pub fn parse_f64_cell(s: Option<&str>) -> Result<Option<f64>, ParseFloatError> {
    let Some(s) = s.map(str::trim) else {
        return Ok(None);
    };
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let cleaned = s.trim_end_matches('%').replace(',', "");
    cleaned.parse::<f64>().map(Some)
}

/// Trimmed, non-empty text or `None`.
pub fn clean_text(s: Option<String>) -> Option<String> {
    let s = s?;
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

pub fn mean(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    Some(v.iter().sum::<f64>() / v.len() as f64)
}

/// Sample standard deviation (N-1 denominator). A single value has spread 0.
pub fn sample_std(v: &[f64]) -> Option<f64> {
    let m = mean(v)?;
    if v.len() < 2 {
        return Some(0.0);
    }
    let ss: f64 = v.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (v.len() - 1) as f64).sqrt())
}

fn sorted(v: &[f64]) -> Vec<f64> {
    let mut s = v.to_vec();
    s.sort_by(f64::total_cmp);
    s
}

/// Linear-interpolation percentile on pre-sorted data, `p` in `[0, 1]`.
/// The position is `p * (n - 1)`, the same rule pandas uses by default.
fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let w = idx - lo as f64;
    Some(sorted[lo] * (1.0 - w) + sorted[hi] * w)
}

pub fn describe(v: &[f64]) -> Option<DescriptiveStats> {
    let s = sorted(v);
    let count = s.len();
    let mean = mean(&s)?;
    let std = sample_std(&s)?;
    Some(DescriptiveStats {
        count,
        mean,
        std,
        min: s[0],
        q1: percentile_sorted(&s, 0.25)?,
        median: percentile_sorted(&s, 0.5)?,
        q3: percentile_sorted(&s, 0.75)?,
        max: s[count - 1],
    })
}

/// Pearson correlation. `None` for mismatched lengths, fewer than two points,
/// or a zero-variance side.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;
    let num: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    let sx: f64 = x.iter().map(|a| (a - mx).powi(2)).sum();
    let sy: f64 = y.iter().map(|b| (b - my).powi(2)).sum();
    let denom = (sx * sy).sqrt();
    if denom < f64::EPSILON {
        return None;
    }
    Some(num / denom)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `num-format` thousands separators on the integer part
    // (e.g. `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// `format_number` for values that may be undefined; undefined renders `N/A`.
pub fn format_opt(n: Option<f64>, decimals: usize) -> String {
    match n {
        Some(v) => format_number(v, decimals),
        None => "N/A".to_string(),
    }
}

pub fn format_signed(n: Option<f64>, decimals: usize) -> String {
    match n {
        Some(v) if v > 0.0 => format!("+{}", format_number(v, decimals)),
        other => format_opt(other, decimals),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
