//! SVG charts. Each function takes an already computed table and writes one
//! file; nothing here looks at raw records.
use crate::error::{ReportError, Result};
use crate::overview::SUBJECTS;
use plotters::prelude::*;
use std::path::Path;

const PALETTE: [RGBColor; 3] = [RGBColor(0, 123, 255), RGBColor(255, 99, 71), RGBColor(46, 204, 113)];
const WIDTH: u32 = 1000;

/// Horizontal bars, one per school, best at the top.
pub fn top_schools_chart(path: &Path, rows: &[(String, f64)]) -> Result<()> {
    if rows.is_empty() {
        return Err(ReportError::Chart("no ranked schools to plot".to_string()));
    }
    let n = rows.len() as i32;
    let max = rows.iter().map(|(_, v)| *v).fold(0.0, f64::max).max(1.0);
    let height = 140 + 36 * rows.len() as u32;

    let root = SVGBackend::new(path, (WIDTH, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Top {} Schools by Total SAT", rows.len()), ("sans-serif", 26).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(340)
        .build_cartesian_2d(0.0..max * 1.1, (0..n).into_segmented())?;

    let label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(y) if (0..n).contains(y) => rows[(n - 1 - y) as usize].0.clone(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(rows.len())
        .y_label_formatter(&label)
        .x_desc("Total SAT score")
        .draw()?;

    chart.draw_series(rows.iter().enumerate().map(|(idx, (_, v))| {
        let y = n - 1 - idx as i32;
        let mut bar = Rectangle::new(
            [(0.0, SegmentValue::Exact(y)), (*v, SegmentValue::Exact(y + 1))],
            PALETTE[0].filled(),
        );
        bar.set_margin(4, 4, 0, 0);
        bar
    }))?;

    root.present()?;
    Ok(())
}

/// Grouped bars: for each group, one bar per subject average. Undefined
/// averages leave a gap.
pub fn group_subject_chart(path: &Path, rows: &[(String, [Option<f64>; 3])]) -> Result<()> {
    if rows.is_empty() {
        return Err(ReportError::Chart("no groups to plot".to_string()));
    }
    // four slots per group: three bars and a gap
    let slots = 4 * rows.len() as i32;
    let max = rows
        .iter()
        .flat_map(|(_, v)| v.iter().flatten().copied())
        .fold(0.0, f64::max)
        .max(1.0);

    let root = SVGBackend::new(path, (WIDTH, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Average SAT Subject Scores by Borough", ("sans-serif", 26).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..slots, 0.0..max * 1.15)?;

    let label = |x: &i32| {
        if x % 4 == 1 {
            rows.get((x / 4) as usize).map(|(g, _)| g.clone()).unwrap_or_default()
        } else {
            String::new()
        }
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots as usize + 1)
        .x_label_formatter(&label)
        .y_desc("Average score")
        .draw()?;

    for (s, subject) in SUBJECTS.iter().enumerate() {
        let color = PALETTE[s];
        chart
            .draw_series(rows.iter().enumerate().filter_map(|(g, (_, avgs))| {
                let v = avgs[s]?;
                let x = 4 * g as i32 + s as i32;
                let mut bar = Rectangle::new([(x, 0.0), (x + 1, v)], color.filled());
                bar.set_margin(0, 0, 2, 2);
                Some(bar)
            }))?
            .label(*subject)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Colour for a correlation in [-1, 1]: blue for negative, red for positive.
fn heat_color(c: Option<f64>) -> RGBColor {
    let Some(c) = c else {
        return RGBColor(220, 220, 220);
    };
    let t = c.clamp(-1.0, 1.0).abs();
    let fade = (255.0 * (1.0 - t)).round() as u8;
    if c >= 0.0 {
        RGBColor(255, fade, fade)
    } else {
        RGBColor(fade, fade, 255)
    }
}

/// 3×3 heatmap of subject correlations; undefined cells are grey and unlabelled.
pub fn correlation_heatmap(path: &Path, matrix: &[[Option<f64>; 3]; 3]) -> Result<()> {
    let root = SVGBackend::new(path, (700, 620)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation of SAT Subject Scores", ("sans-serif", 26).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d((0..3).into_segmented(), (0..3).into_segmented())?;

    // row 0 is drawn at the top
    let x_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) if (0..3).contains(i) => SUBJECTS[*i as usize].to_string(),
        _ => String::new(),
    };
    let y_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) if (0..3).contains(i) => SUBJECTS[(2 - i) as usize].to_string(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(3)
        .y_labels(3)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .draw()?;

    let cells: Vec<(i32, i32, Option<f64>)> = matrix
        .iter()
        .enumerate()
        .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, c)| (i as i32, j as i32, *c)))
        .collect();

    chart.draw_series(cells.iter().map(|&(i, j, c)| {
        let y = 2 - i;
        Rectangle::new(
            [(SegmentValue::Exact(j), SegmentValue::Exact(y)), (SegmentValue::Exact(j + 1), SegmentValue::Exact(y + 1))],
            heat_color(c).filled(),
        )
    }))?;

    chart.draw_series(cells.iter().filter_map(|&(i, j, c)| {
        let c = c?;
        Some(Text::new(
            format!("{:.2}", c),
            (SegmentValue::CenterOf(j), SegmentValue::CenterOf(2 - i)),
            ("sans-serif", 22).into_font().color(&BLACK),
        ))
    }))?;

    root.present()?;
    Ok(())
}
