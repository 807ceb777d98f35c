// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! SVG charts of an [`Analysis`].
//!
//! Charts carry no text so they render without a font backend; the Markdown
//! report holds the numbers. Bars are coloured by category in canonical order.

use std::fs;
use std::path::{Path, PathBuf};

use ffibench_core::Category;
use plotters::prelude::*;

use crate::analysis::{Analysis, AnalysisError, SummaryRow};

pub const SPEEDUP_CHART: &str = "speedup_by_category.svg";
pub const ABSOLUTE_CHART: &str = "absolute_performance.svg";
pub const CATEGORY_CHART: &str = "category_summary.svg";

const BAR_WIDTH: f64 = 0.8;

fn chart_err<E: std::fmt::Display>(chart: &'static str) -> impl Fn(E) -> AnalysisError {
    move |e| AnalysisError::Chart {
        chart,
        message: e.to_string(),
    }
}

fn category_color(category: Category) -> PaletteColor<Palette99> {
    let index = Category::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or_default();
    Palette99::pick(index)
}

/// x position of every row, leaving one empty slot between categories.
fn grouped_positions(rows: &[SummaryRow]) -> (Vec<f64>, f64) {
    let mut positions = Vec::with_capacity(rows.len());
    let mut x = 0.0;
    let mut previous: Option<Category> = None;
    for row in rows {
        if previous.is_some_and(|p| p != row.category) {
            x += 1.0;
        }
        positions.push(x);
        previous = Some(row.category);
        x += 1.0;
    }
    (positions, x.max(1.0))
}

/// Speedup per case, grouped by category, with a 1x baseline.
pub fn speedup_chart(analysis: &Analysis, path: &Path) -> Result<(), AnalysisError> {
    const NAME: &str = "speedup chart";
    let rows = &analysis.rows;
    let (positions, width) = grouped_positions(rows);
    let top = rows
        .iter()
        .filter_map(|r| r.speedup)
        .fold(1.0f64, f64::max)
        * 1.1;

    let root = SVGBackend::new(path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err(NAME))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0f64..width, 0f64..top)
        .map_err(chart_err(NAME))?;

    chart
        .draw_series(rows.iter().zip(&positions).filter_map(|(row, &x)| {
            row.speedup.map(|s| {
                Rectangle::new(
                    [(x, 0.0), (x + BAR_WIDTH, s)],
                    category_color(row.category).filled(),
                )
            })
        }))
        .map_err(chart_err(NAME))?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 1.0), (width, 1.0)],
            RED.stroke_width(2),
        )))
        .map_err(chart_err(NAME))?;

    root.present().map_err(chart_err(NAME))?;
    Ok(())
}

/// Absolute mean time per case, linked on the left and dynamic on the right,
/// both on a log scale.
pub fn absolute_chart(analysis: &Analysis, path: &Path) -> Result<(), AnalysisError> {
    const NAME: &str = "absolute performance chart";
    let rows = &analysis.rows;
    let (positions, width) = grouped_positions(rows);

    let times = rows
        .iter()
        .flat_map(|r| [r.linked_mean_ms, r.dynamic_mean_ms])
        .filter(|t| *t > 0.0);
    let (lo, hi) = times.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
        (lo.min(t), hi.max(t))
    });
    let (lo, hi) = if lo.is_finite() {
        (lo / 2.0, hi * 2.0)
    } else {
        (1e-6, 1.0)
    };

    let root = SVGBackend::new(path, (1600, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err(NAME))?;
    let panels = root.split_evenly((1, 2));

    let series: [fn(&SummaryRow) -> f64; 2] = [|r| r.linked_mean_ms, |r| r.dynamic_mean_ms];
    for (panel, value) in panels.iter().zip(series) {
        let mut chart = ChartBuilder::on(panel)
            .margin(20)
            .build_cartesian_2d(0f64..width, (lo..hi).log_scale())
            .map_err(chart_err(NAME))?;

        chart
            .draw_series(rows.iter().zip(&positions).filter_map(|(row, &x)| {
                let t = value(row);
                (t > 0.0).then(|| {
                    Rectangle::new(
                        [(x, lo), (x + BAR_WIDTH, t)],
                        category_color(row.category).filled(),
                    )
                })
            }))
            .map_err(chart_err(NAME))?;
    }

    root.present().map_err(chart_err(NAME))?;
    Ok(())
}

/// Mean and median speedup per category, side by side, with a 1x baseline.
pub fn category_chart(analysis: &Analysis, path: &Path) -> Result<(), AnalysisError> {
    const NAME: &str = "category summary chart";
    let cats = &analysis.categories;
    let width = cats.len().max(1) as f64;
    let top = cats
        .iter()
        .flat_map(|c| [c.mean, c.median])
        .fold(1.0f64, f64::max)
        * 1.1;

    let root = SVGBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err(NAME))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0f64..width, 0f64..top)
        .map_err(chart_err(NAME))?;

    let half = BAR_WIDTH / 2.0;
    chart
        .draw_series(cats.iter().enumerate().flat_map(|(i, c)| {
            let x = i as f64 + 0.1;
            let color = category_color(c.category);
            [
                Rectangle::new([(x, 0.0), (x + half, c.mean)], color.filled()),
                Rectangle::new([(x + half, 0.0), (x + BAR_WIDTH, c.median)], color.mix(0.5).filled()),
            ]
        }))
        .map_err(chart_err(NAME))?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 1.0), (width, 1.0)],
            RED.stroke_width(2),
        )))
        .map_err(chart_err(NAME))?;

    root.present().map_err(chart_err(NAME))?;
    Ok(())
}

/// Draw all three charts into `dir`, returning the files written.
pub fn render_all(analysis: &Analysis, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, AnalysisError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| AnalysisError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let speedup = dir.join(SPEEDUP_CHART);
    let absolute = dir.join(ABSOLUTE_CHART);
    let category = dir.join(CATEGORY_CHART);

    speedup_chart(analysis, &speedup)?;
    absolute_chart(analysis, &absolute)?;
    category_chart(analysis, &category)?;

    tracing::info!(dir = %dir.display(), "Charts written");
    Ok(vec![speedup, absolute, category])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, category: Category) -> SummaryRow {
        SummaryRow {
            name: name.to_string(),
            category,
            linked_mean_ms: 0.001,
            linked_std_ms: 0.0,
            dynamic_mean_ms: 0.002,
            dynamic_std_ms: 0.0,
            speedup: Some(2.0),
        }
    }

    #[test]
    fn test_grouped_positions_leave_gaps() {
        let rows = [
            row("a", Category::CallOverhead),
            row("b", Category::CallOverhead),
            row("c", Category::Memory),
        ];
        let (positions, width) = grouped_positions(&rows);
        assert_eq!(positions, [0.0, 1.0, 3.0]);
        assert_eq!(width, 4.0);
    }

    #[test]
    fn test_grouped_positions_empty() {
        let (positions, width) = grouped_positions(&[]);
        assert!(positions.is_empty());
        assert_eq!(width, 1.0);
    }
}
