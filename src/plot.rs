//! SVG diagnostics for sample matrices.
//!
//! Two dimensions render as a single scatter plot; three or more render as a
//! pairwise grid with per-parameter histograms on the diagonal.

use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{Error, Result};
use crate::matrix::SampleMatrix;

const HIST_BINS: usize = 15;
const CELL_PX: u32 = 240;

fn plot_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Plot(e.to_string())
}

/// Render `samples` to `path`.
///
/// `parameter_names` labels the axes; missing names fall back to `Param i`.
/// Fails for fewer than two dimensions.
pub fn visualize_samples(
    title: &str,
    samples: &SampleMatrix,
    parameter_names: &[String],
    path: &Path,
) -> Result<()> {
    let dims = samples.num_dimensions();
    if dims < 2 {
        return Err(Error::Plot(
            "cannot visualize samples with less than 2 dimensions".into(),
        ));
    }

    let labels: Vec<String> = (0..dims)
        .map(|j| {
            parameter_names
                .get(j)
                .cloned()
                .unwrap_or_else(|| format!("Param {}", j + 1))
        })
        .collect();
    let columns: Vec<Vec<f64>> = (0..dims).map(|j| samples.column(j)).collect();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if dims == 2 {
        let root = SVGBackend::new(path, (800, 800)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;
        let area = root
            .titled(&format!("{title} - 2D Projection"), ("sans-serif", 24))
            .map_err(plot_err)?;
        draw_scatter(&area, &columns[0], &columns[1], &labels[0], &labels[1], 4)?;
        root.present().map_err(plot_err)?;
    } else {
        let side = CELL_PX * dims as u32;
        let root = SVGBackend::new(path, (side, side)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;
        let area = root
            .titled(&format!("{title} - Pairwise Projections"), ("sans-serif", 28))
            .map_err(plot_err)?;
        let cells = area.split_evenly((dims, dims));
        for i in 0..dims {
            for j in 0..dims {
                let cell = &cells[i * dims + j];
                if i == j {
                    draw_histogram(cell, &columns[i], &labels[i])?;
                } else {
                    let x_desc = if i == dims - 1 { labels[j].as_str() } else { "" };
                    let y_desc = if j == 0 { labels[i].as_str() } else { "" };
                    draw_scatter(cell, &columns[j], &columns[i], x_desc, y_desc, 2)?;
                }
            }
        }
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

fn draw_scatter(
    area: &DrawingArea<SVGBackend, Shift>,
    xs: &[f64],
    ys: &[f64],
    x_desc: &str,
    y_desc: &str,
    radius: i32,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(axis_range(xs), axis_range(ys))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(
            xs.iter()
                .zip(ys)
                .map(|(&x, &y)| Circle::new((x, y), radius, BLUE.mix(0.6).filled())),
        )
        .map_err(plot_err)?;
    Ok(())
}

fn draw_histogram(
    area: &DrawingArea<SVGBackend, Shift>,
    values: &[f64],
    caption: &str,
) -> Result<()> {
    let range = axis_range(values);
    let width = (range.end - range.start) / HIST_BINS as f64;
    let mut counts = [0usize; HIST_BINS];
    for &v in values {
        let bin = (((v - range.start) / width) as usize).min(HIST_BINS - 1);
        counts[bin] += 1;
    }
    let y_max = counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 14))
        .margin(8)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(range.clone(), 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(b, &count)| {
            let x0 = range.start + b as f64 * width;
            Rectangle::new([(x0, 0.0), (x0 + width, count as f64)], BLUE.mix(0.7).filled())
        }))
        .map_err(plot_err)?;
    Ok(())
}

/// Data range with a little padding; degenerate ranges get a unit window.
fn axis_range(values: &[f64]) -> Range<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let span = max - min;
    if span <= 0.0 {
        return (min - 0.5)..(max + 0.5);
    }
    let pad = span * 0.05;
    (min - pad)..(max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let m = SampleMatrix::from_rows(vec![vec![0.1], vec![0.2]]).unwrap();
        let err = visualize_samples("t", &m, &[], &dir.path().join("p.svg")).unwrap_err();
        assert!(matches!(err, Error::Plot(_)));
    }

    #[test]
    fn writes_scatter_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots").join("two.svg");
        let m = SampleMatrix::from_rows(vec![vec![0.1, 0.9], vec![0.5, 0.4], vec![0.8, 0.2]]).unwrap();
        visualize_samples("Test", &m, &["a".into(), "b".into()], &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn writes_pairwise_grid_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.svg");
        let rows = (0..10)
            .map(|i| {
                let t = i as f64 / 10.0;
                vec![t, 1.0 - t, (t * 7.0) % 1.0]
            })
            .collect();
        let m = SampleMatrix::from_rows(rows).unwrap();
        visualize_samples("Grid", &m, &[], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn axis_range_handles_constant_column() {
        assert_eq!(axis_range(&[2.0, 2.0]), 1.5..2.5);
        assert_eq!(axis_range(&[]), 0.0..1.0);
    }
}
