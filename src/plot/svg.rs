//! SVG rendering with Plotters.
//!
//! Draws the observations as points with vertical error bars and overlays the
//! fitted line across the observed x range. Output is a standalone SVG file.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::Observations;
use crate::error::AppError;
use crate::fit::FittedLine;

const POINT_COLOR: RGBColor = RGBColor(128, 0, 128);
const LINE_COLOR: RGBColor = RGBColor(220, 20, 20);

/// Text around the chart.
#[derive(Debug, Clone)]
pub struct PlotLabels {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
}

impl Default for PlotLabels {
    fn default() -> Self {
        Self {
            title: "Grouped data with least-squares fit".to_string(),
            x_desc: "r (Mpc)".to_string(),
            y_desc: "v (km/s)".to_string(),
        }
    }
}

/// Write an SVG scatter-with-error-bars plot and the fitted line.
pub fn write_svg_plot<L: FittedLine>(
    path: &Path,
    obs: &Observations,
    line: &L,
    labels: &PlotLabels,
    size: (u32, u32),
) -> Result<(), AppError> {
    let Some((x0, x1)) = obs.x_range().filter(|(a, b)| b > a) else {
        return Err(AppError::new(4, "Cannot plot: x values have no spread."));
    };

    draw(path, obs, line, labels, size, (x0, x1))
        .map_err(|e| AppError::new(4, format!("Failed to render SVG '{}': {e}", path.display())))
}

fn draw<L: FittedLine>(
    path: &Path,
    obs: &Observations,
    line: &L,
    labels: &PlotLabels,
    size: (u32, u32),
    (x0, x1): (f64, f64),
) -> Result<(), Box<dyn std::error::Error>> {
    let curve: Vec<(f64, f64)> = (0..100)
        .map(|i| {
            let x = x0 + (x1 - x0) * i as f64 / 99.0;
            (x, line.value_at(x))
        })
        .collect();

    let (mut y0, mut y1) = obs.y_range_with_errors().unwrap_or((0.0, 1.0));
    for &(_, y) in &curve {
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    let x_pad = (x1 - x0) * 0.05;
    let y_pad = ((y1 - y0) * 0.05).max(1e-9);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&labels.title, ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((x0 - x_pad)..(x1 + x_pad), (y0 - y_pad)..(y1 + y_pad))?;

    chart
        .configure_mesh()
        .x_desc(labels.x_desc.as_str())
        .y_desc(labels.y_desc.as_str())
        .draw()?;

    chart.draw_series(
        obs.points()
            .map(|(x, y, s)| ErrorBar::new_vertical(x, y - s.abs(), y, y + s.abs(), POINT_COLOR.filled(), 6)),
    )?;

    chart
        .draw_series(obs.points().map(|(x, y, _)| Circle::new((x, y), 3, POINT_COLOR.filled())))?
        .label("Data with uncertainties")
        .legend(|(x, y)| Circle::new((x, y), 3, POINT_COLOR.filled()));

    chart
        .draw_series(LineSeries::new(curve, &LINE_COLOR))?
        .label(format!(
            "Best fit: y = {:.2} + {:.2}*x",
            line.intercept(),
            line.slope()
        ))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LINE_COLOR));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::FitResult;

    #[test]
    fn writes_svg_file() {
        let obs = Observations::new(vec![1.0, 2.0, 3.0], vec![70.0, 140.0, 215.0], vec![5.0, 6.0, 7.0]);
        let fit: FitResult = obs.fit().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit.svg");
        write_svg_plot(&path, &obs, &fit, &PlotLabels::default(), (640, 480)).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn flat_x_is_rejected() {
        let obs = Observations::new(vec![1.0, 1.0], vec![1.0, 2.0], vec![0.1, 0.1]);
        let line = FitResult {
            intercept: 0.0,
            slope: 0.0,
            sigma_intercept: 0.0,
            sigma_slope: 0.0,
            chi_squared: 0.0,
        };
        let dir = tempfile::tempdir().unwrap();
        let err = write_svg_plot(&dir.path().join("x.svg"), &obs, &line, &PlotLabels::default(), (100, 100))
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
