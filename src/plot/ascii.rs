//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - fitted line: `-`, sampled across `[min(x), max(x)]`
//! - error bars: `|` spanning `y ± sigma`
//! - observed points: `o`

use crate::domain::Observations;
use crate::fit::FittedLine;

/// Render observations with error bars and a fitted line.
pub fn render_ascii_plot<L: FittedLine>(obs: &Observations, line: &L, width: usize, height: usize) -> String {
    let width = width.max(5);
    let height = height.max(3);

    let (x_min, x_max) = obs.x_range().map(widen_if_flat).unwrap_or((0.0, 1.0));
    let curve = sample_line(line, x_min, x_max, width);

    let (y_min, y_max) = y_range(obs, &curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the line first so bars and points overlay it.
    draw_curve(&mut grid, &curve, x_min, x_max, y_min, y_max);

    for (x, y, s) in obs.points() {
        let col = map_x(x, x_min, x_max, width);
        let top = map_y(y + s.abs(), y_min, y_max, height);
        let bottom = map_y(y - s.abs(), y_min, y_max, height);
        for row in grid.iter_mut().take(bottom + 1).skip(top) {
            row[col] = '|';
        }
    }

    for (x, y, _) in obs.points() {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn widen_if_flat((min, max): (f64, f64)) -> (f64, f64) {
    if max > min { (min, max) } else { (min - 0.5, max + 0.5) }
}

fn sample_line<L: FittedLine>(line: &L, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x_min + u * (x_max - x_min);
            (x, line.value_at(x))
        })
        .collect()
}

fn y_range(obs: &Observations, curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let (mut min_y, mut max_y) = obs
        .y_range_with_errors()
        .unwrap_or((f64::INFINITY, f64::NEG_INFINITY));
    for &(_, y) in curve {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y_max maps to row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::FitResult;

    fn unit_line() -> FitResult {
        FitResult {
            intercept: 0.0,
            slope: 1.0,
            sigma_intercept: 0.0,
            sigma_slope: 0.0,
            chi_squared: 0.0,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let obs = Observations::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.25, 0.25]);

        let txt = render_ascii_plot(&obs, &unit_line(), 5, 5);
        let expected = concat!(
            "Plot: x=[0.000, 1.000] | y=[-0.325, 1.325]\n",
            "    |\n",
            "   -o\n",
            "  -  \n",
            "o-   \n",
            "|    \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn every_point_is_drawn() {
        let obs = Observations::new(
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            vec![-1.0, 1.0, 3.0, 5.0, 7.0, 9.0],
            vec![0.1; 6],
        );
        let fit = obs.fit().unwrap();
        let txt = render_ascii_plot(&obs, &fit, 60, 20);

        assert_eq!(txt.lines().count(), 21);
        let body: String = txt.lines().skip(1).collect();
        assert_eq!(body.matches('o').count(), 6);
        assert_eq!(txt, render_ascii_plot(&obs, &fit, 60, 20));
    }
}
