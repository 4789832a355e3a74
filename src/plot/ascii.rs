//! ASCII/Unicode plotting for terminal output.
//!
//! Fixed-size character grid; the output is deterministic for a given input.
//!
//! Plot elements:
//! - observed points: `o`
//! - connecting line: `-`

use rust_decimal::prelude::ToPrimitive;

use crate::analysis::{DailyVolume, MonthlyRevenue};

/// Render the monthly revenue trend as a line chart.
pub fn render_monthly_revenue(months: &[MonthlyRevenue], width: usize, height: usize) -> String {
    let points: Vec<f64> = months
        .iter()
        .map(|m| m.revenue.to_f64().unwrap_or(0.0))
        .collect();
    let header = match (months.first(), months.last()) {
        (Some(first), Some(last)) => format!("Monthly revenue: {} .. {}", first.month, last.month),
        _ => "Monthly revenue: no data".to_string(),
    };
    render_series(&header, &points, width, height)
}

/// Render daily transaction counts as a line chart.
pub fn render_daily_volume(days: &[DailyVolume], width: usize, height: usize) -> String {
    let points: Vec<f64> = days.iter().map(|d| d.transactions as f64).collect();
    let header = match (days.first(), days.last()) {
        (Some(first), Some(last)) => format!("Daily transactions: {} .. {}", first.date, last.date),
        _ => "Daily transactions: no data".to_string(),
    };
    render_series(&header, &points, width, height)
}

/// Plot `values` at evenly spaced x positions, first value at the left edge.
fn render_series(title: &str, values: &[f64], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut out = String::new();
    let Some((y_min, y_max)) = y_range(values) else {
        out.push_str(title);
        out.push('\n');
        return out;
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let n = values.len();
    let coords: Vec<(usize, usize)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (map_x(i, n, width), map_y(v, y_min, y_max, height)))
        .collect();

    // Draw lines first (so points can overlay).
    for w in coords.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        draw_line(&mut grid, x0, y0, x1, y1, '-');
    }
    for &(x, y) in &coords {
        grid[y][x] = 'o';
    }

    out.push_str(&format!("{title} | y=[{y_min:.2}, {y_max:.2}]\n"));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

fn y_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &v in values {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }
    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat series: open up a band around the single level.
        Some((min_y - 1.0, max_y + 1.0))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
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
    use rust_decimal::Decimal;

    #[test]
    fn plot_golden_snapshot_small() {
        let months = vec![
            MonthlyRevenue {
                month: "2025-01".to_string(),
                revenue: Decimal::from(100),
            },
            MonthlyRevenue {
                month: "2025-02".to_string(),
                revenue: Decimal::from(110),
            },
        ];

        let txt = render_monthly_revenue(&months, 10, 5);
        let expected = concat!(
            "Monthly revenue: 2025-01 .. 2025-02 | y=[99.50, 110.50]\n",
            "        -o\n",
            "      --\n",
            "    --\n",
            "  --\n",
            "o-\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_prints_title_only() {
        assert_eq!(render_monthly_revenue(&[], 20, 5), "Monthly revenue: no data\n");
    }

    #[test]
    fn single_point_sits_mid_band() {
        let txt = render_daily_volume(
            &[DailyVolume {
                date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                transactions: 4,
            }],
            10,
            5,
        );
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[3], "o");
    }
}
