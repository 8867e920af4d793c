use std::{error::Error, fmt::Display, path::Path};

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use pca::linalg::Matrix;

const SIZE: u32 = 600;
const MARGIN: u32 = 24;
const DOT_RADIUS: i64 = 2;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
// matplotlib's default marker blue
const DOT: Rgb<u8> = Rgb([31, 119, 180]);

/// Render the first two columns of `points` as a scatter plot and save it
/// as a PNG.
pub fn scatter<P: AsRef<Path>>(points: &Matrix, path: P) -> Result<()> {
    let image = render(points)?;
    image
        .save(path.as_ref())
        .with_context(|| format!("Saving plot to {}", path.as_ref().display()))?;
    Ok(())
}

fn render(points: &Matrix) -> Result<RgbImage> {
    if points.width() < 2 {
        return Err(PlotError::NotEnoughColumns(points.width()).into());
    }
    let xs = points.get_col(0)?;
    let ys = points.get_col(1)?;
    let (x_min, x_max) = bounds(&xs);
    let (y_min, y_max) = bounds(&ys);

    let mut image = RgbImage::from_pixel(SIZE, SIZE, BACKGROUND);
    let span = (SIZE - 2 * MARGIN) as f64;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let px = MARGIN as f64 + (x - x_min) / (x_max - x_min) * span;
        // Image rows grow downward, plot values grow upward.
        let py = (SIZE - MARGIN) as f64 - (y - y_min) / (y_max - y_min) * span;
        draw_dot(&mut image, px as i64, py as i64);
    }
    Ok(image)
}

fn draw_dot(image: &mut RgbImage, px: i64, py: i64) {
    for dy in -DOT_RADIUS..=DOT_RADIUS {
        for dx in -DOT_RADIUS..=DOT_RADIUS {
            if dx * dx + dy * dy > DOT_RADIUS * DOT_RADIUS {
                continue;
            }
            let x = px + dx;
            let y = py + dy;
            if x < 0 || y < 0 || x >= SIZE as i64 || y >= SIZE as i64 {
                continue;
            }
            image.put_pixel(x as u32, y as u32, DOT);
        }
    }
}

/// Min and max of `values`, widened when the extent is degenerate so the
/// pixel mapping never divides by zero.
fn bounds(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        min = min.min(*value);
        max = max.max(*value);
    }
    if min == max {
        min -= 0.5;
        max += 0.5;
    }
    (min, max)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlotError {
    NotEnoughColumns(usize),
}

impl Display for PlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotError::NotEnoughColumns(n) => {
                write!(f, "Scatter plot needs 2 projection columns, got {}", n)
            }
        }
    }
}

impl Error for PlotError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_marks_points() {
        let points = Matrix::new(
            vec![
                0.0, 0.0,
                1.0, 1.0,
                2.0, 0.5,
            ],
            3,
            2,
        ).unwrap();

        let image = render(&points).unwrap();

        assert_eq!(image.dimensions(), (SIZE, SIZE));
        let marked = image.pixels().filter(|p| **p == DOT).count();
        assert!(marked > 0);
    }

    #[test]
    fn test_render_single_point() {
        // Degenerate extent in both axes must not divide by zero.
        let points = Matrix::new(vec![1.0, 1.0], 1, 2).unwrap();

        let image = render(&points).unwrap();

        let marked = image.pixels().filter(|p| **p == DOT).count();
        assert!(marked > 0);
    }

    #[test]
    fn test_render_one_column_errors() {
        let points = Matrix::new(vec![1.0, 2.0, 3.0], 3, 1).unwrap();

        let err: Option<PlotError> = render(&points)
            .err()
            .map(|e| e.downcast().unwrap());

        assert_eq!(err, Some(PlotError::NotEnoughColumns(1)));
    }
}
