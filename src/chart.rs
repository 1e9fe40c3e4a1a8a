//! Weight-over-time chart rendering.
//!
//! Charts are drawn into an in-memory RGB buffer with plotters and encoded
//! as PNG; nothing touches the filesystem.

use std::sync::OnceLock;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle, FontTransform};
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::db::models::WeightPoint;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

const FONT_FAMILY: &str = "sans-serif";
const FONT_BYTES: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
const MAX_X_LABELS: usize = 20;
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Embedded chart font could not be loaded")]
    Font,

    #[error("Weight range {0}..{1} cannot be plotted")]
    Range(f64, f64),

    #[error("Drawing error: {0}")]
    Draw(String),

    #[error("PNG encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

fn draw_err(err: impl std::fmt::Display) -> ChartError {
    ChartError::Draw(err.to_string())
}

fn ensure_font() -> Result<(), ChartError> {
    let registered = *FONT_REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if registered {
        Ok(())
    } else {
        Err(ChartError::Font)
    }
}

/// Render the series as a PNG. An empty series yields a "no data" image.
pub fn render_weight_chart(points: &[WeightPoint]) -> Result<Vec<u8>, ChartError> {
    ensure_font()?;

    let mut pixels = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        if points.is_empty() {
            draw_no_data(&root)?;
        } else {
            draw_series(&root, points)?;
        }

        root.present().map_err(draw_err)?;
    }

    encode_png(&pixels)
}

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

fn draw_no_data(root: &Canvas<'_>) -> Result<(), ChartError> {
    let style = TextStyle::from((FONT_FAMILY, 28).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let center = ((WIDTH / 2) as i32, (HEIGHT / 2) as i32);
    root.draw(&Text::new("No weight data available", center, style))
        .map_err(draw_err)
}

fn draw_series(root: &Canvas<'_>, points: &[WeightPoint]) -> Result<(), ChartError> {
    let (y_min, y_max) = weight_bounds(points)?;
    let last = (points.len() - 1) as f64;

    let mut chart = ChartBuilder::on(root)
        .caption("Weight Over Time", (FONT_FAMILY, 26))
        .margin(20)
        .x_label_area_size(110)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..last + 0.5, y_min..y_max)
        .map_err(draw_err)?;

    let format_x = |x: &f64| date_label(points, *x);
    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Weight (kg)")
        .x_labels(points.len().min(MAX_X_LABELS))
        .x_label_formatter(&format_x)
        .label_style((FONT_FAMILY, 13))
        .x_label_style(
            (FONT_FAMILY, 13)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .axis_desc_style((FONT_FAMILY, 16))
        .draw()
        .map_err(draw_err)?;

    let coords = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.weight));

    chart
        .draw_series(LineSeries::new(coords.clone(), LINE_COLOR.stroke_width(2)))
        .map_err(draw_err)?;
    chart
        .draw_series(coords.map(|c| Circle::new(c, 4, LINE_COLOR.filled())))
        .map_err(draw_err)?;

    Ok(())
}

/// Dates are categorical: point `i` sits at x = i and only whole positions
/// get a label.
fn date_label(points: &[WeightPoint], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    points
        .get(index as usize)
        .map(|p| p.date.clone())
        .unwrap_or_default()
}

/// Padded y range. Plotters loops forever on a range whose width is not
/// finite, so that case is an error.
fn weight_bounds(points: &[WeightPoint]) -> Result<(f64, f64), ChartError> {
    let min = points.iter().map(|p| p.weight).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|p| p.weight)
        .fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max - min) * 0.1).max(1.0);
    let (low, high) = (min - pad, max + pad);
    if (high - low).is_finite() {
        Ok((low, high))
    } else {
        Err(ChartError::Range(min, max))
    }
}

fn encode_png(pixels: &[u8]) -> Result<Vec<u8>, ChartError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(pixels, WIDTH, HEIGHT, ColorType::Rgb8)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn point(date: &str, weight: f64) -> WeightPoint {
        WeightPoint {
            date: date.to_string(),
            weight,
        }
    }

    fn assert_png(bytes: &[u8]) {
        assert!(bytes.starts_with(PNG_MAGIC));
        let img = image::load_from_memory(bytes).unwrap();
        assert_eq!((img.width(), img.height()), (WIDTH, HEIGHT));
    }

    #[test]
    fn empty_series_renders_an_image() {
        let png = render_weight_chart(&[]).unwrap();
        assert_png(&png);
    }

    #[test]
    fn single_point_renders() {
        let png = render_weight_chart(&[point("2024-01-01", 70.5)]).unwrap();
        assert_png(&png);
    }

    #[test]
    fn series_renders() {
        let points: Vec<WeightPoint> = (1..=40)
            .map(|day| point(&format!("2024-01-{:02}", day.min(31)), 80.0 - day as f64 * 0.2))
            .collect();
        let png = render_weight_chart(&points).unwrap();
        assert_png(&png);
    }

    #[test]
    fn date_labels_only_on_whole_positions() {
        let points = vec![point("2024-01-01", 70.0), point("2024-01-02", 69.0)];
        assert_eq!(date_label(&points, 0.0), "2024-01-01");
        assert_eq!(date_label(&points, 1.0), "2024-01-02");
        assert_eq!(date_label(&points, 0.5), "");
        assert_eq!(date_label(&points, -0.5), "");
        assert_eq!(date_label(&points, 2.0), "");
    }

    #[test]
    fn bounds_are_padded_for_flat_series() {
        let bounds =
            weight_bounds(&[point("2024-01-01", 70.0), point("2024-01-02", 70.0)]).unwrap();
        assert_eq!(bounds, (69.0, 71.0));

        let bounds = weight_bounds(&[point("a", 60.0), point("b", 80.0)]).unwrap();
        assert_eq!(bounds, (58.0, 82.0));
    }

    #[test]
    fn overflowing_weight_range_is_an_error() {
        let extreme = [point("2024-01-01", 1.7e308), point("2024-01-02", -1.7e308)];
        assert!(matches!(
            weight_bounds(&extreme),
            Err(ChartError::Range(_, _))
        ));
        assert!(matches!(
            render_weight_chart(&extreme),
            Err(ChartError::Range(_, _))
        ));
    }

    #[test]
    fn huge_single_weight_still_renders() {
        let png = render_weight_chart(&[point("2024-01-01", 1e300)]).unwrap();
        assert_png(&png);
    }
}
