use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

use crate::domain::model::{ChartImage, ProgressSnapshot};
use crate::utils::error::{PulseError, Result};

/// Appearance of the progress chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub completed: (u8, u8, u8),
    pub remaining: (u8, u8, u8),
    pub edge: (u8, u8, u8),
    pub background: (u8, u8, u8),
    pub plot_background: (u8, u8, u8),
    pub text: (u8, u8, u8),
    pub watermark: String,
    /// Captions and value labels need a system font.
    pub draw_labels: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            completed: (0x1d, 0xa1, 0xf2),
            remaining: (0xe8, 0xf4, 0xfd),
            edge: (0xcc, 0xcc, 0xcc),
            background: (0xff, 0xff, 0xff),
            plot_background: (0xfa, 0xfa, 0xfa),
            text: (0x33, 0x33, 0x33),
            watermark: "ProgressPulse".to_string(),
            draw_labels: true,
        }
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

struct Layout;

impl Layout {
    const MARGIN: u32 = 24;
    const FONT_FAMILY: &'static str = "sans-serif";
    const CAPTION_FONT_SIZE: i32 = 36;
    const LABEL_FONT_SIZE: i32 = 24;
    const WATERMARK_FONT_SIZE: i32 = 16;
    const X_LABEL_AREA_SIZE: u32 = 56;
    const X_PADDING_DAYS: u32 = 20;
    // y axis is 0..2: completed bar on top, remaining below
    const COMPLETED_BAR: (f64, f64) = (1.2, 1.8);
    const REMAINING_BAR: (f64, f64) = (0.2, 0.8);
}

fn backend_error<E: std::fmt::Debug>(stage: &str) -> impl Fn(E) -> PulseError + '_ {
    move |error| {
        let detail = format!("{:?}", error);
        if detail.to_lowercase().contains("font") {
            PulseError::render(format!("{}: font unavailable: {}", stage, detail))
        } else {
            PulseError::render(format!("{}: {}", stage, detail))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// X axis upper bound in days.
    pub fn x_max(snapshot: &ProgressSnapshot) -> f64 {
        f64::from(snapshot.days_in_year + Layout::X_PADDING_DAYS)
    }

    pub fn render(&self, snapshot: &ProgressSnapshot) -> Result<ChartImage> {
        let style = &self.style;
        if style.width == 0 || style.height == 0 {
            return Err(PulseError::render("chart size must be non-zero"));
        }

        let (width, height) = (style.width, style.height);
        let mut rgb_buffer = vec![255u8; width as usize * height as usize * 3];

        {
            let drawing_area =
                BitMapBackend::with_buffer(&mut rgb_buffer, (width, height)).into_drawing_area();
            drawing_area
                .fill(&rgb(style.background))
                .map_err(backend_error("background fill"))?;

            let mut builder = ChartBuilder::on(&drawing_area);
            builder.margin(Layout::MARGIN);
            if style.draw_labels {
                builder
                    .caption(
                        format!(
                            "{} Year Progress - {:.1}% Complete",
                            snapshot.year, snapshot.percentage_complete
                        ),
                        (Layout::FONT_FAMILY, Layout::CAPTION_FONT_SIZE)
                            .into_font()
                            .color(&rgb(style.completed)),
                    )
                    .x_label_area_size(Layout::X_LABEL_AREA_SIZE);
            }

            let x_max = Self::x_max(snapshot);
            let mut chart = builder
                .build_cartesian_2d(0f64..x_max, 0f64..2f64)
                .map_err(backend_error("chart build"))?;

            chart
                .plotting_area()
                .fill(&rgb(style.plot_background))
                .map_err(backend_error("plot fill"))?;

            if style.draw_labels {
                chart
                    .configure_mesh()
                    .disable_y_mesh()
                    .disable_y_axis()
                    .x_labels(8)
                    .x_desc("Days")
                    .axis_desc_style((Layout::FONT_FAMILY, Layout::LABEL_FONT_SIZE))
                    .label_style((Layout::FONT_FAMILY, Layout::LABEL_FONT_SIZE - 6))
                    .light_line_style(rgb(style.edge).mix(0.3))
                    .axis_style(rgb(style.edge))
                    .draw()
                    .map_err(backend_error("mesh draw"))?;
            }

            let bars = [
                (
                    snapshot.day_of_year,
                    Layout::COMPLETED_BAR,
                    style.completed,
                    "Days Completed",
                ),
                (
                    snapshot.days_remaining,
                    Layout::REMAINING_BAR,
                    style.remaining,
                    "Days Remaining",
                ),
            ];

            for (days, (y0, y1), color, _) in bars {
                let x1 = f64::from(days);
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [(0.0, y0), (x1, y1)],
                        rgb(color).filled(),
                    )))
                    .map_err(backend_error("bar draw"))?;
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [(0.0, y0), (x1, y1)],
                        rgb(style.edge).stroke_width(1),
                    )))
                    .map_err(backend_error("bar edge draw"))?;
            }

            if style.draw_labels {
                let label_font = (Layout::FONT_FAMILY, Layout::LABEL_FONT_SIZE)
                    .into_font()
                    .style(FontStyle::Bold)
                    .color(&rgb(style.text));
                let centered = label_font
                    .clone()
                    .pos(Pos::new(HPos::Center, VPos::Center));

                for (days, (y0, y1), _, category) in bars {
                    let middle = (y0 + y1) / 2.0;
                    chart
                        .draw_series(std::iter::once(Text::new(
                            format!("{} days", days),
                            ((f64::from(days) / 2.0).max(x_max * 0.06), middle),
                            centered.clone(),
                        )))
                        .map_err(backend_error("value label draw"))?;
                    chart
                        .draw_series(std::iter::once(Text::new(
                            category.to_string(),
                            (x_max * 0.01, y1 + 0.12),
                            label_font.clone(),
                        )))
                        .map_err(backend_error("category label draw"))?;
                }

                let watermark = (Layout::FONT_FAMILY, Layout::WATERMARK_FONT_SIZE)
                    .into_font()
                    .style(FontStyle::Italic)
                    .color(&rgb(style.text).mix(0.5))
                    .pos(Pos::new(HPos::Right, VPos::Bottom));
                chart
                    .draw_series(std::iter::once(Text::new(
                        style.watermark.clone(),
                        (x_max * 0.99, 0.02),
                        watermark,
                    )))
                    .map_err(backend_error("watermark draw"))?;
            }

            drawing_area.present().map_err(backend_error("present"))?;
        }

        let rgb_image = RgbImage::from_raw(width, height, rgb_buffer)
            .ok_or_else(|| PulseError::render("image buffer conversion failed"))?;
        let mut output = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(rgb_image)
            .write_to(&mut output, ImageFormat::Png)
            .map_err(|error| PulseError::render(format!("png encoding error: {}", error)))?;

        Ok(ChartImage::png(output.into_inner()))
    }
}
