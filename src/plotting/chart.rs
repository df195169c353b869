use log::warn;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::io::Cursor;

use super::interpolate::monotone_path;
use super::styles::{palette_color, ChartStyle, ChartTheme};
use crate::types::{ChartKind, DateMode, Granularity, RatePoint};
use crate::utils::display_date;

pub type PlotError = Box<dyn Error + Send + Sync>;

type Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Everything the renderer needs to paint one frame, detached from the
/// orchestrator so it can move to a blocking task.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    /// The visible slice of the filtered series.
    pub points: Vec<RatePoint>,
    /// Series index of `points[0]`.
    pub first_index: usize,
    /// Length of the whole filtered series.
    pub series_len: usize,
    /// All variation names in display order; position decides the color.
    pub variation_names: Vec<String>,
    pub top_reference_y: f64,
    pub kind: ChartKind,
    pub granularity: Granularity,
    /// Series index of the selected point, when one is selected.
    pub selected: Option<usize>,
}

impl ChartScene {
    /// Position within `points` of the selected point, if it is visible.
    pub fn selected_position(&self) -> Option<usize> {
        self.selected
            .and_then(|index| index.checked_sub(self.first_index))
            .filter(|position| *position < self.points.len())
    }

    /// Whether the last point of the whole series is inside the window.
    pub fn shows_series_end(&self) -> bool {
        !self.points.is_empty() && self.first_index + self.points.len() == self.series_len
    }

    fn x_max(&self) -> f64 {
        self.points.len().saturating_sub(1).max(1) as f64
    }

    fn y_max(&self) -> f64 {
        if self.top_reference_y > 0.0 {
            self.top_reference_y
        } else {
            5.0
        }
    }
}

/// Map a horizontal pixel position on an image `width` wide to the date key
/// of the nearest visible point.
pub fn hit_test<'s>(scene: &'s ChartScene, x_px: f64, width: u32, style: &ChartStyle) -> Option<&'s str> {
    let last = scene.points.len().checked_sub(1)?;
    let (left, right) = style.plot_x_span(width);
    let fraction = if right > left {
        ((x_px - left) / (right - left)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let position = ((fraction * scene.x_max()).round() as usize).min(last);
    Some(scene.points[position].date.as_str())
}

/// Horizontal pixel extent of the visible window on the range strip, for an
/// image `width` wide. `None` for an empty series.
pub fn brush_window(scene: &ChartScene, width: u32, style: &ChartStyle) -> Option<(f64, f64)> {
    if scene.series_len == 0 || scene.points.is_empty() {
        return None;
    }
    let (left, right) = style.plot_x_span(width);
    let step = (right - left) / scene.series_len as f64;
    let start = left + scene.first_index as f64 * step;
    let end = left + (scene.first_index + scene.points.len()) as f64 * step;
    Some((start, end.min(right)))
}

/// Render the scene into an in-memory PNG.
pub fn render_png(
    scene: &ChartScene,
    width: u32,
    height: u32,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<Vec<u8>, PlotError> {
    if width == 0 || height == 0 {
        return Err(format!("cannot render a {}x{} chart", width, height).into());
    }

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_scene(scene, &root, theme, style)?;
        root.present()?;
    }

    let image = image::RgbImage::from_raw(width, height, buffer)
        .ok_or("bitmap buffer does not match the image size")?;
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
    Ok(png)
}

/// Paint the scene on an existing drawing area.
pub fn draw_scene(
    scene: &ChartScene,
    root: &DrawingArea<BitMapBackend, Shift>,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    root.fill(&theme.background_color)?;

    let (width, height) = root.dim_in_pixel();
    let (plot_area, brush_area) = root.split_vertically(style.brush_top(height));
    draw_brush(scene, &brush_area, width, theme, style)?;

    let x_max = scene.x_max();
    let y_max = scene.y_max();
    let mut chart = ChartBuilder::on(&plot_area)
        .margin(style.margin)
        .x_label_area_size(style.label_area_size)
        .y_label_area_size(style.label_area_size)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    // Labels need system fonts; the series are still worth painting without them.
    if let Err(e) = draw_mesh(&mut chart, scene, theme, style) {
        warn!("chart axes drawn without labels: {}", e);
    }

    let axis_style = ShapeStyle::from(&theme.axis_color).stroke_width(1);
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, y_max), (x_max, y_max)],
        axis_style,
    )))?;
    if scene.shows_series_end() {
        let x = (scene.points.len() - 1) as f64;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x, 0.0), (x, y_max)],
            axis_style,
        )))?;
    }

    for (index, name) in scene.variation_names.iter().enumerate() {
        let color = palette_color(index);
        for run in value_runs(&scene.points, name) {
            draw_run(&mut chart, scene.kind, &run, color, style)?;
        }
    }

    if let Some(position) = scene.selected_position() {
        draw_selection(&mut chart, scene, position, theme, style)?;
    }

    Ok(())
}

/// Range strip: the whole series as a track, the visible window as a band
/// with a handle at each end, and the window's edge dates as labels.
fn draw_brush(
    scene: &ChartScene,
    area: &DrawingArea<BitMapBackend, Shift>,
    width: u32,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    let (_, height) = area.dim_in_pixel();
    let (left, right) = style.plot_x_span(width);
    let (top, bottom) = (4, height as i32 - 4);
    if bottom <= top {
        return Ok(());
    }

    area.draw(&Rectangle::new(
        [(left as i32, top), (right as i32, bottom)],
        theme.axis_color.stroke_width(1),
    ))?;

    let Some((start, end)) = brush_window(scene, width, style) else {
        return Ok(());
    };
    let (start, end) = (start as i32, end as i32);
    area.draw(&Rectangle::new(
        [(start, top), (end, bottom)],
        theme.selection_color.mix(0.3).filled(),
    ))?;

    let half = style.traveller_width as i32 / 2;
    for x in [start, end] {
        area.draw(&Rectangle::new(
            [(x - half, top), (x + half, bottom)],
            theme.selection_color.filled(),
        ))?;
    }

    let label_style = ("sans-serif", f64::from(style.font_size))
        .into_font()
        .color(&theme.text_color);
    let first = &scene.points[0].date;
    let last = &scene.points[scene.points.len() - 1].date;
    let labels = [
        (display_date(first, DateMode::DayMonth, scene.granularity), start + half + 2),
        (display_date(last, DateMode::DayMonth, scene.granularity), end + half + 2),
    ];
    for (label, x) in labels {
        if let Err(e) = area.draw(&Text::new(label, (x, top + 2), label_style.clone())) {
            warn!("range labels skipped: {}", e);
            break;
        }
    }

    Ok(())
}

fn draw_mesh(
    chart: &mut Chart<'_, '_>,
    scene: &ChartScene,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    let labels: Vec<String> = scene
        .points
        .iter()
        .map(|p| display_date(&p.date, DateMode::DayMonth, scene.granularity))
        .collect();
    let x_label_formatter = move |x: &f64| {
        let rounded = x.round();
        if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .label_style(
            ("sans-serif", f64::from(style.font_size))
                .into_font()
                .color(&theme.text_color),
        )
        .x_labels(scene.points.len().clamp(2, 8))
        .x_label_formatter(&x_label_formatter)
        .y_labels(6)
        .y_label_formatter(&|y| format!("{}%", y))
        .draw()?;

    Ok(())
}

/// Contiguous stretches of points that carry a value for `name`, as
/// `(position, value)` pairs. Missing values break the line.
fn value_runs(points: &[RatePoint], name: &str) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (position, point) in points.iter().enumerate() {
        match point.get(name) {
            Some(value) => current.push((position as f64, value)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn draw_run(
    chart: &mut Chart<'_, '_>,
    kind: ChartKind,
    run: &[(f64, f64)],
    color: RGBColor,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    let stroke = color.stroke_width(style.line_width);
    match kind {
        ChartKind::Line => {
            chart.draw_series(LineSeries::new(run.iter().copied(), stroke))?;
        }
        ChartKind::Smooth => {
            let path = monotone_path(run, style.smooth_steps);
            chart.draw_series(LineSeries::new(path, stroke))?;
        }
        ChartKind::Area => {
            let path = monotone_path(run, style.smooth_steps);
            chart.draw_series(AreaSeries::new(path, 0.0, color.mix(0.3)).border_style(stroke))?;
        }
    }
    Ok(())
}

fn draw_selection(
    chart: &mut Chart<'_, '_>,
    scene: &ChartScene,
    position: usize,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    let x = position as f64;
    let y_max = scene.y_max();
    let dash = y_max / 60.0;
    let dash_style = ShapeStyle::from(&theme.selection_color).stroke_width(2);

    let mut dashes = Vec::new();
    let mut y = 0.0;
    while y < y_max {
        dashes.push(PathElement::new(vec![(x, y), (x, (y + dash).min(y_max))], dash_style));
        y += dash * 2.0;
    }
    chart.draw_series(dashes)?;

    let point = &scene.points[position];
    for (index, name) in scene.variation_names.iter().enumerate() {
        if let Some(value) = point.get(name) {
            let color = palette_color(index);
            chart.draw_series(std::iter::once(Circle::new(
                (x, value),
                style.marker_radius,
                color.filled(),
            )))?;
            chart.draw_series(std::iter::once(Circle::new(
                (x, value),
                style.marker_radius,
                WHITE.stroke_width(2),
            )))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_brush_window_tracks_visible_range() {
        let style = ChartStyle::default();
        let mut scene = ChartScene {
            points: (0..5).map(|i| RatePoint::new(format!("d{}", i))).collect(),
            first_index: 5,
            series_len: 20,
            variation_names: Vec::new(),
            top_reference_y: 10.0,
            kind: ChartKind::Line,
            granularity: Granularity::Day,
            selected: None,
        };
        // Plot span is 60..260 for a 270 px image: 10 px per point.
        assert_eq!(brush_window(&scene, 270, &style), Some((110.0, 160.0)));

        scene.first_index = 15;
        assert_eq!(brush_window(&scene, 270, &style), Some((210.0, 260.0)));

        scene.points.clear();
        scene.series_len = 0;
        assert_eq!(brush_window(&scene, 270, &style), None);
    }

    #[test]
    fn test_missing_values_split_runs() {
        let mut points: Vec<RatePoint> = (0..5).map(|i| RatePoint::new(format!("d{}", i))).collect();
        for i in [0, 1, 3] {
            points[i].values.insert("A".to_string(), i as f64);
        }
        assert_eq!(
            value_runs(&points, "A"),
            vec![vec![(0.0, 0.0), (1.0, 1.0)], vec![(3.0, 3.0)]]
        );
        assert!(value_runs(&points, "B").is_empty());
    }
}
