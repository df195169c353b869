use plotters::style::{RGBAColor, RGBColor};

/// Fallback series color, also used for the first variation.
pub const DEFAULT_SERIES_COLOR: RGBColor = RGBColor(0x46, 0x46, 0x4f);

const PALETTE: [RGBColor; 4] = [
    DEFAULT_SERIES_COLOR,
    RGBColor(0x41, 0x42, 0xef),
    RGBColor(0xff, 0x83, 0x46),
    RGBColor(0x35, 0xbd, 0xad),
];

/// Series color for the variation at `index` in display order.
pub fn palette_color(index: usize) -> RGBColor {
    PALETTE.get(index).copied().unwrap_or(DEFAULT_SERIES_COLOR)
}

/// Chart theme configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
    pub selection_color: RGBAColor,
}

impl ChartTheme {
    pub fn light() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            text_color: RGBAColor(0x46, 0x46, 0x4f, 1.0),
            grid_color: RGBAColor(0xe1, 0xe1, 0xe5, 1.0),
            axis_color: RGBAColor(0xc7, 0xc5, 0xd0, 1.0),
            selection_color: RGBAColor(0x91, 0x8f, 0x9a, 1.0),
        }
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(0, 0, 0, 0.94),
            text_color: RGBAColor(255, 255, 255, 0.8),
            grid_color: RGBAColor(255, 255, 255, 0.15),
            axis_color: RGBAColor(255, 255, 255, 0.8),
            selection_color: RGBAColor(255, 255, 255, 0.6),
        }
    }
}

/// Chart style configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub line_width: u32,
    pub font_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
    pub marker_radius: u32,
    /// Interpolated samples per segment for smooth curves.
    pub smooth_steps: usize,
    /// Height of the range strip under the plot.
    pub brush_height: u32,
    /// Width of the drag handles at either end of the brushed range.
    pub traveller_width: u32,
}

impl ChartStyle {
    /// Horizontal pixel span of the plotting area for an image `width` wide.
    pub fn plot_x_span(&self, width: u32) -> (f64, f64) {
        let left = (self.margin + self.label_area_size) as f64;
        let right = width.saturating_sub(self.margin) as f64;
        (left, right.max(left))
    }

    /// First pixel row of the range strip for an image `height` tall.
    pub fn brush_top(&self, height: u32) -> u32 {
        height.saturating_sub(self.brush_height)
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_width: 2,
            font_size: 15,
            margin: 10,
            label_area_size: 50,
            marker_radius: 6,
            smooth_steps: 12,
            brush_height: 40,
            traveller_width: 8,
        }
    }
}
