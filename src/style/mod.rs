//! # Style Properties
//!
//! Opaque configuration structs consumed by components and providers.
//! The layout core never computes with these beyond reading a size or an
//! offset; drawing them is the backend's business.
//!
//! Every prop struct has a `make_valid` that clamps nonsense values to
//! something drawable, so a provider never has to second-guess its input.

use serde::{Deserialize, Serialize};

/// Default font family for text and signatures.
pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";
/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 10.0;
/// Default font weight (regular).
pub const DEFAULT_FONT_WEIGHT: u32 = 400;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// `#rgb` or `#rrggbb`; anything else is black. Non-hex digits read as 0.
    pub fn hex(hex: &str) -> Self {
        let digits: Vec<u8> = hex
            .trim_start_matches('#')
            .chars()
            .map(|c| c.to_digit(16).unwrap_or(0) as u8)
            .collect();
        let (r, g, b) = match digits[..] {
            [r, g, b] => (r * 17, g * 17, b * 17),
            [r1, r2, g1, g2, b1, b2] => (r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2),
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    pub fn is_italic(&self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::Oblique)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justify,
}

/// A fully specified font: what `Config` hands down as the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub family: String,
    pub size: f64,
    pub weight: u32,
    pub style: FontStyle,
    pub color: Color,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: DEFAULT_FONT_SIZE,
            weight: DEFAULT_FONT_WEIGHT,
            style: FontStyle::Normal,
            color: Color::BLACK,
        }
    }
}

/// Text placement and typography. Unset font fields fall back to the
/// configured default font once `make_valid` runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextProps {
    pub family: Option<String>,
    pub size: Option<f64>,
    pub weight: Option<u32>,
    pub style: Option<FontStyle>,
    pub color: Option<Color>,
    pub align: TextAlign,
    /// Offset from the top of the cell.
    pub top: f64,
    /// Inset from the left edge of the cell.
    pub left: f64,
    /// Inset from the right edge of the cell.
    pub right: f64,
    /// Extra space between wrapped lines.
    pub vertical_padding: f64,
}

impl TextProps {
    /// Fill unset font fields from `font` and clamp negative offsets.
    pub fn make_valid(&mut self, font: &Font) {
        if self.family.as_deref().map_or(true, str::is_empty) {
            self.family = Some(font.family.clone());
        }
        if self.size.map_or(true, |s| s <= 0.0) {
            self.size = Some(font.size);
        }
        if self.weight.is_none() {
            self.weight = Some(font.weight);
        }
        if self.style.is_none() {
            self.style = Some(font.style);
        }
        if self.color.is_none() {
            self.color = Some(font.color);
        }
        self.top = self.top.max(0.0);
        self.left = self.left.max(0.0);
        self.right = self.right.max(0.0);
        self.vertical_padding = self.vertical_padding.max(0.0);
    }

    pub fn family(&self) -> &str {
        self.family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY)
    }

    pub fn size(&self) -> f64 {
        self.size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn weight(&self) -> u32 {
        self.weight.unwrap_or(DEFAULT_FONT_WEIGHT)
    }

    pub fn font_style(&self) -> FontStyle {
        self.style.unwrap_or_default()
    }

    pub fn color(&self) -> Color {
        self.color.unwrap_or_default()
    }

    pub fn bold(mut self) -> Self {
        self.weight = Some(700);
        self
    }

    pub fn sized(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// Which sides of a cell get a border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderType {
    #[default]
    None,
    Full,
    Top,
    Bottom,
    Left,
    Right,
}

/// Border and background of a row or column cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellStyle {
    pub background_color: Option<Color>,
    pub border_type: BorderType,
    pub border_color: Option<Color>,
    pub border_thickness: f64,
}

impl CellStyle {
    pub fn background(color: Color) -> Self {
        Self {
            background_color: Some(color),
            ..Default::default()
        }
    }

    pub fn bordered(border_type: BorderType, thickness: f64) -> Self {
        Self {
            border_type,
            border_thickness: thickness,
            ..Default::default()
        }
    }

    pub fn has_border(&self) -> bool {
        self.border_type != BorderType::None && self.border_thickness > 0.0
    }
}

/// Placement of rectangular content (images, QR codes) inside a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectProps {
    /// Share of the cell width to occupy, 1-100.
    pub percent: f64,
    /// Center inside the cell; `left`/`top` are ignored when set.
    pub center: bool,
    pub left: f64,
    pub top: f64,
}

impl Default for RectProps {
    fn default() -> Self {
        Self {
            percent: 100.0,
            center: false,
            left: 0.0,
            top: 0.0,
        }
    }
}

impl RectProps {
    pub fn make_valid(&mut self) {
        if self.percent <= 0.0 || self.percent > 100.0 {
            self.percent = 100.0;
        }
        if self.center {
            self.left = 0.0;
            self.top = 0.0;
        }
        self.left = self.left.max(0.0);
        self.top = self.top.max(0.0);
    }

    pub fn centered(percent: f64) -> Self {
        Self {
            percent,
            center: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineOrientation {
    #[default]
    Horizontal,
    Vertical,
}

/// A straight rule drawn across a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineProps {
    pub color: Color,
    pub thickness: f64,
    pub orientation: LineOrientation,
    /// Length as a share of the cell extent, 1-100.
    pub size_percent: f64,
    /// Position across the cell as a share of the other extent, 0-100.
    pub offset_percent: f64,
}

impl Default for LineProps {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            thickness: 0.6,
            orientation: LineOrientation::Horizontal,
            size_percent: 90.0,
            offset_percent: 5.0,
        }
    }
}

impl LineProps {
    pub fn make_valid(&mut self) {
        if self.thickness <= 0.0 {
            self.thickness = 0.6;
        }
        if self.size_percent <= 0.0 || self.size_percent > 100.0 {
            self.size_percent = 90.0;
        }
        self.offset_percent = self.offset_percent.clamp(0.0, 100.0);
    }
}

/// A signature space: a line with a label under it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignatureProps {
    pub font: TextProps,
    pub line_color: Option<Color>,
    pub line_thickness: f64,
    /// Gap between the line and the label.
    pub safe_padding: f64,
}

impl SignatureProps {
    pub fn make_valid(&mut self, font: &Font) {
        self.font.align = TextAlign::Center;
        self.font.make_valid(font);
        if self.line_thickness <= 0.0 {
            self.line_thickness = 0.6;
        }
        if self.safe_padding <= 0.0 {
            self.safe_padding = 4.0;
        }
    }
}

/// Page-number tokens substituted into footer text at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageNumber {
    /// Replaced by the page's 1-based number. Empty disables substitution.
    pub pattern: String,
    /// Replaced by the total page count when non-empty.
    pub total_pattern: String,
}

impl PageNumber {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            total_pattern: String::new(),
        }
    }

    pub fn with_total(mut self, total_pattern: &str) -> Self {
        self.total_pattern = total_pattern.to_string();
        self
    }
}
