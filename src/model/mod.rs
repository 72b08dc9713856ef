//! # Layout Model
//!
//! The plain data the layout core moves around: positioning rectangles,
//! page geometry, and the process-wide render configuration.
//!
//! None of this has behaviour worth speaking of. A `Cell` is copied freely
//! so that recursive rendering never aliases a parent's cursor, and a
//! `Config` is built once, wrapped in an `Arc`, and only ever read.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::style::{Font, PageNumber};

/// Number of layout units a row is divided into.
pub const GRID_SIZE: u8 = 12;

/// A positioning rectangle in points, origin at the top-left of the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Cell {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// An independent copy. `Cell` is `Copy`; this exists so call sites
    /// that fork a cursor read as such.
    pub fn copy(&self) -> Cell {
        *self
    }

    /// The rectangle that content with the given intrinsic `dimensions`
    /// occupies when placed in this cell at `percent` of its width,
    /// keeping aspect ratio and never exceeding the cell height.
    pub fn fit(&self, dimensions: Dimensions, percent: f64, center: bool, left: f64, top: f64) -> Cell {
        let scale = percent / 100.0;
        if dimensions.width <= 0.0 || dimensions.height <= 0.0 {
            return Cell::new(self.x + left, self.y + top, 0.0, 0.0);
        }
        let proportion = dimensions.height / dimensions.width;
        let mut width = self.width * scale;
        let mut height = width * proportion;
        if self.height > 0.0 && height > self.height * scale {
            height = self.height * scale;
            width = height / proportion;
        }
        if center {
            Cell::new(
                self.x + (self.width - width) / 2.0,
                self.y + (self.height - height) / 2.0,
                width,
                height,
            )
        } else {
            Cell::new(self.x + left, self.y + top, width, height)
        }
    }
}

/// Width and height of something, in whatever unit its source uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Edge values (top, right, bottom, left) used for margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Image encodings the engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    Jpg,
    Jpeg,
    Png,
}

impl Extension {
    pub fn is_jpeg(&self) -> bool {
        matches!(self, Extension::Jpg | Extension::Jpeg)
    }
}

/// A full-page background drawn behind every page's rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundImage {
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
    pub extension: Extension,
}

/// Document metadata embedded in the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// Process-wide render configuration. Read-only once handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub page_size: PageSize,
    pub orientation: Orientation,
    /// Page margins in points (1/72 inch).
    pub margins: Edges,
    pub default_font: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<BackgroundImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<PageNumber>,
    pub metadata: Metadata,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            margins: Edges::uniform(28.35), // 10mm
            default_font: Font::default(),
            background_image: None,
            page_number: None,
            metadata: Metadata::default(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Page (width, height) in points after orientation is applied.
    pub fn page_dimensions(&self) -> (f64, f64) {
        let (w, h) = self.page_size.dimensions();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// The usable content rectangle inside the margins.
    pub fn root_cell(&self) -> Cell {
        let (w, h) = self.page_dimensions();
        Cell::new(
            self.margins.left,
            self.margins.top,
            (w - self.margins.horizontal()).max(0.0),
            (h - self.margins.vertical()).max(0.0),
        )
    }
}

/// Fluent construction of a [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.config.orientation = orientation;
        self
    }

    pub fn with_margins(mut self, margins: Edges) -> Self {
        self.config.margins = margins;
        self
    }

    pub fn with_default_font(mut self, font: Font) -> Self {
        self.config.default_font = font;
        self
    }

    pub fn with_background_image(mut self, bytes: Vec<u8>, extension: Extension) -> Self {
        self.config.background_image = Some(BackgroundImage { bytes, extension });
        self
    }

    pub fn with_page_number(mut self, page_number: PageNumber) -> Self {
        self.config.page_number = Some(page_number);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.config.metadata = metadata;
        self
    }

    pub fn build(self) -> Arc<Config> {
        Arc::new(self.config)
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(serde::de::Error::custom)
    }
}
