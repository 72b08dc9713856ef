//! # Rendering Providers
//!
//! The layout core never draws. It hands a cell and some props to a
//! [`Provider`] and moves its cursor on. A provider also answers the few
//! measurement questions the core needs to compute heights (how many lines
//! does this text wrap into, how tall is a line, what shape is this image),
//! and finally packages what it drew into bytes.
//!
//! Measurement methods have default implementations built on the standard
//! font metrics and the image loader, so a backend only has to draw.

pub mod recording;

use std::sync::Arc;

pub use recording::{DrawCall, RecordingProvider};

use crate::error::FolioError;
use crate::font::FontContext;
use crate::image_loader;
use crate::model::{Cell, Config, Dimensions, Extension};
use crate::style::{CellStyle, LineProps, RectProps, SignatureProps, TextProps};
use crate::text::{FontSpec, TextLayout};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.2;

/// A rendering backend.
pub trait Provider {
    /// Fonts used to measure text.
    fn font_context(&self) -> &FontContext;

    /// Receive the document configuration before the first page opens.
    fn set_config(&mut self, _config: Arc<Config>) {}

    /// A new page starts; everything drawn until the next call lands on it.
    fn begin_page(&mut self, _number: usize, _total: usize) -> Result<(), FolioError> {
        Ok(())
    }

    /// Package everything drawn so far.
    fn generate_bytes(&mut self) -> Result<Vec<u8>, FolioError>;

    fn add_background_image(
        &mut self,
        bytes: &[u8],
        cell: &Cell,
        prop: &RectProps,
        extension: Extension,
    ) -> Result<(), FolioError>;

    fn add_text(&mut self, text: &str, cell: &Cell, prop: &TextProps) -> Result<(), FolioError>;

    fn add_image(
        &mut self,
        bytes: &[u8],
        cell: &Cell,
        prop: &RectProps,
        extension: Extension,
    ) -> Result<(), FolioError>;

    fn add_line(&mut self, cell: &Cell, prop: &LineProps) -> Result<(), FolioError>;

    fn add_signature(
        &mut self,
        label: &str,
        cell: &Cell,
        prop: &SignatureProps,
    ) -> Result<(), FolioError>;

    fn add_qr_code(&mut self, code: &str, cell: &Cell, prop: &RectProps) -> Result<(), FolioError>;

    /// Draw a column (or row) cell's border and background.
    fn create_col(&mut self, cell: &Cell, style: Option<&CellStyle>) -> Result<(), FolioError>;

    /// A row band has been fully rendered.
    fn create_row(&mut self, _cell: &Cell) -> Result<(), FolioError> {
        Ok(())
    }

    /// Number of lines `text` wraps into within `width`.
    fn lines_quantity(&self, text: &str, prop: &TextProps, width: f64) -> usize {
        TextLayout::new().count_lines(self.font_context(), text, width.max(0.0), font_spec(prop))
    }

    /// Height of one line of text.
    fn font_height(&self, prop: &TextProps) -> f64 {
        prop.size() * LINE_HEIGHT
    }

    /// Intrinsic pixel dimensions of an encoded image.
    fn image_dimensions(&self, bytes: &[u8], extension: Extension) -> Result<Dimensions, FolioError> {
        image_loader::probe_dimensions(bytes, extension)
    }
}

/// The measurement font described by text props.
pub fn font_spec(prop: &TextProps) -> FontSpec<'_> {
    FontSpec {
        family: prop.family(),
        weight: prop.weight(),
        italic: prop.font_style().is_italic(),
        size: prop.size(),
    }
}
