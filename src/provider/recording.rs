//! An instrumented provider that records every call instead of drawing.
//!
//! Useful for asserting layout (cursor positions, substituted text) without
//! parsing PDF output, and for dumping a render as JSON.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Provider;
use crate::error::FolioError;
use crate::font::FontContext;
use crate::model::{Cell, Config, Extension};
use crate::style::{CellStyle, LineProps, RectProps, SignatureProps, TextProps};

/// One recorded provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum DrawCall {
    PageStart { number: usize, total: usize },
    BackgroundImage { cell: Cell, extension: Extension, len: usize },
    Text { text: String, cell: Cell },
    Image { cell: Cell, extension: Extension, len: usize },
    Line { cell: Cell },
    Signature { label: String, cell: Cell },
    QrCode { code: String, cell: Cell },
    Col { cell: Cell, styled: bool },
    Row { cell: Cell },
}

#[derive(Default)]
pub struct RecordingProvider {
    fonts: FontContext,
    config: Option<Arc<Config>>,
    calls: Vec<DrawCall>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn config(&self) -> Option<&Arc<Config>> {
        self.config.as_ref()
    }

    /// Text drawn so far, in call order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Cells of every rendered row band, in call order.
    pub fn row_cells(&self) -> Vec<Cell> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Row { cell } => Some(*cell),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Provider for RecordingProvider {
    fn font_context(&self) -> &FontContext {
        &self.fonts
    }

    fn set_config(&mut self, config: Arc<Config>) {
        self.config = Some(config);
    }

    fn begin_page(&mut self, number: usize, total: usize) -> Result<(), FolioError> {
        self.calls.push(DrawCall::PageStart { number, total });
        Ok(())
    }

    fn generate_bytes(&mut self) -> Result<Vec<u8>, FolioError> {
        serde_json::to_vec(&self.calls).map_err(|e| FolioError::ProviderDraw(e.to_string()))
    }

    fn add_background_image(
        &mut self,
        bytes: &[u8],
        cell: &Cell,
        _prop: &RectProps,
        extension: Extension,
    ) -> Result<(), FolioError> {
        self.calls.push(DrawCall::BackgroundImage {
            cell: *cell,
            extension,
            len: bytes.len(),
        });
        Ok(())
    }

    fn add_text(&mut self, text: &str, cell: &Cell, _prop: &TextProps) -> Result<(), FolioError> {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            cell: *cell,
        });
        Ok(())
    }

    fn add_image(
        &mut self,
        bytes: &[u8],
        cell: &Cell,
        _prop: &RectProps,
        extension: Extension,
    ) -> Result<(), FolioError> {
        self.calls.push(DrawCall::Image {
            cell: *cell,
            extension,
            len: bytes.len(),
        });
        Ok(())
    }

    fn add_line(&mut self, cell: &Cell, _prop: &LineProps) -> Result<(), FolioError> {
        self.calls.push(DrawCall::Line { cell: *cell });
        Ok(())
    }

    fn add_signature(
        &mut self,
        label: &str,
        cell: &Cell,
        _prop: &SignatureProps,
    ) -> Result<(), FolioError> {
        self.calls.push(DrawCall::Signature {
            label: label.to_string(),
            cell: *cell,
        });
        Ok(())
    }

    fn add_qr_code(&mut self, code: &str, cell: &Cell, _prop: &RectProps) -> Result<(), FolioError> {
        self.calls.push(DrawCall::QrCode {
            code: code.to_string(),
            cell: *cell,
        });
        Ok(())
    }

    fn create_col(&mut self, cell: &Cell, style: Option<&CellStyle>) -> Result<(), FolioError> {
        self.calls.push(DrawCall::Col {
            cell: *cell,
            styled: style.is_some(),
        });
        Ok(())
    }

    fn create_row(&mut self, cell: &Cell) -> Result<(), FolioError> {
        self.calls.push(DrawCall::Row { cell: *cell });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_bytes_is_json_of_calls() {
        let mut provider = RecordingProvider::new();
        provider.begin_page(1, 1).unwrap();
        provider
            .add_text("Hi", &Cell::new(0.0, 0.0, 10.0, 10.0), &TextProps::default())
            .unwrap();
        let bytes = provider.generate_bytes().unwrap();
        let calls: Vec<DrawCall> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(calls, provider.calls());
        assert_eq!(provider.texts(), vec!["Hi"]);
    }

    #[test]
    fn default_measurement_wraps_text() {
        let provider = RecordingProvider::new();
        let props = TextProps::default();
        assert_eq!(provider.lines_quantity("Hello", &props, 500.0), 1);
        assert!(provider.lines_quantity("Hello there general", &props, 30.0) > 1);
        assert!((provider.font_height(&props) - 12.0).abs() < 1e-9);
    }
}
