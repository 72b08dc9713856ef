//! # PDF Backend
//!
//! A [`Provider`] that writes a PDF 1.7 file from scratch. Draw calls are
//! turned into content-stream operators as they arrive; fonts and images
//! are collected on the side and only become PDF objects when
//! [`Provider::generate_bytes`] assembles the file.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (catalog, page tree, fonts, images, pages)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Layout hands us cells with a top-left origin; PDF user space has its
//! origin at the bottom-left, so every y is flipped against the page height.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io::Write as IoWrite;
use std::sync::Arc;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::FolioError;
use crate::font::{FontContext, StandardFont};
use crate::image_loader::{self, ImagePixelData, JpegColorSpace, LoadedImage};
use crate::model::{Cell, Config, Dimensions, Extension, Metadata};
use crate::provider::{font_spec, Provider, LINE_HEIGHT};
use crate::style::{
    BorderType, CellStyle, Color, LineOrientation, LineProps, RectProps, SignatureProps, TextAlign,
    TextProps,
};
use crate::text::TextLayout;

/// One page being drawn.
struct PdfPage {
    width: f64,
    height: f64,
    content: Vec<u8>,
    /// Indices into `PdfProvider::images` drawn on this page.
    images: Vec<usize>,
}

struct PdfObject {
    data: Vec<u8>,
}

pub struct PdfProvider {
    fonts: FontContext,
    config: Option<Arc<Config>>,
    pages: Vec<PdfPage>,
    /// Fonts in first-use order; index i is resource /Fi.
    used_fonts: Vec<StandardFont>,
    /// Decoded images; index i is resource /Imi.
    images: Vec<LoadedImage>,
    image_cache: HashMap<u64, usize>,
}

impl Default for PdfProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProvider {
    pub fn new() -> Self {
        Self {
            fonts: FontContext::new(),
            config: None,
            pages: Vec::new(),
            used_fonts: Vec::new(),
            images: Vec::new(),
            image_cache: HashMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page(&mut self) -> Result<&mut PdfPage, FolioError> {
        self.pages
            .last_mut()
            .ok_or_else(|| FolioError::ProviderDraw("Draw call before the first page".to_string()))
    }

    fn font_resource(&mut self, font: StandardFont) -> usize {
        match self.used_fonts.iter().position(|f| *f == font) {
            Some(i) => i,
            None => {
                self.used_fonts.push(font);
                self.used_fonts.len() - 1
            }
        }
    }

    /// Decode once per distinct byte string; the background image is drawn
    /// on every page but embedded a single time.
    fn image_resource(&mut self, bytes: &[u8], extension: Extension) -> Result<usize, FolioError> {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        extension.hash(&mut hasher);
        let key = hasher.finish();
        if let Some(&index) = self.image_cache.get(&key) {
            return Ok(index);
        }
        let loaded = image_loader::decode_image_bytes(bytes, extension)?;
        self.images.push(loaded);
        let index = self.images.len() - 1;
        self.image_cache.insert(key, index);
        Ok(index)
    }

    fn draw_image(
        &mut self,
        bytes: &[u8],
        cell: &Cell,
        prop: &RectProps,
        extension: Extension,
    ) -> Result<(), FolioError> {
        let index = self.image_resource(bytes, extension)?;
        let image = &self.images[index];
        let dims = Dimensions::new(image.width_px as f64, image.height_px as f64);
        let mut prop = prop.clone();
        prop.make_valid();
        let rect = cell.fit(dims, prop.percent, prop.center, prop.left, prop.top);

        let page = self.current_page()?;
        if !page.images.contains(&index) {
            page.images.push(index);
        }
        let y = page.height - rect.y - rect.height;
        let _ = write!(
            page.content,
            "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
            rect.width, rect.height, rect.x, y, index
        );
        Ok(())
    }

    fn write_rect(page: &mut PdfPage, x: f64, y: f64, w: f64, h: f64, op: &str) {
        let pdf_y = page.height - y - h;
        let _ = write!(page.content, "{:.2} {:.2} {:.2} {:.2} re\n{}\n", x, pdf_y, w, h, op);
    }

    fn write_segment(page: &mut PdfPage, x1: f64, y1: f64, x2: f64, y2: f64) {
        let _ = write!(
            page.content,
            "{:.2} {:.2} m\n{:.2} {:.2} l\nS\n",
            x1,
            page.height - y1,
            x2,
            page.height - y2
        );
    }

    fn set_fill(page: &mut PdfPage, c: Color) {
        let _ = write!(page.content, "{:.3} {:.3} {:.3} rg\n", c.r, c.g, c.b);
    }

    fn set_stroke(page: &mut PdfPage, c: Color, width: f64) {
        let _ = write!(page.content, "{:.3} {:.3} {:.3} RG\n{:.2} w\n", c.r, c.g, c.b, width);
    }

    /// Write a single image as one or two XObject PDF objects.
    /// Returns the main XObject ID.
    fn write_image_xobject(objects: &mut Vec<PdfObject>, image: &LoadedImage) -> usize {
        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let color_space_str = match color_space {
                    JpegColorSpace::DeviceRGB => "/DeviceRGB",
                    JpegColorSpace::DeviceGray => "/DeviceGray",
                };
                let mut obj_data: Vec<u8> = Vec::new();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace {} /BitsPerComponent 8 /Filter /DCTDecode \
                     /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    color_space_str,
                    data.len()
                );
                obj_data.extend_from_slice(data);
                obj_data.extend_from_slice(b"\nendstream");
                objects.push(PdfObject { data: obj_data });
                objects.len() - 1
            }

            ImagePixelData::Decoded { rgb, alpha } => {
                let smask_id = alpha.as_ref().map(|alpha_data| {
                    let compressed_alpha = compress_to_vec_zlib(alpha_data, 6);
                    let mut smask_data: Vec<u8> = Vec::new();
                    let _ = write!(
                        smask_data,
                        "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                         /ColorSpace /DeviceGray /BitsPerComponent 8 \
                         /Filter /FlateDecode /Length {} >>\nstream\n",
                        image.width_px,
                        image.height_px,
                        compressed_alpha.len()
                    );
                    smask_data.extend_from_slice(&compressed_alpha);
                    smask_data.extend_from_slice(b"\nendstream");
                    objects.push(PdfObject { data: smask_data });
                    objects.len() - 1
                });

                let compressed_rgb = compress_to_vec_zlib(rgb, 6);
                let smask_ref = smask_id
                    .map(|id| format!(" /SMask {} 0 R", id))
                    .unwrap_or_default();
                let mut obj_data: Vec<u8> = Vec::new();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace /DeviceRGB /BitsPerComponent 8 \
                     /Filter /FlateDecode /Length {}{} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    compressed_rgb.len(),
                    smask_ref
                );
                obj_data.extend_from_slice(&compressed_rgb);
                obj_data.extend_from_slice(b"\nendstream");
                objects.push(PdfObject { data: obj_data });
                objects.len() - 1
            }
        }
    }

    fn info_dictionary(metadata: &Metadata) -> Vec<u8> {
        let mut info: Vec<u8> = b"<< ".to_vec();
        let entries = [
            ("Title", metadata.title.clone()),
            ("Author", metadata.author.clone()),
            ("Subject", metadata.subject.clone()),
            ("Creator", metadata.creator.clone()),
            (
                "Keywords",
                (!metadata.keywords.is_empty()).then(|| metadata.keywords.join(", ")),
            ),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                let _ = write!(info, "/{} (", key);
                info.extend_from_slice(&encode_pdf_string(&value));
                info.extend_from_slice(b") ");
            }
        }
        let _ = write!(info, "/Producer (folio {}) >>", env!("CARGO_PKG_VERSION"));
        info
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(objects: &[PdfObject], info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len(),
            info_obj_id,
            xref_offset
        );
        output
    }
}

impl Provider for PdfProvider {
    fn font_context(&self) -> &FontContext {
        &self.fonts
    }

    fn set_config(&mut self, config: Arc<Config>) {
        self.config = Some(config);
    }

    fn begin_page(&mut self, _number: usize, _total: usize) -> Result<(), FolioError> {
        let config = self.config.as_ref().ok_or_else(|| {
            FolioError::ConfigMissing("PDF page opened before a configuration was set".to_string())
        })?;
        let (width, height) = config.page_dimensions();
        self.pages.push(PdfPage {
            width,
            height,
            content: Vec::new(),
            images: Vec::new(),
        });
        Ok(())
    }

    fn generate_bytes(&mut self) -> Result<Vec<u8>, FolioError> {
        // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages
        let mut objects: Vec<PdfObject> = (0..3).map(|_| PdfObject { data: Vec::new() }).collect();

        if self.used_fonts.is_empty() {
            self.used_fonts.push(StandardFont::Helvetica);
        }
        let font_resources = self
            .used_fonts
            .iter()
            .enumerate()
            .map(|(i, font)| {
                objects.push(PdfObject {
                    data: format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                        font.pdf_name()
                    )
                    .into_bytes(),
                });
                format!("/F{} {} 0 R", i, objects.len() - 1)
            })
            .collect::<Vec<_>>()
            .join(" ");

        let image_ids: Vec<usize> = self
            .images
            .iter()
            .map(|image| Self::write_image_xobject(&mut objects, image))
            .collect();

        let mut page_obj_ids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let compressed = compress_to_vec_zlib(&page.content, 6);
            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            objects.push(PdfObject { data: content_data });
            let content_obj_id = objects.len() - 1;

            let xobjects = page
                .images
                .iter()
                .map(|&i| format!("/Im{} {} 0 R", i, image_ids[i]))
                .collect::<Vec<_>>()
                .join(" ");
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> /XObject << {} >> >> >>",
                page.width, page.height, content_obj_id, font_resources, xobjects
            );
            objects.push(PdfObject {
                data: page_dict.into_bytes(),
            });
            page_obj_ids.push(objects.len() - 1);
        }

        objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();
        let kids = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        objects[2].data = format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, page_obj_ids.len())
            .into_bytes();

        let metadata = self
            .config
            .as_ref()
            .map(|c| c.metadata.clone())
            .unwrap_or_default();
        objects.push(PdfObject {
            data: Self::info_dictionary(&metadata),
        });
        let info_obj_id = objects.len() - 1;

        Ok(Self::serialize(&objects, info_obj_id))
    }

    fn add_background_image(
        &mut self,
        bytes: &[u8],
        cell: &Cell,
        prop: &RectProps,
        extension: Extension,
    ) -> Result<(), FolioError> {
        self.draw_image(bytes, cell, prop, extension)
    }

    fn add_text(&mut self, text: &str, cell: &Cell, prop: &TextProps) -> Result<(), FolioError> {
        let spec = font_spec(prop);
        let font = self.fonts.resolve(spec.family, spec.weight, spec.italic);
        let font_index = self.font_resource(font);
        let available = (cell.width - prop.left - prop.right).max(0.0);
        let lines = TextLayout::new().break_into_lines(&self.fonts, text, available, spec);
        let line_height = spec.size * LINE_HEIGHT;
        let baseline_offset = spec.size * font.metrics().ascent + (line_height - spec.size) / 2.0;
        let color = prop.color();

        let page = self.current_page()?;
        let _ = write!(page.content, "BT\n");
        Self::set_fill(page, color);
        let _ = write!(page.content, "/F{} {:.1} Tf\n", font_index, spec.size);

        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            let top = cell.y + prop.top + i as f64 * (line_height + prop.vertical_padding);
            let slack = (available - line.width).max(0.0);
            let x = match prop.align {
                TextAlign::Left | TextAlign::Justify => cell.x + prop.left,
                TextAlign::Right => cell.x + prop.left + slack,
                TextAlign::Center => cell.x + prop.left + slack / 2.0,
            };
            let spaces = line.text.chars().filter(|c| *c == ' ').count();
            let word_spacing = if prop.align == TextAlign::Justify && i < last && spaces > 0 {
                slack / spaces as f64
            } else {
                0.0
            };
            // Tm sets an absolute position per line.
            let _ = write!(
                page.content,
                "{:.3} Tw\n1 0 0 1 {:.2} {:.2} Tm\n(",
                word_spacing,
                x,
                page.height - top - baseline_offset
            );
            page.content.extend_from_slice(&encode_pdf_string(&line.text));
            let _ = write!(page.content, ") Tj\n");
        }
        let _ = write!(page.content, "ET\n");
        Ok(())
    }

    fn add_image(
        &mut self,
        bytes: &[u8],
        cell: &Cell,
        prop: &RectProps,
        extension: Extension,
    ) -> Result<(), FolioError> {
        self.draw_image(bytes, cell, prop, extension)
    }

    fn add_line(&mut self, cell: &Cell, prop: &LineProps) -> Result<(), FolioError> {
        let mut prop = prop.clone();
        prop.make_valid();
        let page = self.current_page()?;
        let _ = write!(page.content, "q\n");
        Self::set_stroke(page, prop.color, prop.thickness);
        match prop.orientation {
            LineOrientation::Horizontal => {
                let length = cell.width * prop.size_percent / 100.0;
                let x = cell.x + (cell.width - length) / 2.0;
                let y = cell.y + cell.height * prop.offset_percent / 100.0;
                Self::write_segment(page, x, y, x + length, y);
            }
            LineOrientation::Vertical => {
                let length = cell.height * prop.size_percent / 100.0;
                let y = cell.y + (cell.height - length) / 2.0;
                let x = cell.x + cell.width * prop.offset_percent / 100.0;
                Self::write_segment(page, x, y, x, y + length);
            }
        }
        let _ = write!(page.content, "Q\n");
        Ok(())
    }

    fn add_signature(
        &mut self,
        label: &str,
        cell: &Cell,
        prop: &SignatureProps,
    ) -> Result<(), FolioError> {
        let line_y = cell.y + prop.safe_padding;
        {
            let page = self.current_page()?;
            let _ = write!(page.content, "q\n");
            Self::set_stroke(page, prop.line_color.unwrap_or(Color::BLACK), prop.line_thickness);
            let inset = cell.width * 0.1;
            Self::write_segment(page, cell.x + inset, line_y, cell.x + cell.width - inset, line_y);
            let _ = write!(page.content, "Q\n");
        }
        let label_cell = Cell::new(
            cell.x,
            line_y + prop.line_thickness,
            cell.width,
            (cell.height - prop.safe_padding - prop.line_thickness).max(0.0),
        );
        self.add_text(label, &label_cell, &prop.font)
    }

    fn add_qr_code(&mut self, code: &str, cell: &Cell, prop: &RectProps) -> Result<(), FolioError> {
        let qr = qrcode::QrCode::new(code.as_bytes())
            .map_err(|e| FolioError::MalformedContent(format!("Cannot encode QR code: {}", e)))?;
        let modules = qr.width();
        let colors = qr.to_colors();

        let mut prop = prop.clone();
        prop.make_valid();
        let rect = cell.fit(Dimensions::new(1.0, 1.0), prop.percent, prop.center, prop.left, prop.top);
        let module_size = rect.width / modules as f64;

        let page = self.current_page()?;
        let _ = write!(page.content, "q\n");
        Self::set_fill(page, Color::BLACK);
        for (i, color) in colors.iter().enumerate() {
            if *color == qrcode::Color::Dark {
                let col = (i % modules) as f64;
                let row = (i / modules) as f64;
                let x = rect.x + col * module_size;
                let y = page.height - (rect.y + (row + 1.0) * module_size);
                let _ = write!(
                    page.content,
                    "{:.3} {:.3} {:.3} {:.3} re\n",
                    x, y, module_size, module_size
                );
            }
        }
        let _ = write!(page.content, "f\nQ\n");
        Ok(())
    }

    fn create_col(&mut self, cell: &Cell, style: Option<&CellStyle>) -> Result<(), FolioError> {
        let Some(style) = style else {
            return Ok(());
        };
        let page = self.current_page()?;

        if let Some(bg) = style.background_color.filter(|bg| bg.a > 0.0) {
            let _ = write!(page.content, "q\n");
            Self::set_fill(page, bg);
            Self::write_rect(page, cell.x, cell.y, cell.width, cell.height, "f");
            let _ = write!(page.content, "Q\n");
        }

        if style.has_border() {
            let _ = write!(page.content, "q\n");
            Self::set_stroke(
                page,
                style.border_color.unwrap_or(Color::BLACK),
                style.border_thickness,
            );
            let (x, y, w, h) = (cell.x, cell.y, cell.width, cell.height);
            match style.border_type {
                BorderType::Full => Self::write_rect(page, x, y, w, h, "S"),
                BorderType::Top => Self::write_segment(page, x, y, x + w, y),
                BorderType::Bottom => Self::write_segment(page, x, y + h, x + w, y + h),
                BorderType::Left => Self::write_segment(page, x, y, x, y + h),
                BorderType::Right => Self::write_segment(page, x + w, y, x + w, y + h),
                BorderType::None => {}
            }
            let _ = write!(page.content, "Q\n");
        }
        Ok(())
    }
}

/// Encode text as a WinAnsi PDF literal string body, escaping delimiters.
/// Characters outside WinAnsi become `?`.
fn encode_pdf_string(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        let byte = unicode_to_winansi(ch).unwrap_or(b'?');
        if matches!(byte, b'\\' | b'(' | b')') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out
}

/// Map a Unicode codepoint to a WinAnsiEncoding byte value.
///
/// WinAnsiEncoding is based on Windows-1252. Most codepoints in
/// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
/// contains special mappings for smart quotes, bullets, dashes, etc.
fn unicode_to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    match cp {
        0x20AC => Some(0x80), // Euro sign
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85), // Horizontal ellipsis
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91), // Smart quotes
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95), // Bullet
        0x2013 => Some(0x96), // En dash
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99), // Trade mark sign
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_loader::tests::{jpeg_bytes, png_bytes};

    fn configured() -> PdfProvider {
        let mut provider = PdfProvider::new();
        provider.set_config(Config::builder().build());
        provider
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn page_content(provider: &PdfProvider) -> String {
        String::from_utf8_lossy(&provider.pages[0].content).into_owned()
    }

    #[test]
    fn test_encode_pdf_string() {
        assert_eq!(encode_pdf_string("Hello (World)"), b"Hello \\(World\\)".to_vec());
        assert_eq!(encode_pdf_string("back\\slash"), b"back\\\\slash".to_vec());
        assert_eq!(encode_pdf_string("€"), vec![0x80]);
        assert_eq!(encode_pdf_string("日"), b"?".to_vec());
    }

    #[test]
    fn test_begin_page_requires_config() {
        let mut provider = PdfProvider::new();
        let err = provider.begin_page(1, 1).unwrap_err();
        assert!(matches!(err, FolioError::ConfigMissing(_)));
    }

    #[test]
    fn test_draw_before_page_fails() {
        let mut provider = configured();
        let err = provider
            .add_text("x", &Cell::new(0.0, 0.0, 10.0, 10.0), &TextProps::default())
            .unwrap_err();
        assert!(matches!(err, FolioError::ProviderDraw(_)));
    }

    #[test]
    fn test_empty_document_produces_valid_pdf() {
        let mut provider = configured();
        provider.begin_page(1, 1).unwrap();
        let bytes = provider.generate_bytes().unwrap();

        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(contains(&bytes, b"%%EOF"));
        assert!(contains(&bytes, b"xref"));
        assert!(contains(&bytes, b"trailer"));
        assert!(contains(&bytes, b"/Count 1"));
    }

    #[test]
    fn test_metadata_in_pdf() {
        let config = Config::builder()
            .with_metadata(Metadata {
                title: Some("Test Document".to_string()),
                author: Some("Folio".to_string()),
                keywords: vec!["a".to_string(), "b".to_string()],
                ..Default::default()
            })
            .build();
        let mut provider = PdfProvider::new();
        provider.set_config(config);
        provider.begin_page(1, 1).unwrap();
        let bytes = provider.generate_bytes().unwrap();

        assert!(contains(&bytes, b"/Title (Test Document)"));
        assert!(contains(&bytes, b"/Author (Folio)"));
        assert!(contains(&bytes, b"/Keywords (a, b)"));
    }

    #[test]
    fn test_bold_font_registered_separately() {
        let mut provider = configured();
        provider.begin_page(1, 1).unwrap();
        let cell = Cell::new(10.0, 10.0, 200.0, 20.0);
        provider.add_text("A", &cell, &TextProps::default()).unwrap();
        provider.add_text("B", &cell, &TextProps::default().bold()).unwrap();
        let bytes = provider.generate_bytes().unwrap();

        assert!(contains(&bytes, b"/BaseFont /Helvetica "));
        assert!(contains(&bytes, b"/BaseFont /Helvetica-Bold"));
    }

    #[test]
    fn test_text_is_flipped_into_pdf_space() {
        let mut provider = configured();
        provider.begin_page(1, 1).unwrap();
        let props = TextProps::default().sized(10.0);
        provider.add_text("Hi", &Cell::new(20.0, 0.0, 200.0, 20.0), &props).unwrap();
        let content = page_content(&provider);
        let page_height = provider.pages[0].height;
        // First baseline sits ascent plus half the leading below the cell top.
        let baseline = page_height - (10.0 * 0.718 + 1.0);
        assert!(content.contains(&format!("1 0 0 1 20.00 {:.2} Tm", baseline)), "{}", content);
        assert!(content.contains("(Hi) Tj"));
    }

    #[test]
    fn test_right_aligned_text_ends_at_cell_edge() {
        let mut provider = configured();
        provider.begin_page(1, 1).unwrap();
        let props = TextProps::default().aligned(TextAlign::Right);
        provider.add_text("Hi", &Cell::new(0.0, 0.0, 100.0, 20.0), &props).unwrap();
        let width = provider.fonts.measure_string("Hi", "Helvetica", 400, false, 10.0);
        let content = page_content(&provider);
        assert!(content.contains(&format!("1 0 0 1 {:.2} ", 100.0 - width)));
    }

    #[test]
    fn test_col_style_draws_background_and_border() {
        let mut provider = configured();
        provider.begin_page(1, 1).unwrap();
        let style = CellStyle {
            background_color: Some(Color::rgb(1.0, 0.0, 0.0)),
            border_type: BorderType::Full,
            border_thickness: 1.0,
            ..Default::default()
        };
        let cell = Cell::new(0.0, 0.0, 50.0, 20.0);
        provider.create_col(&cell, Some(&style)).unwrap();
        let content = page_content(&provider);
        assert!(content.contains("1.000 0.000 0.000 rg"));
        assert!(content.contains("re\nf"));
        assert!(content.contains("re\nS"));
    }

    #[test]
    fn test_unstyled_col_draws_nothing() {
        let mut provider = configured();
        provider.begin_page(1, 1).unwrap();
        provider.create_col(&Cell::new(0.0, 0.0, 50.0, 20.0), None).unwrap();
        assert!(provider.pages[0].content.is_empty());
    }

    #[test]
    fn test_jpeg_embedded_with_dct_decode() {
        let mut provider = configured();
        provider.begin_page(1, 1).unwrap();
        let jpeg = jpeg_bytes(4, 2);
        provider
            .add_image(&jpeg, &Cell::new(0.0, 0.0, 100.0, 100.0), &RectProps::default(), Extension::Jpg)
            .unwrap();
        let content = page_content(&provider);
        assert!(content.contains("100.00 0 0 50.00"), "{}", content);
        let bytes = provider.generate_bytes().unwrap();
        assert!(contains(&bytes, b"/Filter /DCTDecode"));
        assert!(contains(&bytes, b"/Im0 "));
    }

    #[test]
    fn test_png_alpha_gets_smask() {
        let mut provider = configured();
        provider.begin_page(1, 1).unwrap();
        let png = png_bytes(2, 2, 100);
        provider
            .add_image(&png, &Cell::new(0.0, 0.0, 10.0, 10.0), &RectProps::default(), Extension::Png)
            .unwrap();
        let bytes = provider.generate_bytes().unwrap();
        assert!(contains(&bytes, b"/SMask"));
    }

    #[test]
    fn test_repeated_background_embedded_once() {
        let mut provider = configured();
        let png = png_bytes(2, 2, 255);
        let cell = Cell::new(0.0, 0.0, 10.0, 10.0);
        for n in 1..=3 {
            provider.begin_page(n, 3).unwrap();
            provider
                .add_background_image(&png, &cell, &RectProps::default(), Extension::Png)
                .unwrap();
        }
        assert_eq!(provider.images.len(), 1);
        assert_eq!(provider.page_count(), 3);
    }

    #[test]
    fn test_malformed_image_is_reported() {
        let mut provider = configured();
        provider.begin_page(1, 1).unwrap();
        let err = provider
            .add_image(b"not an image", &Cell::new(0.0, 0.0, 10.0, 10.0), &RectProps::default(), Extension::Png)
            .unwrap_err();
        assert!(matches!(err, FolioError::MalformedContent(_)));
    }

    #[test]
    fn test_qr_code_draws_modules() {
        let mut provider = configured();
        provider.begin_page(1, 1).unwrap();
        provider
            .add_qr_code("https://example.com", &Cell::new(0.0, 0.0, 50.0, 50.0), &RectProps::default())
            .unwrap();
        let content = page_content(&provider);
        assert!(content.matches(" re\n").count() > 20);
    }

    #[test]
    fn test_oversized_qr_payload_is_malformed() {
        let mut provider = configured();
        provider.begin_page(1, 1).unwrap();
        let payload = "x".repeat(8000);
        let err = provider
            .add_qr_code(&payload, &Cell::new(0.0, 0.0, 50.0, 50.0), &RectProps::default())
            .unwrap_err();
        assert!(matches!(err, FolioError::MalformedContent(_)));
    }

    #[test]
    fn test_signature_draws_line_and_label() {
        let mut provider = configured();
        provider.begin_page(1, 1).unwrap();
        let mut props = SignatureProps::default();
        props.make_valid(&crate::style::Font::default());
        provider
            .add_signature("Signed", &Cell::new(0.0, 0.0, 100.0, 30.0), &props)
            .unwrap();
        let content = page_content(&provider);
        assert!(content.contains(" l\nS"));
        assert!(content.contains("(Signed) Tj"));
    }
}
