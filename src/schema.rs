//! # JSON Document Description
//!
//! A serde mirror of the builder API, so a document can arrive as JSON
//! from the CLI or from JavaScript:
//!
//! ```json
//! {
//!   "config": { "pageSize": "A4", "pageNumber": { "pattern": "{n}" } },
//!   "header": [{ "height": 20, "cols": [{ "components": [{ "type": "Text", "value": "Invoice" }] }] }],
//!   "footer": [{ "cols": [{ "components": [{ "type": "Text", "value": "Page {n}" }] }] }],
//!   "rows": [{ "cols": [{ "size": 6, "components": [{ "type": "QrCode", "code": "https://example.com" }] }] }]
//! }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::components::{Component, Image, Line, QrCode, Signature, Text};
use crate::document::Document;
use crate::error::FolioError;
use crate::layout::{Col, Page, Row};
use crate::model::{Config, Extension};
use crate::pdf::PdfProvider;
use crate::provider::Provider;
use crate::style::{CellStyle, LineProps, RectProps, SignatureProps, TextProps};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentSpec {
    pub config: Config,
    pub header: Vec<RowSpec>,
    pub footer: Vec<RowSpec>,
    pub rows: Vec<RowSpec>,
    /// Each page starts on a fresh document page after `rows`.
    pub pages: Vec<PageSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSpec {
    pub rows: Vec<RowSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RowSpec {
    /// Fixed height in points; omitted means automatic.
    pub height: Option<f64>,
    pub style: Option<CellStyle>,
    pub cols: Vec<ColSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColSpec {
    /// Grid units; omitted means the full row.
    pub size: Option<u8>,
    pub style: Option<CellStyle>,
    pub components: Vec<ComponentSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentSpec {
    Text {
        value: String,
        #[serde(default)]
        props: TextProps,
    },
    Image {
        /// Data URI, raw base64 or file path.
        src: String,
        #[serde(default)]
        extension: Option<Extension>,
        #[serde(default)]
        props: RectProps,
    },
    Line {
        #[serde(default)]
        props: LineProps,
    },
    Signature {
        label: String,
        #[serde(default)]
        props: SignatureProps,
    },
    QrCode {
        code: String,
        #[serde(default)]
        props: RectProps,
    },
}

impl ComponentSpec {
    pub fn build(self) -> Result<Box<dyn Component>, FolioError> {
        Ok(match self {
            ComponentSpec::Text { value, props } => Box::new(Text::with_props(value, props)),
            ComponentSpec::Image {
                src,
                extension,
                props,
            } => Box::new(Image::from_source(&src, extension, props)?),
            ComponentSpec::Line { props } => Box::new(Line::with_props(props)),
            ComponentSpec::Signature { label, props } => Box::new(Signature::with_props(label, props)),
            ComponentSpec::QrCode { code, props } => Box::new(QrCode::with_props(code, props)),
        })
    }
}

impl ColSpec {
    pub fn build(self) -> Result<Col, FolioError> {
        let mut col = Col::new(self.size.unwrap_or(0));
        if let Some(style) = self.style {
            col = col.with_style(style);
        }
        for component in self.components {
            col.add_boxed(component.build()?);
        }
        Ok(col)
    }
}

impl RowSpec {
    pub fn build(self) -> Result<Row, FolioError> {
        let mut row = Row::new(self.height.unwrap_or(0.0));
        if let Some(style) = self.style {
            row = row.with_style(style);
        }
        for col in self.cols {
            row.add(col.build()?);
        }
        Ok(row)
    }
}

fn build_rows(rows: Vec<RowSpec>) -> Result<Vec<Row>, FolioError> {
    rows.into_iter().map(RowSpec::build).collect()
}

impl DocumentSpec {
    pub fn from_json(json: &str) -> Result<Self, FolioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_document(self) -> Result<Document<PdfProvider>, FolioError> {
        self.into_document_with(PdfProvider::new())
    }

    /// Build against any backend.
    pub fn into_document_with<P: Provider>(self, provider: P) -> Result<Document<P>, FolioError> {
        let mut document = Document::with_provider(Arc::new(self.config), provider);
        if !self.header.is_empty() {
            document.register_header(build_rows(self.header)?)?;
        }
        if !self.footer.is_empty() {
            document.register_footer(build_rows(self.footer)?)?;
        }
        document.add_rows(build_rows(self.rows)?);

        let pages = self
            .pages
            .into_iter()
            .map(|spec| {
                let mut page = Page::default();
                for row in build_rows(spec.rows)? {
                    page.add(row);
                }
                Ok(page)
            })
            .collect::<Result<Vec<_>, FolioError>>()?;
        document.add_pages(pages);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Node;

    #[test]
    fn parses_tagged_components() {
        let spec = DocumentSpec::from_json(
            r#"{
                "rows": [{
                    "height": 30,
                    "cols": [
                        {"size": 8, "components": [{"type": "Text", "value": "Hi", "props": {"size": 14}}]},
                        {"size": 4, "components": [{"type": "Line"}, {"type": "QrCode", "code": "abc"}]}
                    ]
                }]
            }"#,
        )
        .unwrap();
        let row = spec.rows[0].clone().build().unwrap();
        assert_eq!(row.units(), 12);
        let node = row.structure();
        assert_eq!(node.children[0].children[0].kind, "text");
        assert_eq!(node.children[1].children[1].kind, "qrcode");
    }

    #[test]
    fn unknown_component_is_a_parse_error() {
        let err = DocumentSpec::from_json(r#"{"rows": [{"cols": [{"components": [{"type": "Chart"}]}]}]}"#)
            .unwrap_err();
        assert!(matches!(err, FolioError::ParseError { .. }));
    }

    #[test]
    fn config_fields_are_camel_case() {
        let spec = DocumentSpec::from_json(
            r#"{"config": {"pageSize": "Letter", "pageNumber": {"pattern": "{n}", "totalPattern": "{t}"}}}"#,
        )
        .unwrap();
        let page_number = spec.config.page_number.unwrap();
        assert_eq!(page_number.pattern, "{n}");
        assert_eq!(page_number.total_pattern, "{t}");
    }

    #[test]
    fn image_without_known_type_fails_to_build() {
        let spec = ComponentSpec::Image {
            src: "AAAA".to_string(),
            extension: None,
            props: RectProps::default(),
        };
        assert!(matches!(spec.build(), Err(FolioError::MalformedContent(_))));
    }
}
