//! # Folio
//!
//! A grid-based document layout engine.
//!
//! A document is a stack of rows. Each row is split into columns on a
//! twelve-unit grid, and each column holds components: text, images,
//! lines, signature spaces, QR codes. Folio measures everything bottom-up,
//! flows rows down the page, breaks pages when a row no longer fits,
//! repeats headers and footers with page numbers substituted in, and hands
//! every draw call to a [`Provider`](provider::Provider).
//!
//! ## Architecture
//!
//! ```text
//! Input (builder API / JSON)
//!       ↓
//!   [document]    — Pagination, header/footer repetition, numbering
//!       ↓
//!   [layout]      — Page → Row → Col: heights and cursor flow
//!       ↓
//!   [components]  — Leaf content: measure and draw
//!       ↓
//!   [provider]    — Drawing backend ([pdf] or a recording fake)
//! ```
//!
//! ```no_run
//! use folio::components::Text;
//! use folio::layout::{Col, Row};
//! use folio::model::Config;
//! use folio::style::PageNumber;
//! use folio::Document;
//!
//! let config = Config::builder().with_page_number(PageNumber::new("{n}")).build();
//! let mut document = Document::new(config);
//! document
//!     .register_footer(vec![Row::auto().with(Col::full().with(Text::new("Page {n}")))])
//!     .unwrap();
//! document.add_row(20.0, vec![Col::new(12).with(Text::new("Hello"))]);
//! document.generate().unwrap().save("hello.pdf").unwrap();
//! ```

pub mod components;
pub mod document;
pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod provider;
pub mod schema;
pub mod structure;
pub mod style;
pub mod text;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use document::{Document, GeneratedDocument};
pub use error::FolioError;
pub use schema::DocumentSpec;
pub use structure::StructureNode;

/// Render a document described as JSON to PDF.
pub fn generate_json(json: &str) -> Result<GeneratedDocument, FolioError> {
    DocumentSpec::from_json(json)?.into_document()?.generate()
}

/// The structure tree of a document described as JSON, without rendering.
pub fn structure_json(json: &str) -> Result<StructureNode, FolioError> {
    Ok(DocumentSpec::from_json(json)?.into_document()?.structure())
}
