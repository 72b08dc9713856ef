use std::sync::Arc;

use log::debug;

use super::{Component, Node};
use crate::error::FolioError;
use crate::image_loader;
use crate::model::{Cell, Config, Extension};
use crate::provider::Provider;
use crate::structure::StructureNode;
use crate::style::RectProps;

/// An encoded JPEG or PNG image scaled into its cell.
#[derive(Clone)]
pub struct Image {
    bytes: Arc<Vec<u8>>,
    extension: Extension,
    prop: RectProps,
    config: Option<Arc<Config>>,
}

impl Image {
    pub fn new(bytes: Vec<u8>, extension: Extension) -> Self {
        Self::with_props(bytes, extension, RectProps::default())
    }

    pub fn with_props(bytes: Vec<u8>, extension: Extension, mut prop: RectProps) -> Self {
        prop.make_valid();
        Self {
            bytes: Arc::new(bytes),
            extension,
            prop,
            config: None,
        }
    }

    /// Load from a data URI, raw base64 or file path. Without an explicit
    /// extension it is guessed from the source.
    pub fn from_source(
        src: &str,
        extension: Option<Extension>,
        prop: RectProps,
    ) -> Result<Self, FolioError> {
        let extension = extension
            .or_else(|| image_loader::extension_from_source(src))
            .ok_or_else(|| {
                FolioError::MalformedContent("Cannot determine image type; set an extension".to_string())
            })?;
        let bytes = image_loader::read_source_bytes(src)?;
        Ok(Self::with_props(bytes, extension, prop))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn extension(&self) -> Extension {
        self.extension
    }
}

impl Node for Image {
    fn set_config(&mut self, config: Arc<Config>) {
        self.config = Some(config);
    }

    fn config(&self) -> Option<&Arc<Config>> {
        self.config.as_ref()
    }

    fn structure(&self) -> StructureNode {
        StructureNode::new("image")
            .with_value(format!("{:?}", self.extension).to_lowercase())
            .with_detail("bytes", self.bytes.len())
    }
}

impl Component for Image {
    fn render(&self, provider: &mut dyn Provider, cell: &Cell) -> Result<(), FolioError> {
        provider.image_dimensions(&self.bytes, self.extension)?;
        provider.add_image(&self.bytes, cell, &self.prop, self.extension)
    }

    fn height(&self, provider: &dyn Provider, cell: &Cell) -> f64 {
        match provider.image_dimensions(&self.bytes, self.extension) {
            Ok(dims) if dims.width > 0.0 => {
                let width = self.prop.percent / 100.0 * cell.width;
                width * (dims.height / dims.width) + self.prop.top
            }
            Ok(_) => self.prop.top,
            Err(e) => {
                debug!("Image measured as empty: {}", e);
                0.0
            }
        }
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }
}
