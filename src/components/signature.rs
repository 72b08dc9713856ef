use std::sync::Arc;

use super::{transformed, Component, Node, TextTransform};
use crate::error::FolioError;
use crate::model::{Cell, Config};
use crate::provider::Provider;
use crate::structure::StructureNode;
use crate::style::{Font, SignatureProps};

/// A signature space: a rule with a centered label below it.
#[derive(Clone)]
pub struct Signature {
    label: String,
    prop: SignatureProps,
    config: Option<Arc<Config>>,
    transform: Option<TextTransform>,
}

impl Signature {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_props(label, SignatureProps::default())
    }

    pub fn with_props(label: impl Into<String>, prop: SignatureProps) -> Self {
        Self {
            label: label.into(),
            prop,
            config: None,
            transform: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn props(&self) -> SignatureProps {
        let mut prop = self.prop.clone();
        match &self.config {
            Some(config) => prop.make_valid(&config.default_font),
            None => prop.make_valid(&Font::default()),
        }
        prop
    }
}

impl Node for Signature {
    fn set_config(&mut self, config: Arc<Config>) {
        self.config = Some(config);
    }

    fn config(&self) -> Option<&Arc<Config>> {
        self.config.as_ref()
    }

    fn structure(&self) -> StructureNode {
        StructureNode::new("signature").with_value(&self.label)
    }
}

impl Component for Signature {
    fn render(&self, provider: &mut dyn Provider, cell: &Cell) -> Result<(), FolioError> {
        let label = transformed(&self.label, self.transform.as_ref());
        provider.add_signature(&label, cell, &self.props())
    }

    fn height(&self, provider: &dyn Provider, _cell: &Cell) -> f64 {
        let prop = self.props();
        prop.safe_padding + prop.line_thickness + provider.font_height(&prop.font)
    }

    fn set_transform(&mut self, transform: TextTransform) {
        self.transform = Some(transform);
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }
}
