use std::sync::Arc;

use crate::components::{Component, Node, TextTransform};
use crate::error::FolioError;
use crate::model::{Cell, Config, GRID_SIZE};
use crate::provider::Provider;
use crate::structure::StructureNode;
use crate::style::CellStyle;

/// A horizontal slot in a row, `size` grid units wide.
///
/// Components in a column share its band: each one is drawn at the
/// column's origin, so later components layer over earlier ones.
#[derive(Clone, Default)]
pub struct Col {
    /// Grid units; 0 means the whole row.
    size: u8,
    components: Vec<Box<dyn Component>>,
    style: Option<CellStyle>,
    config: Option<Arc<Config>>,
}

impl Col {
    pub fn new(size: u8) -> Self {
        Self {
            size: size.min(GRID_SIZE),
            ..Default::default()
        }
    }

    /// A column spanning the whole row.
    pub fn full() -> Self {
        Self::new(0)
    }

    pub fn add(&mut self, component: impl Component + 'static) -> &mut Self {
        self.components.push(Box::new(component));
        self
    }

    pub fn add_boxed(&mut self, component: Box<dyn Component>) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn with(mut self, component: impl Component + 'static) -> Self {
        self.add(component);
        self
    }

    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Width in grid units.
    pub fn size(&self) -> u8 {
        if self.is_max() {
            GRID_SIZE
        } else {
            self.size
        }
    }

    pub fn is_max(&self) -> bool {
        self.size == 0
    }

    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    pub fn style(&self) -> Option<&CellStyle> {
        self.style.as_ref()
    }

    /// Tallest component laid out in `cell`; 0 when empty.
    pub fn height(&self, provider: &dyn Provider, cell: &Cell) -> f64 {
        self.components
            .iter()
            .map(|c| c.height(provider, cell))
            .fold(0.0, f64::max)
    }

    /// Draw the column into `cell`. With `create_cell` the column's own
    /// border and background go down first.
    pub fn render(
        &self,
        provider: &mut dyn Provider,
        cell: &Cell,
        create_cell: bool,
    ) -> Result<(), FolioError> {
        if create_cell {
            provider.create_col(cell, self.style.as_ref())?;
        }
        for component in &self.components {
            component.render(provider, &cell.copy())?;
        }
        Ok(())
    }

    /// Install `transform` on every component.
    pub fn set_transform(&mut self, transform: TextTransform) {
        for component in &mut self.components {
            component.set_transform(transform.clone());
        }
    }
}

impl Node for Col {
    fn set_config(&mut self, config: Arc<Config>) {
        for component in &mut self.components {
            component.set_config(config.clone());
        }
        self.config = Some(config);
    }

    fn config(&self) -> Option<&Arc<Config>> {
        self.config.as_ref()
    }

    fn structure(&self) -> StructureNode {
        let mut node = StructureNode::new("col")
            .with_value(self.size())
            .with_detail("is_max", self.is_max());
        for component in &self.components {
            node.add_child(component.structure());
        }
        node
    }
}
