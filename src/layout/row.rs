use std::sync::Arc;

use super::col::Col;
use crate::components::Node;
use crate::error::FolioError;
use crate::model::{Cell, Config, GRID_SIZE};
use crate::provider::Provider;
use crate::structure::StructureNode;
use crate::style::CellStyle;

/// A horizontal band of columns.
#[derive(Clone, Default)]
pub struct Row {
    /// Fixed height in points; 0 means automatic.
    height: f64,
    cols: Vec<Col>,
    style: Option<CellStyle>,
    config: Option<Arc<Config>>,
}

impl Row {
    pub fn new(height: f64) -> Self {
        Self {
            height: height.max(0.0),
            ..Default::default()
        }
    }

    /// A row as tall as its tallest column.
    pub fn auto() -> Self {
        Self::new(0.0)
    }

    pub fn add(&mut self, col: Col) -> &mut Self {
        self.cols.push(col);
        self
    }

    pub fn with(mut self, col: Col) -> Self {
        self.add(col);
        self
    }

    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn columns(&self) -> &[Col] {
        &self.cols
    }

    pub fn columns_mut(&mut self) -> &mut [Col] {
        &mut self.cols
    }

    pub fn is_auto(&self) -> bool {
        self.height <= 0.0
    }

    pub fn style(&self) -> Option<&CellStyle> {
        self.style.as_ref()
    }

    /// Sum of the columns' grid units.
    pub fn units(&self) -> u32 {
        self.cols.iter().map(|c| c.size() as u32).sum()
    }

    /// Fixed height, or the tallest column laid out across `cell`.
    pub fn height(&self, provider: &dyn Provider, cell: &Cell) -> f64 {
        if !self.is_auto() {
            return self.height;
        }
        self.cols
            .iter()
            .zip(self.column_cells(cell))
            .map(|(col, col_cell)| col.height(provider, &col_cell))
            .fold(0.0, f64::max)
    }

    /// Each column's cell within `cell`, left to right.
    pub fn column_cells(&self, cell: &Cell) -> Vec<Cell> {
        let unit = cell.width / GRID_SIZE as f64;
        let mut x = cell.x;
        self.cols
            .iter()
            .map(|col| {
                let width = unit * col.size() as f64;
                let col_cell = Cell::new(x, cell.y, width, cell.height);
                x += width;
                col_cell
            })
            .collect()
    }

    /// Draw the row into `cell`, whose height is the row's band.
    pub fn render(&self, provider: &mut dyn Provider, cell: &Cell) -> Result<(), FolioError> {
        if let Some(style) = &self.style {
            provider.create_col(cell, Some(style))?;
        }
        for (col, col_cell) in self.cols.iter().zip(self.column_cells(cell)) {
            col.render(provider, &col_cell, true)?;
        }
        provider.create_row(cell)
    }
}

impl Node for Row {
    fn set_config(&mut self, config: Arc<Config>) {
        for col in &mut self.cols {
            col.set_config(config.clone());
        }
        self.config = Some(config);
    }

    fn config(&self) -> Option<&Arc<Config>> {
        self.config.as_ref()
    }

    fn structure(&self) -> StructureNode {
        let mut node = StructureNode::new("row")
            .with_value(self.height)
            .with_detail("auto", self.is_auto());
        for col in &self.cols {
            node.add_child(col.structure());
        }
        node
    }
}
