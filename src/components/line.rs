use std::sync::Arc;

use super::{Component, Node};
use crate::error::FolioError;
use crate::model::{Cell, Config};
use crate::provider::Provider;
use crate::structure::StructureNode;
use crate::style::LineProps;

/// A horizontal or vertical rule.
#[derive(Clone, Default)]
pub struct Line {
    prop: LineProps,
    config: Option<Arc<Config>>,
}

impl Line {
    pub fn new() -> Self {
        Self::with_props(LineProps::default())
    }

    pub fn with_props(mut prop: LineProps) -> Self {
        prop.make_valid();
        Self { prop, config: None }
    }
}

impl Node for Line {
    fn set_config(&mut self, config: Arc<Config>) {
        self.config = Some(config);
    }

    fn config(&self) -> Option<&Arc<Config>> {
        self.config.as_ref()
    }

    fn structure(&self) -> StructureNode {
        StructureNode::new("line").with_detail("thickness", self.prop.thickness)
    }
}

impl Component for Line {
    fn render(&self, provider: &mut dyn Provider, cell: &Cell) -> Result<(), FolioError> {
        provider.add_line(cell, &self.prop)
    }

    fn height(&self, _provider: &dyn Provider, _cell: &Cell) -> f64 {
        self.prop.thickness
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::RecordingProvider;
    use crate::style::LineOrientation;

    #[test]
    fn height_is_the_thickness() {
        let provider = RecordingProvider::new();
        let cell = Cell::new(0.0, 0.0, 300.0, 50.0);
        let prop = LineProps {
            thickness: 2.5,
            orientation: LineOrientation::Vertical,
            ..Default::default()
        };
        assert_eq!(Line::with_props(prop).height(&provider, &cell), 2.5);
    }

    #[test]
    fn invalid_thickness_falls_back_to_default() {
        let provider = RecordingProvider::new();
        let prop = LineProps {
            thickness: -1.0,
            ..Default::default()
        };
        let line = Line::with_props(prop);
        assert_eq!(line.height(&provider, &Cell::new(0.0, 0.0, 100.0, 0.0)), 0.6);
        assert_eq!(line.height(&provider, &Cell::new(0.0, 0.0, 10.0, 0.0)), 0.6);
    }
}
