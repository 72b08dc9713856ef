use std::sync::Arc;

use super::{transformed, Component, Node, TextTransform};
use crate::error::FolioError;
use crate::model::{Cell, Config};
use crate::provider::Provider;
use crate::structure::StructureNode;
use crate::style::{Font, TextProps};

/// A block of wrapped text.
#[derive(Clone)]
pub struct Text {
    value: String,
    prop: TextProps,
    config: Option<Arc<Config>>,
    transform: Option<TextTransform>,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self::with_props(value, TextProps::default())
    }

    pub fn with_props(value: impl Into<String>, prop: TextProps) -> Self {
        Self {
            value: value.into(),
            prop,
            config: None,
            transform: None,
        }
    }

    /// The stored content, before any transform.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Props with unset font fields filled from the configured default font.
    pub fn props(&self) -> TextProps {
        let mut prop = self.prop.clone();
        match &self.config {
            Some(config) => prop.make_valid(&config.default_font),
            None => prop.make_valid(&Font::default()),
        }
        prop
    }

    /// The content as it will be drawn.
    pub fn display_value(&self) -> String {
        transformed(&self.value, self.transform.as_ref())
    }
}

impl Node for Text {
    fn set_config(&mut self, config: Arc<Config>) {
        self.config = Some(config);
    }

    fn config(&self) -> Option<&Arc<Config>> {
        self.config.as_ref()
    }

    fn structure(&self) -> StructureNode {
        StructureNode::new("text").with_value(&self.value)
    }
}

impl Component for Text {
    fn render(&self, provider: &mut dyn Provider, cell: &Cell) -> Result<(), FolioError> {
        provider.add_text(&self.display_value(), cell, &self.props())
    }

    fn height(&self, provider: &dyn Provider, cell: &Cell) -> f64 {
        let prop = self.props();
        let width = cell.width - prop.left - prop.right;
        let lines = provider.lines_quantity(&self.display_value(), &prop, width) as f64;
        let padding = (lines - 1.0).max(0.0) * prop.vertical_padding;
        lines * provider.font_height(&prop) + padding + prop.top
    }

    fn set_transform(&mut self, transform: TextTransform) {
        self.transform = Some(transform);
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::RecordingProvider;
    use crate::style::Font;

    fn cell() -> Cell {
        Cell::new(0.0, 0.0, 500.0, 100.0)
    }

    #[test]
    fn single_line_height_is_font_height_plus_top() {
        let provider = RecordingProvider::new();
        let mut props = TextProps::default().sized(10.0);
        props.top = 3.0;
        let text = Text::with_props("Hello", props);
        assert!((text.height(&provider, &cell()) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn wrapped_lines_add_vertical_padding() {
        let provider = RecordingProvider::new();
        let mut props = TextProps::default().sized(10.0);
        props.vertical_padding = 2.0;
        let text = Text::with_props("one two three four five six", props);
        let narrow = Cell::new(0.0, 0.0, 40.0, 100.0);
        let lines = provider.lines_quantity(text.value(), &text.props(), 40.0) as f64;
        assert!(lines > 1.0);
        let expected = lines * 12.0 + (lines - 1.0) * 2.0;
        assert!((text.height(&provider, &narrow) - expected).abs() < 1e-9);
    }

    #[test]
    fn unset_font_comes_from_config() {
        let config = Config::builder()
            .with_default_font(Font {
                family: "Courier".to_string(),
                size: 14.0,
                ..Default::default()
            })
            .build();
        let mut text = Text::new("x");
        text.set_config(config);
        let props = text.props();
        assert_eq!(props.family(), "Courier");
        assert_eq!(props.size(), 14.0);
    }

    #[test]
    fn transform_applies_on_render_without_touching_value() {
        let mut provider = RecordingProvider::new();
        let mut text = Text::new("Page {p}");
        text.set_transform(Arc::new(|s: &str| s.replace("{p}", "3")));
        text.render(&mut provider, &cell()).unwrap();
        assert_eq!(provider.texts(), vec!["Page 3"]);
        assert_eq!(text.value(), "Page {p}");
        assert_eq!(text.structure().value.as_deref(), Some("Page {p}"));
    }
}
