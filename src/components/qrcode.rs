use std::sync::Arc;

use super::{Component, Node};
use crate::error::FolioError;
use crate::model::{Cell, Config};
use crate::provider::Provider;
use crate::structure::StructureNode;
use crate::style::RectProps;

/// A square QR code sized by a share of the cell width.
#[derive(Clone)]
pub struct QrCode {
    code: String,
    prop: RectProps,
    config: Option<Arc<Config>>,
}

impl QrCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self::with_props(code, RectProps::default())
    }

    pub fn with_props(code: impl Into<String>, mut prop: RectProps) -> Self {
        prop.make_valid();
        Self {
            code: code.into(),
            prop,
            config: None,
        }
    }
}

impl Node for QrCode {
    fn set_config(&mut self, config: Arc<Config>) {
        self.config = Some(config);
    }

    fn config(&self) -> Option<&Arc<Config>> {
        self.config.as_ref()
    }

    fn structure(&self) -> StructureNode {
        StructureNode::new("qrcode").with_value(&self.code)
    }
}

impl Component for QrCode {
    fn render(&self, provider: &mut dyn Provider, cell: &Cell) -> Result<(), FolioError> {
        provider.add_qr_code(&self.code, cell, &self.prop)
    }

    fn height(&self, _provider: &dyn Provider, cell: &Cell) -> f64 {
        self.prop.percent / 100.0 * cell.width + self.prop.top
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::RecordingProvider;

    #[test]
    fn height_is_a_share_of_the_width_plus_top() {
        let provider = RecordingProvider::new();
        let cell = Cell::new(0.0, 0.0, 200.0, 40.0);
        let prop = RectProps {
            percent: 50.0,
            top: 5.0,
            ..Default::default()
        };
        assert_eq!(QrCode::with_props("abc", prop).height(&provider, &cell), 105.0);
        assert_eq!(QrCode::new("abc").height(&provider, &cell), 200.0);
    }

    #[test]
    fn centered_code_ignores_top_offset() {
        let provider = RecordingProvider::new();
        let prop = RectProps {
            top: 30.0,
            ..RectProps::centered(25.0)
        };
        let qr = QrCode::with_props("abc", prop);
        assert_eq!(qr.height(&provider, &Cell::new(0.0, 0.0, 80.0, 0.0)), 20.0);
    }

    #[test]
    fn renders_its_payload_into_the_cell() {
        let mut provider = RecordingProvider::new();
        let cell = Cell::new(5.0, 6.0, 50.0, 50.0);
        QrCode::new("https://example.com").render(&mut provider, &cell).unwrap();
        assert_eq!(
            provider.calls(),
            &[crate::provider::DrawCall::QrCode {
                code: "https://example.com".to_string(),
                cell
            }]
        );
    }
}
