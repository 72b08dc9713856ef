//! # Leaf Components
//!
//! The content a column holds. Every component answers two questions for
//! the layout core (how tall am I in this cell, and draw yourself into
//! this cell) and otherwise stays opaque to it.
//!
//! Components are trait objects so new kinds can be added without touching
//! `Col` or `Row`. Heights are pure: the core calls `height` before
//! `render` to advance its cursor and may call it any number of times.

mod image;
mod line;
mod qrcode;
mod signature;
mod text;

use std::sync::Arc;

pub use self::image::Image;
pub use self::line::Line;
pub use self::qrcode::QrCode;
pub use self::signature::Signature;
pub use self::text::Text;

use crate::error::FolioError;
use crate::model::{Cell, Config};
use crate::provider::Provider;
use crate::structure::StructureNode;

/// Rewrites a component's textual content at render time.
pub type TextTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Capabilities shared by every node of the layout tree.
pub trait Node {
    /// Receive the shared configuration. Containers forward it to every
    /// descendant.
    fn set_config(&mut self, config: Arc<Config>);

    /// The configuration last pushed to this node, if any.
    fn config(&self) -> Option<&Arc<Config>>;

    /// This node's subtree in the structure tree.
    fn structure(&self) -> StructureNode;
}

/// A leaf content node.
pub trait Component: Node + Send {
    /// Draw into `cell`.
    fn render(&self, provider: &mut dyn Provider, cell: &Cell) -> Result<(), FolioError>;

    /// Height needed within `cell`'s width. Never fails; content the
    /// provider cannot measure reports zero and fails at render instead.
    fn height(&self, provider: &dyn Provider, cell: &Cell) -> f64;

    /// Install a content rewrite. Components without text ignore it.
    fn set_transform(&mut self, _transform: TextTransform) {}

    fn box_clone(&self) -> Box<dyn Component>;
}

impl Clone for Box<dyn Component> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Apply `transform` if one is installed.
pub(crate) fn transformed(value: &str, transform: Option<&TextTransform>) -> String {
    match transform {
        Some(f) => f(value),
        None => value.to_string(),
    }
}
