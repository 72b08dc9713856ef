//! # Layout Engine
//!
//! Block stacking on a twelve-unit grid. A [`Page`] stacks [`Row`]s top to
//! bottom; a row splits its width among [`Col`]s by grid units; a column
//! layers its components in one band.
//!
//! Heights propagate bottom-up: a column is as tall as its tallest
//! component and an automatic row as tall as its tallest column. Nothing
//! is cached, so a height is always computed from the tree as it is now.

mod col;
pub mod page_break;
mod page;
mod row;

pub use col::Col;
pub use page::Page;
pub use row::Row;
