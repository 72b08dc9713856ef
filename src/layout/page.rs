use std::sync::Arc;

use log::{debug, trace};

use super::row::Row;
use crate::components::{Node, TextTransform};
use crate::error::FolioError;
use crate::model::{Cell, Config};
use crate::provider::Provider;
use crate::structure::StructureNode;
use crate::style::{PageNumber, RectProps};

/// One page: body rows stacked from the top, then footer rows.
///
/// Footer rows get the page number substituted into their text at render
/// time. The stored rows are never rewritten, so a page can be rendered
/// again with a different number.
#[derive(Clone, Default)]
pub struct Page {
    number: usize,
    total: usize,
    page_number: PageNumber,
    rows: Vec<Row>,
    footer_rows: Vec<Row>,
    config: Option<Arc<Config>>,
}

impl Page {
    pub fn new(page_number: PageNumber) -> Self {
        Self {
            page_number,
            ..Default::default()
        }
    }

    pub fn add(&mut self, row: Row) -> &mut Self {
        self.rows.push(row);
        self
    }

    pub fn with(mut self, row: Row) -> Self {
        self.add(row);
        self
    }

    pub fn add_footer(&mut self, row: Row) -> &mut Self {
        self.footer_rows.push(row);
        self
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn footer_rows(&self) -> &[Row] {
        &self.footer_rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page_number(&self) -> &PageNumber {
        &self.page_number
    }

    pub fn set_number(&mut self, number: usize, total: usize) {
        self.number = number;
        self.total = total;
    }

    /// Rewrites the page-number tokens for this page. `None` when the
    /// pattern is empty.
    fn number_transform(&self) -> Option<TextTransform> {
        if self.page_number.pattern.is_empty() {
            return None;
        }
        let PageNumber {
            pattern,
            total_pattern,
        } = self.page_number.clone();
        let number = self.number.to_string();
        let total = self.total.to_string();
        Some(Arc::new(move |value: &str| {
            let value = value.replace(&pattern, &number);
            if total_pattern.is_empty() {
                value
            } else {
                value.replace(&total_pattern, &total)
            }
        }))
    }

    /// Render the page into `cell`. The cursor is local to this call.
    pub fn render(&mut self, provider: &mut dyn Provider, cell: Cell) -> Result<(), FolioError> {
        trace!("Rendering page {} of {}", self.number, self.total);
        let mut inner = cell.copy();

        match self.config.as_ref().and_then(|c| c.background_image.as_ref()) {
            Some(background) => provider.add_background_image(
                &background.bytes,
                &inner,
                &RectProps::default(),
                background.extension,
            )?,
            None if self.config.is_none() => {
                debug!("Page {} has no config; skipping background", self.number)
            }
            None => {}
        }

        for row in &self.rows {
            let height = render_row(row, provider, &inner)?;
            inner.y += height;
        }

        let transform = self.number_transform();
        for row in &mut self.footer_rows {
            if let Some(transform) = &transform {
                for col in row.columns_mut() {
                    col.set_transform(transform.clone());
                }
            }
            let height = render_row(row, provider, &inner)?;
            inner.y += height;
        }
        Ok(())
    }
}

/// Render `row` at the cursor and return how far the cursor moves.
fn render_row(row: &Row, provider: &mut dyn Provider, cursor: &Cell) -> Result<f64, FolioError> {
    let height = row.height(provider, cursor);
    let band = Cell::new(cursor.x, cursor.y, cursor.width, height);
    row.render(provider, &band)?;
    Ok(height)
}

impl Node for Page {
    fn set_config(&mut self, config: Arc<Config>) {
        for row in self.rows.iter_mut().chain(self.footer_rows.iter_mut()) {
            row.set_config(config.clone());
        }
        self.config = Some(config);
    }

    fn config(&self) -> Option<&Arc<Config>> {
        self.config.as_ref()
    }

    fn structure(&self) -> StructureNode {
        let mut node = StructureNode::new("page")
            .with_value(self.number)
            .with_detail("total", self.total);
        for row in &self.rows {
            node.add_child(row.structure());
        }
        for row in &self.footer_rows {
            node.add_child(row.structure().relabel("footer-row"));
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Text;
    use crate::layout::Col;
    use crate::provider::{DrawCall, RecordingProvider};

    fn text_row(height: f64, text: &str) -> Row {
        Row::new(height).with(Col::new(12).with(Text::new(text)))
    }

    #[test]
    fn cursor_advances_by_each_row_height() {
        let mut provider = RecordingProvider::new();
        let mut page = Page::default()
            .with(text_row(10.0, "a"))
            .with(text_row(25.0, "b"))
            .with(text_row(5.0, "c"));
        page.render(&mut provider, Cell::new(0.0, 7.0, 100.0, 200.0)).unwrap();
        let ys: Vec<f64> = provider.row_cells().iter().map(|c| c.y).collect();
        assert_eq!(ys, vec![7.0, 17.0, 42.0]);
    }

    #[test]
    fn rerender_starts_from_the_same_cell() {
        let mut provider = RecordingProvider::new();
        let mut page = Page::default().with(text_row(10.0, "a"));
        let cell = Cell::new(0.0, 0.0, 100.0, 200.0);
        page.render(&mut provider, cell).unwrap();
        page.render(&mut provider, cell).unwrap();
        let ys: Vec<f64> = provider.row_cells().iter().map(|c| c.y).collect();
        assert_eq!(ys, vec![0.0, 0.0]);
    }

    #[test]
    fn footer_pattern_is_substituted_per_render() {
        let mut provider = RecordingProvider::new();
        let mut page = Page::new(PageNumber::new("{p}").with_total("{t}"));
        page.add_footer(text_row(0.0, "Page {p} of {t}"));
        let cell = Cell::new(0.0, 0.0, 300.0, 200.0);

        page.set_number(3, 5);
        page.render(&mut provider, cell).unwrap();
        page.set_number(4, 5);
        page.render(&mut provider, cell).unwrap();

        assert_eq!(provider.texts(), vec!["Page 3 of 5", "Page 4 of 5"]);
        let stored = page.footer_rows()[0].columns()[0].components()[0].structure();
        assert_eq!(stored.value.as_deref(), Some("Page {p} of {t}"));
    }

    #[test]
    fn empty_pattern_passes_footer_through() {
        let mut provider = RecordingProvider::new();
        let mut page = Page::default();
        page.add_footer(text_row(0.0, "Page {p}"));
        page.set_number(9, 9);
        page.render(&mut provider, Cell::new(0.0, 0.0, 300.0, 200.0)).unwrap();
        assert_eq!(provider.texts(), vec!["Page {p}"]);
    }

    #[test]
    fn body_rows_are_not_substituted() {
        let mut provider = RecordingProvider::new();
        let mut page = Page::new(PageNumber::new("{p}")).with(text_row(10.0, "body {p}"));
        page.set_number(2, 2);
        page.render(&mut provider, Cell::new(0.0, 0.0, 300.0, 200.0)).unwrap();
        assert_eq!(provider.texts(), vec!["body {p}"]);
    }

    #[test]
    fn background_is_drawn_first_over_the_whole_cell() {
        let config = Config::builder()
            .with_background_image(vec![0x89, b'P', b'N', b'G'], crate::model::Extension::Png)
            .build();
        let mut provider = RecordingProvider::new();
        let mut page = Page::default().with(text_row(10.0, "a"));
        page.set_config(config);
        let cell = Cell::new(5.0, 5.0, 100.0, 200.0);
        page.render(&mut provider, cell).unwrap();
        assert!(matches!(
            provider.calls()[0],
            DrawCall::BackgroundImage { cell: c, len: 4, .. } if c == cell
        ));
    }

    #[test]
    fn config_reaches_every_depth() {
        let config = Config::builder().build();
        let mut page = Page::default().with(text_row(10.0, "a"));
        page.add_footer(text_row(0.0, "f"));
        page.set_config(config.clone());

        for row in page.rows().iter().chain(page.footer_rows()) {
            assert!(Arc::ptr_eq(row.config().unwrap(), &config));
            for col in row.columns() {
                assert!(Arc::ptr_eq(col.config().unwrap(), &config));
                for component in col.components() {
                    assert!(Arc::ptr_eq(component.config().unwrap(), &config));
                }
            }
        }
    }

    #[test]
    fn structure_has_body_rows_then_footer_rows() {
        let mut page = Page::default()
            .with(text_row(10.0, "r1"))
            .with(text_row(20.0, "r2"));
        assert_eq!(page.structure().children.len(), 2);
        assert_eq!(page.structure().children[0], page.rows()[0].structure());

        page.add_footer(text_row(0.0, "f"));
        let node = page.structure();
        assert_eq!(node.children.len(), 3);
        assert_eq!(node.children[2].kind, "footer-row");
    }
}
