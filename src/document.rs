//! # Document
//!
//! The composition root. Rows are added in reading order; the document
//! decides where pages break, repeats the registered header at the top of
//! every page and the registered footer at the bottom, numbers the pages,
//! and finally walks every page through the provider.
//!
//! Pagination happens as rows arrive, so the page a row lands on is known
//! the moment `add_rows` returns. Rendering waits for `generate`, once the
//! total page count is final.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::components::{Node, TextTransform};
use crate::error::FolioError;
use crate::layout::page_break::{decide_break, BreakDecision, EPSILON};
use crate::layout::{Col, Page, Row};
use crate::model::{Config, GRID_SIZE};
use crate::pdf::PdfProvider;
use crate::provider::Provider;
use crate::structure::StructureNode;

/// Stand-in for page numbers when sizing the footer.
const WIDEST_PAGE_NUMBER: &str = "99999";

pub struct Document<P: Provider = PdfProvider> {
    config: Arc<Config>,
    provider: P,
    /// Closed pages, in order.
    pages: Vec<Page>,
    /// Rows of the page being filled, header included.
    rows: Vec<Row>,
    header: Vec<Row>,
    footer: Vec<Row>,
    header_height: f64,
    footer_height: f64,
    current_height: f64,
    /// The current page holds rows besides the repeated header.
    has_content: bool,
}

impl Document<PdfProvider> {
    /// A document rendered to PDF.
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_provider(config, PdfProvider::new())
    }
}

impl<P: Provider> Document<P> {
    pub fn with_provider(config: Arc<Config>, provider: P) -> Self {
        Self {
            config,
            provider,
            pages: Vec::new(),
            rows: Vec::new(),
            header: Vec::new(),
            footer: Vec::new(),
            header_height: 0.0,
            footer_height: 0.0,
            current_height: 0.0,
            has_content: false,
        }
    }

    pub fn current_config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Pages closed so far. The page being filled is not among them.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Height used on the page being filled, header included.
    pub fn current_height(&self) -> f64 {
        self.current_height
    }

    fn usable_height(&self) -> f64 {
        self.config.root_cell().height
    }

    fn rows_height(&self, rows: &[Row]) -> f64 {
        let cell = self.config.root_cell();
        rows.iter().map(|r| r.height(&self.provider, &cell)).sum()
    }

    fn prepare(&self, mut row: Row) -> Row {
        if row.columns().is_empty() {
            row.add(Col::full());
        }
        if row.units() != GRID_SIZE as u32 {
            warn!(
                "Row columns span {} grid units instead of {}",
                row.units(),
                GRID_SIZE
            );
        }
        row.set_config(self.config.clone());
        row
    }

    /// Rows repeated at the top of every page. Registered before any
    /// content they open the current page; otherwise they start with the
    /// next one.
    pub fn register_header(&mut self, rows: Vec<Row>) -> Result<&mut Self, FolioError> {
        let rows: Vec<Row> = rows.into_iter().map(|r| self.prepare(r)).collect();
        let height = self.rows_height(&rows);
        let available = self.usable_height() - self.footer_height;
        if height > available + EPSILON {
            return Err(FolioError::HeaderTooLarge { height, available });
        }
        self.header = rows;
        self.header_height = height;
        if self.has_content {
            debug!("Header registered mid-page; it starts on page {}", self.pages.len() + 2);
        } else {
            // Only the previous header is on this page so far.
            self.rows.clear();
            self.start_page();
        }
        Ok(self)
    }

    /// Rows repeated at the bottom of every page, with page numbers
    /// substituted into their text.
    pub fn register_footer(&mut self, rows: Vec<Row>) -> Result<&mut Self, FolioError> {
        let rows: Vec<Row> = rows.into_iter().map(|r| self.prepare(r)).collect();
        let height = self.footer_reserve(&rows);
        let available = self.usable_height() - self.header_height;
        if height > available + EPSILON {
            return Err(FolioError::FooterTooLarge { height, available });
        }
        self.footer = rows;
        self.footer_height = height;
        Ok(self)
    }

    /// Height kept free for the footer on every page. Footer text is
    /// measured with the page-number tokens replaced by `WIDEST_PAGE_NUMBER`
    /// so substituted numbers never need more room than was reserved.
    fn footer_reserve(&self, rows: &[Row]) -> f64 {
        let page_number = match &self.config.page_number {
            Some(page_number) if !page_number.pattern.is_empty() => page_number.clone(),
            _ => return self.rows_height(rows),
        };
        let widest: TextTransform = Arc::new(move |value: &str| {
            let value = value.replace(&page_number.pattern, WIDEST_PAGE_NUMBER);
            if page_number.total_pattern.is_empty() {
                value
            } else {
                value.replace(&page_number.total_pattern, WIDEST_PAGE_NUMBER)
            }
        });
        let measured: Vec<Row> = rows
            .iter()
            .cloned()
            .map(|mut row| {
                for col in row.columns_mut() {
                    col.set_transform(widest.clone());
                }
                row
            })
            .collect();
        self.rows_height(&measured)
    }

    pub fn add_rows(&mut self, rows: impl IntoIterator<Item = Row>) -> &mut Self {
        for row in rows {
            self.place(row);
        }
        self
    }

    pub fn add_row(&mut self, height: f64, cols: Vec<Col>) -> &mut Self {
        let mut row = Row::new(height);
        for col in cols {
            row.add(col);
        }
        self.add_rows([row])
    }

    pub fn add_auto_row(&mut self, cols: Vec<Col>) -> &mut Self {
        self.add_row(0.0, cols)
    }

    /// Start a new page unless the current one is still empty.
    pub fn add_page_break(&mut self) -> &mut Self {
        if self.has_content {
            self.close_page();
            self.start_page();
        }
        self
    }

    /// Each page starts on a fresh document page; its rows then flow like
    /// any others, so a long page still breaks.
    pub fn add_pages(&mut self, pages: Vec<Page>) -> &mut Self {
        for page in pages {
            self.add_page_break();
            self.add_rows(page.into_rows());
        }
        self
    }

    /// Whether `height` more points fit above the footer.
    pub fn fits_in_current_page(&self, height: f64) -> bool {
        self.current_height + height + self.footer_height <= self.usable_height() + EPSILON
    }

    fn place(&mut self, row: Row) {
        let row = self.prepare(row);
        let height = row.height(&self.provider, &self.config.root_cell());
        loop {
            let remaining = self.usable_height() - self.current_height - self.footer_height;
            match decide_break(remaining, height, !self.has_content) {
                BreakDecision::Place => break,
                BreakDecision::MoveToNextPage => {
                    debug!(
                        "Row of height {:.2} does not fit in {:.2}; starting page {}",
                        height,
                        remaining,
                        self.pages.len() + 2
                    );
                    self.close_page();
                    self.start_page();
                }
                BreakDecision::Overflow => {
                    warn!(
                        "Row of height {:.2} exceeds the usable page height {:.2}; it will overflow",
                        height, remaining
                    );
                    break;
                }
            }
        }
        self.current_height += height;
        self.rows.push(row);
        self.has_content = true;
    }

    /// The page being filled, as it would close now.
    fn pending_page(&self) -> Page {
        let page_number = self.config.page_number.clone().unwrap_or_default();
        let mut page = Page::new(page_number);
        for row in &self.rows {
            page.add(row.clone());
        }
        let filler = self.usable_height() - self.current_height - self.footer_height;
        if !self.footer.is_empty() && filler > EPSILON {
            debug!("Padding page {} with {:.2} before the footer", self.pages.len() + 1, filler);
            page.add(Row::new(filler).with(Col::full()));
        }
        for row in &self.footer {
            page.add_footer(row.clone());
        }
        page.set_config(self.config.clone());
        page
    }

    fn close_page(&mut self) {
        let page = self.pending_page();
        debug!("Closing page {} with {} rows", self.pages.len() + 1, page.rows().len());
        self.pages.push(page);
        self.rows.clear();
        self.current_height = 0.0;
        self.has_content = false;
    }

    fn start_page(&mut self) {
        self.rows.extend(self.header.iter().cloned());
        self.current_height = self.header_height;
    }

    /// Structure of every page, the one being filled included.
    pub fn structure(&self) -> StructureNode {
        let mut root = StructureNode::new("document");
        for page in &self.pages {
            root.add_child(page.structure());
        }
        if self.has_content || self.pages.is_empty() {
            let mut pending = self.pending_page();
            let number = self.pages.len() + 1;
            pending.set_number(number, number);
            root.add_child(pending.structure());
        }
        root
    }

    /// Number, render and package every page.
    pub fn generate(mut self) -> Result<GeneratedDocument, FolioError> {
        let started = Instant::now();
        self.provider.set_config(self.config.clone());
        if self.has_content || self.pages.is_empty() {
            self.close_page();
        }

        let total = self.pages.len();
        let root = self.config.root_cell();
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.set_number(i + 1, total);
            self.provider.begin_page(i + 1, total)?;
            page.render(&mut self.provider, root)?;
        }

        let bytes = self.provider.generate_bytes()?;
        info!(
            "Generated {} page(s), {} bytes in {:.1?}",
            total,
            bytes.len(),
            started.elapsed()
        );
        Ok(GeneratedDocument {
            bytes,
            page_count: total,
        })
    }
}

/// The provider's output for a finished document.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    bytes: Vec<u8>,
    page_count: usize,
}

impl GeneratedDocument {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FolioError> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Text;
    use crate::model::{Edges, PageSize};
    use crate::provider::{DrawCall, RecordingProvider};
    use crate::style::PageNumber;

    /// 100pt of usable height.
    fn small_config() -> Arc<Config> {
        Config::builder()
            .with_page_size(PageSize::Custom {
                width: 200.0,
                height: 120.0,
            })
            .with_margins(Edges::uniform(10.0))
            .with_page_number(PageNumber::new("{n}"))
            .build()
    }

    fn doc() -> Document<RecordingProvider> {
        Document::with_provider(small_config(), RecordingProvider::new())
    }

    fn text_row(height: f64, text: &str) -> Row {
        Row::new(height).with(Col::new(12).with(Text::new(text)))
    }

    fn calls(generated: &GeneratedDocument) -> Vec<DrawCall> {
        serde_json::from_slice(generated.bytes()).unwrap()
    }

    #[test]
    fn rows_that_fit_share_a_page() {
        let mut d = doc();
        d.add_rows([text_row(40.0, "a"), text_row(60.0, "b")]);
        assert!(d.pages().is_empty());
        assert_eq!(d.generate().unwrap().page_count(), 1);
    }

    #[test]
    fn overflowing_row_moves_to_next_page() {
        let mut d = doc();
        d.add_rows([text_row(60.0, "a"), text_row(60.0, "b")]);
        assert_eq!(d.pages().len(), 1);
        assert_eq!(d.current_height(), 60.0);
        assert_eq!(d.generate().unwrap().page_count(), 2);
    }

    #[test]
    fn header_repeats_and_footer_lands_at_the_bottom() {
        let mut d = doc();
        d.register_header(vec![text_row(10.0, "head")]).unwrap();
        d.register_footer(vec![text_row(10.0, "foot {n}")]).unwrap();
        d.add_rows([text_row(50.0, "a"), text_row(50.0, "b")]);
        let generated = d.generate().unwrap();
        assert_eq!(generated.page_count(), 2);

        let calls = calls(&generated);
        let texts: Vec<&str> = calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["head", "a", "foot 1", "head", "b", "foot 2"]);

        let footer_ys: Vec<f64> = calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, cell } if text.starts_with("foot") => Some(cell.y),
                _ => None,
            })
            .collect();
        // Top margin 10 + usable 100 - footer 10.
        assert_eq!(footer_ys, vec![100.0, 100.0]);
    }

    #[test]
    fn too_large_header_is_rejected() {
        let mut d = doc();
        assert!(matches!(
            d.register_header(vec![text_row(150.0, "x")]),
            Err(FolioError::HeaderTooLarge { .. })
        ));
        assert!(matches!(
            d.register_footer(vec![text_row(101.0, "x")]),
            Err(FolioError::FooterTooLarge { .. })
        ));
    }

    #[test]
    fn header_and_footer_together_must_fit_the_page() {
        let mut d = doc();
        assert!(d.register_header(vec![text_row(60.0, "head")]).is_ok());
        assert!(matches!(
            d.register_footer(vec![text_row(60.0, "foot")]),
            Err(FolioError::FooterTooLarge { .. })
        ));

        let mut d = doc();
        assert!(d.register_footer(vec![text_row(60.0, "foot")]).is_ok());
        match d.register_header(vec![text_row(60.0, "head")]) {
            Err(FolioError::HeaderTooLarge { height, available }) => {
                assert_eq!(height, 60.0);
                assert_eq!(available, 40.0);
            }
            _ => panic!("expected the header to be rejected"),
        }
    }

    #[test]
    fn header_registered_after_content_starts_on_the_next_page() {
        let mut d = doc();
        d.add_rows([text_row(90.0, "a")]);
        d.register_header(vec![text_row(20.0, "head")]).unwrap();
        assert_eq!(d.current_height(), 90.0);
        d.add_rows([text_row(20.0, "b")]);
        assert_eq!(d.pages().len(), 1);
        assert_eq!(d.current_height(), 40.0);

        let calls = calls(&d.generate().unwrap());
        let drawn: Vec<(&str, f64)> = calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, cell } => Some((text.as_str(), cell.y)),
                _ => None,
            })
            .collect();
        assert_eq!(drawn, vec![("a", 10.0), ("head", 10.0), ("b", 30.0)]);
    }

    #[test]
    fn registering_a_header_again_replaces_the_one_on_an_empty_page() {
        let mut d = doc();
        d.register_header(vec![text_row(30.0, "old")]).unwrap();
        d.register_header(vec![text_row(10.0, "new")]).unwrap();
        assert_eq!(d.current_height(), 10.0);
        d.add_rows([text_row(10.0, "a")]);
        let calls = calls(&d.generate().unwrap());
        let texts: Vec<&str> = calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["new", "a"]);
    }

    #[test]
    fn footer_reserve_allows_for_substituted_numbers() {
        let config = Config::builder()
            .with_page_size(PageSize::Custom {
                width: 200.0,
                height: 120.0,
            })
            .with_margins(Edges::uniform(10.0))
            .with_page_number(PageNumber::new("#"))
            .build();
        let mut d = Document::with_provider(config, RecordingProvider::new());
        // One 12pt line as written; three once each token becomes five digits.
        d.register_footer(vec![Row::auto().with(Col::full().with(Text::new("# # # # # # # # # # # #")))])
            .unwrap();
        assert!(!d.fits_in_current_page(77.0));
        assert!(d.fits_in_current_page(64.0));
    }

    #[test]
    fn giant_row_overflows_on_its_own_page() {
        let mut d = doc();
        d.add_rows([text_row(20.0, "a"), text_row(500.0, "giant"), text_row(20.0, "b")]);
        assert_eq!(d.generate().unwrap().page_count(), 3);
    }

    #[test]
    fn empty_row_gets_a_full_column() {
        let mut d = doc();
        d.add_rows([Row::new(10.0)]);
        let structure = d.structure();
        let row = &structure.children[0].children[0];
        assert_eq!(row.children.len(), 1);
        assert_eq!(row.children[0].value.as_deref(), Some("12"));
    }

    #[test]
    fn page_break_only_after_content() {
        let mut d = doc();
        d.add_page_break();
        d.add_rows([text_row(10.0, "a")]);
        d.add_page_break();
        d.add_page_break();
        d.add_rows([text_row(10.0, "b")]);
        assert_eq!(d.generate().unwrap().page_count(), 2);
    }

    #[test]
    fn empty_document_still_has_one_page() {
        let generated = doc().generate().unwrap();
        assert_eq!(generated.page_count(), 1);
        assert_eq!(calls(&generated), vec![DrawCall::PageStart { number: 1, total: 1 }]);
    }

    #[test]
    fn fits_in_current_page_accounts_for_footer() {
        let mut d = doc();
        d.register_footer(vec![text_row(30.0, "f")]).unwrap();
        d.add_rows([text_row(50.0, "a")]);
        assert!(d.fits_in_current_page(20.0));
        assert!(!d.fits_in_current_page(21.0));
    }

    #[test]
    fn add_pages_starts_each_on_a_fresh_page() {
        let mut d = doc();
        d.add_rows([text_row(10.0, "intro")]);
        let page = Page::default().with(text_row(10.0, "p1"));
        let other = Page::default().with(text_row(10.0, "p2"));
        d.add_pages(vec![page, other]);
        assert_eq!(d.generate().unwrap().page_count(), 3);
    }

    #[test]
    fn structure_previews_the_pending_page_without_closing_it() {
        let mut d = doc();
        d.add_rows([text_row(60.0, "a"), text_row(60.0, "b")]);
        let structure = d.structure();
        assert_eq!(structure.count("page"), 2);
        assert_eq!(d.pages().len(), 1);
        assert_eq!(structure.children[1].value.as_deref(), Some("2"));
    }

    #[test]
    fn rows_receive_the_document_config() {
        let config = small_config();
        let mut d = Document::with_provider(config.clone(), RecordingProvider::new());
        d.add_rows([text_row(60.0, "a"), text_row(60.0, "b")]);
        let page = &d.pages()[0];
        assert!(Arc::ptr_eq(page.config().unwrap(), &config));
        assert!(Arc::ptr_eq(page.rows()[0].config().unwrap(), &config));
    }
}
