//! The in-progress product configuration (draft).

use crate::ids::FileId;
use crate::money::{Currency, Money};
use crate::options::{ColorMode, PageRange, PageSize, PaperStock, Sides};
use serde::{Deserialize, Serialize};

/// A single edit to the draft.
///
/// Numeric edits are clamped to >= 1; the page range is sanitized.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    Quantity(u32),
    PageCount(u32),
    Color(ColorMode),
    Paper(PaperStock),
    Size(PageSize),
    Sides(Sides),
    PageRange(String),
}

/// The mutable draft of one print job.
///
/// `page_price` and `total` are only trustworthy immediately after a
/// pricing round-trip that has not been superseded by a later edit; the
/// session tracks that freshness separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfiguration {
    /// Name of the uploaded document, if any.
    pub file_name: Option<String>,
    /// Remote handle of the uploaded document. None until upload succeeds.
    pub file_id: Option<FileId>,
    /// Number of copies. Always >= 1.
    pub quantity: u32,
    /// Number of pages in the document. Always >= 1.
    pub page_count: u32,
    /// Whether the page count was detected from the document (locked)
    /// rather than confirmed by hand.
    pub page_count_detected: bool,
    /// Price per page from the last pricing round-trip.
    pub page_price: Money,
    pub color: ColorMode,
    pub paper: PaperStock,
    pub size: PageSize,
    pub sides: Sides,
    pub page_range: PageRange,
    /// Total from the last pricing round-trip.
    pub total: Money,
}

impl Default for ProductConfiguration {
    fn default() -> Self {
        Self {
            file_name: None,
            file_id: None,
            quantity: 1,
            page_count: 1,
            page_count_detected: false,
            page_price: Money::zero(Currency::MXN),
            color: ColorMode::default(),
            paper: PaperStock::default(),
            size: PageSize::default(),
            sides: Sides::default(),
            page_range: PageRange::all(),
            total: Money::zero(Currency::MXN),
        }
    }
}

impl ProductConfiguration {
    /// Apply a single normalized edit to the draft.
    pub fn apply_edit(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Quantity(n) => self.quantity = n.max(1),
            DraftEdit::PageCount(n) => {
                self.page_count = n.max(1);
                self.page_count_detected = false;
            }
            DraftEdit::Color(c) => self.color = c,
            DraftEdit::Paper(p) => self.paper = p,
            DraftEdit::Size(s) => self.size = s,
            DraftEdit::Sides(s) => self.sides = s,
            DraftEdit::PageRange(raw) => self.page_range = PageRange::new(&raw),
        }
    }

    /// Record a page count detected from the document itself.
    pub fn set_detected_page_count(&mut self, pages: u32) {
        self.page_count = pages.max(1);
        self.page_count_detected = true;
    }

    /// Record a successful upload.
    pub fn set_file(&mut self, name: impl Into<String>, id: FileId) {
        self.file_name = Some(name.into());
        self.file_id = Some(id);
    }

    /// Record the name of a file whose upload is in progress.
    pub fn set_pending_file(&mut self, name: impl Into<String>) {
        self.file_name = Some(name.into());
        self.file_id = None;
    }

    /// Roll the draft back to "no file".
    pub fn clear_file(&mut self) {
        self.file_name = None;
        self.file_id = None;
    }

    /// Write the result of a pricing round-trip into the draft.
    pub fn apply_quote(&mut self, page_price: Money, total: Money) {
        self.page_price = page_price;
        self.total = total;
    }

    /// Subtotal per copy (total divided by quantity; quantity is >= 1).
    pub fn subtotal_per_copy(&self) -> Money {
        self.total.divide(self.quantity as i64)
    }

    /// Whether the draft can become a cart item.
    ///
    /// A new item needs an uploaded file handle; an edit may inherit the
    /// original handle, so `editing` relaxes that requirement.
    pub fn is_ready_for_cart(&self, editing: bool) -> bool {
        (self.file_id.is_some() || editing) && self.quantity > 0
    }

    /// Project the pricing-relevant fields for a quote request.
    pub fn quote_options(&self) -> QuoteOptions {
        QuoteOptions {
            color: self.color,
            paper: self.paper,
            size: self.size,
            sides: self.sides,
            page_count: self.page_count,
            quantity: self.quantity,
            page_range: self.page_range.clone(),
        }
    }
}

/// The subset of the draft a pricing request is computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteOptions {
    pub color: ColorMode,
    pub paper: PaperStock,
    pub size: PageSize,
    pub sides: Sides,
    pub page_count: u32,
    pub quantity: u32,
    pub page_range: PageRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_draft() {
        let draft = ProductConfiguration::default();
        assert_eq!(draft.quantity, 1);
        assert_eq!(draft.page_count, 1);
        assert!(draft.file_id.is_none());
        assert!(!draft.is_ready_for_cart(false));
    }

    #[test]
    fn test_numeric_edits_clamp() {
        let mut draft = ProductConfiguration::default();
        draft.apply_edit(DraftEdit::Quantity(0));
        assert_eq!(draft.quantity, 1);
        draft.apply_edit(DraftEdit::PageCount(0));
        assert_eq!(draft.page_count, 1);
        draft.apply_edit(DraftEdit::Quantity(5));
        assert_eq!(draft.quantity, 5);
    }

    #[test]
    fn test_page_range_edit_sanitizes() {
        let mut draft = ProductConfiguration::default();
        draft.apply_edit(DraftEdit::PageRange("1-3,x7".to_string()));
        assert_eq!(draft.page_range.as_str(), "1-3,7");
    }

    #[test]
    fn test_manual_page_count_unlocks_detection() {
        let mut draft = ProductConfiguration::default();
        draft.set_detected_page_count(42);
        assert!(draft.page_count_detected);
        assert_eq!(draft.page_count, 42);

        draft.apply_edit(DraftEdit::PageCount(10));
        assert!(!draft.page_count_detected);
        assert_eq!(draft.page_count, 10);
    }

    #[test]
    fn test_readiness_requires_file_unless_editing() {
        let mut draft = ProductConfiguration::default();
        assert!(!draft.is_ready_for_cart(false));
        assert!(draft.is_ready_for_cart(true));

        draft.set_file("doc.pdf", FileId::new("f-1"));
        assert!(draft.is_ready_for_cart(false));
    }

    #[test]
    fn test_upload_rollback() {
        let mut draft = ProductConfiguration::default();
        draft.set_pending_file("doc.pdf");
        assert_eq!(draft.file_name.as_deref(), Some("doc.pdf"));
        assert!(draft.file_id.is_none());

        draft.clear_file();
        assert!(draft.file_name.is_none());
        assert!(draft.file_id.is_none());
    }

    #[test]
    fn test_subtotal_per_copy() {
        let mut draft = ProductConfiguration::default();
        draft.apply_edit(DraftEdit::Quantity(3));
        draft.apply_quote(
            Money::from_decimal(1.30, Currency::MXN),
            Money::from_decimal(3.90, Currency::MXN),
        );
        assert_eq!(draft.subtotal_per_copy().amount_cents, 130);
    }

    #[test]
    fn test_single_copy_single_page_quote() {
        let mut draft = ProductConfiguration::default();
        draft.apply_quote(
            Money::from_decimal(1.30, Currency::MXN),
            Money::from_decimal(1.30, Currency::MXN),
        );
        assert_eq!(draft.subtotal_per_copy().amount_cents, 130);
        assert_eq!(draft.total.amount_cents, 130);
    }
}
