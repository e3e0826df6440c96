//! Payslip (invoice) generation for placed orders.
//!
//! A [`Receipt`] is assembled from an order read back after checkout and,
//! when available, the full shipping form. [`Receipt::layout`] turns it
//! into positioned text runs on A4 pages; this step is pure, so the same
//! receipt always yields the same pages. [`Receipt::to_pdf`] then renders
//! those pages with the built-in PDF fonts.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use comfy_table::{CellAlignment, ContentArrangement, Table, presets};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};

use crate::checkout::Checkout;
use crate::error::{Result, ShopError};
use crate::models::{CartLine, Order, OrderId, PaymentMethod, ShippingInfo};

/// Default file name for a saved payslip.
pub const PAYSLIP_FILE_NAME: &str = "payslip.pdf";

/// A4 page width.
pub const PAGE_WIDTH_MM: f32 = 210.0;

/// A4 page height.
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Margin on every side of the page.
pub const MARGIN_MM: f32 = 15.0;

/// Character budget of one item-table line in the monospace font.
const TABLE_COLUMNS: u16 = 90;

/// Points per millimetre.
const MM_PER_PT: f32 = 0.3528;

/// Horizontal offset of the summary labels.
const SUMMARY_LABEL_X_MM: f32 = 110.0;

/// Horizontal offset of the summary amounts.
const SUMMARY_AMOUNT_X_MM: f32 = 160.0;

/// Vertical space between sections.
const SECTION_GAP_MM: f32 = 6.0;

/// Currency code printed on the payslip.
const PDF_CURRENCY: &str = "BDT";

/// Typeface and size of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    /// Large bold document title.
    Title,
    /// Bold section heading.
    Heading,
    /// Regular body text.
    Body,
    /// Bold body text.
    Strong,
    /// Monospace text for the item table.
    Mono,
}

impl TextStyle {
    /// Font size in points.
    #[inline]
    #[must_use]
    pub const fn size_pt(self) -> f32 {
        match self {
            Self::Title => 22.0,
            Self::Heading => 13.0,
            Self::Body | Self::Strong => 10.0,
            Self::Mono => 9.0,
        }
    }

    /// Vertical space taken by one line in this style.
    #[inline]
    #[must_use]
    pub fn line_height_mm(self) -> f32 {
        self.size_pt() * MM_PER_PT * 1.4
    }
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// ASCII text.
    pub text: String,
    /// Typeface and size.
    pub style: TextStyle,
    /// Distance from the left page edge.
    pub x_mm: f32,
    /// Distance from the top page edge to the top of the line.
    pub y_mm: f32,
}

/// The runs placed on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiptPage {
    /// Runs in drawing order.
    pub runs: Vec<TextRun>,
}

/// Whom the payslip is addressed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BilledTo {
    /// Customer name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone, when captured at checkout.
    pub phone: Option<String>,
    /// Delivery address on one line.
    pub address: String,
}

/// Structured payslip content.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// Order the payslip is for.
    pub order_id: OrderId,
    /// Recipient block.
    pub billed_to: BilledTo,
    /// Payment method, when known.
    pub payment_method: Option<PaymentMethod>,
    /// Ordered lines.
    pub lines: Vec<CartLine>,
    /// Sum of the line totals.
    pub subtotal: f64,
    /// Delivery charge.
    pub delivery_charge: f64,
    /// Voucher discount.
    pub discount: f64,
    /// Amount charged.
    pub total: f64,
    /// Date printed on the payslip.
    pub generated_on: NaiveDate,
}

impl Receipt {
    /// Builds a receipt from an order read back from the backend.
    #[must_use]
    pub fn from_order(order: &Order, generated_on: NaiveDate) -> Self {
        let billed_to = order
            .customer_profile()
            .map(|profile| BilledTo {
                name: profile.name.clone(),
                email: profile.email.clone(),
                phone: None,
                address: order.shipping_address.clone(),
            })
            .unwrap_or_else(|| BilledTo {
                address: order.shipping_address.clone(),
                ..BilledTo::default()
            });
        Self {
            order_id: order.id.clone(),
            billed_to,
            payment_method: order.payment_method,
            lines: order.items.clone(),
            subtotal: order.items_subtotal(),
            delivery_charge: order.shipping_price,
            discount: order.discount_amount,
            total: order.total_amount,
            generated_on,
        }
    }

    /// Builds a receipt for a checkout that placed an order.
    ///
    /// Returns `None` until the checkout has succeeded.
    #[must_use]
    pub fn from_checkout(checkout: &Checkout, generated_on: NaiveDate) -> Option<Self> {
        checkout
            .placed_order()
            .map(|order| Self::from_order(order, generated_on).with_shipping(checkout.shipping()))
    }

    /// Replaces the recipient block with the shipping form contents.
    #[must_use]
    pub fn with_shipping(mut self, shipping: &ShippingInfo) -> Self {
        self.billed_to = BilledTo {
            name: shipping.full_name(),
            email: shipping.email.clone(),
            phone: Some(shipping.phone.clone()),
            address: shipping.concatenated_address(),
        };
        self
    }

    /// Lays the receipt out on A4 pages.
    ///
    /// Runs are placed top-down inside the margins. When the next run
    /// would cross the bottom margin a new page starts, and the run keeps
    /// its horizontal position.
    #[must_use]
    pub fn layout(&self) -> Vec<ReceiptPage> {
        let mut composer = Composer::new();

        composer.line("INVOICE", TextStyle::Title, MARGIN_MM);
        composer.line("Sunshine - Elevate Your Style", TextStyle::Body, MARGIN_MM);
        composer.line(format!("Order ID: {}", self.order_id), TextStyle::Body, MARGIN_MM);
        composer.line(
            format!("Date: {}", self.generated_on.format("%Y-%m-%d")),
            TextStyle::Body,
            MARGIN_MM,
        );
        composer.gap(SECTION_GAP_MM);

        composer.line("Billed To", TextStyle::Heading, MARGIN_MM);
        if !self.billed_to.name.is_empty() {
            composer.line(self.billed_to.name.as_str(), TextStyle::Strong, MARGIN_MM);
        }
        for detail in [
            Some(&self.billed_to.address),
            Some(&self.billed_to.email),
            self.billed_to.phone.as_ref(),
        ]
        .into_iter()
        .flatten()
        .filter(|detail| !detail.is_empty())
        {
            composer.line(detail.as_str(), TextStyle::Body, MARGIN_MM);
        }
        composer.gap(SECTION_GAP_MM);

        composer.line("Payment Details", TextStyle::Heading, MARGIN_MM);
        let method = self
            .payment_method
            .map_or("Not specified", PaymentMethod::label);
        composer.line(format!("Payment Method: {method}"), TextStyle::Body, MARGIN_MM);
        composer.gap(SECTION_GAP_MM);

        for table_line in self.items_table().lines() {
            composer.line(table_line, TextStyle::Mono, MARGIN_MM);
        }
        composer.gap(SECTION_GAP_MM);

        composer.summary("Subtotal:", self.subtotal, TextStyle::Body);
        composer.summary("Delivery Charge:", self.delivery_charge, TextStyle::Body);
        if self.discount > 0.0 {
            composer.summary("Discount:", -self.discount, TextStyle::Body);
        }
        composer.summary("Grand Total:", self.total, TextStyle::Strong);
        composer.gap(SECTION_GAP_MM);

        composer.line("Thank you for your business!", TextStyle::Body, MARGIN_MM);
        composer.line(
            "Sunshine | 123 Fashion St, Dhaka, Bangladesh | contact@sunshine.com",
            TextStyle::Body,
            MARGIN_MM,
        );
        composer.finish()
    }

    /// Renders the layout as a PDF document.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Receipt`] if the PDF backend fails.
    #[tracing::instrument(skip_all, fields(order_id = %self.order_id))]
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        let pages = self.layout();
        tracing::debug!(pages = pages.len(), "rendering payslip");

        let (doc, first_page, first_layer) = PdfDocument::new(
            format!("Payslip {}", ascii_safe(self.order_id.as_inner())),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
            mono: doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_error)?,
        };

        for (index, page) in pages.iter().enumerate() {
            let (page_index, layer_index) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);
            for run in &page.runs {
                let baseline = run.y_mm + run.style.size_pt() * MM_PER_PT;
                layer.use_text(
                    run.text.as_str(),
                    run.style.size_pt(),
                    Mm(run.x_mm),
                    Mm(PAGE_HEIGHT_MM - baseline),
                    fonts.for_style(run.style),
                );
            }
        }

        doc.save_to_bytes().map_err(pdf_error)
    }

    /// Writes the PDF to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Receipt`] if rendering fails or
    /// [`ShopError::Io`] if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_pdf()?;
        fs::write(path.as_ref(), bytes)?;
        tracing::info!(path = %path.as_ref().display(), "payslip saved");
        Ok(())
    }

    /// Formats the item lines as a fixed-width ASCII table.
    fn items_table(&self) -> String {
        let mut table = Table::new();
        _ = table
            .load_preset(presets::ASCII_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(TABLE_COLUMNS)
            .set_header(vec!["Product", "Size", "Qty", "Price", "Total"]);
        for line in &self.lines {
            _ = table.add_row(vec![
                ascii_safe(&line.name),
                ascii_safe(&line.size),
                line.quantity.to_string(),
                pdf_amount(line.price),
                pdf_amount(line.line_total()),
            ]);
        }
        for index in 2..5 {
            if let Some(column) = table.column_mut(index) {
                _ = column.set_cell_alignment(CellAlignment::Right);
            }
        }
        table.to_string()
    }
}

/// Top-down page filler.
#[derive(Debug)]
struct Composer {
    /// Completed pages.
    pages: Vec<ReceiptPage>,
    /// Runs on the page being filled.
    current: Vec<TextRun>,
    /// Top of the next line on the current page.
    y_mm: f32,
}

impl Composer {
    /// Starts at the top margin of the first page.
    const fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y_mm: MARGIN_MM,
        }
    }

    /// Places one run per `(text, x)` cell on a shared line.
    fn row(&mut self, cells: Vec<(String, f32)>, style: TextStyle) {
        let height = style.line_height_mm();
        if self.y_mm + height > PAGE_HEIGHT_MM - MARGIN_MM && !self.current.is_empty() {
            self.pages.push(ReceiptPage {
                runs: core::mem::take(&mut self.current),
            });
            self.y_mm = MARGIN_MM;
        }
        for (text, x_mm) in cells {
            self.current.push(TextRun {
                text: ascii_safe(&text),
                style,
                x_mm,
                y_mm: self.y_mm,
            });
        }
        self.y_mm += height;
    }

    /// Places a single run.
    fn line<T: Into<String>>(&mut self, text: T, style: TextStyle, x_mm: f32) {
        self.row(vec![(text.into(), x_mm)], style);
    }

    /// Places a right-hand summary label and amount.
    fn summary(&mut self, label: &str, amount: f64, style: TextStyle) {
        self.row(
            vec![
                (label.to_owned(), SUMMARY_LABEL_X_MM),
                (pdf_amount(amount), SUMMARY_AMOUNT_X_MM),
            ],
            style,
        );
    }

    /// Leaves vertical space.
    fn gap(&mut self, mm: f32) {
        self.y_mm += mm;
    }

    /// Returns every page, including the one being filled.
    fn finish(mut self) -> Vec<ReceiptPage> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(ReceiptPage { runs: self.current });
        }
        self.pages
    }
}

/// Font handles registered with the document.
#[derive(Debug)]
struct Fonts {
    /// Helvetica.
    regular: IndirectFontRef,
    /// Helvetica Bold.
    bold: IndirectFontRef,
    /// Courier.
    mono: IndirectFontRef,
}

impl Fonts {
    /// Returns the handle matching `style`.
    const fn for_style(&self, style: TextStyle) -> &IndirectFontRef {
        match style {
            TextStyle::Title | TextStyle::Heading | TextStyle::Strong => &self.bold,
            TextStyle::Body => &self.regular,
            TextStyle::Mono => &self.mono,
        }
    }
}

/// Formats an amount for the PDF, e.g. `BDT 150.00`.
fn pdf_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("-{PDF_CURRENCY} {:.2}", -amount)
    } else {
        format!("{PDF_CURRENCY} {amount:.2}")
    }
}

/// Replaces characters the built-in fonts cannot draw with `?`.
fn ascii_safe(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_ascii() && !ch.is_ascii_control() { ch } else { '?' })
        .collect()
}

/// Maps a PDF backend error into [`ShopError::Receipt`].
fn pdf_error(err: printpdf::Error) -> ShopError {
    ShopError::Receipt(err.to_string())
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroU32;

    use super::*;
    use crate::models::ProductId;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn order(item_count: usize) -> Order {
        let items: Vec<serde_json::Value> = (0..item_count)
            .map(|index| {
                serde_json::json!({
                    "productId": format!("p{index}"),
                    "name": format!("Cotton Panjabi {index}"),
                    "price": 40,
                    "size": "M",
                    "quantity": 2
                })
            })
            .collect();
        serde_json::from_value(serde_json::json!({
            "_id": "o-42",
            "user": {"name": "Rahim Uddin", "email": "rahim@example.com"},
            "items": items,
            "shippingAddress": "House 12, Road 5, Dhaka, Dhaka, 1207",
            "shippingPrice": 100,
            "discountAmount": 0,
            "totalAmount": 180,
            "paymentMethod": "cash on delivery"
        }))
        .unwrap()
    }

    fn all_text(pages: &[ReceiptPage]) -> String {
        pages
            .iter()
            .flat_map(|page| page.runs.iter().map(|run| run.text.as_str()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn layout_is_deterministic() {
        let receipt = Receipt::from_order(&order(3), date());
        let again = Receipt::from_order(&order(3), date());
        assert_eq!(receipt.layout(), again.layout());
    }

    #[test]
    fn single_item_fits_one_page() {
        let pages = Receipt::from_order(&order(1), date()).layout();
        assert_eq!(pages.len(), 1);
        let text = all_text(&pages);
        assert!(text.contains("Order ID: o-42"));
        assert!(text.contains("Date: 2024-05-01"));
        assert!(text.contains("Rahim Uddin"));
        assert!(text.contains("Cotton Panjabi 0"));
        assert!(text.contains("BDT 80.00"));
        assert!(text.contains("BDT 180.00"));
        assert!(text.contains("Payment Method: Cash on Delivery"));
        assert!(!text.contains("Discount:"));
    }

    #[test]
    fn long_orders_paginate_inside_margins() {
        let pages = Receipt::from_order(&order(80), date()).layout();
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(!page.runs.is_empty());
            for run in &page.runs {
                assert!(run.y_mm >= MARGIN_MM);
                assert!(run.y_mm + run.style.line_height_mm() <= PAGE_HEIGHT_MM - MARGIN_MM + 1e-3);
            }
        }
        let continued = &pages[1].runs[0];
        assert_eq!(continued.style, TextStyle::Mono);
        assert!((continued.x_mm - MARGIN_MM).abs() < f32::EPSILON);
        assert!((continued.y_mm - MARGIN_MM).abs() < f32::EPSILON);
    }

    #[test]
    fn shipping_form_replaces_recipient() {
        let shipping = ShippingInfo {
            first_name: "Karim".to_owned(),
            last_name: "Ahmed".to_owned(),
            email: "karim@example.com".to_owned(),
            phone: "01800000000".to_owned(),
            address: "Flat 3B".to_owned(),
            street: "Lake Road".to_owned(),
            city: "Sylhet".to_owned(),
            district: "Sylhet".to_owned(),
            postal_code: "3100".to_owned(),
        };
        let receipt = Receipt::from_order(&order(1), date()).with_shipping(&shipping);
        assert_eq!(receipt.billed_to.phone.as_deref(), Some("01800000000"));
        let text = all_text(&receipt.layout());
        assert!(text.contains("Karim Ahmed"));
        assert!(text.contains("Flat 3B, Lake Road, Sylhet, Sylhet, 3100"));
        assert!(!text.contains("Rahim"));
    }

    #[test]
    fn discount_line_is_printed_when_applied() {
        let mut receipt = Receipt::from_order(&order(1), date());
        receipt.discount = 50.0;
        let text = all_text(&receipt.layout());
        assert!(text.contains("Discount:"));
        assert!(text.contains("-BDT 50.00"));
    }

    #[test]
    fn non_ascii_text_is_replaced() {
        assert_eq!(ascii_safe("\u{09F3}150 Sari \u{2600}"), "?150 Sari ?");
        let mut receipt = Receipt::from_order(&order(0), date());
        receipt.lines.push(CartLine {
            product_id: ProductId::from("p9"),
            name: "Jamdani \u{09B6}\u{09BE}\u{09DC}\u{09BF}".to_owned(),
            image: String::new(),
            price: 10.0,
            size: "Free".to_owned(),
            quantity: NonZeroU32::new(1).unwrap(),
        });
        for page in receipt.layout() {
            for run in page.runs {
                assert!(run.text.is_ascii());
            }
        }
    }

    #[test]
    fn empty_order_still_lays_out() {
        let pages = Receipt::from_order(&order(0), date()).layout();
        assert_eq!(pages.len(), 1);
        assert!(all_text(&pages).contains("Grand Total:"));
    }

    #[test]
    fn pdf_output_is_a_pdf() {
        let bytes = Receipt::from_order(&order(60), date()).to_pdf().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PAYSLIP_FILE_NAME);
        Receipt::from_order(&order(2), date()).save(&path).unwrap();
        let written = fs::read(&path).unwrap();
        assert!(written.starts_with(b"%PDF"));
    }

    #[test]
    fn from_checkout_requires_placed_order() {
        let checkout = Checkout::default();
        assert!(Receipt::from_checkout(&checkout, date()).is_none());
    }
}
