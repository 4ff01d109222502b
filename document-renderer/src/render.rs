//! The fixed-coordinate invoice layout.

use checkout_core::money::format_usd;
use checkout_core::AppError;
use invoicing_core::InvoiceSnapshot;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, Stream};
use tracing::debug;

use crate::artifact::RenderedArtifact;
use crate::layout::{
    self, wrap_text, Canvas, Font, BLACK, GRAY, MM_TO_PT, NAVY, RULE_GRAY, WHITE,
};

const MARGIN_LEFT: f32 = 14.0;
const RIGHT_COLUMN_X: f32 = 120.0;
const RIGHT_EDGE: f32 = 196.0;
/// Content past this vertical offset no longer fits the page.
const BOTTOM_LIMIT: f32 = 287.0;
const LINE_STEP: f32 = 5.0;

const TABLE_TOP: f32 = 95.0;
const TABLE_HEADER_HEIGHT: f32 = 8.0;
const ROW_PADDING: f32 = 2.5;
const COL_DESCRIPTION_X: f32 = 16.0;
const COL_DESCRIPTION_WIDTH: f32 = 88.0;
const COL_QTY_RIGHT: f32 = 122.0;
const COL_PRICE_RIGHT: f32 = 156.0;
const COL_AMOUNT_RIGHT: f32 = 194.0;

/// Render a frozen snapshot into a self-contained PDF artifact.
///
/// Pure and deterministic: equal snapshots yield byte-identical artifacts.
/// Content that would cross the bottom margin of the single A4 page fails
/// with [`AppError::PageOverflow`].
pub fn render(snapshot: &InvoiceSnapshot) -> Result<RenderedArtifact, AppError> {
    let mut canvas = Canvas::new();

    header(&mut canvas, snapshot);
    party_blocks(&mut canvas, snapshot)?;
    let table_end = items_table(&mut canvas, snapshot)?;
    let totals_end = totals_block(&mut canvas, snapshot, table_end)?;
    notes_block(&mut canvas, snapshot, totals_end)?;

    let bytes = write_pdf(canvas.into_content())?;
    debug!(
        invoice_number = %snapshot.invoice_number,
        size_bytes = bytes.len(),
        "Invoice rendered"
    );
    Ok(RenderedArtifact::from_pdf_bytes(&bytes))
}

fn ensure_fits(y_mm: f32) -> Result<(), AppError> {
    if y_mm > BOTTOM_LIMIT {
        return Err(AppError::PageOverflow);
    }
    Ok(())
}

fn header(canvas: &mut Canvas, snapshot: &InvoiceSnapshot) {
    canvas.text(MARGIN_LEFT, 20.0, Font::Bold, 20.0, NAVY, "INVOICE");
    let meta = [
        format!("Invoice #: {}", snapshot.invoice_number),
        format!("Date: {}", snapshot.issue_date.format("%Y-%m-%d")),
        format!("Due Date: {}", snapshot.due_date.format("%Y-%m-%d")),
    ];
    for (i, line) in meta.iter().enumerate() {
        let y = 30.0 + i as f32 * LINE_STEP;
        canvas.text(MARGIN_LEFT, y, Font::Regular, 10.0, GRAY, line);
    }
}

/// Issuer block on the left, recipient block on the right. Both start at the
/// same fixed offset; each advances its own cursor one line step per address
/// line and contact field.
fn party_blocks(canvas: &mut Canvas, snapshot: &InvoiceSnapshot) -> Result<(), AppError> {
    let issuer = &snapshot.issuer;
    let end_left = party_block(
        canvas,
        MARGIN_LEFT,
        "From:",
        &issuer.name,
        &issuer.address,
        &[&issuer.email, &issuer.phone],
    );
    let recipient = &snapshot.recipient;
    let end_right = party_block(
        canvas,
        RIGHT_COLUMN_X,
        "Bill To:",
        &recipient.name,
        &recipient.address,
        &[&recipient.email],
    );
    // The table position is fixed; an address tall enough to reach it does
    // not fit this layout.
    if end_left.max(end_right) > TABLE_TOP {
        return Err(AppError::PageOverflow);
    }
    Ok(())
}

fn party_block(
    canvas: &mut Canvas,
    x: f32,
    label: &str,
    name: &str,
    address: &str,
    contacts: &[&str],
) -> f32 {
    canvas.text(x, 55.0, Font::Bold, 12.0, NAVY, label);
    canvas.text(x, 60.0, Font::Regular, 11.0, BLACK, name);
    let mut y = 65.0;
    for line in address.split('\n') {
        canvas.text(x, y, Font::Regular, 11.0, BLACK, line);
        y += LINE_STEP;
    }
    for contact in contacts {
        canvas.text(x, y, Font::Regular, 11.0, BLACK, contact);
        y += LINE_STEP;
    }
    y
}

/// Render the line-item table and return the vertical offset of its bottom
/// edge, so the blocks below are placed relative to the actual table height.
fn items_table(canvas: &mut Canvas, snapshot: &InvoiceSnapshot) -> Result<f32, AppError> {
    let mut y = TABLE_TOP;

    canvas.fill_rect(
        MARGIN_LEFT,
        y,
        RIGHT_EDGE - MARGIN_LEFT,
        TABLE_HEADER_HEIGHT,
        NAVY,
    );
    let header_baseline = y + 5.5;
    canvas.text(
        COL_DESCRIPTION_X,
        header_baseline,
        Font::Bold,
        10.0,
        WHITE,
        "Description",
    );
    canvas.text(108.0, header_baseline, Font::Bold, 10.0, WHITE, "Quantity");
    canvas.text(140.0, header_baseline, Font::Bold, 10.0, WHITE, "Price");
    canvas.text(176.0, header_baseline, Font::Bold, 10.0, WHITE, "Amount");
    y += TABLE_HEADER_HEIGHT;

    for item in &snapshot.items {
        let lines = wrap_text(&item.description, COL_DESCRIPTION_WIDTH, 10.0);
        let row_height = lines.len() as f32 * LINE_STEP + ROW_PADDING;
        ensure_fits(y + row_height)?;

        let first_baseline = y + LINE_STEP;
        for (i, line) in lines.iter().enumerate() {
            canvas.text(
                COL_DESCRIPTION_X,
                first_baseline + i as f32 * LINE_STEP,
                Font::Regular,
                10.0,
                BLACK,
                line,
            );
        }
        canvas.text_right(
            COL_QTY_RIGHT,
            first_baseline,
            Font::Mono,
            10.0,
            BLACK,
            &item.quantity.to_string(),
        );
        canvas.text_right(
            COL_PRICE_RIGHT,
            first_baseline,
            Font::Mono,
            10.0,
            BLACK,
            &format_usd(item.unit_price),
        );
        canvas.text_right(
            COL_AMOUNT_RIGHT,
            first_baseline,
            Font::Mono,
            10.0,
            BLACK,
            &format_usd(item.amount()),
        );

        y += row_height;
        canvas.hline(MARGIN_LEFT, RIGHT_EDGE, y, RULE_GRAY);
    }

    Ok(y)
}

fn totals_block(
    canvas: &mut Canvas,
    snapshot: &InvoiceSnapshot,
    table_end: f32,
) -> Result<f32, AppError> {
    let label_x = 150.0;
    let mut y = table_end + 10.0;
    ensure_fits(y + 2.0 * LINE_STEP)?;

    canvas.text(label_x, y, Font::Regular, 10.0, BLACK, "Subtotal:");
    canvas.text_right(
        COL_AMOUNT_RIGHT,
        y,
        Font::Mono,
        10.0,
        BLACK,
        &format_usd(snapshot.subtotal()),
    );

    y += LINE_STEP;
    let tax_label = format!("Tax ({}%):", snapshot.tax_rate_percent.normalize());
    canvas.text(label_x, y, Font::Regular, 10.0, BLACK, &tax_label);
    canvas.text_right(
        COL_AMOUNT_RIGHT,
        y,
        Font::Mono,
        10.0,
        BLACK,
        &format_usd(snapshot.tax()),
    );

    y += LINE_STEP;
    canvas.text(label_x, y, Font::Bold, 12.0, NAVY, "Total:");
    canvas.text_right(
        COL_AMOUNT_RIGHT,
        y,
        Font::MonoBold,
        12.0,
        NAVY,
        &format_usd(snapshot.total()),
    );

    Ok(y)
}

/// Only rendered when the notes are non-empty.
fn notes_block(
    canvas: &mut Canvas,
    snapshot: &InvoiceSnapshot,
    totals_end: f32,
) -> Result<(), AppError> {
    let notes = snapshot.notes.trim();
    if notes.is_empty() {
        return Ok(());
    }

    let mut y = totals_end + 15.0;
    ensure_fits(y)?;
    canvas.text(MARGIN_LEFT, y, Font::Bold, 11.0, NAVY, "Notes:");

    y += LINE_STEP;
    for line in wrap_text(notes, RIGHT_EDGE - MARGIN_LEFT, 10.0) {
        ensure_fits(y)?;
        canvas.text(MARGIN_LEFT, y, Font::Regular, 10.0, BLACK, &line);
        y += LINE_STEP;
    }
    Ok(())
}

fn write_pdf(content: Content) -> Result<Vec<u8>, AppError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in Font::all() {
        let font_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(font.base_font().into())),
        ]));
        fonts.set(font.resource_name(), Object::Reference(font_id));
    }
    let resources_id = doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(fonts),
    )]));

    let encoded = content
        .encode()
        .map_err(|e| AppError::Render(anyhow::anyhow!("Failed to encode page content: {}", e)))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(layout::PAGE_WIDTH_MM * MM_TO_PT),
                Object::Real(layout::PAGE_HEIGHT_MM * MM_TO_PT),
            ]),
        ),
        ("Contents", Object::Reference(content_id)),
        ("Resources", Object::Reference(resources_id)),
    ]));

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| AppError::Render(anyhow::anyhow!("Failed to save PDF: {}", e)))?;
    Ok(buffer)
}
