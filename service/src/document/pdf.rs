//! `printpdf`-backed rendering of a composed [`Document`].

use std::io::BufWriter;

use derive_more::{Display, Error as StdError, From};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm,
    PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Rgb,
};
use tracerr::Traced;

use super::{Company, Document};

const WIDTH: Mm = Mm(210.0);
const HEIGHT: Mm = Mm(297.0);
const MARGIN: f32 = 20.0;
const LEFT: Mm = Mm(MARGIN);
const RIGHT: Mm = Mm(WIDTH.0 - MARGIN);
const TOP: Mm = Mm(HEIGHT.0 - MARGIN);

const TITLE_SIZE: f32 = 16.0;
const FONT_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 8.0;
const ROW_HEIGHT: f32 = 6.0;
const ITEMS_PER_PAGE: usize = 25;

// Positions table geometry: left edges for index and text, right edges
// for the amount columns.
const COL_INDEX: Mm = LEFT;
const COL_TEXT: Mm = Mm(30.0);
const COL_PRICE_RIGHT: Mm = Mm(130.0);
const COL_QUANTITY_RIGHT: Mm = Mm(152.0);
const COL_TOTAL_RIGHT: Mm = RIGHT;

/// Top of the footer block; page content never reaches below it.
const FOOTER_TOP: Mm = Mm(38.0);

/// Vertical space the totals block and the notice need on the last page.
const SUMMARY_SPACE: f32 = 60.0;

/// Renders the provided [`Document`] into PDF bytes.
///
/// # Errors
///
/// If the PDF document fails to encode.
pub fn render(
    document: &Document,
    company: &Company,
) -> Result<Vec<u8>, Traced<Error>> {
    let title = format!("{} {}", document.title(), document.number);
    let (pdf, first_page, first_layer) =
        PdfDocument::new(&title, WIDTH, HEIGHT, "base");
    let font = pdf
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(tracerr::from_and_wrap!())?;
    let bold = pdf
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(tracerr::from_and_wrap!())?;

    let layer = pdf.get_page(first_page).get_layer(first_layer);
    layer.set_outline_color(Color::Rgb(Rgb::new(0.6, 0.6, 0.6, None)));
    layer.set_outline_thickness(0.3);

    draw_letterhead(&layer, document, company, &font, &bold, &title);
    draw_footer(&layer, company, &font);

    // First page carries the letterhead, so its table sits lower.
    let first_top = Mm(TOP.0 - 72.0);
    draw_table(&layer, document, &font, &bold, first_top, 0);

    let pages = document.rows.len().div_ceil(ITEMS_PER_PAGE).max(1);
    let mut last_layer = layer;
    for page in 1..pages {
        last_layer = add_page(&pdf, company, &font);
        draw_table(
            &last_layer,
            document,
            &font,
            &bold,
            Mm(TOP.0 - 10.0),
            page * ITEMS_PER_PAGE,
        );
    }

    // Totals and notice go right below the last table chunk, or onto a
    // fresh page when they would collide with the footer.
    let rows_on_last = match document.rows.len() % ITEMS_PER_PAGE {
        0 if !document.rows.is_empty() => ITEMS_PER_PAGE,
        rest => rest,
    };
    let last_top = if pages == 1 { Mm(TOP.0 - 72.0) } else { Mm(TOP.0 - 10.0) };
    #[expect(clippy::cast_precision_loss, reason = "small row counts")]
    let mut y = Mm(last_top.0 - (rows_on_last + 2) as f32 * ROW_HEIGHT);
    if y.0 - SUMMARY_SPACE < FOOTER_TOP.0 {
        last_layer = add_page(&pdf, company, &font);
        y = Mm(TOP.0 - 10.0);
    }
    draw_summary(&last_layer, document, &font, &bold, y);

    let mut bytes = Vec::new();
    pdf.save(&mut BufWriter::new(&mut bytes))
        .map_err(tracerr::from_and_wrap!())?;
    Ok(bytes)
}

/// Adds a continuation page and returns its base layer.
fn add_page(
    pdf: &PdfDocumentReference,
    company: &Company,
    font: &IndirectFontRef,
) -> PdfLayerReference {
    let (page, layer) = pdf.add_page(WIDTH, HEIGHT, "base");
    let layer = pdf.get_page(page).get_layer(layer);
    layer.set_outline_color(Color::Rgb(Rgb::new(0.6, 0.6, 0.6, None)));
    layer.set_outline_thickness(0.3);
    draw_footer(&layer, company, font);
    layer
}

/// Draws the first-page letterhead: counterparty address on the left,
/// company block (and logo, if configured) on the right, followed by the
/// title and the metadata strip.
fn draw_letterhead(
    layer: &PdfLayerReference,
    document: &Document,
    company: &Company,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
    title: &str,
) {
    if let Some(path) = &company.logo {
        match printpdf::image_crate::open(path) {
            Ok(image) => {
                Image::from_dynamic_image(&image).add_to_layer(
                    layer.clone(),
                    ImageTransform {
                        translate_x: Some(Mm(RIGHT.0 - 40.0)),
                        translate_y: Some(Mm(TOP.0 - 18.0)),
                        dpi: Some(300.0),
                        ..ImageTransform::default()
                    },
                );
            }
            Err(e) => {
                tracing::warn!(
                    "skipping unreadable logo `{}`: {e}",
                    path.display(),
                );
            }
        }
    }

    layer.use_text(&company.name, FONT_SIZE, LEFT, TOP, bold);
    for (i, line) in document.customer_lines.iter().enumerate() {
        #[expect(clippy::cast_precision_loss, reason = "few address lines")]
        let y = Mm(TOP.0 - 10.0 - i as f32 * 5.0);
        layer.use_text(line, FONT_SIZE, LEFT, y, font);
    }

    let company_lines = [
        company.owner.clone(),
        company.street.clone(),
        format!("{} {}", company.postal_code, company.city),
        company.phone.clone(),
        company.email.clone(),
        company.web.clone(),
    ];
    for (i, line) in company_lines.iter().enumerate() {
        #[expect(clippy::cast_precision_loss, reason = "few header lines")]
        let y = Mm(TOP.0 - i as f32 * 4.5);
        right_text(layer, line, FOOTER_SIZE, Mm(RIGHT.0 - 45.0), y, font);
    }

    let title_y = Mm(TOP.0 - 48.0);
    layer.use_text(title, TITLE_SIZE, LEFT, title_y, bold);

    // Metadata strip: document number left, customer number centered,
    // issue date right.
    let meta_y = Mm(title_y.0 - 9.0);
    layer.use_text(
        format!("{}: {}", document.kind.number_label(), document.number),
        FONT_SIZE,
        LEFT,
        meta_y,
        font,
    );
    center_text(
        layer,
        &format!("Kundennummer: {}", document.customer_number),
        FONT_SIZE,
        Mm(WIDTH.0 / 2.0),
        meta_y,
        font,
    );
    right_text(
        layer,
        &format!("Datum: {}", document.issued_on),
        FONT_SIZE,
        RIGHT,
        meta_y,
        font,
    );
    if let Some((from, to)) = &document.period {
        layer.use_text(
            format!("Leistungszeitraum: {from} - {to}"),
            FONT_SIZE,
            LEFT,
            Mm(meta_y.0 - 6.0),
            font,
        );
    }
}

/// Draws one page worth of the positions table starting at `from_row`.
fn draw_table(
    layer: &PdfLayerReference,
    document: &Document,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
    top: Mm,
    from_row: usize,
) {
    layer.use_text("Pos.", FONT_SIZE, COL_INDEX, top, bold);
    layer.use_text("Bezeichnung", FONT_SIZE, COL_TEXT, top, bold);
    right_text(layer, "Einzelpreis", FONT_SIZE, COL_PRICE_RIGHT, top, bold);
    right_text(layer, "Menge", FONT_SIZE, COL_QUANTITY_RIGHT, top, bold);
    right_text(layer, "Gesamt", FONT_SIZE, COL_TOTAL_RIGHT, top, bold);
    rule(layer, Mm(top.0 - 2.0));

    for (i, row) in document
        .rows
        .iter()
        .skip(from_row)
        .take(ITEMS_PER_PAGE)
        .enumerate()
    {
        #[expect(clippy::cast_precision_loss, reason = "bounded by page size")]
        let y = Mm(top.0 - (i + 1) as f32 * ROW_HEIGHT);
        layer.use_text(row.index.to_string(), FONT_SIZE, COL_INDEX, y, font);
        layer.use_text(&row.text, FONT_SIZE, COL_TEXT, y, font);
        right_text(layer, &row.unit_price, FONT_SIZE, COL_PRICE_RIGHT, y, font);
        right_text(layer, &row.quantity, FONT_SIZE, COL_QUANTITY_RIGHT, y, font);
        right_text(layer, &row.total, FONT_SIZE, COL_TOTAL_RIGHT, y, font);
    }
}

/// Draws the totals block and the notice below it.
fn draw_summary(
    layer: &PdfLayerReference,
    document: &Document,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
    top: Mm,
) {
    rule(layer, Mm(top.0 + ROW_HEIGHT - 2.0));
    let mut y = top;
    for line in &document.summary {
        let f = if line.emphasized { bold } else { font };
        layer.use_text(line.label, FONT_SIZE, Mm(COL_PRICE_RIGHT.0 - 30.0), y, f);
        right_text(layer, &line.amount, FONT_SIZE, COL_TOTAL_RIGHT, y, f);
        y = Mm(y.0 - ROW_HEIGHT);
    }

    layer.use_text(document.notice, FONT_SIZE, LEFT, Mm(y.0 - 12.0), font);
}

/// Draws the three-column footer anchored at the page bottom.
fn draw_footer(
    layer: &PdfLayerReference,
    company: &Company,
    font: &IndirectFontRef,
) {
    rule(layer, FOOTER_TOP);

    let columns: [&[String]; 3] = [
        &[
            company.name.clone(),
            company.street.clone(),
            format!("{} {}", company.postal_code, company.city),
            company.phone.clone(),
        ],
        &[
            format!("UID: {}", company.uid),
            format!("Steuernummer: {}", company.tax_number),
            company.email.clone(),
            company.web.clone(),
        ],
        &[
            company.bank_name.clone(),
            format!("IBAN: {}", company.iban),
            format!("BIC: {}", company.bic),
        ],
    ];
    let column_width = (RIGHT.0 - LEFT.0) / 3.0;
    for (col, lines) in columns.iter().enumerate() {
        #[expect(clippy::cast_precision_loss, reason = "three columns")]
        let x = Mm(LEFT.0 + col as f32 * column_width);
        for (i, line) in lines.iter().enumerate() {
            #[expect(clippy::cast_precision_loss, reason = "few footer lines")]
            let y = Mm(FOOTER_TOP.0 - 5.0 - i as f32 * 4.0);
            layer.use_text(line, FOOTER_SIZE, x, y, font);
        }
    }
}

/// Draws a full-width horizontal rule at the given height.
fn rule(layer: &PdfLayerReference, y: Mm) {
    layer.add_line(Line {
        points: vec![
            (Point::new(LEFT, y), false),
            (Point::new(RIGHT, y), false),
        ],
        is_closed: false,
    });
}

/// Estimates the printed width of `text` at the given font size.
///
/// Builtin fonts expose no metrics, so the width is approximated with an
/// average Helvetica advance of half the font size.
fn text_width(text: &str, size: f32) -> f32 {
    const MM_PER_PT: f32 = 0.352_778;
    #[expect(clippy::cast_precision_loss, reason = "short text runs")]
    let chars = text.chars().count() as f32;
    chars * size * 0.5 * MM_PER_PT
}

/// Places `text` so its right edge sits at `right`.
fn right_text(
    layer: &PdfLayerReference,
    text: &str,
    size: f32,
    right: Mm,
    y: Mm,
    font: &IndirectFontRef,
) {
    layer.use_text(text, size, Mm(right.0 - text_width(text, size)), y, font);
}

/// Places `text` so its middle sits at `center`.
fn center_text(
    layer: &PdfLayerReference,
    text: &str,
    size: f32,
    center: Mm,
    y: Mm,
    font: &IndirectFontRef,
) {
    let x = Mm(center.0 - text_width(text, size) / 2.0);
    layer.use_text(text, size, x, y, font);
}

/// Error of rendering a [`Document`] into PDF bytes.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to build or encode the PDF document.
    #[display("failed to encode PDF document: {_0}")]
    Pdf(printpdf::Error),

    /// Failed to write out the encoded bytes.
    #[display("failed to write out PDF bytes: {_0}")]
    Io(std::io::Error),
}

#[cfg(test)]
mod spec {
    use common::Date;

    use crate::domain::{contract, customer, invoice, Contract, Invoice};
    use crate::document::{Company, Document};

    use super::render;

    #[test]
    fn renders_nonempty_pdf_without_customer() {
        let contract = Contract {
            id: contract::Id::from(3),
            customer_id: customer::Id::from(1),
            issued_on: Date::from_calendar(2024, 5, 2).unwrap().coerce(),
            accepted: false,
            items: vec![],
        };
        let document = Document::offer(&contract, None);

        let bytes = render(&document, &Company::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn renders_invoice_letterhead_with_period() {
        let invoice = Invoice {
            id: invoice::Id::from(7),
            customer_id: customer::Id::from(17),
            issued_on: Date::from_calendar(2024, 3, 5).unwrap().coerce(),
            started_on: Date::from_calendar(2024, 2, 1).unwrap().coerce(),
            finished_on: Date::from_calendar(2024, 2, 29).unwrap().coerce(),
            kind: invoice::Kind::Service,
            deposit: None,
            items: vec![],
        };
        let document = Document::invoice(&invoice, None);
        assert!(document.period.is_some());

        let bytes = render(&document, &Company::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
