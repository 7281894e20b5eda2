use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
};

use crate::{
    ReportError, ResultReport,
    layout::{Align, Element, PAGE_HEIGHT, PAGE_WIDTH, Page, Rgb},
};

const LAYER: &str = "Layer 1";
/// Rough Helvetica advance width as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;
const PT_TO_MM: f32 = 0.352_778;

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(rgb.0) / 255.0,
        f32::from(rgb.1) / 255.0,
        f32::from(rgb.2) / 255.0,
        None,
    ))
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_CHAR_WIDTH * PT_TO_MM
}

fn draw(layer: &PdfLayerReference, font: &IndirectFontRef, element: &Element) {
    match element {
        Element::Text {
            x,
            y,
            size,
            color: rgb,
            align,
            text,
        } => {
            let x = match align {
                Align::Left => *x,
                Align::Center => x - text_width(text, *size) / 2.0,
            };
            layer.set_fill_color(color(*rgb));
            layer.use_text(text.as_str(), *size, Mm(x), Mm(PAGE_HEIGHT - y), font);
        }
        Element::Rule { x1, x2, y } => {
            layer.set_outline_color(color(Rgb::BLACK));
            layer.set_outline_thickness(0.5);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1), Mm(PAGE_HEIGHT - y)), false),
                    (Point::new(Mm(*x2), Mm(PAGE_HEIGHT - y)), false),
                ],
                is_closed: false,
            });
        }
    }
}

/// Paint laid out pages into a PDF document.
pub fn render(title: &str, pages: &[Page]) -> ResultReport<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(format!("{e:?}")))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    for (index, page) in pages.iter().enumerate() {
        if index > 0 {
            let (page_index, layer_index) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
            layer = doc.get_page(page_index).get_layer(layer_index);
        }
        for element in &page.elements {
            draw(&layer, &font, element);
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| ReportError::Pdf(format!("{e:?}")))?;
    tracing::debug!("rendered {} page report ({} bytes)", pages.len(), bytes.len());
    Ok(bytes)
}
