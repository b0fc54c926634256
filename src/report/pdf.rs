use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::error::{Error, Result};

/// Turns report text into a paginated document artifact
pub trait ReportRenderer: Send + Sync {
    /// Render `body` under a "Meeting Report - {title}" heading, returning
    /// the finished PDF bytes.
    fn render(&self, title: &str, body: &str) -> Result<Vec<u8>>;
}

/// How a single report line is typeset
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line {
    /// Section header: markup-prefixed lines, `#` markers stripped
    Heading(String),
    Body(String),
    /// Paragraph break
    Blank,
}

/// Classify one line of summarizer output. `#`-prefixed lines are headers
/// with the markers removed; `*`-prefixed lines keep their bullet.
pub(crate) fn classify(raw: &str) -> Line {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Line::Blank
    } else if trimmed.starts_with('#') {
        Line::Heading(trimmed.trim_start_matches('#').trim().to_string())
    } else if trimmed.starts_with('*') {
        Line::Heading(trimmed.to_string())
    } else {
        Line::Body(trimmed.to_string())
    }
}

/// Greedy word wrap; a single word longer than `max_chars` gets its own line.
pub(crate) fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// PDF renderer over builtin Helvetica fonts: US-letter pages, 20mm
/// margins, output held in memory until the blob upload.
pub struct PdfRenderer;

impl ReportRenderer for PdfRenderer {
    fn render(&self, title: &str, body: &str) -> Result<Vec<u8>> {
        let doc_title = format!("Meeting Report - {title}");
        let (doc, first_page, first_layer) =
            PdfDocument::new(&doc_title, Mm(215.9), Mm(279.4), "Layer 1");

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| Error::Render(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| Error::Render(e.to_string()))?;

        let mut layer = doc.get_page(first_page).get_layer(first_layer);
        let mut y = 279.4 - 30.0;

        layer.use_text(&doc_title, 24.0, Mm(20.0), Mm(y), &bold);
        y -= 16.0;

        for raw in body.lines() {
            match classify(raw) {
                Line::Blank => {
                    y -= 4.0;
                }
                Line::Heading(text) => {
                    for piece in wrap(&text, 70) {
                        if y < 25.0 {
                            let (page, new_layer) = doc.add_page(Mm(215.9), Mm(279.4), "Layer 1");
                            layer = doc.get_page(page).get_layer(new_layer);
                            y = 279.4 - 25.0;
                        }
                        layer.use_text(&piece, 14.0, Mm(20.0), Mm(y), &bold);
                        y -= 8.0;
                    }
                    y -= 2.0;
                }
                Line::Body(text) => {
                    for piece in wrap(&text, 90) {
                        if y < 25.0 {
                            let (page, new_layer) = doc.add_page(Mm(215.9), Mm(279.4), "Layer 1");
                            layer = doc.get_page(page).get_layer(new_layer);
                            y = 279.4 - 25.0;
                        }
                        layer.use_text(&piece, 11.0, Mm(20.0), Mm(y), &regular);
                        y -= 6.0;
                    }
                }
            }
        }

        doc.save_to_bytes().map_err(|e| Error::Render(e.to_string()))
    }
}
