//! Page geometry and the low-level drawing surface.
//!
//! All public coordinates are millimetres measured from the top-left corner
//! of the page; the canvas converts them to PDF user space (points, origin at
//! the bottom-left) when the operations are emitted.

use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// Fixed character advance of the Courier fonts, as a fraction of the font
/// size. This is exact for Courier, which is what makes right-aligned numeric
/// columns deterministic without glyph metrics.
const MONO_ADVANCE_EM: f32 = 0.6;

/// Average character advance assumed for Helvetica when wrapping text.
const AVG_CHAR_ADVANCE_EM: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Mono,
    MonoBold,
}

impl Font {
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Mono => "F3",
            Font::MonoBold => "F4",
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Mono => "Courier",
            Font::MonoBold => "Courier-Bold",
        }
    }

    pub fn all() -> [Font; 4] {
        [Font::Regular, Font::Bold, Font::Mono, Font::MonoBold]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const NAVY: Rgb = Rgb(26, 54, 93);
pub const GRAY: Rgb = Rgb(100, 100, 100);
pub const RULE_GRAY: Rgb = Rgb(200, 200, 200);

/// Accumulates page content operations.
pub struct Canvas {
    ops: Vec<Operation>,
}

impl Canvas {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    fn x_pt(x_mm: f32) -> f32 {
        x_mm * MM_TO_PT
    }

    fn y_pt(y_mm: f32) -> f32 {
        (PAGE_HEIGHT_MM - y_mm) * MM_TO_PT
    }

    /// Place a line of text with its left edge at `x_mm` and its baseline at
    /// `y_mm` from the page top.
    pub fn text(&mut self, x_mm: f32, y_mm: f32, font: Font, size: f32, color: Rgb, s: &str) {
        self.text_at_pt(Self::x_pt(x_mm), Self::y_pt(y_mm), font, size, color, s);
    }

    /// Place a fixed-pitch line of text with its right edge at `right_mm`.
    /// Only meaningful for the Courier fonts, whose advance is exact.
    pub fn text_right(
        &mut self,
        right_mm: f32,
        y_mm: f32,
        font: Font,
        size: f32,
        color: Rgb,
        s: &str,
    ) {
        debug_assert!(matches!(font, Font::Mono | Font::MonoBold));
        let width_pt = s.chars().count() as f32 * MONO_ADVANCE_EM * size;
        self.text_at_pt(
            Self::x_pt(right_mm) - width_pt,
            Self::y_pt(y_mm),
            font,
            size,
            color,
            s,
        );
    }

    fn text_at_pt(&mut self, x: f32, y: f32, font: Font, size: f32, color: Rgb, s: &str) {
        self.set_fill_color(color);
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![
                Object::Name(font.resource_name().into()),
                Object::Real(size),
            ],
        ));
        self.ops.push(Operation::new(
            "Td",
            vec![Object::Real(x), Object::Real(y)],
        ));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(
                s.as_bytes().to_vec(),
                StringFormat::Literal,
            )],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// Fill a rectangle whose top edge sits at `top_mm` from the page top.
    pub fn fill_rect(&mut self, x_mm: f32, top_mm: f32, w_mm: f32, h_mm: f32, color: Rgb) {
        self.set_fill_color(color);
        self.ops.push(Operation::new(
            "re",
            vec![
                Object::Real(Self::x_pt(x_mm)),
                Object::Real(Self::y_pt(top_mm + h_mm)),
                Object::Real(w_mm * MM_TO_PT),
                Object::Real(h_mm * MM_TO_PT),
            ],
        ));
        self.ops.push(Operation::new("f", vec![]));
    }

    /// Stroke a thin horizontal rule at `y_mm` from the page top.
    pub fn hline(&mut self, x1_mm: f32, x2_mm: f32, y_mm: f32, color: Rgb) {
        let Rgb(r, g, b) = color;
        self.ops.push(Operation::new(
            "RG",
            vec![
                Object::Real(f32::from(r) / 255.0),
                Object::Real(f32::from(g) / 255.0),
                Object::Real(f32::from(b) / 255.0),
            ],
        ));
        self.ops.push(Operation::new("w", vec![Object::Real(0.5)]));
        self.ops.push(Operation::new(
            "m",
            vec![
                Object::Real(Self::x_pt(x1_mm)),
                Object::Real(Self::y_pt(y_mm)),
            ],
        ));
        self.ops.push(Operation::new(
            "l",
            vec![
                Object::Real(Self::x_pt(x2_mm)),
                Object::Real(Self::y_pt(y_mm)),
            ],
        ));
        self.ops.push(Operation::new("S", vec![]));
    }

    fn set_fill_color(&mut self, color: Rgb) {
        let Rgb(r, g, b) = color;
        self.ops.push(Operation::new(
            "rg",
            vec![
                Object::Real(f32::from(r) / 255.0),
                Object::Real(f32::from(g) / 255.0),
                Object::Real(f32::from(b) / 255.0),
            ],
        ));
    }

    pub fn into_content(self) -> Content {
        Content {
            operations: self.ops,
        }
    }
}

/// Greedy word wrap against an assumed average character advance.
///
/// Embedded newlines start new lines; words longer than a full line are split
/// at the character limit. Always returns at least one (possibly empty) line.
pub fn wrap_text(text: &str, max_width_mm: f32, font_size: f32) -> Vec<String> {
    let max_chars = ((max_width_mm * MM_TO_PT) / (AVG_CHAR_ADVANCE_EM * font_size))
        .floor()
        .max(1.0) as usize;

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            // Break words that cannot fit on a line by themselves.
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split_at = word
                    .char_indices()
                    .nth(max_chars)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                let (head, tail) = word.split_at(split_at);
                lines.push(head.to_string());
                word = tail;
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_embedded_newlines() {
        let lines = wrap_text("first\nsecond line", 180.0, 10.0);
        assert_eq!(lines[0], "first");
        assert_eq!(lines[1], "second line");
    }

    #[test]
    fn wrap_breaks_long_paragraphs_at_word_boundaries() {
        let text = "alpha beta gamma delta";
        // ~11 chars per line at this width and size
        let lines = wrap_text(text, 20.0, 10.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 11));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn wrap_splits_oversized_words() {
        let lines = wrap_text(&"x".repeat(40), 20.0, 10.0);
        assert!(lines.len() >= 4);
        assert_eq!(lines.concat(), "x".repeat(40));
    }

    #[test]
    fn wrap_of_empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 180.0, 10.0), vec![String::new()]);
    }
}
